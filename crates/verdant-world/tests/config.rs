use verdant_world::WorldGenParams;
use verdant_world::worldgen::{load_params_from_path, parse_params};

#[test]
fn sample_config_matches_defaults() {
    let text = include_str!("../../../config/world.toml");
    assert_eq!(parse_params(text).unwrap(), WorldGenParams::default());
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_params_from_path(std::path::Path::new("/nonexistent/world.toml")).is_err());
}

#[test]
fn invalid_values_fail_validation() {
    let err = parse_params("[world]\nblock_size = 0\n").unwrap_err();
    assert!(err.to_string().contains("world.block_size"));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(parse_params("[world\nseed = 1").is_err());
}
