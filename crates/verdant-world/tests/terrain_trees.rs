use std::sync::Arc;

use verdant_scene::{Host, Layer, Scene};
use verdant_world::{
    GroundKind, HeightField, IndexError, Palette, TerrainGenerator, TreeGenerator, WorldGenParams,
};

fn generators() -> (TerrainGenerator, TreeGenerator, WorldGenParams) {
    let params = WorldGenParams::default();
    let heights = HeightField::new(&params);
    let palette = Arc::new(Palette::new(params.seed));
    (
        TerrainGenerator::new(&params, heights, palette.clone()),
        TreeGenerator::new(&params, heights, palette),
        params,
    )
}

#[test]
fn create_then_remove_leaves_nothing_behind() {
    let (mut terrain, mut trees, _) = generators();
    let mut scene = Scene::new();
    let columns = terrain.create_in_range(&mut scene, -1260, 1260).unwrap();
    let grown = trees.create_in_range(&mut scene, -1260, 1260).unwrap();
    assert_eq!(columns, 84);
    assert_eq!(trees.tree_cells().len(), grown);
    assert!(scene.layer_len(Layer::Terrain) >= 3 * columns);
    assert_eq!(scene.layer_len(Layer::Trunks) > 0, grown > 0);

    assert_eq!(terrain.remove_in_range(&mut scene, -1260, 1260), Ok(columns));
    assert_eq!(trees.remove_in_range(&mut scene, -1260, 1260), Ok(grown));
    assert!(scene.is_empty());
    assert!(terrain.columns().is_empty());
    assert!(trees.tree_cells().is_empty());
    assert_eq!(trees.leaves().leaf_total(), 0);
}

#[test]
fn ranges_are_half_open() {
    let (mut terrain, _, _) = generators();
    let mut scene = Scene::new();
    terrain.create_in_range(&mut scene, 0, 90).unwrap();
    assert_eq!(terrain.columns().cells(), vec![0, 30, 60]);
    terrain.create_in_range(&mut scene, 90, 120).unwrap();
    assert_eq!(terrain.columns().cells(), vec![0, 30, 60, 90]);
}

#[test]
fn negative_min_rounds_down() {
    let (mut terrain, _, _) = generators();
    let mut scene = Scene::new();
    terrain.create_in_range(&mut scene, -45, 0).unwrap();
    assert_eq!(terrain.columns().cells(), vec![-60, -30]);
}

#[test]
fn double_create_and_missing_remove_are_errors() {
    let (mut terrain, _, _) = generators();
    let mut scene = Scene::new();
    terrain.create_in_range(&mut scene, 0, 60).unwrap();
    let live = scene.len();
    assert_eq!(
        terrain.create_in_range(&mut scene, 30, 60),
        Err(IndexError::AlreadyPresent(30))
    );
    assert_eq!(scene.len(), live);
    assert_eq!(
        terrain.remove_in_range(&mut scene, 60, 90),
        Err(IndexError::NotFound(60))
    );
}

#[test]
fn solid_blocks_live_in_terrain_layer() {
    let (mut terrain, _, _) = generators();
    let mut scene = Scene::new();
    terrain.create_in_range(&mut scene, 0, 30).unwrap();
    for &(id, kind) in terrain.columns().get(0).unwrap() {
        let expected = match kind {
            GroundKind::Solid => Layer::Terrain,
            GroundKind::Filler => Layer::Filler,
        };
        assert_eq!(scene.layer_of(id), Some(expected));
    }
}

#[test]
fn tree_removal_catches_falling_leaves() {
    let (_, mut trees, params) = generators();
    let mut scene = Scene::new();
    let x = (0..10_000)
        .map(|i| i * params.block_size)
        .find(|&x| trees.is_planted(x))
        .unwrap();
    trees.create_in_range(&mut scene, x, x + params.block_size).unwrap();
    assert_eq!(trees.trunk_ids(x).len() as i32, trees.trunk_len(x));

    // long enough for some leaves to be mid-fall
    for _ in 0..400 {
        trees.update(&mut scene, 1.0);
        scene.step(1.0);
        for contact in scene.drain_contacts() {
            trees.on_contact(&mut scene, &contact);
        }
    }
    trees.remove_in_range(&mut scene, x, x + params.block_size).unwrap();
    assert!(scene.is_empty());
}
