use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorldConfig {
    #[serde(default)]
    pub world: World,
    #[serde(default)]
    pub window: Window,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub trees: Trees,
    #[serde(default)]
    pub leaves: Leaves,
    #[serde(default)]
    pub stream: Stream,
    #[serde(default)]
    pub avatar: Avatar,
    #[serde(default)]
    pub day: Day,
}

#[derive(Clone, Debug, Deserialize)]
pub struct World {
    #[serde(default = "default_seed")]
    pub seed: i64,
    #[serde(default = "default_block_size")]
    pub block_size: i32,
}
fn default_seed() -> i64 {
    3343
}
fn default_block_size() -> i32 {
    30
}
impl Default for World {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            block_size: default_block_size(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Window {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}
fn default_width() -> f32 {
    1280.0
}
fn default_height() -> f32 {
    720.0
}
impl Default for Window {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_crust_depth")]
    pub crust_depth: i32,
    #[serde(default = "default_base_floor_divisor")]
    pub base_floor_divisor: f32,
    #[serde(default = "default_base_band_divisor")]
    pub base_band_divisor: f32,
    #[serde(default = "default_spatial")]
    pub spatial: f32,
    #[serde(default = "default_carrier")]
    pub carrier: f32,
    #[serde(default = "default_modulating")]
    pub modulating: f32,
}
fn default_crust_depth() -> i32 {
    3
}
fn default_base_floor_divisor() -> f32 {
    3.0
}
fn default_base_band_divisor() -> f32 {
    15.0
}
fn default_spatial() -> f32 {
    2.0
}
fn default_carrier() -> f32 {
    2.3
}
fn default_modulating() -> f32 {
    10.0
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            crust_depth: default_crust_depth(),
            base_floor_divisor: default_base_floor_divisor(),
            base_band_divisor: default_base_band_divisor(),
            spatial: default_spatial(),
            carrier: default_carrier(),
            modulating: default_modulating(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_plant_bound")]
    pub plant_bound: u32,
    #[serde(default = "default_plant_chance")]
    pub plant_chance: u32,
    #[serde(default = "default_trunk_min")]
    pub trunk_min: i32,
    #[serde(default = "default_trunk_range")]
    pub trunk_range: i32,
    #[serde(default = "default_trunk_offset")]
    pub trunk_offset: i32,
}
fn default_plant_bound() -> u32 {
    100
}
fn default_plant_chance() -> u32 {
    5
}
fn default_trunk_min() -> i32 {
    10
}
fn default_trunk_range() -> i32 {
    7
}
fn default_trunk_offset() -> i32 {
    2
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            plant_bound: default_plant_bound(),
            plant_chance: default_plant_chance(),
            trunk_min: default_trunk_min(),
            trunk_range: default_trunk_range(),
            trunk_offset: default_trunk_offset(),
        }
    }
}

/// Leaf behaviour. Every field may be changed while running.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Leaves {
    pub size: f32,
    pub average: u32,
    pub variation: u32,
    pub spread: f32,
    pub sway_phase_max: f32,
    pub max_angle: f32,
    pub angle_cycle: f32,
    pub width_cycle: f32,
    pub fall_delay_max: f32,
    pub fall_speed: f32,
    pub drift_speed: f32,
    pub drift_cycle: f32,
    pub fade_out: f32,
    pub fade_in: f32,
}
impl Default for Leaves {
    fn default() -> Self {
        Self {
            size: 30.0,
            average: 40,
            variation: 5,
            spread: 7.0,
            sway_phase_max: 1.0,
            max_angle: 40.0,
            angle_cycle: 6.0,
            width_cycle: 3.0,
            fall_delay_max: 600.0,
            fall_speed: 100.0,
            drift_speed: 100.0,
            drift_cycle: 5.0,
            fade_out: 7.0,
            fade_in: 2.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Stream {
    #[serde(default = "default_frames_in_window")]
    pub frames_in_window: i32,
}
fn default_frames_in_window() -> i32 {
    3
}
impl Default for Stream {
    fn default() -> Self {
        Self {
            frames_in_window: default_frames_in_window(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Avatar {
    pub speed: f32,
    pub fly_speed: f32,
    pub jump_speed: f32,
    pub max_rise_speed: f32,
    pub max_fall_speed: f32,
    pub gravity: f32,
    pub max_energy: f32,
    pub energy_step: f32,
    pub spawn_y: f32,
    pub fell_through_y: f32,
    pub respawn_y: f32,
}
impl Default for Avatar {
    fn default() -> Self {
        Self {
            speed: 300.0,
            fly_speed: 50.0,
            jump_speed: 280.0,
            max_rise_speed: 300.0,
            max_fall_speed: 200.0,
            gravity: 500.0,
            max_energy: 100.0,
            energy_step: 0.5,
            spawn_y: -400.0,
            fell_through_y: 1800.0,
            respawn_y: -1000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Day {
    pub cycle_length: f32,
    pub night_opacity: f32,
    pub sun_radius: f32,
    pub orbit_radius: f32,
}
impl Default for Day {
    fn default() -> Self {
        Self {
            cycle_length: 50.0,
            night_opacity: 0.5,
            sun_radius: 100.0,
            orbit_radius: 200.0,
        }
    }
}

// Flattened params snapshot for runtime use
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldGenParams {
    pub seed: i64,
    pub block_size: i32,
    pub window_width: f32,
    pub window_height: f32,
    pub crust_depth: i32,
    pub base_floor_divisor: f32,
    pub base_band_divisor: f32,
    pub spatial: f32,
    pub carrier: f32,
    pub modulating: f32,
    pub plant_bound: u32,
    pub plant_chance: u32,
    pub trunk_min: i32,
    pub trunk_range: i32,
    pub trunk_offset: i32,
    pub frames_in_window: i32,
    pub leaves: Leaves,
    pub avatar: Avatar,
    pub day: Day,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self {
            seed: cfg.world.seed,
            block_size: cfg.world.block_size,
            window_width: cfg.window.width,
            window_height: cfg.window.height,
            crust_depth: cfg.terrain.crust_depth,
            base_floor_divisor: cfg.terrain.base_floor_divisor,
            base_band_divisor: cfg.terrain.base_band_divisor,
            spatial: cfg.terrain.spatial,
            carrier: cfg.terrain.carrier,
            modulating: cfg.terrain.modulating,
            plant_bound: cfg.trees.plant_bound,
            plant_chance: cfg.trees.plant_chance,
            trunk_min: cfg.trees.trunk_min,
            trunk_range: cfg.trees.trunk_range,
            trunk_offset: cfg.trees.trunk_offset,
            frames_in_window: cfg.stream.frames_in_window,
            leaves: cfg.leaves,
            avatar: cfg.avatar,
            day: cfg.day,
        }
    }

    /// Width of one streaming frame, a whole number of blocks.
    #[inline]
    pub fn frame_width(&self) -> i32 {
        if self.block_size <= 0 || self.frames_in_window <= 0 {
            return 0;
        }
        let blocks = (self.window_width / self.frames_in_window as f32 / self.block_size as f32)
            .floor() as i32;
        blocks * self.block_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { field, value })
            }
        }
        positive("world.block_size", self.block_size as f64)?;
        positive("window.width", self.window_width as f64)?;
        positive("window.height", self.window_height as f64)?;
        positive("stream.frames_in_window", self.frames_in_window as f64)?;
        positive("terrain.crust_depth", self.crust_depth as f64)?;
        positive("terrain.base_floor_divisor", self.base_floor_divisor as f64)?;
        positive("terrain.base_band_divisor", self.base_band_divisor as f64)?;
        positive("terrain.spatial", self.spatial as f64)?;
        positive("trees.plant_bound", self.plant_bound as f64)?;
        positive("trees.trunk_min", self.trunk_min as f64)?;
        positive("leaves.size", self.leaves.size as f64)?;
        positive("day.cycle_length", self.day.cycle_length as f64)?;
        if self.frames_in_window < 3 {
            return Err(ConfigError::OutOfRange {
                field: "stream.frames_in_window",
                reason: format!(
                    "need at least 3 frames so the window does not slide back and forth (got {})",
                    self.frames_in_window
                ),
            });
        }
        if self.trunk_range < 0 {
            return Err(ConfigError::OutOfRange {
                field: "trees.trunk_range",
                reason: format!("must not be negative (got {})", self.trunk_range),
            });
        }
        if self.plant_chance > self.plant_bound {
            return Err(ConfigError::OutOfRange {
                field: "trees.plant_chance",
                reason: format!(
                    "{} exceeds plant_bound {}",
                    self.plant_chance, self.plant_bound
                ),
            });
        }
        if self.frame_width() <= 0 {
            return Err(ConfigError::FrameTooNarrow {
                width: self.window_width,
                frames: self.frames_in_window,
                block: self.block_size,
            });
        }
        Ok(())
    }

    /// Takes the live-tunable sections from `fresh`. Returns true if any other
    /// section differs, since those only apply to a new world.
    pub fn apply_live(&mut self, fresh: &WorldGenParams) -> bool {
        let mut structural = *fresh;
        structural.leaves = self.leaves;
        structural.day = self.day;
        let ignored = structural != *self;
        self.leaves = fresh.leaves;
        self.day = fresh.day;
        ignored
    }
}

pub fn parse_params(s: &str) -> Result<WorldGenParams, Box<dyn Error>> {
    let cfg: WorldConfig = toml::from_str(s)?;
    let params = WorldGenParams::from_config(&cfg);
    params.validate()?;
    Ok(params)
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    parse_params(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let p = parse_params("").unwrap();
        assert_eq!(p, WorldGenParams::default());
        assert_eq!(p.seed, 3343);
        assert_eq!(p.block_size, 30);
        assert_eq!(p.frame_width(), 420);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let p = parse_params(
            r#"
            [world]
            seed = 7

            [leaves]
            fall_speed = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(p.seed, 7);
        assert_eq!(p.block_size, 30);
        assert_eq!(p.leaves.fall_speed, 40.0);
        assert_eq!(p.leaves.average, 40);
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let mut p = WorldGenParams::default();
        p.block_size = 0;
        assert_eq!(
            p.validate(),
            Err(ConfigError::NonPositive {
                field: "world.block_size",
                value: 0.0
            })
        );
    }

    #[test]
    fn two_frames_are_rejected() {
        let mut p = WorldGenParams::default();
        p.frames_in_window = 2;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::OutOfRange {
                field: "stream.frames_in_window",
                ..
            })
        ));
    }

    #[test]
    fn narrow_window_is_rejected() {
        let mut p = WorldGenParams::default();
        p.window_width = 60.0;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::FrameTooNarrow { frames: 3, .. })
        ));
    }

    #[test]
    fn live_reload_only_takes_leaves_and_day() {
        let mut current = WorldGenParams::default();
        let mut fresh = current;
        fresh.leaves.fade_out = 3.0;
        fresh.day.cycle_length = 20.0;
        assert!(!current.apply_live(&fresh));
        assert_eq!(current.leaves.fade_out, 3.0);
        assert_eq!(current.day.cycle_length, 20.0);

        fresh.seed = 1;
        assert!(current.apply_live(&fresh));
        assert_eq!(current.seed, 3343);
    }
}
