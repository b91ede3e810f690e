//! Procedural side-scroller world: height field, cell index and the terrain, tree
//! and leaf generators that materialize ranges of columns into a [`Host`].
//!
//! [`Host`]: verdant_scene::Host
#![forbid(unsafe_code)]

pub mod cell_index;
pub mod error;
pub mod height;
pub mod leaves;
pub mod palette;
pub mod rng;
pub mod terrain;
pub mod trees;
pub mod worldgen;

pub use cell_index::{CellIndex, cell_span};
pub use error::{ConfigError, IndexError, WorldError};
pub use height::HeightField;
pub use leaves::{LeafState, LeafSystem};
pub use palette::Palette;
pub use terrain::{GroundKind, TerrainGenerator};
pub use trees::{TreeGenerator, plant_test};
pub use worldgen::{WorldConfig, WorldGenParams};
