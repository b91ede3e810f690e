use std::sync::Arc;

use verdant_geom::Vec2;
use verdant_scene::{Body, EntityId, Host, Layer};

use crate::cell_index::{CellIndex, cell_span};
use crate::error::IndexError;
use crate::height::HeightField;
use crate::palette::{GROUND, Palette};
use crate::worldgen::WorldGenParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundKind {
    /// Crust block; collides.
    Solid,
    /// Visual fill below the crust.
    Filler,
}

impl GroundKind {
    #[inline]
    pub fn layer(self) -> Layer {
        match self {
            GroundKind::Solid => Layer::Terrain,
            GroundKind::Filler => Layer::Filler,
        }
    }
}

pub struct TerrainGenerator {
    heights: HeightField,
    block: i32,
    window_height: f32,
    crust_depth: i32,
    palette: Arc<Palette>,
    columns: CellIndex<(EntityId, GroundKind)>,
}

impl TerrainGenerator {
    pub fn new(params: &WorldGenParams, heights: HeightField, palette: Arc<Palette>) -> Self {
        Self {
            heights,
            block: params.block_size,
            window_height: params.window_height,
            crust_depth: params.crust_depth,
            palette,
            columns: CellIndex::new(),
        }
    }

    #[inline]
    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.heights.height_at(x)
    }

    /// Block layout of the column at `x`: top-left corners from the window bottom
    /// upward, each tagged with its kind.
    pub fn column_layout(&self, x: i32) -> Vec<(Vec2, GroundKind)> {
        let s = self.block as f32;
        let h = self.heights.height_at(x as f32);
        let limit = self.window_height - h + (self.crust_depth - 1) as f32 * s;
        let mut out = Vec::new();
        let mut k = 0;
        while (k as f32) * s < limit {
            let top = self.window_height - (k + 1) as f32 * s;
            let kind = if top <= h {
                GroundKind::Solid
            } else {
                GroundKind::Filler
            };
            out.push((Vec2::new(x as f32, top), kind));
            k += 1;
        }
        out
    }

    /// Materializes every column in `[min, max)`. Returns the number of columns built.
    pub fn create_in_range<H: Host>(
        &mut self,
        host: &mut H,
        min: i32,
        max: i32,
    ) -> Result<usize, IndexError> {
        let size = Vec2::new(self.block as f32, self.block as f32);
        let mut built = 0;
        for x in cell_span(min, max, self.block) {
            if self.columns.contains(x) {
                return Err(IndexError::AlreadyPresent(x));
            }
            let column: Vec<(EntityId, GroundKind)> = self
                .column_layout(x)
                .into_iter()
                .map(|(pos, kind)| {
                    let color = self.palette.approximate(GROUND, pos);
                    (host.add(Body::new(pos, size, color), kind.layer()), kind)
                })
                .collect();
            self.columns.put(x, column)?;
            built += 1;
        }
        log::trace!("terrain created [{}, {}): {} columns", min, max, built);
        Ok(built)
    }

    pub fn remove_in_range<H: Host>(
        &mut self,
        host: &mut H,
        min: i32,
        max: i32,
    ) -> Result<usize, IndexError> {
        let mut removed = 0;
        for x in cell_span(min, max, self.block) {
            for (id, kind) in self.columns.remove(x)? {
                if !host.remove(id, kind.layer()) {
                    log::warn!("terrain block {:?} at {} missing from {}", id, x, kind.layer().name());
                }
            }
            removed += 1;
        }
        log::trace!("terrain removed [{}, {}): {} columns", min, max, removed);
        Ok(removed)
    }

    pub fn columns(&self) -> &CellIndex<(EntityId, GroundKind)> {
        &self.columns
    }
}
