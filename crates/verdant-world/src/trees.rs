use std::sync::Arc;

use verdant_geom::Vec2;
use verdant_scene::{Body, Contact, EntityId, Host, Layer};

use crate::cell_index::{CellIndex, cell_span};
use crate::error::IndexError;
use crate::height::HeightField;
use crate::leaves::LeafSystem;
use crate::palette::{Palette, TRUNK};
use crate::rng::{SALT_PLANT, SALT_TRUNK, SeededRng, hash2, unit_from};
use crate::worldgen::WorldGenParams;

/// Whether a tree grows in the column at `x`. Shared by creation and removal so
/// both always agree.
#[inline]
pub fn plant_test(x: i32, seed: i64, bound: u32, chance: u32) -> bool {
    SeededRng::new(hash2(x as i64, seed, SALT_PLANT)).below(bound.max(1)) < chance
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TreePart {
    Trunk(EntityId),
    Canopy(i32),
}

pub struct TreeGenerator {
    heights: HeightField,
    seed: i64,
    block: i32,
    window_height: f32,
    plant_bound: u32,
    plant_chance: u32,
    trunk_min: i32,
    trunk_range: i32,
    trunk_offset: i32,
    palette: Arc<Palette>,
    trees: CellIndex<TreePart>,
    leaves: LeafSystem,
}

impl TreeGenerator {
    pub fn new(params: &WorldGenParams, heights: HeightField, palette: Arc<Palette>) -> Self {
        let leaves = LeafSystem::new(
            params.leaves,
            params.seed,
            params.block_size as f32,
            palette.clone(),
        );
        Self {
            heights,
            seed: params.seed,
            block: params.block_size,
            window_height: params.window_height,
            plant_bound: params.plant_bound,
            plant_chance: params.plant_chance,
            trunk_min: params.trunk_min,
            trunk_range: params.trunk_range,
            trunk_offset: params.trunk_offset,
            palette,
            trees: CellIndex::new(),
            leaves,
        }
    }

    #[inline]
    pub fn is_planted(&self, x: i32) -> bool {
        plant_test(x, self.seed, self.plant_bound, self.plant_chance)
    }

    pub fn trunk_len(&self, x: i32) -> i32 {
        let r = unit_from(hash2(x as i64, self.seed, SALT_TRUNK));
        self.trunk_min + (self.trunk_range as f32 * r).floor() as i32
    }

    /// Number of blocks from the window bottom to the first trunk block.
    fn base_blocks(&self, x: i32) -> i32 {
        let h = self.heights.height_at(x as f32);
        ((self.window_height - h) / self.block as f32).floor() as i32 + self.trunk_offset
    }

    /// Trunk block corners bottom-up, and the canopy anchor above them.
    pub fn trunk_layout(&self, x: i32) -> (Vec<Vec2>, Vec2) {
        let s = self.block as f32;
        let base = self.base_blocks(x);
        let len = self.trunk_len(x);
        let blocks = (1..=len)
            .map(|i| Vec2::new(x as f32, self.window_height - (base + i) as f32 * s))
            .collect();
        let anchor = Vec2::new(x as f32, self.window_height - (base + len) as f32 * s);
        (blocks, anchor)
    }

    /// Grows every planted column in `[min, max)`. Returns the number of trees.
    pub fn create_in_range<H: Host>(
        &mut self,
        host: &mut H,
        min: i32,
        max: i32,
    ) -> Result<usize, IndexError> {
        let size = Vec2::new(self.block as f32, self.block as f32);
        let mut grown = 0;
        for x in cell_span(min, max, self.block) {
            if !self.is_planted(x) {
                continue;
            }
            if self.trees.contains(x) {
                return Err(IndexError::AlreadyPresent(x));
            }
            let (blocks, anchor) = self.trunk_layout(x);
            let mut parts: Vec<TreePart> = blocks
                .into_iter()
                .map(|pos| {
                    let color = self.palette.approximate(TRUNK, pos);
                    TreePart::Trunk(host.add(Body::new(pos, size, color), Layer::Trunks))
                })
                .collect();
            self.leaves.populate(host, x, anchor)?;
            parts.push(TreePart::Canopy(x));
            self.trees.put(x, parts)?;
            grown += 1;
        }
        log::trace!("trees created [{}, {}): {}", min, max, grown);
        Ok(grown)
    }

    pub fn remove_in_range<H: Host>(
        &mut self,
        host: &mut H,
        min: i32,
        max: i32,
    ) -> Result<usize, IndexError> {
        let mut felled = 0;
        for x in cell_span(min, max, self.block) {
            if !self.is_planted(x) {
                continue;
            }
            for part in self.trees.remove(x)? {
                match part {
                    TreePart::Trunk(id) => {
                        if !host.remove(id, Layer::Trunks) {
                            log::warn!("trunk block {:?} at {} already gone", id, x);
                        }
                    }
                    TreePart::Canopy(cell) => {
                        self.leaves.destroy(host, cell)?;
                    }
                }
            }
            felled += 1;
        }
        log::trace!("trees removed [{}, {}): {}", min, max, felled);
        Ok(felled)
    }

    pub fn update<H: Host>(&mut self, host: &mut H, dt: f32) {
        self.leaves.update(host, dt);
    }

    pub fn on_contact<H: Host>(&mut self, host: &mut H, contact: &Contact) -> bool {
        self.leaves.on_contact(host, contact)
    }

    pub fn leaves(&self) -> &LeafSystem {
        &self.leaves
    }

    pub fn leaves_mut(&mut self) -> &mut LeafSystem {
        &mut self.leaves
    }

    /// Cells with a live tree, ascending.
    pub fn tree_cells(&self) -> Vec<i32> {
        self.trees.cells()
    }

    pub fn trunk_ids(&self, x: i32) -> Vec<EntityId> {
        self.trees
            .get(x)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| match p {
                        TreePart::Trunk(id) => Some(*id),
                        TreePart::Canopy(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
