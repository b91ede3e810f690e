//! Canopies and the per-leaf Attached/Falling lifecycle.
//!
//! An attached leaf sways in place on its own phase and, after a seeded delay,
//! detaches: it moves to the falling layer, drifts sideways while fading out and
//! freezes on the first ground contact. When the fade completes it returns home,
//! fades back in and starts over.

use std::sync::Arc;

use hashbrown::HashMap;
use verdant_geom::Vec2;
use verdant_scene::{Body, Contact, EntityId, Host, Layer, Repeat, Timer, Tween};

use crate::error::IndexError;
use crate::palette::{LEAF, Palette};
use crate::rng::{
    SALT_DRIFT, SALT_FALL, SALT_LEAF_COUNT, SALT_LEAF_X, SALT_LEAF_Y, SALT_SWAY, hash3,
    unit_from,
};
use crate::worldgen::Leaves as LeafParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafState {
    Attached,
    Falling,
}

impl LeafState {
    #[inline]
    pub fn layer(self) -> Layer {
        match self {
            LeafState::Attached => Layer::Leaves,
            LeafState::Falling => Layer::FallingLeaves,
        }
    }
}

/// Seeded draws fixed for the leaf's lifetime.
#[derive(Clone, Copy, Debug)]
struct LeafSeeds {
    sway_phase: f32,
    fall_delay: f32,
    drift: f32,
}

#[derive(Debug)]
struct Leaf {
    id: EntityId,
    home: Vec2,
    state: LeafState,
    landed: bool,
    seeds: LeafSeeds,
    sway_delay: Option<Timer>,
    fall_delay: Option<Timer>,
    angle: Option<Tween>,
    width: Option<Tween>,
    drift: Option<Tween>,
    fade: Option<Tween>,
}

impl Leaf {
    fn new(id: EntityId, home: Vec2, seeds: LeafSeeds, params: &LeafParams) -> Self {
        Self {
            id,
            home,
            state: LeafState::Attached,
            landed: false,
            seeds,
            sway_delay: Some(Timer::once(seeds.sway_phase)),
            fall_delay: Some(Timer::once(seeds.fall_delay * params.fall_delay_max)),
            angle: None,
            width: None,
            drift: None,
            fade: None,
        }
    }

    fn start_sway(&mut self, params: &LeafParams) {
        self.angle = Some(Tween::linear(
            0.0,
            params.max_angle,
            params.angle_cycle,
            Repeat::BackAndForth,
        ));
        self.width = Some(Tween::linear(
            0.0,
            params.size / 3.0,
            params.width_cycle,
            Repeat::BackAndForth,
        ));
    }

    fn detach<H: Host>(&mut self, host: &mut H, params: &LeafParams) {
        if !host.relayer(self.id, Layer::Leaves, Layer::FallingLeaves) {
            log::warn!("leaf {:?} was not attached when its fall began", self.id);
        }
        host.set_layers_collide(Layer::FallingLeaves, Layer::Terrain, true);
        host.set_layers_collide(Layer::FallingLeaves, Layer::Leaves, false);
        let opacity = host.body(self.id).map(|b| b.look.opacity).unwrap_or(1.0);
        if let Some(body) = host.body_mut(self.id) {
            body.vel = Vec2::new(0.0, params.fall_speed);
        }
        let d = (self.seeds.drift - 0.5) * params.drift_speed;
        self.drift = Some(Tween::linear(d, -d, params.drift_cycle, Repeat::BackAndForth));
        self.fade = Some(Tween::linear(opacity, 0.0, params.fade_out, Repeat::Once));
        self.state = LeafState::Falling;
        self.landed = false;
    }

    fn land<H: Host>(&mut self, host: &mut H) {
        if let Some(body) = host.body_mut(self.id) {
            body.vel = Vec2::ZERO;
        }
        self.sway_delay = None;
        self.drift = None;
        self.angle = None;
        self.width = None;
        self.landed = true;
    }

    fn reattach<H: Host>(&mut self, host: &mut H, params: &LeafParams) {
        if !host.relayer(self.id, Layer::FallingLeaves, Layer::Leaves) {
            log::warn!("leaf {:?} was not falling when it returned home", self.id);
        }
        if let Some(body) = host.body_mut(self.id) {
            body.vel = Vec2::ZERO;
            body.pos = self.home;
            body.look.angle = 0.0;
            body.look.width_inset = 0.0;
            body.look.opacity = 0.0;
        }
        self.state = LeafState::Attached;
        self.landed = false;
        self.drift = None;
        self.angle = None;
        self.width = None;
        self.fade = Some(Tween::linear(0.0, 1.0, params.fade_in, Repeat::Once));
        self.sway_delay = Some(Timer::once(self.seeds.sway_phase));
        self.fall_delay = Some(Timer::once(self.seeds.fall_delay * params.fall_delay_max));
    }

    fn update<H: Host>(&mut self, host: &mut H, params: &LeafParams, dt: f32) {
        if let Some(timer) = self.sway_delay.as_mut() {
            if timer.advance(dt) > 0 {
                self.sway_delay = None;
                self.start_sway(params);
            }
        }
        if self.state == LeafState::Attached {
            if let Some(timer) = self.fall_delay.as_mut() {
                if timer.advance(dt) > 0 {
                    self.fall_delay = None;
                    self.detach(host, params);
                }
            }
        }

        let angle = self.angle.as_mut().map(|tw| tw.advance(dt));
        let width = self.width.as_mut().map(|tw| tw.advance(dt));
        let drift = self.drift.as_mut().map(|tw| tw.advance(dt));
        let fade = self.fade.as_mut().map(|tw| (tw.advance(dt), tw.is_finished()));
        if let Some(body) = host.body_mut(self.id) {
            if let Some(a) = angle {
                body.look.angle = a;
            }
            if let Some(w) = width {
                body.look.width_inset = w;
            }
            if let Some(vx) = drift {
                body.vel.x = vx;
            }
            if let Some((opacity, _)) = fade {
                body.look.opacity = opacity;
            }
        }

        if let Some((_, true)) = fade {
            self.fade = None;
            if self.state == LeafState::Falling {
                self.reattach(host, params);
            }
        }
    }
}

#[derive(Debug)]
struct Canopy {
    anchor: Vec2,
    leaves: Vec<Leaf>,
}

pub struct LeafSystem {
    params: LeafParams,
    seed: i64,
    block: f32,
    palette: Arc<Palette>,
    canopies: HashMap<i32, Canopy>,
    owners: HashMap<EntityId, (i32, usize)>,
}

impl LeafSystem {
    pub fn new(params: LeafParams, seed: i64, block: f32, palette: Arc<Palette>) -> Self {
        Self {
            params,
            seed,
            block,
            palette,
            canopies: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    pub fn params(&self) -> &LeafParams {
        &self.params
    }

    /// Applies to timers and tweens started from now on.
    pub fn set_params(&mut self, params: LeafParams) {
        self.params = params;
    }

    pub fn leaf_count(&self, anchor: Vec2) -> usize {
        let (ax, ay) = (anchor.x.round() as i64, anchor.y.round() as i64);
        let r = unit_from(hash3(ax, ay, self.seed, SALT_LEAF_COUNT));
        self.params.average as usize + (self.params.variation as f32 * r).floor() as usize
    }

    /// Home positions (top-left) of every leaf around `anchor`.
    pub fn leaf_homes(&self, anchor: Vec2) -> Vec<Vec2> {
        let (ax, ay) = (anchor.x.round() as i64, anchor.y.round() as i64);
        let reach = self.params.spread * self.block;
        (0..self.leaf_count(anchor))
            .map(|i| {
                let rx = unit_from(hash3(ax, i as i64, self.seed, SALT_LEAF_X));
                let ry = unit_from(hash3(ay, i as i64, self.seed, SALT_LEAF_Y));
                anchor + Vec2::new(reach * (rx - 0.5), reach * (ry - 0.5))
            })
            .collect()
    }

    fn seeds_for(&self, home: Vec2, i: usize) -> LeafSeeds {
        let hx = home.x.round() as i64 ^ ((i as i64) << 32);
        let hy = home.y.round() as i64;
        LeafSeeds {
            sway_phase: self.params.sway_phase_max * unit_from(hash3(hx, hy, self.seed, SALT_SWAY)),
            fall_delay: unit_from(hash3(hx, hy, self.seed, SALT_FALL)),
            drift: unit_from(hash3(hx, hy, self.seed, SALT_DRIFT)),
        }
    }

    /// Spawns the canopy for the tree at `cell`. Returns the number of leaves.
    pub fn populate<H: Host>(
        &mut self,
        host: &mut H,
        cell: i32,
        anchor: Vec2,
    ) -> Result<usize, IndexError> {
        if self.canopies.contains_key(&cell) {
            return Err(IndexError::AlreadyPresent(cell));
        }
        host.set_layers_collide(Layer::Leaves, Layer::Leaves, false);
        let size = Vec2::new(self.params.size, self.params.size);
        let mut leaves = Vec::new();
        for (i, home) in self.leaf_homes(anchor).into_iter().enumerate() {
            let color = self.palette.approximate(LEAF, home);
            let body = Body::new(home, size, color).dynamic().blocking();
            let id = host.add(body, Layer::Leaves);
            self.owners.insert(id, (cell, i));
            leaves.push(Leaf::new(id, home, self.seeds_for(home, i), &self.params));
        }
        let count = leaves.len();
        self.canopies.insert(cell, Canopy { anchor, leaves });
        Ok(count)
    }

    /// Removes every leaf of the canopy at `cell` from whichever layer it is in.
    pub fn destroy<H: Host>(&mut self, host: &mut H, cell: i32) -> Result<usize, IndexError> {
        let canopy = self
            .canopies
            .remove(&cell)
            .ok_or(IndexError::NotFound(cell))?;
        for leaf in &canopy.leaves {
            self.owners.remove(&leaf.id);
            if !host.remove(leaf.id, leaf.state.layer()) {
                log::warn!(
                    "leaf {:?} of canopy {} not found in {}",
                    leaf.id,
                    cell,
                    leaf.state.layer().name()
                );
            }
        }
        Ok(canopy.leaves.len())
    }

    pub fn update<H: Host>(&mut self, host: &mut H, dt: f32) {
        let params = self.params;
        for canopy in self.canopies.values_mut() {
            for leaf in &mut canopy.leaves {
                leaf.update(host, &params, dt);
            }
        }
    }

    /// Routes a contact to its leaf. Returns true if the contact belonged to a leaf.
    pub fn on_contact<H: Host>(&mut self, host: &mut H, contact: &Contact) -> bool {
        let Some(&(cell, i)) = self.owners.get(&contact.entity) else {
            return false;
        };
        let Some(leaf) = self.canopies.get_mut(&cell).and_then(|c| c.leaves.get_mut(i)) else {
            return false;
        };
        if leaf.state == LeafState::Falling && !leaf.landed && contact.other_layer.is_ground() {
            leaf.land(host);
        }
        true
    }

    pub fn leaf_state(&self, id: EntityId) -> Option<LeafState> {
        let &(cell, i) = self.owners.get(&id)?;
        self.canopies.get(&cell)?.leaves.get(i).map(|l| l.state)
    }

    pub fn is_landed(&self, id: EntityId) -> bool {
        self.owners
            .get(&id)
            .and_then(|&(cell, i)| self.canopies.get(&cell)?.leaves.get(i))
            .is_some_and(|l| l.landed)
    }

    pub fn leaf_ids(&self, cell: i32) -> Vec<EntityId> {
        self.canopies
            .get(&cell)
            .map(|c| c.leaves.iter().map(|l| l.id).collect())
            .unwrap_or_default()
    }

    pub fn anchor(&self, cell: i32) -> Option<Vec2> {
        self.canopies.get(&cell).map(|c| c.anchor)
    }

    #[inline]
    pub fn canopy_count(&self) -> usize {
        self.canopies.len()
    }

    #[inline]
    pub fn leaf_total(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_scene::Scene;

    fn system(params: LeafParams) -> LeafSystem {
        LeafSystem::new(params, 3343, 30.0, Arc::new(Palette::new(3343)))
    }

    fn quick() -> LeafParams {
        LeafParams {
            fall_delay_max: 0.0,
            sway_phase_max: 0.0,
            fade_out: 2.0,
            fade_in: 1.0,
            ..LeafParams::default()
        }
    }

    #[test]
    fn canopy_size_and_spread() {
        let sys = system(LeafParams::default());
        let anchor = Vec2::new(600.0, 150.0);
        let homes = sys.leaf_homes(anchor);
        assert!((40..45).contains(&homes.len()));
        for h in homes {
            assert!((h.x - anchor.x).abs() <= 105.0);
            assert!((h.y - anchor.y).abs() <= 105.0);
        }
        assert_eq!(sys.leaf_homes(anchor), sys.leaf_homes(anchor));
    }

    #[test]
    fn leaf_detaches_and_comes_home() {
        let mut scene = Scene::new();
        let mut sys = system(quick());
        let n = sys.populate(&mut scene, 0, Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(scene.layer_len(Layer::Leaves), n);

        sys.update(&mut scene, 0.01);
        assert_eq!(scene.layer_len(Layer::FallingLeaves), n);
        assert!(scene.layers_collide(Layer::FallingLeaves, Layer::Terrain));
        let id = sys.leaf_ids(0)[0];
        assert_eq!(sys.leaf_state(id), Some(LeafState::Falling));
        assert_eq!(scene.body(id).unwrap().vel.y, 100.0);

        for _ in 0..2 {
            sys.update(&mut scene, 1.0);
        }
        assert_eq!(sys.leaf_state(id), Some(LeafState::Attached));
        assert_eq!(scene.layer_of(id), Some(Layer::Leaves));
        let body = scene.body(id).unwrap();
        assert_eq!(body.vel, Vec2::ZERO);
        assert!(body.look.opacity < 1.0);
    }

    #[test]
    fn ground_contact_freezes_falling_leaf() {
        let mut scene = Scene::new();
        let mut sys = system(quick());
        sys.populate(&mut scene, 0, Vec2::new(0.0, 0.0)).unwrap();
        sys.update(&mut scene, 0.01);
        let id = sys.leaf_ids(0)[0];
        let ground = scene.add(
            Body::new(Vec2::new(-500.0, 500.0), Vec2::new(1000.0, 30.0), [0, 0, 0, 255]),
            Layer::Terrain,
        );

        let hit = Contact {
            entity: id,
            other: ground,
            other_layer: Layer::Terrain,
        };
        assert!(sys.on_contact(&mut scene, &hit));
        assert!(sys.is_landed(id));
        assert_eq!(scene.body(id).unwrap().vel, Vec2::ZERO);

        let before = scene.body(id).unwrap().pos;
        sys.update(&mut scene, 0.5);
        scene.step(0.5);
        assert_eq!(scene.body(id).unwrap().pos, before);
        assert_eq!(sys.leaf_state(id), Some(LeafState::Falling));
    }

    #[test]
    fn landed_leaf_never_starts_swaying() {
        let mut scene = Scene::new();
        let mut sys = system(LeafParams {
            fall_delay_max: 0.0,
            sway_phase_max: 5.0,
            fade_out: 100.0,
            ..LeafParams::default()
        });
        sys.populate(&mut scene, 0, Vec2::new(0.0, 0.0)).unwrap();
        sys.update(&mut scene, 0.01);
        let ground = scene.add(
            Body::new(Vec2::new(-500.0, 500.0), Vec2::new(1000.0, 30.0), [0, 0, 0, 255]),
            Layer::Terrain,
        );
        let ids = sys.leaf_ids(0);
        for &id in &ids {
            let hit = Contact {
                entity: id,
                other: ground,
                other_layer: Layer::Terrain,
            };
            assert!(sys.on_contact(&mut scene, &hit));
        }
        let frozen: Vec<(f32, f32)> = ids
            .iter()
            .map(|&id| {
                let look = scene.body(id).unwrap().look;
                (look.angle, look.width_inset)
            })
            .collect();

        // Every sway phase elapses while the leaves lie on the ground.
        for _ in 0..20 {
            sys.update(&mut scene, 0.5);
        }
        for (&id, &(angle, inset)) in ids.iter().zip(&frozen) {
            assert!(sys.is_landed(id));
            let look = scene.body(id).unwrap().look;
            assert_eq!(look.angle, angle);
            assert_eq!(look.width_inset, inset);
        }
    }

    #[test]
    fn non_ground_contact_is_ignored() {
        let mut scene = Scene::new();
        let mut sys = system(quick());
        sys.populate(&mut scene, 0, Vec2::new(0.0, 0.0)).unwrap();
        sys.update(&mut scene, 0.01);
        let id = sys.leaf_ids(0)[0];
        let hit = Contact {
            entity: id,
            other: id,
            other_layer: Layer::Avatar,
        };
        sys.on_contact(&mut scene, &hit);
        assert!(!sys.is_landed(id));
        assert_eq!(scene.body(id).unwrap().vel.y, 100.0);
    }

    #[test]
    fn destroy_removes_from_both_layers() {
        let mut scene = Scene::new();
        let mut sys = system(LeafParams {
            fall_delay_max: 10.0,
            ..LeafParams::default()
        });
        let n = sys.populate(&mut scene, 30, Vec2::new(30.0, 0.0)).unwrap();
        sys.update(&mut scene, 5.0);
        let falling = scene.layer_len(Layer::FallingLeaves);
        assert_eq!(falling + scene.layer_len(Layer::Leaves), n);

        assert_eq!(sys.destroy(&mut scene, 30), Ok(n));
        assert!(scene.is_empty());
        assert_eq!(sys.leaf_total(), 0);
        assert_eq!(sys.destroy(&mut scene, 30), Err(IndexError::NotFound(30)));
    }

    #[test]
    fn populate_twice_is_rejected() {
        let mut scene = Scene::new();
        let mut sys = system(LeafParams::default());
        sys.populate(&mut scene, 0, Vec2::ZERO).unwrap();
        let before = scene.len();
        assert_eq!(
            sys.populate(&mut scene, 0, Vec2::ZERO),
            Err(IndexError::AlreadyPresent(0))
        );
        assert_eq!(scene.len(), before);
    }
}
