use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use verdant_geom::Vec2;

use crate::body::Body;
use crate::layer::Layer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A dynamic entity overlapped something in a layer it collides with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub entity: EntityId,
    pub other: EntityId,
    pub other_layer: Layer,
}

/// What world generators need from the engine.
pub trait Host {
    fn add(&mut self, body: Body, layer: Layer) -> EntityId;
    /// Removes `id` if it currently lives in `layer`; false otherwise.
    fn remove(&mut self, id: EntityId, layer: Layer) -> bool;
    /// Moves `id` between layers; false if it was not in `from`.
    fn relayer(&mut self, id: EntityId, from: Layer, to: Layer) -> bool;
    fn layer_of(&self, id: EntityId) -> Option<Layer>;
    fn body(&self, id: EntityId) -> Option<&Body>;
    fn body_mut(&mut self, id: EntityId) -> Option<&mut Body>;
    fn set_layers_collide(&mut self, a: Layer, b: Layer, enabled: bool);
}

struct Slot {
    layer: Layer,
    body: Body,
}

pub struct Scene {
    entities: HashMap<EntityId, Slot>,
    layers: BTreeMap<Layer, HashSet<EntityId>>,
    collide: HashSet<(Layer, Layer)>,
    contacts: Vec<Contact>,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            layers: BTreeMap::new(),
            collide: HashSet::new(),
            contacts: Vec::new(),
            next_id: 1,
        }
    }
}

#[inline]
fn pair(a: Layer, b: Layer) -> (Layer, Layer) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn layer_len(&self, layer: Layer) -> usize {
        self.layers.get(&layer).map(|s| s.len()).unwrap_or(0)
    }

    pub fn layers_collide(&self, a: Layer, b: Layer) -> bool {
        self.collide.contains(&pair(a, b))
    }

    /// Entities of one layer, unordered.
    pub fn iter_layer(&self, layer: Layer) -> impl Iterator<Item = (EntityId, &Body)> + '_ {
        self.layers
            .get(&layer)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.entities.get(id).map(|slot| (*id, &slot.body)))
    }

    /// Contacts gathered since the last drain, in detection order.
    pub fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }

    /// Integrates dynamic bodies and records contacts against colliding layers.
    pub fn step(&mut self, dt: f32) {
        let mut movers: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, slot)| slot.body.dynamic)
            .map(|(id, _)| *id)
            .collect();
        movers.sort_unstable();

        // Bodies only move during a step; membership is fixed, so each layer is
        // sorted once.
        let sorted: Vec<(Layer, Vec<EntityId>)> = self
            .layers
            .iter()
            .map(|(layer, members)| {
                let mut ids: Vec<EntityId> = members.iter().copied().collect();
                ids.sort_unstable();
                (*layer, ids)
            })
            .collect();

        for id in movers {
            let Some(slot) = self.entities.get(&id) else {
                continue;
            };
            let layer = slot.layer;
            let mut body = slot.body;
            body.vel += body.accel * dt;
            body.pos += body.vel * dt;

            for (other_layer, others) in &sorted {
                let other_layer = *other_layer;
                if !self.layers_collide(layer, other_layer) {
                    continue;
                }
                for &oid in others {
                    if oid == id {
                        continue;
                    }
                    let Some(other) = self.entities.get(&oid) else {
                        continue;
                    };
                    let other_rect = other.body.rect();
                    if !body.rect().overlaps(&other_rect) {
                        continue;
                    }
                    self.contacts.push(Contact {
                        entity: id,
                        other: oid,
                        other_layer,
                    });
                    if body.blocking {
                        if let Some(push) = body.rect().separation(&other_rect) {
                            body.pos += push;
                            cancel_into(&mut body.vel, push);
                        }
                    }
                }
            }

            if let Some(slot) = self.entities.get_mut(&id) {
                slot.body = body;
            }
        }
    }
}

/// Zeroes the velocity component that points against a separation push.
fn cancel_into(vel: &mut Vec2, push: Vec2) {
    if (push.y < 0.0 && vel.y > 0.0) || (push.y > 0.0 && vel.y < 0.0) {
        vel.y = 0.0;
    }
    if (push.x < 0.0 && vel.x > 0.0) || (push.x > 0.0 && vel.x < 0.0) {
        vel.x = 0.0;
    }
}

impl Host for Scene {
    fn add(&mut self, body: Body, layer: Layer) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Slot { layer, body });
        self.layers.entry(layer).or_default().insert(id);
        id
    }

    fn remove(&mut self, id: EntityId, layer: Layer) -> bool {
        match self.entities.get(&id) {
            Some(slot) if slot.layer == layer => {}
            _ => return false,
        }
        self.entities.remove(&id);
        if let Some(members) = self.layers.get_mut(&layer) {
            members.remove(&id);
        }
        true
    }

    fn relayer(&mut self, id: EntityId, from: Layer, to: Layer) -> bool {
        let Some(slot) = self.entities.get_mut(&id) else {
            return false;
        };
        if slot.layer != from {
            return false;
        }
        slot.layer = to;
        if let Some(members) = self.layers.get_mut(&from) {
            members.remove(&id);
        }
        self.layers.entry(to).or_default().insert(id);
        true
    }

    fn layer_of(&self, id: EntityId) -> Option<Layer> {
        self.entities.get(&id).map(|slot| slot.layer)
    }

    fn body(&self, id: EntityId) -> Option<&Body> {
        self.entities.get(&id).map(|slot| &slot.body)
    }

    fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.entities.get_mut(&id).map(|slot| &mut slot.body)
    }

    fn set_layers_collide(&mut self, a: Layer, b: Layer, enabled: bool) {
        let changed = if enabled {
            self.collide.insert(pair(a, b))
        } else {
            self.collide.remove(&pair(a, b))
        };
        if changed {
            log::debug!("layers {} <-> {} collide={}", a.name(), b.name(), enabled);
        }
    }
}
