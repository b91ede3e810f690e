use std::sync::Arc;

use hashbrown::HashMap;
use verdant_geom::Vec2;
use verdant_scene::{Host, Layer, Scene, Timer};
use verdant_world::{
    HeightField, Palette, TerrainGenerator, TreeGenerator, WorldError, WorldGenParams,
};

use crate::avatar::{Avatar, AvatarInput};
use crate::day_cycle::{DayCycle, DaySample};
use crate::event::{Event, EventQueue, log_event};
use crate::streamer::WorldStreamer;

const STATS_PERIOD: f32 = 5.0;

#[derive(Clone, Debug, Default)]
pub struct SimStats {
    pub ticks: u64,
    pub slides: u64,
    pub frames_slid: u64,
    pub columns_created: u64,
    pub columns_removed: u64,
    pub trees_created: u64,
    pub trees_removed: u64,
    pub recoveries: u64,
    pub events_by: HashMap<&'static str, u64>,
}

/// The world plus everything that moves it forward one tick at a time.
pub struct Simulation {
    params: WorldGenParams,
    scene: Scene,
    terrain: TerrainGenerator,
    trees: TreeGenerator,
    streamer: WorldStreamer,
    avatar: Avatar,
    day: DayCycle,
    sky: DaySample,
    queue: EventQueue,
    stats: SimStats,
    heartbeat: Timer,
}

impl Simulation {
    pub fn new(params: WorldGenParams) -> Result<Self, WorldError> {
        params.validate()?;
        let heights = HeightField::new(&params);
        let palette = Arc::new(Palette::new(params.seed));
        let streamer = WorldStreamer::new(&params)?;

        let mut scene = Scene::new();
        scene.set_layers_collide(Layer::Avatar, Layer::Terrain, true);
        scene.set_layers_collide(Layer::Avatar, Layer::Trunks, true);

        let block = params.block_size as f32;
        let spawn_x = (streamer.frames() * streamer.frame()) as f32 / 2.0;
        let avatar = Avatar::spawn(
            &mut scene,
            &params.avatar,
            block,
            Vec2::new(spawn_x, params.avatar.spawn_y),
        );
        let window = Vec2::new(params.window_width, params.window_height);
        let day = DayCycle::new(&params.day, window);
        let sky = day.sample();

        let mut sim = Self {
            terrain: TerrainGenerator::new(&params, heights, palette.clone()),
            trees: TreeGenerator::new(&params, heights, palette),
            params,
            scene,
            streamer,
            avatar,
            day,
            sky,
            queue: EventQueue::new(),
            stats: SimStats::default(),
            heartbeat: Timer::repeating(STATS_PERIOD),
        };
        let (min, max) = sim.streamer.range();
        sim.queue.emit_now(Event::EnsureRangeLoaded { min, max });
        sim.drain_events()?;
        log::info!(
            "world ready: seed={} frame={}px window=[{}, {}) entities={}",
            params.seed,
            sim.streamer.frame(),
            min,
            max,
            sim.scene.len()
        );
        Ok(sim)
    }

    /// Advances the world by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: AvatarInput) -> Result<(), WorldError> {
        self.queue.emit_now(Event::Tick);
        self.avatar.control(&mut self.scene, input);
        self.trees.update(&mut self.scene, dt);
        self.scene.step(dt);
        for contact in self.scene.drain_contacts() {
            self.trees.on_contact(&mut self.scene, &contact);
        }
        if let Some(at) = self.avatar.recover_if_fallen(&mut self.scene) {
            self.queue.emit_now(Event::AvatarRecovered { at });
        }

        if let Some(center) = self.avatar.center(&self.scene) {
            for slide in self.streamer.update(center.x)? {
                let (left, right) = slide.window;
                self.queue.emit_now(Event::FrameSlid {
                    dir: slide.dir,
                    frames: slide.frames,
                    left,
                    right,
                });
                self.queue.emit_now(Event::EnsureRangeUnloaded {
                    min: slide.unload.0,
                    max: slide.unload.1,
                });
                self.queue.emit_now(Event::EnsureRangeLoaded {
                    min: slide.load.0,
                    max: slide.load.1,
                });
            }
        }
        self.sky = self.day.advance(dt);

        self.drain_events()?;
        self.queue.advance_tick();
        self.stats.ticks += 1;
        if self.heartbeat.advance(dt) > 0 {
            self.log_stats();
        }
        Ok(())
    }

    /// Runs every event queued for this tick. Streaming events must all land in
    /// the tick that emitted them or the index falls out of step with the window.
    fn drain_events(&mut self) -> Result<(), WorldError> {
        while let Some(env) = self.queue.pop_ready() {
            log_event(env.tick, &env.kind);
            *self.stats.events_by.entry(env.kind.label()).or_insert(0) += 1;
            self.handle_event(env.kind)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, ev: Event) -> Result<(), WorldError> {
        match ev {
            Event::Tick | Event::LiveConfigApplied => {}
            Event::FrameSlid { frames, .. } => {
                self.stats.slides += 1;
                self.stats.frames_slid += frames as u64;
            }
            Event::EnsureRangeUnloaded { min, max } => {
                self.stats.columns_removed +=
                    self.terrain.remove_in_range(&mut self.scene, min, max)? as u64;
                self.stats.trees_removed +=
                    self.trees.remove_in_range(&mut self.scene, min, max)? as u64;
            }
            Event::EnsureRangeLoaded { min, max } => {
                self.stats.columns_created +=
                    self.terrain.create_in_range(&mut self.scene, min, max)? as u64;
                self.stats.trees_created +=
                    self.trees.create_in_range(&mut self.scene, min, max)? as u64;
            }
            Event::AvatarRecovered { .. } => {
                self.stats.recoveries += 1;
            }
        }
        Ok(())
    }

    fn log_stats(&self) {
        let (left, right) = self.streamer.range();
        log::info!(
            "tick {} window=[{}, {}) entities={} leaves={} falling={} energy={:.1}",
            self.stats.ticks,
            left,
            right,
            self.scene.len(),
            self.trees.leaves().leaf_total(),
            self.scene.layer_len(Layer::FallingLeaves),
            self.avatar.energy()
        );
    }

    /// Applies the live-tunable parts of a reloaded config.
    pub fn apply_live_config(&mut self, fresh: &WorldGenParams) {
        if self.params.apply_live(fresh) {
            log::warn!("config reload: only [leaves] and [day] apply to a running world");
        }
        self.trees.leaves_mut().set_params(self.params.leaves);
        self.day.set_params(&self.params.day);
        self.queue.emit_now(Event::LiveConfigApplied);
    }

    #[inline]
    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.terrain.ground_height_at(x)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_center(&self) -> Vec2 {
        self.avatar.center(&self.scene).unwrap_or_default()
    }

    /// Materialized range `[left, right)`.
    pub fn window(&self) -> (i32, i32) {
        self.streamer.range()
    }

    pub fn streamer(&self) -> &WorldStreamer {
        &self.streamer
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn trees(&self) -> &TreeGenerator {
        &self.trees
    }

    pub fn sky(&self) -> &DaySample {
        &self.sky
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.queue.now
    }

    /// Moves the avatar without physics; the window catches up on the next update.
    pub fn teleport_avatar(&mut self, center: Vec2) {
        if let Some(body) = self.scene.body_mut(self.avatar.id()) {
            body.set_center(center);
            body.vel = Vec2::ZERO;
        }
    }
}
