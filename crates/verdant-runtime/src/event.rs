use std::collections::{BTreeMap, VecDeque};

use verdant_geom::Vec2;

use crate::streamer::SlideDir;

pub enum Event {
    Tick,

    FrameSlid { dir: SlideDir, frames: i32, left: i32, right: i32 },
    EnsureRangeUnloaded { min: i32, max: i32 },
    EnsureRangeLoaded { min: i32, max: i32 },

    AvatarRecovered { at: Vec2 },
    LiveConfigApplied,
}

impl Event {
    pub fn label(&self) -> &'static str {
        match self {
            Event::Tick => "Tick",
            Event::FrameSlid { .. } => "FrameSlid",
            Event::EnsureRangeUnloaded { .. } => "EnsureRangeUnloaded",
            Event::EnsureRangeLoaded { .. } => "EnsureRangeLoaded",
            Event::AvatarRecovered { .. } => "AvatarRecovered",
            Event::LiveConfigApplied => "LiveConfigApplied",
        }
    }
}

pub struct EventEnvelope {
    pub tick: u64,
    pub kind: Event,
}

/// Events bucketed by tick; FIFO within a tick.
#[derive(Default)]
pub struct EventQueue {
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_now(&mut self, kind: Event) {
        let tick = self.now;
        self.by_tick
            .entry(tick)
            .or_default()
            .push_back(EventEnvelope { tick, kind });
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now)?.pop_front()
    }

    /// Moves to the next tick. Unprocessed events run first in the next tick,
    /// in their original order.
    pub fn advance_tick(&mut self) {
        let left = self.by_tick.remove(&self.now).unwrap_or_default();
        self.now = self.now.wrapping_add(1);
        if !left.is_empty() {
            log::warn!(
                target: "events",
                "[tick {}] {} events carried into the next tick",
                self.now.wrapping_sub(1),
                left.len()
            );
            let next = self.by_tick.entry(self.now).or_default();
            for env in left.into_iter().rev() {
                next.push_front(env);
            }
        }
    }
}

pub fn log_event(tick: u64, ev: &Event) {
    match ev {
        Event::Tick => {
            log::trace!(target: "events", "[tick {}] Tick", tick);
        }
        Event::FrameSlid { dir, frames, left, right } => {
            log::debug!(target: "events", "[tick {}] FrameSlid {:?} x{} window=[{}, {})", tick, dir, frames, left, right);
        }
        Event::EnsureRangeUnloaded { min, max } => {
            log::debug!(target: "events", "[tick {}] EnsureRangeUnloaded [{}, {})", tick, min, max);
        }
        Event::EnsureRangeLoaded { min, max } => {
            log::debug!(target: "events", "[tick {}] EnsureRangeLoaded [{}, {})", tick, min, max);
        }
        Event::AvatarRecovered { at } => {
            log::warn!(target: "events", "[tick {}] AvatarRecovered at ({:.0}, {:.0})", tick, at.x, at.y);
        }
        Event::LiveConfigApplied => {
            log::info!(target: "events", "[tick {}] LiveConfigApplied", tick);
        }
    }
}
