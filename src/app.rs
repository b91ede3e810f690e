use std::error::Error;

use raylib::prelude::*;
use verdant_runtime::{AvatarInput, Simulation};
use verdant_world::WorldGenParams;

use crate::Args;
use crate::watchers::ConfigWatcher;

const FIXED_DT: f32 = 1.0 / 60.0;
// Longer frames are split so a hitch cannot tunnel the avatar through the crust.
const MAX_STEP: f32 = 1.0 / 30.0;

fn read_input(rl: &RaylibHandle) -> AvatarInput {
    AvatarInput {
        left: rl.is_key_down(KeyboardKey::KEY_LEFT),
        right: rl.is_key_down(KeyboardKey::KEY_RIGHT),
        jump: rl.is_key_down(KeyboardKey::KEY_SPACE),
        fly: rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT)
            || rl.is_key_down(KeyboardKey::KEY_RIGHT_SHIFT),
    }
}

pub fn run_headless(
    params: WorldGenParams,
    ticks: u64,
    input: AvatarInput,
) -> Result<(), Box<dyn Error>> {
    let mut sim = Simulation::new(params)?;
    for _ in 0..ticks {
        sim.update(FIXED_DT, input)?;
    }
    let (left, right) = sim.window();
    let stats = sim.stats();
    let center = sim.avatar_center();
    log::info!(
        "headless run done: ticks={} avatar=({:.0}, {:.0}) window=[{}, {}) slides={} frames={}",
        stats.ticks,
        center.x,
        center.y,
        left,
        right,
        stats.slides,
        stats.frames_slid
    );
    log::info!(
        "columns +{} -{} trees +{} -{} recoveries={} entities={}",
        stats.columns_created,
        stats.columns_removed,
        stats.trees_created,
        stats.trees_removed,
        stats.recoveries,
        sim.scene().len()
    );
    let mut by: Vec<(&&str, &u64)> = stats.events_by.iter().collect();
    by.sort();
    for (label, n) in by {
        log::debug!("  {:<20} {}", label, n);
    }
    Ok(())
}

pub fn run_windowed(params: WorldGenParams, args: &Args) -> Result<(), Box<dyn Error>> {
    let mut sim = Simulation::new(params)?;
    let watcher = match (&args.config, args.watch_config) {
        (Some(path), true) => Some(ConfigWatcher::spawn(path.clone())),
        (None, true) => {
            log::warn!("--watch-config needs --config; not watching");
            None
        }
        _ => None,
    };

    let (mut rl, thread) = raylib::init()
        .size(params.window_width as i32, params.window_height as i32)
        .title("Verdant")
        .build();
    rl.set_target_fps(60);

    while !rl.window_should_close() {
        if let Some(w) = &watcher {
            if let Some(fresh) = w.poll() {
                sim.apply_live_config(&fresh);
            }
        }
        let input = read_input(&rl);
        let mut remaining = rl.get_frame_time().max(0.0);
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP);
            sim.update(dt, input)?;
            remaining -= dt;
        }
        verdant_render_raylib::draw_frame(&mut rl, &thread, &sim);
    }
    Ok(())
}
