use std::f32::consts::PI;

use verdant_geom::Vec2;
use verdant_scene::{Interp, Repeat, Tween};
use verdant_world::worldgen::Day as DayParams;

const ELLIPSE_SHIFT: f32 = 0.1;
const ELLIPSE_FACTOR: f32 = 1.5;
const HALO_FACTOR: f32 = 2.0;

/// Screen-space state of the sky for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DaySample {
    /// Degrees in `[0, 360)`; 0 is noon.
    pub sun_angle: f32,
    pub sun_center: Vec2,
    pub sun_size: f32,
    pub halo_size: f32,
    pub night_opacity: f32,
}

pub struct DayCycle {
    params: DayParams,
    window: Vec2,
    sun: Tween,
    night: Tween,
}

/// Sun centre on its elliptic orbit around the window centre.
pub fn sun_position(window: Vec2, orbit_radius: f32, angle_deg: f32) -> Vec2 {
    let theta = angle_deg.to_radians() + PI;
    let center = window / 2.0;
    let stretch = ELLIPSE_SHIFT + ELLIPSE_FACTOR * (theta - PI / 2.0).cos().abs();
    Vec2::new(
        center.x + stretch * orbit_radius * theta.sin(),
        center.y + orbit_radius * theta.cos(),
    )
}

impl DayCycle {
    pub fn new(params: &DayParams, window: Vec2) -> Self {
        let (sun, night) = Self::tweens(params);
        Self {
            params: *params,
            window,
            sun,
            night,
        }
    }

    fn tweens(params: &DayParams) -> (Tween, Tween) {
        let cycle = params.cycle_length.max(f32::EPSILON);
        (
            Tween::linear(0.0, 360.0, cycle, Repeat::Loop),
            Tween::new(
                0.0,
                params.night_opacity,
                cycle / 2.0,
                Interp::Cubic,
                Repeat::BackAndForth,
            ),
        )
    }

    /// Restarts the cycle from noon with new timings.
    pub fn set_params(&mut self, params: &DayParams) {
        if *params == self.params {
            return;
        }
        let (sun, night) = Self::tweens(params);
        self.params = *params;
        self.sun = sun;
        self.night = night;
        log::info!("day cycle reset: {:.1}s per day", params.cycle_length);
    }

    pub fn advance(&mut self, dt: f32) -> DaySample {
        self.sun.advance(dt);
        self.night.advance(dt);
        self.sample()
    }

    pub fn sample(&self) -> DaySample {
        let sun_angle = self.sun.value();
        DaySample {
            sun_angle,
            sun_center: sun_position(self.window, self.params.orbit_radius, sun_angle),
            sun_size: self.params.sun_radius,
            halo_size: self.params.sun_radius * HALO_FACTOR,
            night_opacity: self.night.value(),
        }
    }
}
