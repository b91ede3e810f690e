//! Raylib front end: world layers through a following 2D camera, sky and HUD in
//! screen space.
#![forbid(unsafe_code)]

use raylib::prelude::*;
use verdant_geom::{Rect, Vec2};
use verdant_runtime::{DaySample, Simulation};
use verdant_scene::{Body, Layer, Scene};
use verdant_world::palette::SKY;

const SUN_COLOR: Color = Color::new(255, 255, 0, 255);
const HALO_COLOR: Color = Color::new(255, 255, 0, 20);
const HUD_COLOR: Color = Color::new(30, 30, 30, 255);
const CULL_MARGIN: f32 = 120.0;

pub mod conv {
    use raylib::prelude::{Color, Vector2};
    use verdant_geom::Vec2;
    use verdant_scene::Rgba;

    pub fn vec2_to_rl(v: Vec2) -> Vector2 {
        Vector2::new(v.x, v.y)
    }

    pub fn vec2_from_rl(v: Vector2) -> Vec2 {
        Vec2::new(v.x, v.y)
    }

    /// Colour with its alpha scaled by `opacity`.
    pub fn rgba_to_rl(c: Rgba, opacity: f32) -> Color {
        let a = (c[3] as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Color::new(c[0], c[1], c[2], a)
    }
}

/// Keeps the avatar horizontally centred; world y already matches screen y.
pub fn follow_camera(avatar_center: Vec2, screen: Vec2) -> Camera2D {
    Camera2D {
        offset: conv::vec2_to_rl(screen / 2.0),
        target: Vector2::new(avatar_center.x, screen.y / 2.0),
        rotation: 0.0,
        zoom: 1.0,
    }
}

/// World-space rectangle visible through `camera`, padded for rotated leaves.
pub fn visible_rect(camera: &Camera2D, screen: Vec2) -> Rect {
    let target = conv::vec2_from_rl(camera.target);
    let pad = Vec2::new(CULL_MARGIN, CULL_MARGIN);
    Rect::from_center(target, screen + pad * 2.0)
}

pub fn draw_body<D: RaylibDraw>(d: &mut D, body: &Body) {
    let look = body.look;
    if look.opacity <= 0.0 {
        return;
    }
    let color = conv::rgba_to_rl(look.color, look.opacity);
    let w = (body.size.x - look.width_inset).max(1.0);
    let h = body.size.y;
    let center = body.center();
    if look.angle == 0.0 && look.width_inset == 0.0 {
        d.draw_rectangle_v(conv::vec2_to_rl(body.pos), conv::vec2_to_rl(body.size), color);
    } else {
        d.draw_rectangle_pro(
            Rectangle::new(center.x, center.y, w, h),
            Vector2::new(w / 2.0, h / 2.0),
            look.angle,
            color,
        );
    }
}

pub fn draw_scene<D: RaylibDraw>(d: &mut D, scene: &Scene, view: Rect) {
    for layer in Layer::ALL {
        for (_, body) in scene.iter_layer(layer) {
            if body.rect().overlaps(&view) {
                draw_body(d, body);
            }
        }
    }
}

/// Sun and halo, behind the world.
pub fn draw_sun<D: RaylibDraw>(d: &mut D, sky: &DaySample) {
    let c = conv::vec2_to_rl(sky.sun_center);
    d.draw_circle_v(c, sky.halo_size / 2.0, HALO_COLOR);
    d.draw_circle_v(c, sky.sun_size / 2.0, SUN_COLOR);
}

pub fn draw_night<D: RaylibDraw>(d: &mut D, sky: &DaySample, screen: Vec2) {
    if sky.night_opacity <= 0.0 {
        return;
    }
    d.draw_rectangle(
        0,
        0,
        screen.x as i32,
        screen.y as i32,
        conv::rgba_to_rl([0, 0, 0, 255], sky.night_opacity),
    );
}

pub fn draw_hud<D: RaylibDraw>(d: &mut D, energy: f32) {
    let text = format!("Energy level: {}", energy.floor() as i32);
    d.draw_text(&text, 12, 12, 20, HUD_COLOR);
}

pub fn draw_frame(rl: &mut RaylibHandle, thread: &RaylibThread, sim: &Simulation) {
    let screen = Vec2::new(rl.get_screen_width() as f32, rl.get_screen_height() as f32);
    let camera = follow_camera(sim.avatar_center(), screen);
    let view = visible_rect(&camera, screen);
    let sky = *sim.sky();

    let mut d = rl.begin_drawing(thread);
    d.clear_background(conv::rgba_to_rl(SKY, 1.0));
    draw_sun(&mut d, &sky);
    {
        let mut world = d.begin_mode2D(camera);
        draw_scene(&mut world, sim.scene(), view);
    }
    draw_night(&mut d, &sky, screen);
    draw_hud(&mut d, sim.avatar().energy());
}
