use fastnoise_lite::{FastNoiseLite, NoiseType};
use verdant_geom::Vec2;
use verdant_scene::Rgba;

pub const GROUND: Rgba = [212, 123, 74, 255];
pub const TRUNK: Rgba = [100, 50, 20, 255];
pub const LEAF: Rgba = [50, 200, 30, 255];
pub const SKY: Rgba = [128, 198, 229, 255];
pub const AVATAR: Rgba = [70, 70, 160, 255];

const CHANNEL_OFFSET: f32 = 1000.0;

/// Base colours nudged by coherent noise so neighbouring blocks vary smoothly.
pub struct Palette {
    noise: FastNoiseLite,
    delta: f32,
}

impl Palette {
    pub fn new(seed: i64) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(0.05));
        Self { noise, delta: 10.0 }
    }

    pub fn approximate(&self, base: Rgba, at: Vec2) -> Rgba {
        let mut out = base;
        for (i, channel) in out.iter_mut().take(3).enumerate() {
            let n = self
                .noise
                .get_noise_2d(at.x + i as f32 * CHANNEL_OFFSET, at.y);
            let v = *channel as f32 + n * self.delta;
            *channel = v.round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}
