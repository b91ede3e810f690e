use crate::rng::{SALT_BASE, SeededRng, hash2};
use crate::worldgen::WorldGenParams;

/// Terrain elevation as a function of world x. Elevation is measured like screen
/// y: the surface at `x` is `height_at(x)` pixels below the top of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightField {
    base: f64,
    block: f64,
    f1: f64,
    f2: f64,
    c1: f64,
    c2: f64,
}

impl HeightField {
    pub fn new(params: &WorldGenParams) -> Self {
        let h = params.window_height as f64;
        let block = params.block_size as f64;
        let mut base_rng = SeededRng::new(hash2(params.seed, 0, SALT_BASE));
        let base = (h / params.base_floor_divisor as f64).floor()
            + h / params.base_band_divisor as f64 * base_rng.unit_f64();

        let mut shape = SeededRng::new(base.floor() as i64 as u64);
        let wavelength = params.spatial as f64 * block;
        let f1 = shape.unit_f64() / wavelength;
        let f2 = shape.unit_f64() / wavelength;
        let c1 = params.carrier as f64 * shape.unit_f64();
        let c2 = params.modulating as f64 * shape.unit_f64();
        log::debug!(
            "height field seed={} base={:.2} f=({:.5}, {:.5}) c=({:.3}, {:.3})",
            params.seed,
            base,
            f1,
            f2,
            c1,
            c2
        );
        Self {
            base,
            block,
            f1,
            f2,
            c1,
            c2,
        }
    }

    #[inline]
    pub fn base(&self) -> f32 {
        self.base as f32
    }

    pub fn height_at(&self, x: f32) -> f32 {
        let x = x as f64;
        let wave = x.sin() + self.c1 * (self.f1 * x).sin() + self.c2 * (self.f2 * x).sin();
        (self.base + self.block * wave) as f32
    }

    /// Largest deviation from `base` the formula can produce.
    pub fn amplitude(&self) -> f32 {
        (self.block * (1.0 + self.c1 + self.c2)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_sits_on_base() {
        let field = HeightField::new(&WorldGenParams::default());
        assert_eq!(field.height_at(0.0), field.base());
    }

    #[test]
    fn different_seeds_differ() {
        let a = HeightField::new(&WorldGenParams::default());
        let mut p = WorldGenParams::default();
        p.seed = 3344;
        let b = HeightField::new(&p);
        assert_ne!(a, b);
    }
}
