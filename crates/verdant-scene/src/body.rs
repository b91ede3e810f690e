use verdant_geom::{Rect, Vec2};

pub type Rgba = [u8; 4];

/// Render-only state. Nothing here feeds into collision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Look {
    pub color: Rgba,
    /// Degrees, clockwise.
    pub angle: f32,
    /// Horizontal shrink applied when drawing.
    pub width_inset: f32,
    pub opacity: f32,
}

impl Look {
    pub const fn solid(color: Rgba) -> Self {
        Self {
            color,
            angle: 0.0,
            width_inset: 0.0,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Top-left corner in world pixels.
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Integrated and contact-tested every step.
    pub dynamic: bool,
    /// Pushed back out of anything it overlaps in a colliding layer.
    pub blocking: bool,
    pub look: Look,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, color: Rgba) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            dynamic: false,
            blocking: false,
            look: Look::solid(color),
        }
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
    }
}
