#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interp {
    Linear,
    /// Smoothstep: eases in and out.
    Cubic,
}

impl Interp {
    #[inline]
    fn apply(self, t: f32) -> f32 {
        match self {
            Interp::Linear => t,
            Interp::Cubic => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Loop,
    BackAndForth,
}

/// Value animated from `from` to `to` over `duration` seconds, advanced by the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    interp: Interp,
    repeat: Repeat,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, interp: Interp, repeat: Repeat) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            interp,
            repeat,
        }
    }

    pub fn linear(from: f32, to: f32, duration: f32, repeat: Repeat) -> Self {
        Self::new(from, to, duration, Interp::Linear, repeat)
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        let phase = match self.repeat {
            Repeat::Once => t.min(1.0),
            Repeat::Loop => t.fract(),
            Repeat::BackAndForth => {
                let leg = t.floor() as u64;
                let f = t.fract();
                if leg % 2 == 0 { f } else { 1.0 - f }
            }
        };
        self.from + (self.to - self.from) * self.interp.apply(phase)
    }

    /// Moves time forward and returns the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        if self.repeat == Repeat::Once {
            self.elapsed = self.elapsed.min(self.duration.max(0.0));
        }
        self.value()
    }

    /// Only `Once` tweens ever finish.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.repeat == Repeat::Once && self.elapsed >= self.duration
    }
}
