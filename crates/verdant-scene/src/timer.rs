/// Delay that fires once, or every `period` seconds when repeating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    remaining: f32,
    period: Option<f32>,
    done: bool,
}

impl Timer {
    pub fn once(delay: f32) -> Self {
        Self {
            remaining: delay.max(0.0),
            period: None,
            done: false,
        }
    }

    pub fn repeating(period: f32) -> Self {
        let period = period.max(f32::EPSILON);
        Self {
            remaining: period,
            period: Some(period),
            done: false,
        }
    }

    /// Advances the clock; returns how many times the timer fired.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.done {
            return 0;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining > 0.0 {
            return 0;
        }
        match self.period {
            None => {
                self.done = true;
                1
            }
            Some(period) => {
                let mut fired = 0;
                while self.remaining <= 0.0 {
                    self.remaining += period;
                    fired += 1;
                }
                fired
            }
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}
