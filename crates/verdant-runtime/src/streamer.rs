use verdant_world::{ConfigError, WorldError, WorldGenParams};

/// Farthest avatar x the window follows. Cell coordinates are `i32`, so the window
/// must stay well inside that range.
pub const WORLD_LIMIT: f32 = (1u32 << 30) as f32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDir {
    Right,
    Left,
}

/// Window movement: `unload` leaves, then `load` enters. Both ranges are half-open.
/// A one-frame slide swaps the trailing frame for the leading one; a jump of a
/// whole window or more swaps the old window for the new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slide {
    pub dir: SlideDir,
    /// Frames the window moved.
    pub frames: i32,
    pub unload: (i32, i32),
    pub load: (i32, i32),
    /// Window bounds once this slide has been applied.
    pub window: (i32, i32),
}

/// Sliding window of `frames + 2` frames kept materialized around the avatar.
#[derive(Clone, Debug)]
pub struct WorldStreamer {
    frame: i32,
    frames: i32,
    left: i32,
    right: i32,
}

impl WorldStreamer {
    pub fn new(params: &WorldGenParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let frame = params.frame_width();
        let frames = params.frames_in_window;
        Ok(Self {
            frame,
            frames,
            left: -frame,
            right: (frames + 1) * frame,
        })
    }

    /// Materialized range `[left, right)`.
    #[inline]
    pub fn range(&self) -> (i32, i32) {
        (self.left, self.right)
    }

    #[inline]
    pub fn frame(&self) -> i32 {
        self.frame
    }

    #[inline]
    pub fn frames(&self) -> i32 {
        self.frames
    }

    /// Slides needed to keep `avatar_x` inside the window, in the order they must run.
    pub fn update(&mut self, avatar_x: f32) -> Result<Vec<Slide>, WorldError> {
        if !avatar_x.is_finite() || avatar_x.abs() > WORLD_LIMIT {
            return Err(WorldError::OutOfBounds(avatar_x));
        }
        let span = self.frames * self.frame;
        let f = self.frame;
        let mut out = Vec::new();

        let ahead = avatar_x as f64 - (self.left + span) as f64;
        let behind = (self.right - span) as f64 - avatar_x as f64;
        if ahead > 0.0 {
            let n = (ahead / f as f64).ceil() as i32;
            if n >= self.frames + 2 {
                out.push(self.jump(SlideDir::Right, n));
            }
        } else if behind > 0.0 {
            let n = (behind / f as f64).ceil() as i32;
            if n >= self.frames + 2 {
                out.push(self.jump(SlideDir::Left, n));
            }
        }

        while avatar_x > (self.left + span) as f32 {
            self.left += f;
            self.right += f;
            out.push(Slide {
                dir: SlideDir::Right,
                frames: 1,
                unload: (self.left - f, self.left),
                load: (self.right - f, self.right),
                window: (self.left, self.right),
            });
        }
        while avatar_x < (self.right - span) as f32 {
            self.left -= f;
            self.right -= f;
            out.push(Slide {
                dir: SlideDir::Left,
                frames: 1,
                unload: (self.right, self.right + f),
                load: (self.left, self.left + f),
                window: (self.left, self.right),
            });
        }
        Ok(out)
    }

    /// Moves the window `n` frames at once. Old and new windows do not overlap.
    fn jump(&mut self, dir: SlideDir, n: i32) -> Slide {
        let old = (self.left, self.right);
        let shift = match dir {
            SlideDir::Right => n * self.frame,
            SlideDir::Left => -n * self.frame,
        };
        self.left += shift;
        self.right += shift;
        Slide {
            dir,
            frames: n,
            unload: old,
            load: (self.left, self.right),
            window: (self.left, self.right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streamer() -> WorldStreamer {
        WorldStreamer::new(&WorldGenParams::default()).unwrap()
    }

    #[test]
    fn initial_window_spans_five_frames() {
        let s = streamer();
        assert_eq!(s.frame(), 420);
        assert_eq!(s.range(), (-420, 1680));
    }

    #[test]
    fn stable_zone_needs_no_slides() {
        let mut s = streamer();
        assert!(s.update(420.0).unwrap().is_empty());
        assert!(s.update(840.0).unwrap().is_empty());
        assert!(s.update(630.0).unwrap().is_empty());
    }

    #[test]
    fn one_frame_right() {
        let mut s = streamer();
        let slides = s.update(841.0).unwrap();
        assert_eq!(
            slides,
            vec![Slide {
                dir: SlideDir::Right,
                frames: 1,
                unload: (-420, 0),
                load: (1680, 2100),
                window: (0, 2100),
            }]
        );
        assert_eq!(s.range(), (0, 2100));
        assert_eq!(slides[0].window, s.range());
    }

    #[test]
    fn one_frame_left() {
        let mut s = streamer();
        let slides = s.update(419.0).unwrap();
        assert_eq!(
            slides,
            vec![Slide {
                dir: SlideDir::Left,
                frames: 1,
                unload: (1260, 1680),
                load: (-840, -420),
                window: (-840, 1260),
            }]
        );
        assert_eq!(s.range(), (-840, 1260));
        assert_eq!(slides[0].window, s.range());
    }

    #[test]
    fn long_jump_swaps_whole_window() {
        let mut s = streamer();
        let slides = s.update(3_000_000.0).unwrap();
        assert_eq!(slides.len(), 1);
        let jump = slides[0];
        assert_eq!(jump.dir, SlideDir::Right);
        assert_eq!(jump.unload, (-420, 1680));
        assert_eq!(jump.load, s.range());
        assert_eq!(jump.frames, 7141);
        let (left, right) = s.range();
        assert_eq!(right - left, 5 * 420);
        assert!(3_000_000.0 <= (left + 3 * 420) as f32);
        assert!(3_000_000.0 >= (right - 3 * 420) as f32);
    }

    #[test]
    fn short_moves_slide_frame_by_frame() {
        let mut s = streamer();
        // Four frames ahead is still one short of a full window.
        let slides = s.update(840.0 + 4.0 * 420.0).unwrap();
        assert_eq!(slides.len(), 4);
        assert!(slides.iter().all(|sl| sl.frames == 1));
        assert_eq!(slides.last().map(|sl| sl.window), Some(s.range()));
    }

    #[test]
    fn long_jump_left_lands_in_stable_zone() {
        let mut s = streamer();
        let slides = s.update(-1_234_567.0).unwrap();
        assert!(slides.iter().all(|sl| sl.dir == SlideDir::Left));
        assert!(slides[0].frames >= 5);
        let (left, right) = s.range();
        assert!(-1_234_567.0 <= (left + 3 * 420) as f32);
        assert!(-1_234_567.0 >= (right - 3 * 420) as f32);
        assert!(s.update(-1_234_567.0).unwrap().is_empty());
    }

    #[test]
    fn refuses_positions_past_the_world_limit() {
        let mut s = streamer();
        let before = s.range();
        assert!(matches!(s.update(3.0e9), Err(WorldError::OutOfBounds(_))));
        assert!(matches!(s.update(-3.0e9), Err(WorldError::OutOfBounds(_))));
        assert!(matches!(s.update(f32::NAN), Err(WorldError::OutOfBounds(_))));
        assert_eq!(s.range(), before);
        assert!(s.update(WORLD_LIMIT).is_ok());
    }

    #[test]
    fn rejects_bad_config() {
        let mut p = WorldGenParams::default();
        p.block_size = -30;
        assert!(WorldStreamer::new(&p).is_err());
    }
}
