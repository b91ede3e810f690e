#![forbid(unsafe_code)]

pub mod avatar;
pub mod day_cycle;
pub mod event;
pub mod sim;
pub mod streamer;

pub use avatar::{Avatar, AvatarInput};
pub use day_cycle::{DayCycle, DaySample};
pub use event::{Event, EventEnvelope, EventQueue};
pub use sim::{SimStats, Simulation};
pub use streamer::{Slide, SlideDir, WorldStreamer};
