//! Host-side entity store: layers, collision groups, kinematics, timers and tweens.
//!
//! World generators only talk to the [`Host`] trait; [`Scene`] is the in-process
//! implementation used by the simulation and the tests.
#![forbid(unsafe_code)]

mod body;
mod layer;
mod scene;
mod timer;
mod tween;

pub use body::{Body, Look, Rgba};
pub use layer::Layer;
pub use scene::{Contact, EntityId, Host, Scene};
pub use timer::Timer;
pub use tween::{Interp, Repeat, Tween};
