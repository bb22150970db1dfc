//! Keyframe timeline engine.
//!
//! Pure data and math: an [`Animation`] owns up to four value [`Channel`]s and
//! one [`EventChannel`]. It is advanced once per frame by whichever effect owns
//! it (a fade, a moving unit, a combat resolver) and reports [`Status::Done`]
//! when its frame counter reaches `finish`.
//!
//! # Timing
//!
//! - Normalized time is `counter / finish`, with `counter` bumped before any
//!   sampling, so the first update already observes `1 / finish`.
//! - Keyframe `t` values are expressed in eased time.
//! - Event samples fire when normalized time strictly exceeds their `t`.
mod animation;
mod channel;
mod easing;
mod presets;

pub use animation::{Animation, MAX_CHANNELS, Status};
pub use channel::{Channel, EventChannel, EventSample, Keyframe};
pub use easing::{Easing, lerp};
pub use presets::AnimationId;
