//! Keyframe value tracks and time-triggered event tracks.

use crate::error::TimelineError;
use crate::event::{Event, EventBus, EventKind};

use super::easing::{Easing, lerp};

/// One keyframe: value `value` at eased time `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    pub t: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(t: f32, value: f32) -> Self {
        Self { t, value }
    }
}

/// Ordered keyframes plus an easing curve and a forward-only cursor.
///
/// Invariants (checked by [`Channel::new`]): at least two samples, the first
/// at `t = 0`, the last at `t = 1`, ascending in between. The cursor always
/// satisfies `index + 1 < samples.len()`, so [`Channel::value_at`] can never
/// read past the last keyframe.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    samples: Vec<Keyframe>,
    easing: Easing,
    index: usize,
}

impl Channel {
    pub fn new(samples: Vec<Keyframe>, easing: Easing) -> Result<Self, TimelineError> {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Err(TimelineError::EmptyChannel);
        };
        if samples.len() < 2 {
            return Err(TimelineError::EmptyChannel);
        }
        if first.t != 0.0 || last.t != 1.0 {
            return Err(TimelineError::BoundaryViolation {
                first: first.t,
                last: last.t,
            });
        }
        if samples.windows(2).any(|pair| pair[1].t < pair[0].t) {
            return Err(TimelineError::UnsortedKeyframes);
        }
        Ok(Self {
            samples,
            easing,
            index: 0,
        })
    }

    /// A two-key channel holding `value` for the whole run.
    pub fn flat(value: f32) -> Self {
        Self {
            samples: vec![Keyframe::new(0.0, value), Keyframe::new(1.0, value)],
            easing: Easing::Linear,
            index: 0,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn cursor(&self) -> usize {
        self.index
    }

    pub fn samples(&self) -> &[Keyframe] {
        &self.samples
    }

    /// Moves the cursor forward past every keyframe the eased time has
    /// crossed. Never moves backwards.
    pub fn advance(&mut self, time: f32) {
        let eased = self.easing.apply(time);
        while self.index + 2 < self.samples.len() && eased > self.samples[self.index + 1].t {
            self.index += 1;
        }
    }

    /// Interpolated value for normalized `time` within the current segment.
    pub fn value_at(&self, time: f32) -> f32 {
        debug_assert!(
            self.index + 1 < self.samples.len(),
            "channel cursor past last keyframe"
        );
        let from = self.samples[self.index];
        let to = self.samples[self.index + 1];
        let span = to.t - from.t;
        if span <= f32::EPSILON {
            return to.value;
        }
        let ratio = ((self.easing.apply(time) - from.t) / span).clamp(0.0, 1.0);
        lerp(from.value, to.value, ratio)
    }

    pub(crate) fn rewind(&mut self) {
        self.index = 0;
    }
}

/// Event `value` fired once per run when normalized time crosses `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSample {
    pub t: f32,
    pub value: EventKind,
}

impl EventSample {
    pub const fn new(t: f32, value: EventKind) -> Self {
        Self { t, value }
    }
}

/// Ascending list of [`EventSample`]s with a firing cursor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventChannel {
    samples: Vec<EventSample>,
    index: usize,
}

impl EventChannel {
    /// Builds a track. Samples must be ascending by `t`; an unsorted track
    /// would delay or bunch its later samples, so it is rejected here.
    pub fn new(samples: Vec<EventSample>) -> Result<Self, TimelineError> {
        if samples.windows(2).any(|pair| pair[1].t < pair[0].t) {
            return Err(TimelineError::UnsortedEvents);
        }
        Ok(Self { samples, index: 0 })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples already fired this run.
    pub fn fired(&self) -> usize {
        self.index
    }

    /// Fires, in array order, every unfired sample whose `t` the normalized
    /// time now strictly exceeds.
    pub fn update(&mut self, time: f32, bus: &mut EventBus) {
        while let Some(sample) = self.samples.get(self.index) {
            if time <= sample.t {
                break;
            }
            bus.emit(Event::new(sample.value).with_number(sample.t));
            self.index += 1;
        }
    }

    pub(crate) fn rewind(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Channel {
        Channel::new(
            vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.5, 10.0),
                Keyframe::new(1.0, 0.0),
            ],
            Easing::Linear,
        )
        .unwrap()
    }

    #[test]
    fn rejects_channels_that_do_not_span_zero_to_one() {
        let err = Channel::new(
            vec![Keyframe::new(0.1, 0.0), Keyframe::new(1.0, 1.0)],
            Easing::Linear,
        )
        .unwrap_err();
        assert!(matches!(err, TimelineError::BoundaryViolation { .. }));

        assert_eq!(
            Channel::new(vec![Keyframe::new(0.0, 1.0)], Easing::Linear).unwrap_err(),
            TimelineError::EmptyChannel
        );
        assert_eq!(
            Channel::new(Vec::new(), Easing::Linear).unwrap_err(),
            TimelineError::EmptyChannel
        );
    }

    #[test]
    fn rejects_unsorted_keyframes() {
        let err = Channel::new(
            vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.8, 1.0),
                Keyframe::new(0.4, 1.0),
                Keyframe::new(1.0, 0.0),
            ],
            Easing::Linear,
        )
        .unwrap_err();
        assert_eq!(err, TimelineError::UnsortedKeyframes);
    }

    #[test]
    fn value_interpolates_within_current_segment() {
        let mut channel = ramp();
        assert_eq!(channel.value_at(0.0), 0.0);

        channel.advance(0.25);
        assert_eq!(channel.cursor(), 0);
        assert!((channel.value_at(0.25) - 5.0).abs() < 1e-4);

        channel.advance(0.75);
        assert_eq!(channel.cursor(), 1);
        assert!((channel.value_at(0.75) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn cursor_never_passes_the_last_segment() {
        let mut channel = ramp();
        channel.advance(1.0);
        channel.advance(5.0);
        assert_eq!(channel.cursor(), 1);
        assert_eq!(channel.value_at(1.0), 0.0);
    }

    #[test]
    fn event_channel_fires_each_sample_once_in_order() {
        let mut track = EventChannel::new(vec![
            EventSample::new(0.0, EventKind::CombatStarted),
            EventSample::new(0.6, EventKind::AttackImpact),
        ])
        .unwrap();
        let mut bus = EventBus::new();

        track.update(0.5, &mut bus);
        track.update(0.5, &mut bus);
        assert_eq!(track.fired(), 1);

        track.update(0.61, &mut bus);
        track.update(0.9, &mut bus);
        let kinds: Vec<_> = bus.pending_kinds().collect();
        assert_eq!(kinds, vec![EventKind::CombatStarted, EventKind::AttackImpact]);
    }

    #[test]
    fn event_channel_rejects_unsorted_samples() {
        let err = EventChannel::new(vec![
            EventSample::new(0.7, EventKind::AttackImpact),
            EventSample::new(0.2, EventKind::CombatStarted),
        ])
        .unwrap_err();
        assert_eq!(err, TimelineError::UnsortedEvents);
    }
}
