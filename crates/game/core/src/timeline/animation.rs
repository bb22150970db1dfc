use arrayvec::ArrayVec;

use crate::error::TimelineError;
use crate::event::EventBus;

use super::channel::{Channel, EventChannel};
use super::presets::AnimationId;

/// Maximum number of value channels per animation.
pub const MAX_CHANNELS: usize = 4;

/// Result of advancing a frame-counted process by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    Running,
    Done,
}

impl Status {
    pub const fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }
}

/// Frame-counted keyframe timeline.
///
/// Normalized time is `counter / finish`. Owners call [`Animation::update`]
/// once per simulation step and drop (or restart) the animation when it
/// reports [`Status::Done`].
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    id: Option<AnimationId>,
    speed: u32,
    counter: u32,
    finish: u32,
    repeat: bool,
    finished: bool,
    channels: ArrayVec<Channel, MAX_CHANNELS>,
    events: EventChannel,
}

impl Animation {
    pub fn new(finish: u32, speed: u32, repeat: bool) -> Result<Self, TimelineError> {
        if finish == 0 {
            return Err(TimelineError::ZeroFinish);
        }
        Ok(Self::blank(finish, speed, repeat))
    }

    /// Channel-less animation; `finish` is raised to at least one frame.
    pub(crate) fn blank(finish: u32, speed: u32, repeat: bool) -> Self {
        Self {
            id: None,
            speed: speed.max(1),
            counter: 0,
            finish: finish.max(1),
            repeat,
            finished: false,
            channels: ArrayVec::new(),
            events: EventChannel::default(),
        }
    }

    pub fn with_channel(mut self, channel: Channel) -> Result<Self, TimelineError> {
        self.channels
            .try_push(channel)
            .map_err(|_| TimelineError::TooManyChannels { max: MAX_CHANNELS })?;
        Ok(self)
    }

    #[must_use]
    pub fn with_events(mut self, events: EventChannel) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub(crate) fn tagged(mut self, id: AnimationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Preset this animation was built from, if any.
    pub fn id(&self) -> Option<AnimationId> {
        self.id
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn finish(&self) -> u32 {
        self.finish
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Normalized time in `[0, 1]`.
    pub fn time(&self) -> f32 {
        self.counter as f32 / self.finish as f32
    }

    /// Sprite frame index: the counter divided by the frame divisor.
    pub fn sprite_frame(&self) -> u32 {
        self.counter / self.speed
    }

    /// Advances one frame: bumps the counter, moves channel cursors, and
    /// fires crossed event samples onto `bus`.
    ///
    /// Returns [`Status::Done`] on the frame the counter reaches `finish` for a
    /// non-repeating animation. Repeating animations rewind to zero at that
    /// point and keep reporting [`Status::Running`]. A finished animation is
    /// inert: further calls neither advance nor fire.
    pub fn update(&mut self, bus: &mut EventBus) -> Status {
        if self.finished {
            return Status::Done;
        }

        self.counter += 1;
        let time = self.time();
        for channel in &mut self.channels {
            channel.advance(time);
        }
        self.events.update(time, bus);

        if self.counter % self.finish == 0 {
            if self.repeat {
                self.restart();
                return Status::Running;
            }
            self.finished = true;
            return Status::Done;
        }
        Status::Running
    }

    /// Current value of channel `channel`, or `None` if no such channel.
    pub fn value(&self, channel: usize) -> Option<f32> {
        self.channels
            .get(channel)
            .map(|track| track.value_at(self.time()))
    }

    /// Rewinds counter, channel cursors, and event track.
    pub fn restart(&mut self) {
        self.counter = 0;
        self.finished = false;
        for channel in &mut self.channels {
            channel.rewind();
        }
        self.events.rewind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::timeline::{Easing, EventSample, Keyframe};

    fn fade(finish: u32, repeat: bool) -> Animation {
        Animation::new(finish, 1, repeat)
            .unwrap()
            .with_channel(
                Channel::new(
                    vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)],
                    Easing::Linear,
                )
                .unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn zero_finish_is_rejected() {
        assert_eq!(
            Animation::new(0, 1, false).unwrap_err(),
            TimelineError::ZeroFinish
        );
    }

    #[test]
    fn value_starts_at_first_key_and_approaches_last() {
        let mut anim = fade(10, false);
        let mut bus = EventBus::new();
        assert_eq!(anim.value(0), Some(0.0));

        for _ in 0..9 {
            assert_eq!(anim.update(&mut bus), Status::Running);
        }
        let near_end = anim.value(0).unwrap();
        assert!((near_end - 0.9).abs() < 1e-4);
        assert_eq!(anim.value(3), None);
    }

    #[test]
    fn non_repeating_reports_done_once_then_stays_inert() {
        let mut anim = fade(3, false);
        let mut bus = EventBus::new();
        assert_eq!(anim.update(&mut bus), Status::Running);
        assert_eq!(anim.update(&mut bus), Status::Running);
        assert_eq!(anim.update(&mut bus), Status::Done);
        assert!(anim.is_finished());

        assert_eq!(anim.update(&mut bus), Status::Done);
        assert_eq!(anim.counter(), 3);
    }

    #[test]
    fn repeating_animation_rewinds_and_never_finishes() {
        let mut anim = fade(4, true);
        let mut bus = EventBus::new();
        for _ in 0..20 {
            assert_eq!(anim.update(&mut bus), Status::Running);
        }
        assert_eq!(anim.counter(), 0);
        assert_eq!(anim.value(0), Some(0.0));
    }

    #[test]
    fn event_samples_fire_once_each_across_a_run() {
        let events = EventChannel::new(vec![
            EventSample::new(0.0, EventKind::CombatStarted),
            EventSample::new(0.6, EventKind::AttackImpact),
        ])
        .unwrap();
        let mut anim = Animation::new(40, 1, false).unwrap().with_events(events);
        let mut bus = EventBus::new();

        let mut fired_at = Vec::new();
        for frame in 0..40 {
            anim.update(&mut bus);
            while let Some(event) = bus.pop() {
                fired_at.push((frame, event.kind));
            }
        }

        assert_eq!(fired_at.len(), 2);
        assert_eq!(fired_at[0], (0, EventKind::CombatStarted));
        assert_eq!(fired_at[1].1, EventKind::AttackImpact);
        assert!(fired_at[1].0 >= 24);
    }

    #[test]
    fn fifth_channel_is_rejected() {
        let mut anim = Animation::new(5, 1, false).unwrap();
        for _ in 0..MAX_CHANNELS {
            anim = anim.with_channel(Channel::flat(1.0)).unwrap();
        }
        assert_eq!(
            anim.with_channel(Channel::flat(1.0)).unwrap_err(),
            TimelineError::TooManyChannels { max: MAX_CHANNELS }
        );
    }

    #[test]
    fn sprite_frame_divides_counter_by_speed() {
        let mut anim = Animation::new(12, 4, false).unwrap();
        let mut bus = EventBus::new();
        for _ in 0..9 {
            anim.update(&mut bus);
        }
        assert_eq!(anim.sprite_frame(), 2);
    }
}
