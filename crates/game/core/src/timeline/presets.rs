//! Static animation tables keyed by [`AnimationId`].

use crate::error::GameError;
use crate::event::EventKind;

use super::animation::Animation;
use super::channel::{Channel, EventChannel, EventSample, Keyframe};
use super::easing::Easing;

/// Named animation presets.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AnimationId {
    /// Screen fade in after a level loads. Channel 0: overlay alpha.
    FadeIn,
    /// Phase banner between turns. Channel 0: banner alpha.
    TurnBanner,
    /// Grey-out flash when a unit waits. Channel 0: tint.
    UnitExhaust,
    /// Unit walking along a path. Channel 0: progress along the path.
    MoveParcel,
    /// Attack playback. Channel 0: lunge offset, channel 1: hit flash.
    AttackLunge,
    /// Heal playback. Channel 0: glow.
    HealPulse,
    /// Looping cursor pulse. Channel 0: cursor alpha.
    CursorBlink,
}

struct ChannelSpec {
    easing: Easing,
    keys: &'static [Keyframe],
}

struct Preset {
    speed: u32,
    finish: u32,
    repeat: bool,
    channels: &'static [ChannelSpec],
    events: &'static [EventSample],
}

const FADE_IN: Preset = Preset {
    speed: 1,
    finish: 30,
    repeat: false,
    channels: &[ChannelSpec {
        easing: Easing::QuadOut,
        keys: &[Keyframe::new(0.0, 1.0), Keyframe::new(1.0, 0.0)],
    }],
    events: &[],
};

const TURN_BANNER: Preset = Preset {
    speed: 1,
    finish: 60,
    repeat: false,
    channels: &[ChannelSpec {
        easing: Easing::Linear,
        keys: &[
            Keyframe::new(0.0, 0.0),
            Keyframe::new(0.25, 1.0),
            Keyframe::new(0.75, 1.0),
            Keyframe::new(1.0, 0.0),
        ],
    }],
    events: &[],
};

const UNIT_EXHAUST: Preset = Preset {
    speed: 1,
    finish: 12,
    repeat: false,
    channels: &[ChannelSpec {
        easing: Easing::QuadIn,
        keys: &[Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)],
    }],
    events: &[],
};

const MOVE_PARCEL: Preset = Preset {
    speed: 4,
    finish: 1,
    repeat: false,
    channels: &[ChannelSpec {
        easing: Easing::Linear,
        keys: &[Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)],
    }],
    events: &[],
};

const ATTACK_LUNGE: Preset = Preset {
    speed: 5,
    finish: 40,
    repeat: false,
    channels: &[
        ChannelSpec {
            easing: Easing::Linear,
            keys: &[
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.5, 1.0),
                Keyframe::new(1.0, 0.0),
            ],
        },
        ChannelSpec {
            easing: Easing::Linear,
            keys: &[
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.6, 0.0),
                Keyframe::new(0.7, 1.0),
                Keyframe::new(1.0, 0.0),
            ],
        },
    ],
    events: &[
        EventSample::new(0.0, EventKind::CombatStarted),
        EventSample::new(0.6, EventKind::AttackImpact),
    ],
};

const HEAL_PULSE: Preset = Preset {
    speed: 5,
    finish: 30,
    repeat: false,
    channels: &[ChannelSpec {
        easing: Easing::Smoothstep,
        keys: &[
            Keyframe::new(0.0, 0.0),
            Keyframe::new(0.5, 1.0),
            Keyframe::new(1.0, 0.0),
        ],
    }],
    events: &[EventSample::new(0.0, EventKind::CombatStarted)],
};

const CURSOR_BLINK: Preset = Preset {
    speed: 8,
    finish: 48,
    repeat: true,
    channels: &[ChannelSpec {
        easing: Easing::QuadInOut,
        keys: &[
            Keyframe::new(0.0, 1.0),
            Keyframe::new(0.5, 0.3),
            Keyframe::new(1.0, 1.0),
        ],
    }],
    events: &[],
};

impl AnimationId {
    fn preset(self) -> &'static Preset {
        match self {
            AnimationId::FadeIn => &FADE_IN,
            AnimationId::TurnBanner => &TURN_BANNER,
            AnimationId::UnitExhaust => &UNIT_EXHAUST,
            AnimationId::MoveParcel => &MOVE_PARCEL,
            AnimationId::AttackLunge => &ATTACK_LUNGE,
            AnimationId::HealPulse => &HEAL_PULSE,
            AnimationId::CursorBlink => &CURSOR_BLINK,
        }
    }

    /// Unmodulated length of the preset in frames.
    pub fn base_frames(self) -> u32 {
        self.preset().finish
    }

    /// Modulation that stretches this preset to exactly `frames` frames.
    pub fn modulation_for(self, frames: u32) -> f32 {
        frames as f32 / self.base_frames() as f32
    }
}

impl Animation {
    /// Builds an animation from a preset table.
    ///
    /// `modulation` uniformly stretches `finish` (for example by path length or
    /// by a configured combat duration). Non-positive or non-finite values are
    /// treated as `1.0`. The stretched length is never below one frame.
    pub fn from_preset(id: AnimationId, modulation: f32) -> Animation {
        let preset = id.preset();
        let modulation = if modulation.is_finite() && modulation > 0.0 {
            modulation
        } else {
            tracing::warn!(preset = %id, modulation, "invalid frame modulation, using 1.0");
            1.0
        };
        let finish = ((preset.finish as f32 * modulation).round() as u32).max(1);

        let mut animation = Animation::blank(finish, preset.speed, preset.repeat);

        for table in preset.channels {
            let channel = Channel::new(table.keys.to_vec(), table.easing).unwrap_or_else(|err| {
                tracing::warn!(
                    preset = %id,
                    code = err.error_code(),
                    %err,
                    "invalid preset channel, holding at zero"
                );
                Channel::flat(0.0)
            });
            animation = match animation.with_channel(channel) {
                Ok(animation) => animation,
                Err(err) => {
                    tracing::warn!(
                        preset = %id,
                        code = err.error_code(),
                        %err,
                        "preset channel dropped"
                    );
                    return Animation::blank(finish, preset.speed, preset.repeat).tagged(id);
                }
            };
        }

        let events = EventChannel::new(preset.events.to_vec()).unwrap_or_else(|err| {
            tracing::warn!(
                preset = %id,
                code = err.error_code(),
                %err,
                "invalid preset event track, dropping it"
            );
            EventChannel::default()
        });

        animation.with_events(events).tagged(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::timeline::Status;
    use strum::IntoEnumIterator;

    #[test]
    fn every_preset_table_is_well_formed() {
        for id in AnimationId::iter() {
            let preset = id.preset();
            assert!(preset.finish > 0, "{id} finish");
            assert!(preset.channels.len() <= crate::timeline::MAX_CHANNELS);
            for table in preset.channels {
                assert!(
                    Channel::new(table.keys.to_vec(), table.easing).is_ok(),
                    "{id} channel"
                );
            }
            assert!(EventChannel::new(preset.events.to_vec()).is_ok(), "{id} events");
        }
    }

    #[test]
    fn modulation_stretches_finish() {
        assert_eq!(Animation::from_preset(AnimationId::TurnBanner, 1.0).finish(), 60);
        assert_eq!(Animation::from_preset(AnimationId::TurnBanner, 0.5).finish(), 30);
        assert_eq!(Animation::from_preset(AnimationId::MoveParcel, 18.0).finish(), 18);
    }

    #[test]
    fn invalid_modulation_falls_back_to_base_length() {
        assert_eq!(Animation::from_preset(AnimationId::FadeIn, 0.0).finish(), 30);
        assert_eq!(Animation::from_preset(AnimationId::FadeIn, f32::NAN).finish(), 30);
    }

    #[test]
    fn tiny_modulation_never_yields_zero_frames() {
        assert_eq!(Animation::from_preset(AnimationId::UnitExhaust, 0.001).finish(), 1);
    }

    #[test]
    fn attack_lunge_fires_impact_after_sixty_percent() {
        let frames = 40;
        let mut anim = Animation::from_preset(
            AnimationId::AttackLunge,
            AnimationId::AttackLunge.modulation_for(frames),
        );
        let mut bus = EventBus::new();
        let mut impacts = Vec::new();

        for frame in 0..frames {
            let status = anim.update(&mut bus);
            while let Some(event) = bus.pop() {
                if event.kind == EventKind::AttackImpact {
                    impacts.push(frame);
                }
            }
            assert_eq!(status.is_done(), frame == frames - 1);
        }

        assert_eq!(impacts.len(), 1);
        assert!(impacts[0] >= 24);
        assert_eq!(anim.id(), Some(AnimationId::AttackLunge));
        assert_eq!(anim.update(&mut bus), Status::Done);
    }

    #[test]
    fn cursor_blink_loops_forever() {
        let mut anim = Animation::from_preset(AnimationId::CursorBlink, 1.0);
        let mut bus = EventBus::new();
        for _ in 0..500 {
            assert_eq!(anim.update(&mut bus), Status::Running);
        }
    }
}
