//! Pure combat rules.
//!
//! # Formula
//!
//! ```text
//! hit     = roll < accuracy            (roll uniform in [0, 100))
//! damage  = max(attack - defense, 0)
//! counter = victim reaches attacker && victim survives the first blow
//! ```

use crate::state::Unit;

use super::dice::DiceSource;

/// Outcome of one accuracy roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackOutcome {
    Hit,
    Miss,
}

impl AttackOutcome {
    pub const fn is_hit(self) -> bool {
        matches!(self, AttackOutcome::Hit)
    }
}

/// Precomputed result of an attack, fixed before playback starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngagementOutcome {
    pub strike: Option<AttackOutcome>,
    pub counter: Option<AttackOutcome>,
    /// Whether the victim strikes back. Forced off when the first blow kills.
    pub counter_attack: bool,
    pub damage_to_victim: u32,
    pub damage_to_attacker: u32,
}

/// `true` iff the roll lands strictly under the accuracy percentage.
pub fn check_hit(accuracy: u32, roll: u32) -> bool {
    roll < accuracy
}

/// Damage after defense, floored at zero.
pub fn calculate_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense)
}

/// Rolls an attack and, if still eligible, the counterattack.
///
/// `counter_eligible` is the caller's range check; it is overridden to
/// `false` whenever the strike alone would drop the victim to zero.
pub fn resolve_attack(
    attacker: &Unit,
    victim: &Unit,
    counter_eligible: bool,
    dice: &mut dyn DiceSource,
) -> EngagementOutcome {
    let mut outcome = EngagementOutcome {
        counter_attack: counter_eligible,
        ..EngagementOutcome::default()
    };

    if check_hit(attacker.accuracy, dice.roll_d100()) {
        outcome.strike = Some(AttackOutcome::Hit);
        outcome.damage_to_victim = calculate_damage(attacker.attack, victim.defense);
    } else {
        outcome.strike = Some(AttackOutcome::Miss);
    }

    if outcome.damage_to_victim >= victim.hp {
        outcome.counter_attack = false;
    }

    if outcome.counter_attack {
        if check_hit(victim.accuracy, dice.roll_d100()) {
            outcome.counter = Some(AttackOutcome::Hit);
            outcome.damage_to_attacker = calculate_damage(victim.attack, attacker.defense);
        } else {
            outcome.counter = Some(AttackOutcome::Miss);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ScriptedDice;
    use crate::state::{Faction, Position};
    use proptest::prelude::*;

    fn unit(hp: u32, attack: u32, defense: u32, accuracy: u32) -> Unit {
        Unit::new("u", Faction::Player, Position::ORIGIN)
            .with_hp(hp, hp.max(1))
            .with_combat(attack, defense, accuracy)
    }

    #[test]
    fn weak_attack_deals_zero_not_negative() {
        assert_eq!(calculate_damage(5, 8), 0);
        let mut dice = ScriptedDice::new([0]);
        let outcome = resolve_attack(&unit(10, 5, 0, 100), &unit(10, 0, 8, 0), false, &mut dice);
        assert_eq!(outcome.strike, Some(AttackOutcome::Hit));
        assert_eq!(outcome.damage_to_victim, 0);
    }

    #[test]
    fn accuracy_roll_is_strictly_below() {
        assert!(check_hit(80, 79));
        assert!(!check_hit(80, 80));
        assert!(!check_hit(0, 0));
    }

    #[test]
    fn counter_rolls_against_victim_accuracy() {
        // Strike hits for 3, victim survives and counters with roll 10 < 50.
        let mut dice = ScriptedDice::new([0, 10]);
        let attacker = unit(10, 5, 1, 90);
        let victim = unit(10, 4, 2, 50);
        let outcome = resolve_attack(&attacker, &victim, true, &mut dice);
        assert_eq!(outcome.damage_to_victim, 3);
        assert!(outcome.counter_attack);
        assert_eq!(outcome.counter, Some(AttackOutcome::Hit));
        assert_eq!(outcome.damage_to_attacker, 3);
    }

    #[test]
    fn missed_strike_still_allows_counter() {
        let mut dice = ScriptedDice::new([99, 99]);
        let outcome = resolve_attack(&unit(10, 5, 1, 90), &unit(3, 4, 2, 50), true, &mut dice);
        assert_eq!(outcome.strike, Some(AttackOutcome::Miss));
        assert!(outcome.counter_attack);
        assert_eq!(outcome.counter, Some(AttackOutcome::Miss));
        assert_eq!(outcome.damage_to_attacker, 0);
    }

    proptest! {
        #[test]
        fn damage_is_never_negative(attack in 0u32..200, defense in 0u32..200) {
            let damage = calculate_damage(attack, defense);
            prop_assert!(damage <= attack);
            if defense >= attack {
                prop_assert_eq!(damage, 0);
            }
        }

        #[test]
        fn lethal_strike_suppresses_counter(
            attack in 0u32..50,
            defense in 0u32..50,
            hp in 1u32..40,
            rolls in proptest::collection::vec(0u32..100, 2),
        ) {
            let attacker = unit(20, attack, 0, 100);
            let victim = unit(hp, 10, defense, 100);
            let mut dice = ScriptedDice::new(rolls);
            let outcome = resolve_attack(&attacker, &victim, true, &mut dice);
            if outcome.damage_to_victim >= victim.hp {
                prop_assert!(!outcome.counter_attack);
                prop_assert_eq!(outcome.counter, None);
                prop_assert_eq!(outcome.damage_to_attacker, 0);
            } else {
                prop_assert!(outcome.counter_attack);
            }
        }
    }
}
