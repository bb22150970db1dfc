/// Cursor, menu, targeting and busy modes of the player interface.
///
/// Exactly one value is active per session. The interface transition function
/// writes it, except for the exit from [`InterfaceState::NoOp`], which belongs
/// to the `FadeDone` / `MoveFinished` handlers, and the exit from
/// [`InterfaceState::Combat`], which belongs to resolver completion.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InterfaceState {
    // ----- neutral: free cursor -----
    #[default]
    NeutralOverGround,
    NeutralOverUnit,
    NeutralOverEnemy,

    // ----- selected: a unit is picked up -----
    SelectedOverGround,
    SelectedOverAlly,
    SelectedOverEnemy,
    SelectedOverInaccessible,

    // ----- targeting: choosing an action's target -----
    TargetingOverValid,
    TargetingOverUntargetable,
    TargetingOverAlly,
    TargetingOverEnemy,

    // ----- menus -----
    GameMenuRoot,
    GameMenuEndTurn,
    GameMenuOptions,
    UnitMenuRoot,
    UnitMenuStats,
    EnemyInfoRoot,
    EnemyInfoDetail,

    // ----- busy sentinels -----
    Combat,
    NoOp,
}

/// Grouping of [`InterfaceState`] values that share input handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StateFamily {
    Neutral,
    Selected,
    Targeting,
    GameMenu,
    UnitMenu,
    EnemyInfo,
    Busy,
}

impl InterfaceState {
    pub const fn family(self) -> StateFamily {
        use InterfaceState::*;
        match self {
            NeutralOverGround | NeutralOverUnit | NeutralOverEnemy => StateFamily::Neutral,
            SelectedOverGround | SelectedOverAlly | SelectedOverEnemy
            | SelectedOverInaccessible => StateFamily::Selected,
            TargetingOverValid | TargetingOverUntargetable | TargetingOverAlly
            | TargetingOverEnemy => StateFamily::Targeting,
            GameMenuRoot | GameMenuEndTurn | GameMenuOptions => StateFamily::GameMenu,
            UnitMenuRoot | UnitMenuStats => StateFamily::UnitMenu,
            EnemyInfoRoot | EnemyInfoDetail => StateFamily::EnemyInfo,
            Combat | NoOp => StateFamily::Busy,
        }
    }

    /// Busy sentinels ignore every non-meta command.
    pub const fn is_busy(self) -> bool {
        matches!(self, InterfaceState::Combat | InterfaceState::NoOp)
    }

    pub const fn is_neutral(self) -> bool {
        matches!(self.family(), StateFamily::Neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn only_combat_and_noop_are_busy() {
        let busy: Vec<_> = InterfaceState::iter().filter(|s| s.is_busy()).collect();
        assert_eq!(busy, vec![InterfaceState::Combat, InterfaceState::NoOp]);
    }

    #[test]
    fn snake_case_names() {
        assert_eq!(InterfaceState::SelectedOverEnemy.to_string(), "selected_over_enemy");
        assert_eq!(InterfaceState::NoOp.as_ref(), "no_op");
    }
}
