//! Table-driven UI state machine.
//!
//! Each [`State`] owns an ordered list of [`Transition`]s. A key is resolved
//! by scanning that list in declaration order; the first entry whose
//! [`KeyMatch`] accepts the key wins. Every list ends with a
//! [`KeyMatch::EndOfList`] entry that accepts any key, so a scan always
//! terminates on a defined transition.
//!
//! [`Machine::process`] runs the resolved [`Action`] first and only then
//! moves to the next state, so an action always observes the state it was
//! triggered from.
//!
//! The default [`TABLE`] is checked at compile time; tables built elsewhere
//! go through [`check`] in [`Machine::with_table`].

use core::fmt;

use thiserror_no_std::Error;

use crate::keypad::Key;

/// UI states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    /// Home pages with time, climate or CO2 reading. Initial state.
    Idle,
    /// Options menu.
    Options,
    /// Entering HH:MM digit by digit.
    SetTime,
    /// Deciding whether the entered value is the time or the alarm.
    ChooseTimeOrAlarm,
    /// Alarm enable status shown after a toggle.
    ShowAlarmSetting,
    /// Help text.
    ShowInstructions,
}

impl State {
    /// Every state.
    pub const ALL: [State; 6] = [
        State::Idle,
        State::Options,
        State::SetTime,
        State::ChooseTimeOrAlarm,
        State::ShowAlarmSetting,
        State::ShowInstructions,
    ];

    /// Short name for logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::Options => "options",
            State::SetTime => "set-time",
            State::ChooseTimeOrAlarm => "choose-time-alarm",
            State::ShowAlarmSetting => "show-alarm",
            State::ShowInstructions => "show-instructions",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key pattern of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyMatch {
    /// Exactly this key.
    Key(Key),
    /// End-of-list sentinel: any key not matched by an earlier entry.
    EndOfList,
}

impl KeyMatch {
    /// Whether this pattern accepts `key`.
    pub const fn matches(self, key: Key) -> bool {
        match self {
            KeyMatch::Key(k) => k as u8 == key as u8,
            KeyMatch::EndOfList => true,
        }
    }
}

/// Side effect bound to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Draw the current home page (time with climate or CO2).
    ShowHome,
    /// Draw the options menu.
    ShowOptions,
    /// Draw the help text.
    ShowInstructions,
    /// Move to the next home page.
    ScrollUp,
    /// Move to the previous home page.
    ScrollDown,
    /// Flash "Invalid key!", then the home page.
    InvalidKey,
    /// Reset the time entry to 00:00 and draw the entry prompt.
    PromptTimeEntry,
    /// Feed the pressed digit to the time entry.
    EnterDigit,
    /// Draw the entered time and the time/alarm choice.
    ShowTimeAlarmChoice,
    /// Flash "Invalid time entry", then the entry prompt.
    InvalidTimeEntry,
    /// Write the entered time to the clock.
    SetSystemTime,
    /// Write the entered time to alarm 0.
    SetSystemAlarm,
    /// Flash "Invalid entry", then the time/alarm choice.
    InvalidTimeAlarmChoice,
    /// Flip the alarm 0 interrupt enable and draw the alarm status.
    ToggleAlarm,
}

/// One row of a state's transition list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// Key pattern.
    pub on: KeyMatch,
    /// State entered after the action completes.
    pub next: State,
    /// Action to run.
    pub action: Action,
}

/// Transition list of one state.
#[derive(Debug, Clone, Copy)]
pub struct StateTransitions {
    /// Owning state.
    pub state: State,
    /// Ordered entries, wildcard last.
    pub transitions: &'static [Transition],
}

/// Table validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// A state has no transition list.
    #[error("state {0} has no transition list")]
    MissingState(State),
    /// A state appears more than once.
    #[error("state {0} is listed twice")]
    DuplicateState(State),
    /// A list does not end with the end-of-list wildcard.
    #[error("state {0} has no trailing wildcard")]
    MissingWildcard(State),
    /// A wildcard appears before the end of a list.
    #[error("state {0} has a wildcard before its last entry")]
    WildcardNotLast(State),
}

const fn on(key: Key, next: State, action: Action) -> Transition {
    Transition {
        on: KeyMatch::Key(key),
        next,
        action,
    }
}

const fn otherwise(next: State, action: Action) -> Transition {
    Transition {
        on: KeyMatch::EndOfList,
        next,
        action,
    }
}

const IDLE: &[Transition] = &[
    on(Key::Second, State::Options, Action::ShowOptions),
    on(Key::Help, State::ShowInstructions, Action::ShowInstructions),
    on(Key::Up, State::Idle, Action::ScrollUp),
    on(Key::Down, State::Idle, Action::ScrollDown),
    otherwise(State::Idle, Action::InvalidKey),
];

const OPTIONS: &[Transition] = &[
    on(Key::One, State::SetTime, Action::PromptTimeEntry),
    on(Key::Two, State::ShowAlarmSetting, Action::ToggleAlarm),
    otherwise(State::Idle, Action::InvalidKey),
];

const SET_TIME: &[Transition] = &[
    on(Key::Zero, State::SetTime, Action::EnterDigit),
    on(Key::One, State::SetTime, Action::EnterDigit),
    on(Key::Two, State::SetTime, Action::EnterDigit),
    on(Key::Three, State::SetTime, Action::EnterDigit),
    on(Key::Four, State::SetTime, Action::EnterDigit),
    on(Key::Five, State::SetTime, Action::EnterDigit),
    on(Key::Six, State::SetTime, Action::EnterDigit),
    on(Key::Seven, State::SetTime, Action::EnterDigit),
    on(Key::Eight, State::SetTime, Action::EnterDigit),
    on(Key::Nine, State::SetTime, Action::EnterDigit),
    on(Key::Enter, State::ChooseTimeOrAlarm, Action::ShowTimeAlarmChoice),
    otherwise(State::SetTime, Action::InvalidTimeEntry),
];

const CHOOSE_TIME_OR_ALARM: &[Transition] = &[
    on(Key::One, State::Idle, Action::SetSystemTime),
    on(Key::Two, State::Idle, Action::SetSystemAlarm),
    otherwise(State::ChooseTimeOrAlarm, Action::InvalidTimeAlarmChoice),
];

const SHOW_ALARM_SETTING: &[Transition] = &[otherwise(State::Idle, Action::ShowHome)];

const SHOW_INSTRUCTIONS: &[Transition] = &[otherwise(State::Idle, Action::ShowHome)];

/// The clock's transition table.
pub const TABLE: &[StateTransitions] = &[
    StateTransitions {
        state: State::Idle,
        transitions: IDLE,
    },
    StateTransitions {
        state: State::Options,
        transitions: OPTIONS,
    },
    StateTransitions {
        state: State::SetTime,
        transitions: SET_TIME,
    },
    StateTransitions {
        state: State::ChooseTimeOrAlarm,
        transitions: CHOOSE_TIME_OR_ALARM,
    },
    StateTransitions {
        state: State::ShowAlarmSetting,
        transitions: SHOW_ALARM_SETTING,
    },
    StateTransitions {
        state: State::ShowInstructions,
        transitions: SHOW_INSTRUCTIONS,
    },
];

const _: () = assert!(check(TABLE).is_ok(), "transition table is malformed");

/// Validate a table: every state listed exactly once, every list non-empty
/// and terminated by exactly one trailing wildcard.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // bounded by `while` conditions
pub const fn check(table: &[StateTransitions]) -> Result<(), TableError> {
    let mut s = 0;
    while s < State::ALL.len() {
        let state = State::ALL[s];
        let mut found = false;
        let mut i = 0;
        while i < table.len() {
            let entry = &table[i];
            if entry.state as u8 == state as u8 {
                if found {
                    return Err(TableError::DuplicateState(state));
                }
                found = true;
                if let Err(e) = check_list(state, entry.transitions) {
                    return Err(e);
                }
            }
            i += 1;
        }
        if !found {
            return Err(TableError::MissingState(state));
        }
        s += 1;
    }
    Ok(())
}

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
const fn check_list(state: State, list: &[Transition]) -> Result<(), TableError> {
    let len = list.len();
    if len == 0 {
        return Err(TableError::MissingWildcard(state));
    }
    let mut i = 0;
    while i < len {
        let wildcard = matches!(list[i].on, KeyMatch::EndOfList);
        let last = i + 1 == len;
        if wildcard && !last {
            return Err(TableError::WildcardNotLast(state));
        }
        if last && !wildcard {
            return Err(TableError::MissingWildcard(state));
        }
        i += 1;
    }
    Ok(())
}

/// Transition list of `state` in `table`.
pub fn transitions(table: &'static [StateTransitions], state: State) -> Option<&'static [Transition]> {
    table
        .iter()
        .find(|entry| entry.state == state)
        .map(|entry| entry.transitions)
}

/// Transition function: first entry of `state`'s list that accepts `key`.
pub fn delta(
    table: &'static [StateTransitions],
    state: State,
    key: Key,
) -> Result<Transition, TableError> {
    let list = transitions(table, state).ok_or(TableError::MissingState(state))?;
    list.iter()
        .find(|t| t.on.matches(key))
        .copied()
        .ok_or(TableError::MissingWildcard(state))
}

/// The state machine: current state plus the table it runs on.
#[derive(Debug, Clone)]
pub struct Machine {
    state: State,
    table: &'static [StateTransitions],
}

impl Machine {
    /// Machine on [`TABLE`], starting in [`State::Idle`].
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            table: TABLE,
        }
    }

    /// Machine on a custom table, validated first.
    pub fn with_table(table: &'static [StateTransitions]) -> Result<Self, TableError> {
        check(table)?;
        Ok(Self {
            state: State::Idle,
            table,
        })
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Transition `key` would take from the current state.
    pub fn resolve(&self, key: Key) -> Result<Transition, TableError> {
        delta(self.table, self.state, key)
    }

    /// Resolve `key`, run the action through `run` with the pre-transition
    /// state, then enter the next state. Returns what `run` returned.
    ///
    /// The next state is entered regardless of what `run` returns.
    pub fn process<R>(
        &mut self,
        key: Key,
        run: impl FnOnce(Action, State) -> R,
    ) -> Result<R, TableError> {
        let transition = self.resolve(key)?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "fsm: {} --{}--> {} ({})",
            self.state,
            key,
            transition.next,
            transition.action
        );
        let outcome = run(transition.action, self.state);
        self.state = transition.next;
        Ok(outcome)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_fsm_default_table_is_well_formed() {
        assert_eq!(check(TABLE), Ok(()));
    }

    #[test]
    fn test_fsm_every_list_ends_with_wildcard() {
        for state in State::ALL {
            let list = transitions(TABLE, state).unwrap();
            assert_eq!(list.last().map(|t| t.on), Some(KeyMatch::EndOfList));
        }
    }

    #[test]
    fn test_fsm_starts_idle() {
        assert_eq!(Machine::new().state(), State::Idle);
    }

    #[test]
    fn test_fsm_second_opens_options() {
        let mut fsm = Machine::new();
        let action = fsm.process(Key::Second, |a, _| a).unwrap();
        assert_eq!(action, Action::ShowOptions);
        assert_eq!(fsm.state(), State::Options);
    }

    #[test]
    fn test_fsm_action_sees_previous_state() {
        let mut fsm = Machine::new();
        let seen = fsm.process(Key::Second, |_, s| s).unwrap();
        assert_eq!(seen, State::Idle);
        let seen = fsm.process(Key::One, |_, s| s).unwrap();
        assert_eq!(seen, State::Options);
        assert_eq!(fsm.state(), State::SetTime);
    }

    #[test]
    fn test_fsm_unlisted_key_takes_wildcard() {
        let mut fsm = Machine::new();
        let action = fsm.process(Key::Clear, |a, _| a).unwrap();
        assert_eq!(action, Action::InvalidKey);
        assert_eq!(fsm.state(), State::Idle);
    }

    #[test]
    fn test_fsm_set_time_flow() {
        let mut fsm = Machine::new();
        let keys = [Key::Second, Key::One, Key::One, Key::Two, Key::Enter, Key::Two];
        let mut actions = [Action::ShowHome; 6];
        for (slot, key) in actions.iter_mut().zip(keys) {
            *slot = fsm.process(key, |a, _| a).unwrap();
        }
        assert_eq!(
            actions,
            [
                Action::ShowOptions,
                Action::PromptTimeEntry,
                Action::EnterDigit,
                Action::EnterDigit,
                Action::ShowTimeAlarmChoice,
                Action::SetSystemAlarm,
            ]
        );
        assert_eq!(fsm.state(), State::Idle);
    }

    #[test]
    fn test_fsm_bad_choice_stays_put() {
        let mut fsm = Machine::new();
        for key in [Key::Second, Key::One, Key::Enter] {
            fsm.process(key, |_, _| ()).unwrap();
        }
        let action = fsm.process(Key::Nine, |a, _| a).unwrap();
        assert_eq!(action, Action::InvalidTimeAlarmChoice);
        assert_eq!(fsm.state(), State::ChooseTimeOrAlarm);
    }

    #[test]
    fn test_fsm_info_screens_return_home_on_any_key() {
        for start in [Key::Help, Key::Second] {
            let mut fsm = Machine::new();
            fsm.process(start, |_, _| ()).unwrap();
            if fsm.state() == State::Options {
                fsm.process(Key::Two, |_, _| ()).unwrap();
                assert_eq!(fsm.state(), State::ShowAlarmSetting);
            }
            let action = fsm.process(Key::Clear, |a, _| a).unwrap();
            assert_eq!(action, Action::ShowHome);
            assert_eq!(fsm.state(), State::Idle);
        }
    }

    static NO_WILDCARD: &[Transition] = &[on(Key::One, State::Idle, Action::ShowHome)];
    static EARLY_WILDCARD: &[Transition] = &[
        otherwise(State::Idle, Action::ShowHome),
        on(Key::One, State::Idle, Action::ShowHome),
    ];

    fn table_with(idle: &'static [Transition]) -> [StateTransitions; 6] {
        let mut table = [StateTransitions {
            state: State::Idle,
            transitions: SHOW_INSTRUCTIONS,
        }; 6];
        for (entry, state) in table.iter_mut().zip(State::ALL) {
            entry.state = state;
        }
        table[0].transitions = idle;
        table
    }

    #[test]
    fn test_fsm_rejects_missing_wildcard() {
        let table = table_with(NO_WILDCARD);
        assert_eq!(check(&table), Err(TableError::MissingWildcard(State::Idle)));
    }

    #[test]
    fn test_fsm_rejects_early_wildcard() {
        let table = table_with(EARLY_WILDCARD);
        assert_eq!(check(&table), Err(TableError::WildcardNotLast(State::Idle)));
    }

    #[test]
    fn test_fsm_rejects_missing_state() {
        assert_eq!(
            check(&TABLE[..5]),
            Err(TableError::MissingState(State::ShowInstructions))
        );
    }

    #[test]
    fn test_fsm_with_table_validates() {
        static BROKEN: [StateTransitions; 1] = [StateTransitions {
            state: State::Idle,
            transitions: &[],
        }];
        assert!(Machine::with_table(&BROKEN).is_err());
        assert!(Machine::with_table(TABLE).is_ok());
    }
}
