//! Per-visitor dhikr counter kept in the session cookie.

use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::helper::catalog::TASBEEH_PHRASES;

pub const SESSION_KEY: &str = "tasbeeh";
pub const DEFAULT_TARGET: u32 = 33;
pub const TARGET_STEP: u32 = 11;
pub const MIN_TARGET: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasbeehState {
    pub phrase: usize,
    pub count: u32,
    pub target: u32,
}

impl Default for TasbeehState {
    fn default() -> Self {
        TasbeehState { phrase: 0, count: 0, target: DEFAULT_TARGET }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TasbeehAction {
    Increment,
    Reset,
    RaiseTarget,
    LowerTarget,
    SelectPhrase(usize),
}

impl TasbeehAction {
    /// `phrase` is only read for `select`.
    pub fn parse(action: &str, phrase: Option<usize>) -> Option<Self> {
        match action {
            "increment" => Some(TasbeehAction::Increment),
            "reset" => Some(TasbeehAction::Reset),
            "target_up" => Some(TasbeehAction::RaiseTarget),
            "target_down" => Some(TasbeehAction::LowerTarget),
            "select" => phrase.map(TasbeehAction::SelectPhrase),
            _ => None,
        }
    }
}

impl TasbeehState {
    pub fn apply(mut self, action: TasbeehAction) -> Self {
        match action {
            TasbeehAction::Increment => self.count = self.count.saturating_add(1),
            TasbeehAction::Reset => self.count = 0,
            TasbeehAction::RaiseTarget => self.target = self.target.saturating_add(TARGET_STEP),
            TasbeehAction::LowerTarget => self.target = self.target.saturating_sub(TARGET_STEP).max(MIN_TARGET),
            TasbeehAction::SelectPhrase(index) if index < TASBEEH_PHRASES.len() => {
                self.phrase = index;
                self.count = 0;
            }
            TasbeehAction::SelectPhrase(_) => {}
        }
        self
    }

    /// Whole percent, capped at 100.
    pub fn progress(&self) -> u32 {
        if self.target == 0 {
            return 100;
        }
        ((self.count as u64 * 100 / self.target as u64) as u32).min(100)
    }

    pub fn is_complete(&self) -> bool {
        self.count >= self.target
    }

    pub fn load(session: &Session) -> Self {
        let mut state = session.get::<TasbeehState>(SESSION_KEY).unwrap_or(None).unwrap_or_default();
        if state.phrase >= TASBEEH_PHRASES.len() {
            state.phrase = 0;
        }
        state.target = state.target.max(MIN_TARGET);
        state
    }

    pub fn save(&self, session: &Session) {
        if let Err(e) = session.insert(SESSION_KEY, self) {
            log::warn!("Could not store tasbeeh state in session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_to_the_target() {
        let mut state = TasbeehState::default();
        for _ in 0..33 {
            state = state.apply(TasbeehAction::Increment);
        }
        assert!(state.is_complete());
        assert_eq!(state.progress(), 100);
        state = state.apply(TasbeehAction::Increment);
        assert_eq!(state.count, 34);
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn target_moves_in_steps_with_a_floor() {
        let state = TasbeehState::default().apply(TasbeehAction::RaiseTarget);
        assert_eq!(state.target, 44);
        let state = state
            .apply(TasbeehAction::LowerTarget)
            .apply(TasbeehAction::LowerTarget)
            .apply(TasbeehAction::LowerTarget)
            .apply(TasbeehAction::LowerTarget);
        assert_eq!(state.target, MIN_TARGET);
    }

    #[test]
    fn selecting_a_phrase_resets_the_count() {
        let state = TasbeehState::default()
            .apply(TasbeehAction::Increment)
            .apply(TasbeehAction::SelectPhrase(2));
        assert_eq!((state.phrase, state.count), (2, 0));

        let unchanged = state.apply(TasbeehAction::SelectPhrase(99));
        assert_eq!(unchanged, state);
    }

    #[test]
    fn progress_rounds_down() {
        let state = TasbeehState { phrase: 0, count: 11, target: 33 };
        assert_eq!(state.progress(), 33);
        assert!(!state.is_complete());
    }

    #[test]
    fn parse_actions() {
        assert_eq!(TasbeehAction::parse("select", Some(1)), Some(TasbeehAction::SelectPhrase(1)));
        assert_eq!(TasbeehAction::parse("select", None), None);
        assert_eq!(TasbeehAction::parse("explode", None), None);
    }
}
