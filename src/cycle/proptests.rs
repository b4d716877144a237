//! Property-based tests for the submission cycle
//!
//! These tests verify that every cycle settles cleanly whatever the reply
//! stream looks like:
//! - Input is disabled for the whole cycle and re-enabled exactly once
//! - The placeholder is finished exactly once
//! - Exactly one assistant turn is recorded, and it is never empty

use super::transition::{CONNECTION_ERROR_TEXT, EMPTY_REPLY_TEXT};
use super::*;
use crate::conversation::{Role, Turn};
use crate::stream::DisplayState;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_display_state() -> impl Strategy<Value = DisplayState> {
    prop_oneof![
        3 => "[a-zA-Z0-9 .*_`#<>\\[\\]()\n]{0,30}".prop_map(DisplayState::Content),
        1 => "[a-zA-Z0-9 ._<>\"]{0,30}".prop_map(DisplayState::Error),
        1 => "[a-zA-Z0-9 .]{0,30}".prop_map(DisplayState::DecodeFailed),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Ending {
    Ended,
    RequestFailed,
    StreamFailed,
}

fn arb_ending() -> impl Strategy<Value = Ending> {
    prop_oneof![
        Just(Ending::Ended),
        Just(Ending::RequestFailed),
        Just(Ending::StreamFailed),
    ]
}

fn ending_event(ending: Ending) -> Event {
    match ending {
        Ending::Ended => Event::StreamEnded,
        Ending::RequestFailed => Event::RequestFailed,
        Ending::StreamFailed => Event::StreamFailed,
    }
}

/// Run one full cycle and collect every effect it produced
fn run_cycle(query: &str, records: &[DisplayState], ending: Ending) -> (CycleState, Vec<Effect>) {
    let mut state = CycleState::Idle;
    let mut effects = Vec::new();

    let mut events = vec![Event::Submit {
        query: query.to_string(),
    }];
    // A request failure happens before any frame arrives
    if !matches!(ending, Ending::RequestFailed) {
        events.extend(records.iter().cloned().map(|state| Event::Record { state }));
    }
    events.push(ending_event(ending));

    for event in events {
        let result = transition(&state, event).expect("valid cycle");
        state = result.new_state;
        effects.extend(result.effects);
    }
    (state, effects)
}

fn appended_turns(effects: &[Effect]) -> Vec<&Turn> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendTurn(turn) => Some(turn),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every cycle returns to idle with input re-enabled last
    #[test]
    fn prop_cycle_always_settles(
        query in "[a-zA-Z?]{1,20}",
        records in proptest::collection::vec(arb_display_state(), 0..6),
        ending in arb_ending(),
    ) {
        let (state, effects) = run_cycle(&query, &records, ending);

        prop_assert_eq!(state, CycleState::Idle);
        prop_assert_eq!(effects.first(), Some(&Effect::SetInputEnabled(false)));
        prop_assert_eq!(effects.last(), Some(&Effect::SetInputEnabled(true)));

        let input_toggles = effects
            .iter()
            .filter(|e| matches!(e, Effect::SetInputEnabled(_)))
            .count();
        prop_assert_eq!(input_toggles, 2);

        let begins = effects.iter().filter(|e| matches!(e, Effect::BeginReply)).count();
        let finishes = effects.iter().filter(|e| matches!(e, Effect::FinishReply(_))).count();
        prop_assert_eq!(begins, 1);
        prop_assert_eq!(finishes, 1);
    }

    /// One human turn and one non-empty assistant turn per cycle, in that order
    #[test]
    fn prop_one_turn_pair_per_cycle(
        query in "[a-zA-Z?]{1,20}",
        records in proptest::collection::vec(arb_display_state(), 0..6),
        ending in arb_ending(),
    ) {
        let (_, effects) = run_cycle(&query, &records, ending);
        let turns = appended_turns(&effects);

        prop_assert_eq!(turns.len(), 2);
        prop_assert_eq!(turns[0], &Turn::human(query.clone()));
        prop_assert_eq!(turns[1].role, Role::Assistant);
        prop_assert!(!turns[1].content.is_empty());
    }

    /// A normally ended stream settles on the last record and stores its
    /// text unchanged
    #[test]
    fn prop_final_display_is_last_record(
        records in proptest::collection::vec(arb_display_state(), 1..6),
    ) {
        let (_, effects) = run_cycle("q", &records, Ending::Ended);
        let finished = effects.iter().find_map(|e| match e {
            Effect::FinishReply(state) => Some(state.clone()),
            _ => None,
        });

        let last = records.last().cloned();
        let last_is_blank = last.as_ref().is_some_and(|s| s.text().trim().is_empty());
        if last_is_blank {
            prop_assert_eq!(finished, Some(DisplayState::Error(EMPTY_REPLY_TEXT.to_string())));
        } else {
            let stored = appended_turns(&effects)[1].content.clone();
            prop_assert_eq!(Some(stored.as_str()), last.as_ref().map(DisplayState::text));
            prop_assert_eq!(finished, last);
        }
    }

    /// Transport failures always record the fixed connection text
    #[test]
    fn prop_failures_record_fixed_text(
        records in proptest::collection::vec(arb_display_state(), 0..6),
        failure in prop_oneof![Just(Ending::RequestFailed), Just(Ending::StreamFailed)],
    ) {
        let (_, effects) = run_cycle("q", &records, failure);
        let turns = appended_turns(&effects);
        prop_assert_eq!(turns[1], &Turn::assistant(CONNECTION_ERROR_TEXT));
    }
}
