//! Property-based tests for the conversation store

use super::*;
use proptest::prelude::*;

fn arb_turn() -> impl Strategy<Value = Turn> {
    prop_oneof![
        "[a-zA-Z0-9 ?!.]{0,40}".prop_map(Turn::human),
        "[a-zA-Z0-9 ?!.]{1,40}".prop_map(Turn::assistant),
    ]
}

proptest! {
    /// The context prefix is every turn but the last, in append order
    #[test]
    fn prop_prefix_is_all_but_latest(turns in proptest::collection::vec(arb_turn(), 1..20)) {
        let mut store = ConversationStore::new();
        for turn in &turns {
            store.append(turn.clone());
        }

        let prefix = store.context_prefix();
        prop_assert_eq!(prefix.len(), store.len() - 1);
        prop_assert_eq!(&prefix[..], &turns[..turns.len() - 1]);
        prop_assert_eq!(store.latest(), turns.last());
    }

    /// Appending never disturbs earlier turns
    #[test]
    fn prop_append_only(
        turns in proptest::collection::vec(arb_turn(), 0..10),
        extra in arb_turn(),
    ) {
        let mut store = ConversationStore::new();
        for turn in &turns {
            store.append(turn.clone());
        }
        let before = store.turns().to_vec();

        store.append(extra.clone());

        prop_assert_eq!(store.len(), before.len() + 1);
        prop_assert_eq!(&store.turns()[..before.len()], &before[..]);
        prop_assert_eq!(store.latest(), Some(&extra));
    }
}
