//! Property tests for the HTTP contracts.
//!
//! 1. The cancel allow-list holds for every casing of every label.
//! 2. A field-keyed validation failure mentions every field and message.
//! 3. Blank search text and open filters never reach the query string.

use std::collections::BTreeMap;

use gsdash_proto::{
    ErrorBody, ErrorMessage, FieldError, LockFilter, ResourceQuery, StateFilter, TaskQuery,
    TaskState, can_cancel, failure_message,
};
use proptest::prelude::*;

/// Randomly upper- or lower-cases each character.
fn arb_casing(label: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), label.len()).prop_map(move |flags| {
        label
            .chars()
            .zip(flags)
            .map(|(c, upper)| {
                if upper {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

fn arb_known_label() -> impl Strategy<Value = (&'static str, String)> {
    prop_oneof![
        Just("idle"),
        Just("pending"),
        Just("running"),
        Just("success"),
        Just("failed"),
        Just("canceled"),
        Just("cancelled"),
    ]
    .prop_flat_map(|label| arb_casing(label).prop_map(move |cased| (label, cased)))
}

fn arb_state() -> impl Strategy<Value = TaskState> {
    prop::sample::select(TaskState::KNOWN.to_vec())
}

proptest! {
    #[test]
    fn cancel_allow_list_ignores_case((label, cased) in arb_known_label()) {
        let expected = matches!(label, "idle" | "pending" | "running");
        prop_assert_eq!(can_cancel(&cased), expected);
    }

    #[test]
    fn unknown_labels_are_never_cancellable(label in "[a-zA-Z_]{0,12}") {
        let known = ["idle", "pending", "running", "success", "failed", "canceled", "cancelled"];
        prop_assume!(!known.contains(&label.to_ascii_lowercase().as_str()));
        prop_assert!(!can_cancel(&label));
    }

    #[test]
    fn field_errors_all_reach_the_notice(
        fields in prop::collection::btree_map("[A-Za-z_]{1,12}", "[ -~]{1,40}", 1..6),
    ) {
        let mapping: BTreeMap<String, FieldError> = fields
            .iter()
            .map(|(k, v)| (k.clone(), FieldError::new(v.clone())))
            .collect();
        let body = serde_json::to_vec(&ErrorBody::fields(mapping)).unwrap();
        let decoded = ErrorBody::decode(&body).unwrap();
        prop_assert!(matches!(decoded.message, ErrorMessage::Fields(_)));

        let text = failure_message("Adding task failed", Some(&decoded.message));
        prop_assert!(text.starts_with("Adding task failed\n"));
        for (field, message) in &fields {
            let line = format!("{field}: {message}");
            prop_assert!(text.lines().any(|l| l == line), "missing line {:?}", line);
        }
    }

    #[test]
    fn blank_search_is_omitted(q in "[ \t]{0,8}", offset in 0u32..1000, count in 1u32..100) {
        let query = TaskQuery { q, offset, count, ..TaskQuery::default() };
        let value = serde_json::to_value(&query).unwrap();
        prop_assert!(value.get("q").is_none());
        prop_assert!(value.get("status").is_none());
        prop_assert_eq!(value["offset"].as_u64(), Some(u64::from(offset)));
        prop_assert_eq!(value["count"].as_u64(), Some(u64::from(count)));
    }

    #[test]
    fn state_filter_is_sent_upper_case(state in arb_state(), q in "[a-z]{1,8}") {
        let query = TaskQuery {
            state: StateFilter::Only(state.clone()),
            q: format!("  {q} "),
            ..TaskQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        prop_assert_eq!(value["status"].as_str(), Some(state.wire_label()));
        prop_assert_eq!(value["q"].as_str(), Some(q.as_str()));
    }

    #[test]
    fn lock_filter_only_when_chosen(pick in 0u8..3) {
        let lock = match pick {
            0 => LockFilter::Any,
            1 => LockFilter::Locked,
            _ => LockFilter::Unlocked,
        };
        let query = ResourceQuery { lock, ..ResourceQuery::default() };
        let value = serde_json::to_value(&query).unwrap();
        match lock {
            LockFilter::Any => prop_assert!(value.get("is_locked").is_none()),
            LockFilter::Locked => prop_assert_eq!(value["is_locked"].as_bool(), Some(true)),
            LockFilter::Unlocked => prop_assert_eq!(value["is_locked"].as_bool(), Some(false)),
        }
    }
}
