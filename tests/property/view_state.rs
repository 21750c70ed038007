//! Property tests for the list and submission view-models.
//!
//! 1. Reset restores the exact baseline whatever was edited.
//! 2. Search copies staged into committed, and later edits stay staged.
//! 3. A blank alias maps a resource under its own id.

use gsdash::view::{ResourceBinding, TaskListView, TaskSubmission};
use gsdash_proto::{StateFilter, TaskQuery, TaskState};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Query(String),
    State(Option<TaskState>),
    Offset(u32),
    Count(u32),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        "[ -~]{0,16}".prop_map(Edit::Query),
        prop::option::of(prop::sample::select(TaskState::KNOWN.to_vec())).prop_map(Edit::State),
        any::<u32>().prop_map(Edit::Offset),
        (1u32..500).prop_map(Edit::Count),
    ]
}

fn apply(query: &mut TaskQuery, edit: Edit) {
    match edit {
        Edit::Query(q) => query.q = q,
        Edit::State(state) => query.state = state.map_or(StateFilter::All, StateFilter::Only),
        Edit::Offset(offset) => query.offset = offset,
        Edit::Count(count) => query.count = count,
    }
}

proptest! {
    #[test]
    fn reset_restores_baseline(
        page_size in 1u32..50,
        edits in prop::collection::vec(arb_edit(), 0..12),
        search_midway in any::<bool>(),
    ) {
        let baseline = TaskQuery::with_page_size(page_size);
        let mut view = TaskListView::new(baseline.clone());
        let half = edits.len() / 2;
        for (i, edit) in edits.into_iter().enumerate() {
            if search_midway && i == half {
                view.search();
            }
            apply(view.form.staged_mut(), edit);
        }
        view.reset();
        prop_assert_eq!(view.form.staged(), &baseline);
    }

    #[test]
    fn search_copies_then_detaches(
        first in prop::collection::vec(arb_edit(), 0..8),
        second in prop::collection::vec(arb_edit(), 1..8),
    ) {
        let mut view = TaskListView::new(TaskQuery::default());
        for edit in first {
            apply(view.form.staged_mut(), edit);
        }
        let staged = view.form.staged().clone();
        let sent = view.search();
        prop_assert_eq!(&sent, &staged);
        prop_assert_eq!(view.form.committed(), &staged);

        for edit in second {
            apply(view.form.staged_mut(), edit);
        }
        prop_assert_eq!(view.form.committed(), &staged);
    }

    #[test]
    fn blank_alias_maps_to_id(id in "[a-z0-9-]{1,24}", blank in "[ \t]{0,4}") {
        let form = TaskSubmission {
            resources: vec![ResourceBinding::new(id.clone(), blank)],
            ..TaskSubmission::default()
        };
        let mapping = form.resource_mapping();
        prop_assert_eq!(mapping.len(), 1);
        prop_assert_eq!(mapping.get(&id), Some(&id));
    }

    #[test]
    fn named_alias_is_kept(id in "[a-z0-9-]{1,24}", alias in "[a-z_]{1,12}") {
        let form = TaskSubmission {
            resources: vec![ResourceBinding::new(id.clone(), alias.clone())],
            ..TaskSubmission::default()
        };
        let mapping = form.resource_mapping();
        prop_assert_eq!(mapping.get(&alias), Some(&id));
    }
}
