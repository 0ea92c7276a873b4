//! End-to-end scenarios: persisted step JSON through the codec, remapper and
//! decoration builder, the way the editing surface drives the engine.

use pretty_assertions::assert_eq;
use serde_json::json;

use redline_engine::{
    Batch, Decoration, Mapping, PreviewOptions, Snapshot, StepFailure, ViewMode, apply_steps,
    build_decorations, build_decorations_flat, extract_preview, parse_steps, remap_steps,
};

fn doc() -> Snapshot {
    Snapshot::from_text("The quick fox jumps")
}

#[test]
fn suggestion_json_renders_as_overlays() {
    // A stored AI suggestion: replace "quick" with "slow", add an adverb
    let raw = json!([
        {
            "stepType": "replace", "from": 4, "to": 9,
            "slice": { "content": [{ "type": "text", "text": "slow" }] },
            "deletedText": "quick", "insertedText": "slow"
        },
        {
            "stepType": "replace", "from": 19, "to": 19,
            "slice": { "content": [{ "type": "text", "text": " gracefully" }] },
            "insertedText": " gracefully"
        },
    ]);

    let steps = parse_steps(&raw);
    assert_eq!(steps.len(), 2);

    let set = build_decorations_flat(&doc(), &steps, ViewMode::Owner, None);
    assert_eq!(set.len(), 3);
    assert_eq!(set.inlines().count(), 1);
    assert_eq!(set.widgets().count(), 2);
}

#[test]
fn malformed_entries_do_not_take_down_the_batch() {
    let raw = json!([
        { "stepType": "addMark", "from": 0, "to": 3 },
        { "stepType": "replace", "from": 4, "to": 9, "deletedText": "quick" },
    ]);

    let steps = parse_steps(&raw);
    let set = build_decorations_flat(&doc(), &steps, ViewMode::Owner, None);
    assert_eq!(set.len(), 1);
}

#[test]
fn pending_edits_survive_concurrent_typing_via_remap() {
    // The owner typed "Note: " at the front since the suggestion was stored
    let base = doc();
    let typed = apply_steps(
        &base,
        &[redline_engine::Step::insertion(0, "Note: ")],
    );
    assert!(!typed.failed);
    let live = typed.doc;
    assert_eq!(live.text_content(), "Note: The quick fox jumps");

    let mapping = Mapping::from_entries(vec![redline_engine::MapEntry {
        start: 0,
        old_len: 0,
        new_len: 6,
    }]);

    let steps = vec![redline_engine::Step::deletion(4, 9, "quick")];
    let set = build_decorations_flat(&live, &steps, ViewMode::Owner, Some(&mapping));

    assert_eq!(set.len(), 1);
    match set.iter().next().unwrap() {
        Decoration::Inline { from, to, .. } => assert_eq!((*from, *to), (10, 15)),
        other => panic!("expected an inline, got {other:?}"),
    }
}

#[test]
fn deleted_target_skips_its_decoration_but_not_the_batch() {
    // Concurrent edit removed "quick " entirely
    let live = Snapshot::from_text("The fox jumps");
    let mapping = Mapping::from_entries(vec![redline_engine::MapEntry {
        start: 4,
        old_len: 6,
        new_len: 0,
    }]);

    let steps = vec![
        redline_engine::Step::deletion(5, 9, "uick"), // interior of the deleted span
        redline_engine::Step::deletion(14, 19, "jumps"),
    ];
    let set = build_decorations_flat(&live, &steps, ViewMode::Owner, Some(&mapping));

    // first step unrepresentable, second still decorates
    assert_eq!(set.len(), 1);
    match set.iter().next().unwrap() {
        Decoration::Inline { from, to, .. } => assert_eq!((*from, *to), (8, 13)),
        other => panic!("expected an inline, got {other:?}"),
    }
}

#[test]
fn remap_reports_the_stale_step() {
    let mapping = Mapping::from_entries(vec![redline_engine::MapEntry {
        start: 4,
        old_len: 6,
        new_len: 0,
    }]);
    let steps = vec![redline_engine::Step::deletion(5, 9, "uick")];

    let outcome = remap_steps(&steps, &mapping);
    assert!(outcome.failed);
    assert_eq!(outcome.failed_step, Some(0));
    assert_eq!(outcome.reason, Some(StepFailure::MapFailed));
    assert_eq!(outcome.reason.unwrap().to_string(), "map_failed");
}

#[test]
fn accepting_a_suggestion_materializes_it() {
    let raw = json!([{
        "stepType": "replace", "from": 4, "to": 9,
        "slice": { "content": [{ "type": "text", "text": "sly" }] },
        "deletedText": "quick", "insertedText": "sly"
    }]);
    let steps = parse_steps(&raw);

    let outcome = apply_steps(&doc(), &steps);
    assert!(!outcome.failed);
    assert_eq!(outcome.doc.text_content(), "The sly fox jumps");
}

#[test]
fn preview_and_decorations_agree_on_a_batch() {
    let steps = vec![redline_engine::Step::replacement(4, 9, "quick", "slow")];
    let base = doc();

    let preview = extract_preview(&base, &steps, &PreviewOptions::default());
    assert_eq!(preview.deleted, "quick");
    assert_eq!(preview.inserted, "slow");

    let set = build_decorations_flat(&base, &steps, ViewMode::Owner, None);
    assert_eq!(set.inlines().count(), 1);
    assert_eq!(set.widgets().count(), 1);
    // the decoration pass left the document alone
    assert_eq!(base.text_content(), "The quick fox jumps");
}

#[test]
fn independent_suggestions_decorate_side_by_side() {
    let first = Batch::with_id(
        uuid::Uuid::new_v4(),
        vec![redline_engine::Step::deletion(4, 9, "quick")],
    );
    let second = Batch::with_id(
        uuid::Uuid::new_v4(),
        vec![redline_engine::Step::replacement(14, 19, "jumps", "rests")],
    );

    let set = build_decorations(&doc(), &[first.clone(), second], ViewMode::Collaborator, None);

    assert_eq!(set.inlines().count(), 2);
    assert_eq!(set.widgets().count(), 1);

    let ids: Vec<_> = set
        .inlines()
        .map(|d| match d {
            Decoration::Inline { data, .. } => data.suggestion_id,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(ids[0], first.id);
    assert!(ids[1].is_some());
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn decoration_set_is_ordered_and_deterministic() {
    let steps = vec![
        redline_engine::Step::replacement(14, 19, "jumps", "rests"),
        redline_engine::Step::deletion(4, 9, "quick"),
    ];

    let set = build_decorations_flat(&doc(), &steps, ViewMode::Owner, None);
    let positions: Vec<usize> = set.iter().map(|d| d.position()).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);

    let again = build_decorations_flat(&doc(), &steps, ViewMode::Owner, None);
    assert_eq!(set, again);
}
