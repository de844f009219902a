use std::sync::Arc;

use super::common::*;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::decision::{
    Condition, DecisionEngine, DecisionError, DecisionSession, OsFilter, Preset, ScreenFilter, SubFactor,
    TraitKey,
};

fn session() -> DecisionSession {
    DecisionSession::with_snapshot(three_phone_catalog(), engine(), camera_snapshot())
}

#[test]
fn session_starts_with_computed_results() {
    let session = session();
    assert_eq!(ids(&session.results()), vec!["a", "c"]);
}

#[test]
fn each_edit_recomputes_from_scratch() {
    let mut session = session();

    let results = session.set_os(OsFilter::All);
    assert_eq!(results.total_matches, 3);

    let results = session.set_condition(Condition::New);
    assert_eq!(ids(&results), vec!["a", "b"]);

    let results = session.exclude_brand("APPLE");
    assert_eq!(ids(&results), vec!["b"]);

    let results = session.include_brand("apple");
    assert_eq!(results.total_matches, 2);

    let results = session.set_screen(ScreenFilter::Large);
    assert!(results.is_empty());
}

#[test]
fn budget_edits_are_sanitised() {
    let mut session = session();

    session.set_budget_max("$450");
    assert_eq!(session.snapshot().constraints.budget_max, 450);
    assert_eq!(ids(&session.results()), vec!["c"]);

    session.set_budget_min("9,999");
    assert_eq!(session.snapshot().constraints.budget_min, 450);
    assert!(session.results().is_empty());

    session.set_budget_max("99999");
    assert_eq!(session.snapshot().constraints.budget_max, 5000);
}

#[test]
fn presets_replace_weights_but_keep_sub_factors() {
    let mut session = session();
    session
        .set_sub_weight(TraitKey::Camera, SubFactor::Video, 5)
        .expect("video is a camera factor");

    let results = session.apply_preset(Preset::Photography);
    assert_eq!(session.snapshot().weights, Preset::Photography.weights());
    assert!(session.snapshot().sub_weights.is_expanded(TraitKey::Camera));
    assert_eq!(results.effective_weights.get(TraitKey::Camera), 5);

    let results = session.collapse_trait(TraitKey::Camera);
    assert_eq!(results.effective_weights.get(TraitKey::Camera), 10);
}

#[test]
fn invalid_sub_factor_leaves_state_untouched() {
    let mut session = session();
    let before = session.snapshot().clone();

    let err = session
        .set_sub_weight(TraitKey::Battery, SubFactor::Zoom, 3)
        .expect_err("zoom is not a battery factor");

    assert!(matches!(err, DecisionError::MisplacedSubFactor { .. }));
    assert_eq!(session.snapshot(), &before);
}

#[test]
fn unchanged_edit_keeps_the_same_results() {
    let mut session = session();
    let before = session.results();
    let after = session.set_os(OsFilter::Ios);
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn weight_edits_reorder_dials() {
    let mut session = DecisionSession::new(Catalog::default(), engine());
    session.set_weight(TraitKey::Design, 10);
    let dials = session.dial_order();
    assert_eq!(dials[0].key, TraitKey::Design);
    assert!(dials[0].priority);

    session.reset();
    assert_eq!(session.dial_order()[0].key, TraitKey::Reliability);
}

#[test]
fn reset_respects_a_lowered_budget_ceiling() {
    let engine = DecisionEngine::new(EngineConfig {
        budget_ceiling: 500,
        ..EngineConfig::default()
    });
    let mut session = DecisionSession::new(three_phone_catalog(), engine);
    assert_eq!(session.snapshot().constraints.budget_max, 500);

    session.set_weight(TraitKey::Camera, 10);
    session.reset();
    let constraints = &session.snapshot().constraints;
    assert_eq!(constraints.budget_max, 500);
    assert!(constraints.budget_min <= constraints.budget_max);

    session.set_budget_max("900");
    assert_eq!(session.snapshot().constraints.budget_max, 500);
}
