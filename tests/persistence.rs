// Copyright (c) 2024 Mike Tsao

//! Exercises the persistence schema: kebab-case records, polymorphic module
//! records, round-trip identity, and records saved by older versions.

use serde_json::json;
use tribus::prelude::*;

#[test]
fn records_use_kebab_case_keys() {
    let mut master = MasterCoreBuilder::default().build().unwrap();
    master.before_ser();
    let value = serde_json::to_value(&master).unwrap();
    let map = value.as_object().unwrap();
    for key in [
        "input-on",
        "level-cv-smoothing",
        "fade-cv-mode",
        "color-theme",
    ] {
        assert!(map.contains_key(key), "missing {key}");
    }
}

#[test]
fn modules_round_trip_through_a_polymorphic_record() {
    let mut module: Box<dyn BusModule> = Box::new(
        MiniStripCoreBuilder::default()
            .input_on(false)
            .build()
            .unwrap(),
    );
    module.before_ser();
    let json = serde_json::to_string(&module).unwrap();
    assert!(json.contains(r#""type":"MiniStripCore""#));

    let mut restored: Box<dyn BusModule> = serde_json::from_str(&json).unwrap();
    restored.after_deser();
    restored.update_sample_rate(SampleRate::new(1000));
    restored.process();
}

#[test]
fn master_record_round_trips_identically() {
    let mut master = MasterCoreBuilder::default()
        .input_on(false)
        .level_cv_smoothing(false)
        .fade_cv_mode(FadeCvMode::FadeOutOnly)
        .color_theme(ColorTheme::Night)
        .build()
        .unwrap();
    master.before_ser();
    let json = serde_json::to_string(&master).unwrap();

    let mut restored: MasterCore = serde_json::from_str(&json).unwrap();
    restored.after_deser();
    assert!(!restored.is_on());
    assert!(!restored.level_cv_smoothing());
    assert_eq!(restored.fade_cv_mode(), FadeCvMode::FadeOutOnly);
    assert_eq!(restored.color_theme(), ColorTheme::Night);

    restored.before_ser();
    assert_eq!(json, serde_json::to_string(&restored).unwrap());
}

#[test]
fn legacy_master_record_resolves_missing_options() {
    // records from before the smoothing and fade-mode options existed carry
    // only the on/off flag
    let record = json!({ "input-on": true });
    let mut master: MasterCore = serde_json::from_value(record).unwrap();
    // the host restores knobs before calling after_deser
    master.params.fade_out_ms = 4000.0;
    master.after_deser();

    assert!(
        !master.level_cv_smoothing(),
        "old records always ran unsmoothed"
    );
    assert_eq!(master.fade_cv_mode(), FadeCvMode::Both);
    assert_eq!(
        master.params.fade_in_ms, 4000.0,
        "the single legacy knob becomes both fade durations"
    );
    assert_eq!(master.color_theme(), ColorTheme::Cream);
}

#[test]
fn current_master_record_keeps_its_fade_knobs() {
    let record = json!({
        "input-on": true,
        "level-cv-smoothing": true,
        "fade-cv-mode": 2,
        "color-theme": 1,
    });
    let mut master: MasterCore = serde_json::from_value(record).unwrap();
    master.params.fade_in_ms = 100.0;
    master.params.fade_out_ms = 4000.0;
    master.after_deser();

    assert_eq!(master.params.fade_in_ms, 100.0);
    assert!(master.level_cv_smoothing());
    assert_eq!(master.fade_cv_mode(), FadeCvMode::FadeOutOnly);
    assert_eq!(master.color_theme(), ColorTheme::Night);
}

#[test]
fn legacy_strip_record_defaults_newer_fields() {
    let record = json!({ "input-on": false });
    let mut strip: StereoStripCore = serde_json::from_value(record).unwrap();
    strip.after_deser();
    assert!(!strip.is_on());
    assert_eq!(strip.gain(), 1.0);
    assert!(!strip.is_post_fade(0));
    assert!(!strip.is_post_fade(1));
}

#[test]
fn compact_strip_record_round_trips() {
    let mut strip = CompactStripCoreBuilder::default()
        .input_on(false)
        .build()
        .unwrap();
    strip.before_ser();
    let json = serde_json::to_string(&strip).unwrap();
    assert!(json.contains(r#""input-on":false"#));

    let mut restored: CompactStripCore = serde_json::from_str(&json).unwrap();
    restored.after_deser();
    assert!(!restored.is_on());
}

#[test]
fn records_missing_the_on_key_load_audible() {
    // the earliest records predate even the on/off key
    let mini: MiniStripCore = serde_json::from_value(json!({})).unwrap();
    assert!(mini.is_on());
    let compact: CompactStripCore = serde_json::from_value(json!({})).unwrap();
    assert!(compact.is_on());
    let mut strip: StereoStripCore = serde_json::from_value(json!({})).unwrap();
    strip.after_deser();
    assert!(strip.is_on());
    let mut master: MasterCore = serde_json::from_value(json!({})).unwrap();
    master.after_deser();
    assert!(master.is_on());
}

#[test]
fn unknown_discriminants_degrade_instead_of_failing_the_load() {
    // a record written by a newer version with themes or fade modes this
    // version doesn't know still loads, falling back to the defaults
    let record = json!({ "input-on": true, "color-theme": 9, "fade-cv-mode": 9 });
    let master: MasterCore = serde_json::from_value(record).unwrap();
    assert_eq!(master.color_theme(), ColorTheme::Cream);
    assert_eq!(master.fade_cv_mode(), FadeCvMode::Both);
}
