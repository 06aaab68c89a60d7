//! Configuration defaults and serde behavior.

use tomopaint_core::config::TomopaintConfig;

#[test]
fn defaults_match_documented_values() {
    let config = TomopaintConfig::default();
    assert_eq!(config.learn.forest.n_estimators, 50);
    assert_eq!(config.learn.forest.max_depth, 10);
    assert!((config.learn.forest.max_samples - 0.05).abs() < 1e-12);
    assert_eq!(config.learn.boost.n_estimators, 100);
    assert_eq!(config.engine.debounce_ms, 1000);
    assert!((config.engine.background_percentile - 1.0).abs() < 1e-12);
    assert_eq!(config.store.painting_key, "painting");
    assert_eq!(config.store.prediction_key, "prediction");
}

#[test]
fn round_trips_through_json() {
    let mut config = TomopaintConfig::default();
    config.learn.forest.seed = Some(7);
    config.engine.debounce_ms = 250;
    let text = serde_json::to_string(&config).unwrap();
    let back: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back["engine"]["debounce_ms"], 250);
    let parsed: TomopaintConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.learn.forest.seed, Some(7));
    assert_eq!(parsed.engine.debounce_ms, 250);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let parsed: TomopaintConfig =
        serde_json::from_str(r#"{"engine": {"debounce_ms": 50}}"#).unwrap();
    assert_eq!(parsed.engine.debounce_ms, 50);
    // Everything left unspecified keeps its default.
    assert!((parsed.engine.background_percentile - 1.0).abs() < 1e-12);
    assert_eq!(parsed.learn.forest.n_estimators, 50);
    assert_eq!(parsed.store.image_key, "crop/original_data");
}
