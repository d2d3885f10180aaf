use std::collections::HashMap;

use prometheus_parse::Scrape;
use prometheus_parse::Value;

use super::*;

fn scrape(stats: &Stats) -> HashMap<String, f64> {
    let text = stats.render();
    let lines = text.lines().map(|line| Ok(line.to_string()));
    let scrape = Scrape::parse(lines).unwrap();
    scrape
        .samples
        .into_iter()
        .map(|sample| match sample.value {
            Value::Counter(value) => (sample.metric, value),
            other => panic!("{} is not a counter: {other:?}", sample.metric),
        })
        .collect()
}

#[test]
fn starts_at_zero() {
    let samples = scrape(&Stats::default());
    assert_eq!(samples.len(), 4);
    assert!(samples.values().all(|value| *value == 0.0));
}

#[test]
fn renders_recorded_counts() {
    let stats = Stats::default();
    for _ in 0..3 {
        stats.record_event();
    }
    stats.record_skipped();
    stats.record_unchanged();
    stats.record_updated();

    let samples = scrape(&stats);
    assert_eq!(samples[EVENTS_TOTAL], 3.0);
    assert_eq!(samples[SKIPPED_TOTAL], 1.0);
    assert_eq!(samples[UNCHANGED_TOTAL], 1.0);
    assert_eq!(samples[UPDATED_TOTAL], 1.0);
}

#[test]
fn documents_every_counter() {
    let text = Stats::default().render();
    let lines = text.lines().map(|line| Ok(line.to_string()));
    let scrape = Scrape::parse(lines).unwrap();
    for name in [EVENTS_TOTAL, SKIPPED_TOTAL, UNCHANGED_TOTAL, UPDATED_TOTAL] {
        assert!(scrape.docs.contains_key(name), "missing HELP for {name}");
    }
}
