//! Integration tests for projecting a live markers log into a Chrome trace

use markers::{EventLog, ManualClock, NO_INSTANCE_KEY};
use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use trace::{ChromeTrace, Phase, TimeSpans};

#[test]
fn test_session_log_to_trace() {
    let clock = Arc::new(ManualClock::new(1000));
    let log = EventLog::with_clock(1000, clock.clone());
    log.log_event_at("BEGINNING_OF_TIME", None, 1000).unwrap();
    clock.set(1010);
    log.append("RUN_JS_BUNDLE_START", None, 5, None).unwrap();
    clock.set(1020);
    log.log_start("fetch_config", Some("net")).unwrap();
    clock.set(1070);
    log.log_end("fetch_config", Some("net")).unwrap();
    clock.set(1100);
    log.append("RUN_JS_BUNDLE_END", None, 5, None).unwrap();
    clock.set(1200);
    log.log_event("TTI_COMPLETE", None).unwrap();

    let trace = ChromeTrace::from_payload(&log.to_json(), 0).unwrap();
    let names: Vec<_> = trace.trace_events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["BEGINNING_OF_TIME", "RUN_JS_BUNDLE", "@fetch_config", "TTI_COMPLETE"]);

    let bundle = &trace.trace_events[1];
    assert_eq!(bundle.ph, Phase::Complete);
    assert_eq!(bundle.ts, 10_000);
    assert_eq!(bundle.dur, Some(90_000));
    assert_eq!(bundle.args.instance_key, 5);

    let fetch = &trace.trace_events[2];
    assert_eq!(fetch.dur, Some(50_000));
    assert_eq!(fetch.args.tag.as_deref(), Some("net"));

    assert_eq!(trace.trace_events[3].ph, Phase::Instant);
    assert_eq!(trace.trace_events[3].ts, 200_000);
}

#[test]
fn test_script_spans_share_the_timeline() {
    let log = EventLog::new(5000);
    log.log_event_at("BEGINNING_OF_TIME", None, 5000).unwrap();

    let clock = Arc::new(ManualClock::new(5100));
    let mut spans = TimeSpans::with_clock(clock.clone());
    spans.start("Feed_mount");
    clock.advance(25);
    spans.stop("Feed_mount");
    spans.start("Feed_update");

    let mut trace = ChromeTrace::from_payload(&log.to_json(), 0).unwrap();
    trace.push_spans(&spans);

    assert_eq!(trace.len(), 2);
    let mount = &trace.trace_events[1];
    assert_eq!(mount.name, "Feed_mount");
    assert_eq!(mount.ph, Phase::Complete);
    assert_eq!(mount.ts, 100_000);
    assert_eq!(mount.dur, Some(25_000));
    assert_eq!(mount.args.tag.as_deref(), Some("JS_EVENT"));
}

#[test]
fn test_failed_export_uses_fallback_epoch_for_spans() {
    let clock = Arc::new(ManualClock::new(300));
    let mut spans = TimeSpans::with_clock(clock.clone());
    spans.start("App_mount");
    clock.advance(10);
    spans.stop("App_mount");

    let mut trace = ChromeTrace::from_payload("{}", 250).unwrap();
    trace.push_spans(&spans);

    assert_eq!(trace.len(), 1);
    assert_eq!(trace.trace_events[0].ts, 50_000);

    let value: Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
    assert_eq!(value["traceEvents"].as_array().unwrap().len(), 1);
}

fn marker_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z]{1,6}",
        "[A-Z]{1,6}_START",
        "[A-Z]{1,6}_END",
    ]
}

proptest! {
    #[test]
    fn every_non_end_record_becomes_one_event(
        events in proptest::collection::vec((marker_name(), 0i64..10_000, -1i32..4), 0..48),
    ) {
        let log = EventLog::new(0);
        for (name, time, key) in &events {
            log.append(name.as_str(), None, *key, Some(*time)).unwrap();
        }

        let trace = ChromeTrace::from_payload(&log.to_json(), 0).unwrap();
        let expected = events.iter().filter(|(name, _, _)| !name.ends_with("_END")).count();
        prop_assert_eq!(trace.len(), expected);

        for event in &trace.trace_events {
            prop_assert!(!event.name.ends_with("_START"));
            prop_assert_eq!(event.dur.is_some(), event.ph == Phase::Complete);
        }

        let json: Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
        prop_assert!(json["traceEvents"].is_array());
    }
}

#[test]
fn test_custom_events_use_no_instance_key() {
    let log = EventLog::new(0);
    log.log_start_at("x", None, 1).unwrap();
    log.log_end_at("x", None, 4).unwrap();

    let trace = ChromeTrace::from_payload(&log.to_json(), 0).unwrap();
    assert_eq!(trace.trace_events[0].args.instance_key, NO_INSTANCE_KEY);
    assert_eq!(trace.trace_events[0].dur, Some(3_000));
}
