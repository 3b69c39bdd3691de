//! Event-to-log dispatch through the bus and the direct facade.

use std::sync::Arc;
use std::thread;

use serde_json::json;

use event_logger::config::{ChannelLevels, LoggerConfig};
use event_logger::dispatch::{Dispatcher, Locator, EVENTS, LOGGER};
use event_logger::events::{
    BindingTable, Clock, CollectionDescriptor, EventBus, InMemoryEventBus, RequestInfo,
    ResponseServer,
};
use event_logger::logging::{ChannelName, LogRecord, MemorySink, Severity};
use event_logger::LoggerError;

mod common;

use common::{FailingSink, Harness, PanickingSink};

#[test]
fn test_incoming_message_logs_request_line() {
    let h = Harness::verbose();

    h.bus.publish(
        "incomingMessage",
        json!({"requestId": "abc", "method": "GET", "url": "/x"}),
    );

    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].channel, ChannelName::Request);
    assert_eq!(records[0].severity, Severity::Info);
    assert_eq!(records[0].message, "[abc] GET /x");
}

#[test]
fn test_response_server_reports_elapsed_time() {
    let h = Harness::verbose();
    let request = RequestInfo::new("req-1", "GET", "/x")
        .with_remote_addr("1.2.3.4")
        .started_at(h.clock.now_millis());

    h.clock.advance(150);
    h.bus.publish("responseServer", ResponseServer::new("200", request));

    assert_eq!(
        h.sink.messages_for(ChannelName::Response),
        vec!["[req-1] 1.2.3.4 - - (150ms) GET /x 200".to_string()]
    );
    assert_eq!(h.sink.records()[0].severity, Severity::Info);
}

#[test]
fn test_lifecycle_events_go_to_system_channel() {
    let h = Harness::verbose();

    h.bus.publish("collectionFound", CollectionDescriptor::new("users"));
    h.bus.publish("collectionLoaded", CollectionDescriptor::new("users"));
    h.bus.publish("allCollectionsLoaded", json!({"ignored": true}));
    h.bus.publish("forwarding", "forwarded to /v2/users");

    assert_eq!(
        h.sink.messages_for(ChannelName::System),
        vec![
            "Collection users found".to_string(),
            "Collection users loaded".to_string(),
            "All collections loaded".to_string(),
            "forwarded to /v2/users".to_string(),
        ]
    );
}

#[test]
fn test_level_events_keep_their_severity() {
    let h = Harness::verbose();

    for severity in Severity::ALL {
        h.bus.publish(severity.as_str(), format!("{severity} message"));
    }

    let records = h.sink.records_for(ChannelName::System);
    assert_eq!(records.len(), Severity::ALL.len());
    for (record, severity) in records.iter().zip(Severity::ALL) {
        assert_eq!(record.severity, severity);
        assert_eq!(record.message, format!("{severity} message"));
    }
}

#[test]
fn test_unknown_event_is_ignored() {
    let h = Harness::verbose();

    assert_eq!(h.bus.publish("userSignedUp", json!({"id": 1})), 0);
    h.dispatcher.dispatch("userSignedUp", &json!({"id": 1}));

    assert!(h.sink.is_empty());
}

#[test]
fn test_malformed_payload_degrades_to_one_warning() {
    let h = Harness::verbose();

    h.bus.publish("incomingMessage", json!({"url": "/x"}));

    assert!(h.sink.records_for(ChannelName::Request).is_empty());
    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].channel, ChannelName::System);
    assert_eq!(records[0].severity, Severity::Warn);
    assert_eq!(
        records[0].message,
        "Unable to log event incomingMessage: missing field `requestId`"
    );
}

#[test]
fn test_panicking_extractor_degrades_to_warning() {
    let mut bindings = BindingTable::predefined();
    bindings.register_fn("audit", |_ctx| panic!("bad audit payload"));
    let h = Harness::with_bindings(ChannelLevels::uniform(Severity::Trace), bindings);

    h.bus.publish("audit", json!({}));
    h.bus.publish("info", "still alive");

    assert_eq!(
        h.sink.messages_for(ChannelName::System),
        vec![
            "Unable to log event audit: extractor panicked: bad audit payload".to_string(),
            "still alive".to_string(),
        ]
    );
}

#[test]
fn test_channel_level_suppresses_lower_records() {
    let h = Harness::new(ChannelLevels {
        request: Severity::Warn,
        response: Severity::Info,
        system: Severity::Error,
    });

    h.bus.publish(
        "incomingMessage",
        json!({"requestId": "a", "method": "GET", "url": "/"}),
    );
    h.dispatcher.warn("below error");
    h.dispatcher.error("at error");
    h.dispatcher.fatal("above error");

    assert!(h.sink.records_for(ChannelName::Request).is_empty());
    assert_eq!(
        h.sink.messages_for(ChannelName::System),
        vec!["at error".to_string(), "above error".to_string()]
    );
}

#[test]
fn test_suppression_boundary_for_every_pair() {
    for configured in Severity::ALL {
        let h = Harness::new(ChannelLevels::uniform(configured));
        for severity in Severity::ALL {
            h.dispatcher.log(severity, severity);
        }

        let emitted: Vec<Severity> = h.sink.records().iter().map(|r| r.severity).collect();
        let expected: Vec<Severity> = Severity::ALL
            .into_iter()
            .filter(|s| *s >= configured)
            .collect();
        assert_eq!(emitted, expected, "configured level {configured}");
    }
}

#[test]
fn test_facade_emits_one_system_record_per_call() {
    let h = Harness::verbose();
    let d = &h.dispatcher;

    d.trace("t");
    d.debug("d");
    d.info("i");
    d.warn("w");
    d.error("e");
    d.fatal("f");

    let records = h.sink.records();
    assert_eq!(records.len(), 6);
    for (record, severity) in records.iter().zip(Severity::ALL) {
        assert_eq!(record.channel, ChannelName::System);
        assert_eq!(record.severity, severity);
    }
}

#[test]
fn test_facade_by_name() {
    let h = Harness::verbose();

    h.dispatcher.log_named("WARN", "by name").unwrap();
    let err = h.dispatcher.log_named("verbose", "nope").unwrap_err();

    assert!(matches!(err, LoggerError::InvalidSeverity(ref name) if name == "verbose"));
    assert_eq!(h.sink.len(), 1);
    assert_eq!(h.sink.records()[0].severity, Severity::Warn);
}

#[test]
fn test_facade_joins_arguments() {
    let h = Harness::verbose();

    h.dispatcher
        .log_args(Severity::Info, &[&"loaded", &3, &"collections"]);

    assert_eq!(
        h.sink.messages_for(ChannelName::System),
        vec!["loaded 3 collections".to_string()]
    );
}

#[test]
fn test_facade_by_name_joins_arguments() {
    let h = Harness::verbose();

    h.dispatcher
        .log_named_args("error", &[&"collection", &"users", &"failed after", &2, &"retries"])
        .unwrap();
    let err = h
        .dispatcher
        .log_named_args("loudest", &[&"dropped"])
        .unwrap_err();

    assert!(matches!(err, LoggerError::InvalidSeverity(ref name) if name == "loudest"));
    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].severity, Severity::Error);
    assert_eq!(records[0].message, "collection users failed after 2 retries");
}

#[test]
fn test_last_registration_wins() {
    let mut bindings = BindingTable::predefined();
    bindings.register_fn("forwarding", |ctx| {
        Ok(LogRecord::system(Severity::Debug, format!("first {}", ctx.text("to")?)))
    });
    bindings.register_fn("forwarding", |ctx| {
        Ok(LogRecord::system(Severity::Info, format!("second {}", ctx.text("to")?)))
    });
    let h = Harness::with_bindings(ChannelLevels::uniform(Severity::Trace), bindings);

    h.bus.publish("forwarding", json!({"to": "/v2"}));

    assert_eq!(
        h.sink.messages_for(ChannelName::System),
        vec!["second /v2".to_string()]
    );
}

#[test]
fn test_initialize_twice_subscribes_twice() {
    let h = Harness::verbose();
    h.dispatcher.initialize(h.bus());

    h.bus.publish("info", "hello");

    assert_eq!(h.sink.len(), 2);
    assert_eq!(h.bus.handler_count("info"), 2);
}

#[test]
fn test_formatting_is_repeatable() {
    let h = Harness::verbose();
    let payload = json!({"requestId": "abc", "method": "GET", "url": "/x"});

    h.bus.emit("incomingMessage", &payload);
    h.bus.emit("incomingMessage", &payload);

    let messages = h.sink.messages_for(ChannelName::Request);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].as_bytes(), messages[1].as_bytes());
}

#[test]
fn test_sink_failures_do_not_escape() {
    let failing = common::dispatcher_with_sink(Arc::new(FailingSink), ChannelLevels::default());
    let panicking = common::dispatcher_with_sink(Arc::new(PanickingSink), ChannelLevels::default());

    for dispatcher in [failing, panicking] {
        let bus = InMemoryEventBus::new();
        dispatcher.initialize(&bus);

        bus.publish("info", "dropped");
        bus.publish("incomingMessage", json!({"requestId": "a", "method": "GET", "url": "/"}));
        dispatcher.error("also dropped");
    }
}

#[test]
fn test_register_through_locator() {
    let bus: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let locator = Locator::new();
    locator.register_instance(EVENTS, Arc::clone(&bus));
    let sink = Arc::new(MemorySink::new());

    let logger = Dispatcher::register(&locator, &LoggerConfig::with_level("debug"), sink.clone())
        .unwrap();
    let resolved: Arc<Dispatcher> = locator.resolve(LOGGER).unwrap();
    assert!(Arc::ptr_eq(&logger, &resolved));
    assert_eq!(logger.registry().levels(), ChannelLevels::uniform(Severity::Debug));

    bus.publish("collectionFound", CollectionDescriptor::new("orders"));
    bus.publish("trace", "filtered out");

    assert_eq!(
        sink.messages_for(ChannelName::System),
        vec!["Collection orders found".to_string()]
    );
}

#[test]
fn test_register_without_bus_fails() {
    let locator = Locator::new();
    let err = Dispatcher::register(&locator, &LoggerConfig::default(), Arc::new(MemorySink::new()))
        .unwrap_err();
    assert!(matches!(err, LoggerError::Locator(_)));
    assert!(!locator.contains(LOGGER));
}

#[test]
fn test_register_with_bad_level_fails_fast() {
    let bus: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let locator = Locator::new();
    locator.register_instance(EVENTS, Arc::clone(&bus));

    let err = Dispatcher::register(&locator, &LoggerConfig::with_level("loud"), Arc::new(MemorySink::new()))
        .unwrap_err();

    assert!(matches!(err, LoggerError::Configuration(_)));
    assert_eq!(bus.handler_count("incomingMessage"), 0);
}

#[test]
fn test_concurrent_publishers_do_not_interleave() {
    let h = Harness::verbose();
    let threads: Vec<_> = (0..8)
        .map(|t| {
            let bus = Arc::clone(&h.bus);
            thread::spawn(move || {
                for i in 0..100 {
                    bus.publish(
                        "incomingMessage",
                        json!({"requestId": format!("{t}-{i}"), "method": "GET", "url": "/load"}),
                    );
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    let messages = h.sink.messages_for(ChannelName::Request);
    assert_eq!(messages.len(), 800);
    assert!(messages
        .iter()
        .all(|m| m.starts_with('[') && m.ends_with("] GET /load")));
}
