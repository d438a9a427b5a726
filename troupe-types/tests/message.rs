//! Message, event, and internal-message construction and passthrough.

use serde_json::json;
use troupe_types::{event_kind, Event, InternalMessage, Message};

#[test]
fn message_fields_are_positional_inputs_for_dispatch() {
    let msg = Message::new("sender", "status", json!({"command": "get_status"}));
    assert_eq!(msg.from, "sender");
    assert_eq!(msg.topic, "status");
    assert_eq!(msg.payload, json!({"command": "get_status"}));
}

#[test]
fn cancel_event_uses_the_cancel_kind() {
    let event = Event::cancel("parent");
    assert_eq!(event.kind, event_kind::CANCEL);
    assert_eq!(event.kind, "pid.cancel");
    assert_eq!(event.from, "parent");
    assert!(event.extra.is_empty());
}

#[test]
fn extra_event_fields_pass_through_untouched() {
    let event: Event = serde_json::from_value(json!({
        "kind": "pid.cancel",
        "from": "parent",
        "deadline": 1500,
        "result": {"partial": true},
    }))
    .expect("event deserializes");
    assert_eq!(event.kind, event_kind::CANCEL);
    assert_eq!(event.extra["deadline"], json!(1500));
    assert_eq!(event.extra["result"], json!({"partial": true}));
}

#[test]
fn next_message_with_empty_topic_has_no_topic() {
    let msg = InternalMessage::next("", Some(json!(1)), "x");
    assert_eq!(msg.kind, InternalMessage::NEXT);
    assert!(msg.topic.is_none());

    let msg = InternalMessage::next("resume", None, "async");
    assert_eq!(msg.topic.as_deref(), Some("resume"));
    assert!(msg.payload.is_none());
    assert_eq!(msg.from, "async");
}

#[test]
fn custom_internal_kinds_carry_no_topic() {
    let msg = InternalMessage::new("tick", Some(json!(5)), "timer");
    assert_eq!(msg.kind, "tick");
    assert!(msg.topic.is_none());
    assert_eq!(msg.payload, Some(json!(5)));
}
