//! Handler-registry helpers: upsert, removal, reserved-slot protection, and
//! visibility of mutations to running chains.

use serde_json::json;
use troupe_loop::{Actor, Handlers};
use troupe_types::test_utils::LocalProcess;
use troupe_types::{exit, next, ActorError, HandlerReply, Message};

#[tokio::test]
async fn added_handler_is_visible_to_the_live_chain() {
    let handlers = Handlers::<()>::new().on("start", |ctx, _payload, _topic, _from| {
        ctx.add_handler("dynamic", |_ctx, _payload, topic, _from| {
            Ok(exit(json!({"reached": topic})))
        })?;
        Ok(next("dynamic"))
    });
    let actor = Actor::new((), handlers);
    let (process, handle) = LocalProcess::new("live-add-actor");
    handle
        .inbox
        .send(Message::new("x", "start", json!({})))
        .await
        .expect("inbox open");

    let result = actor.run(process).await.expect("actor run");
    assert_eq!(result, json!({"reached": "dynamic"}));
}

#[tokio::test]
async fn added_handler_serves_later_messages() {
    let handlers = Handlers::<()>::new().on("setup", |ctx, _payload, _topic, _from| {
        ctx.add_handler("added", |_ctx, payload, _topic, _from| {
            Ok(exit(json!({"echo": payload})))
        })?;
        Ok(HandlerReply::Continue)
    });
    let actor = Actor::new((), handlers);
    let (process, handle) = LocalProcess::new("late-add-actor");
    handle
        .inbox
        .send(Message::new("x", "setup", json!({})))
        .await
        .expect("inbox open");
    handle
        .inbox
        .send(Message::new("x", "added", json!({"n": 5})))
        .await
        .expect("inbox open");

    let result = actor.run(process).await.expect("actor run");
    assert_eq!(result, json!({"echo": {"n": 5}}));
}

#[tokio::test]
async fn removed_handler_falls_back_to_default() {
    let handlers = Handlers::<()>::new()
        .on("target", |_ctx, _payload, _topic, _from| {
            Ok(exit(json!("target must be unreachable after removal")))
        })
        .on("teardown", |ctx, _payload, _topic, _from| {
            assert!(ctx.remove_handler("target"));
            Ok(HandlerReply::Continue)
        })
        .on_default(|_ctx, _payload, topic, _from| Ok(exit(json!({"t": topic}))));
    let actor = Actor::new((), handlers);
    let (process, handle) = LocalProcess::new("remove-actor");
    handle
        .inbox
        .send(Message::new("x", "teardown", json!({})))
        .await
        .expect("inbox open");
    handle
        .inbox
        .send(Message::new("x", "target", json!({})))
        .await
        .expect("inbox open");

    let result = actor.run(process).await.expect("actor run");
    assert_eq!(result, json!({"t": "target"}));
}

#[tokio::test]
async fn add_remove_roundtrip_restores_routing() {
    let handlers = Handlers::<Vec<String>>::new()
        .on("add", |ctx, _payload, _topic, _from| {
            ctx.add_handler("t", |ctx, _payload, _topic, _from| {
                ctx.state.push("handled:t".to_string());
                Ok(HandlerReply::Continue)
            })?;
            Ok(HandlerReply::Continue)
        })
        .on("rm", |ctx, _payload, _topic, _from| {
            assert!(ctx.remove_handler("t"));
            Ok(HandlerReply::Continue)
        })
        .on("finish", |ctx, _payload, _topic, _from| {
            Ok(exit(json!({"log": ctx.state.clone()})))
        })
        .on_default(|ctx, _payload, topic, _from| {
            ctx.state.push(format!("default:{topic}"));
            Ok(HandlerReply::Continue)
        });
    let actor = Actor::new(Vec::new(), handlers);
    let (process, handle) = LocalProcess::new("roundtrip-actor");
    for topic in ["t", "add", "t", "rm", "t", "finish"] {
        handle
            .inbox
            .send(Message::new("x", topic, json!({})))
            .await
            .expect("inbox open");
    }

    let result = actor.run(process).await.expect("actor run");
    assert_eq!(
        result,
        json!({"log": ["default:t", "handled:t", "default:t"]})
    );
}

#[tokio::test]
async fn invalid_topics_are_rejected_and_reserved_slots_survive() {
    let handlers = Handlers::<()>::new()
        .on_init(|ctx| {
            let empty = ctx.add_handler("", |_ctx, _payload, _topic, _from| {
                Ok(HandlerReply::Continue)
            });
            assert!(matches!(empty, Err(ActorError::InvalidHandler(_))));

            let reserved = ctx.add_handler("__shadow", |_ctx, _payload, _topic, _from| {
                Ok(HandlerReply::Continue)
            });
            assert!(matches!(reserved, Err(ActorError::InvalidHandler(_))));

            ctx.add_handler("tmp", |_ctx, _payload, _topic, _from| {
                Ok(HandlerReply::Continue)
            })?;
            assert!(ctx.remove_handler("tmp"));
            assert!(!ctx.remove_handler("tmp"));
            // The fallback slot lives outside the topic map.
            assert!(!ctx.remove_handler("__default"));
            Ok(HandlerReply::Continue)
        })
        .on_default(|_ctx, _payload, _topic, _from| Ok(exit(json!("fallback intact"))));
    let actor = Actor::new((), handlers);
    let (process, handle) = LocalProcess::new("guard-actor");
    handle
        .inbox
        .send(Message::new("x", "anything", json!({})))
        .await
        .expect("inbox open");

    let result = actor.run(process).await.expect("actor run");
    assert_eq!(result, json!("fallback intact"));
}

#[tokio::test]
async fn reserved_names_in_the_builder_are_held_aside() {
    let handlers = Handlers::<()>::new()
        .on("__secret", |_ctx, _payload, _topic, _from| {
            Ok(exit(json!("reserved names are never dispatched")))
        })
        .on_default(|_ctx, _payload, topic, _from| Ok(exit(json!({"t": topic}))));
    let actor = Actor::new((), handlers);
    let (process, handle) = LocalProcess::new("reserved-actor");
    handle
        .inbox
        .send(Message::new("x", "__secret", json!({})))
        .await
        .expect("inbox open");

    let result = actor.run(process).await.expect("actor run");
    assert_eq!(result, json!({"t": "__secret"}));
}
