mod common;

use std::time::Duration;

use serde_json::json;

use flame_client::chat::ChatView;
use flame_client::matches::MatchesView;
use flame_client::scope::ViewScope;

use common::{FakeBackend, MATCH_ID, OTHER_ID, TOKEN, wait_for};

#[tokio::test]
async fn matches_keep_server_order() {
    let fake = FakeBackend::start().await;
    let ctx = fake.context(true);
    fake.state.messages.lock().unwrap().push(json!({
        "id": "x1", "content": "hey", "createdAt": "2024-05-01T09:00:00Z", "senderId": OTHER_ID
    }));

    let view = MatchesView::load(&ctx, ViewScope::new()).await.unwrap().unwrap();
    let rows = view.summaries();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].match_id, MATCH_ID);
    assert_eq!(rows[0].name, "bea");
    assert_eq!(rows[0].preview(), "hey");
    assert_eq!(rows[1].match_id, "m2");
    assert_eq!(rows[1].preview(), "Say hi!");
}

#[tokio::test]
async fn chat_joins_room_and_dedupes_echo() {
    let fake = FakeBackend::start().await;
    let ctx = fake.context(true);

    let mut chat = ChatView::open(&ctx, MATCH_ID, ViewScope::new()).await.unwrap().unwrap();
    assert_eq!(chat.title(), "bea");
    assert!(chat.is_live());
    assert!(chat.take_scroll_request());
    assert!(!chat.take_scroll_request());

    assert!(wait_for(|| fake.state.has_frame("room:join")).await);
    assert_eq!(fake.state.ws_auth.lock().unwrap().as_deref(), Some(format!("Bearer {TOKEN}").as_str()));
    let join = fake.state.ws_frames.lock().unwrap()[0].clone();
    assert_eq!(join, json!({ "type": "room:join", "data": MATCH_ID }));

    let mut incoming = chat.take_incoming().unwrap();
    assert!(chat.take_incoming().is_none());

    // blank input is not sent
    assert!(!chat.send(&ctx, "   ").await.unwrap());
    assert!(chat.messages().is_empty());

    assert!(chat.send(&ctx, "  hello there ").await.unwrap());
    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].content, "hello there");
    assert!(chat.is_mine(&chat.messages()[0]));
    assert!(chat.take_scroll_request());

    // the server echoes our own message back over the socket
    let echo = tokio::time::timeout(Duration::from_secs(2), incoming.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(!chat.receive(echo));
    assert_eq!(chat.messages().len(), 1);
    assert!(!chat.take_scroll_request());

    chat.close().await;
    assert!(wait_for(|| fake.state.has_frame("room:leave")).await);
}

#[tokio::test]
async fn pushed_messages_append_and_unknown_frames_are_ignored() {
    let fake = FakeBackend::start().await;
    let ctx = fake.context(true);

    let mut chat = ChatView::open(&ctx, MATCH_ID, ViewScope::new()).await.unwrap().unwrap();
    assert!(wait_for(|| fake.state.has_frame("room:join")).await);
    let mut incoming = chat.take_incoming().unwrap();

    fake.push_frame(json!({ "type": "typing", "data": { "userId": OTHER_ID } }));
    fake.push_frame(json!({
        "type": "message:new",
        "data": { "id": "r1", "content": "you there?", "createdAt": "2024-05-01T10:00:00Z", "senderId": OTHER_ID }
    }));

    let pushed = tokio::time::timeout(Duration::from_secs(2), incoming.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pushed.id, "r1");
    assert!(chat.receive(pushed));
    assert!(!chat.is_mine(&chat.messages()[0]));
    assert_eq!(chat.avatar_for(&chat.messages()[0]).map(|p| p.url.as_str()), Some("/bea.jpg"));
    assert!(chat.show_avatar(0));
    assert!(chat.take_scroll_request());
}

#[tokio::test]
async fn chat_works_without_realtime() {
    let fake = FakeBackend::start().await;
    let mut config = fake.config();
    config.realtime_url = Some("ws://127.0.0.1:1/realtime".into());
    let ctx = flame_client::AppContextInner::with_storage(config, None).unwrap();
    let user = serde_json::from_value(json!({ "id": common::ME_ID, "email": "ada@example.com" })).unwrap();
    ctx.auth.set(TOKEN.to_string(), user).unwrap();

    let mut chat = ChatView::open(&ctx, MATCH_ID, ViewScope::new()).await.unwrap().unwrap();
    assert!(!chat.is_live());
    assert!(chat.take_incoming().is_none());
    assert!(chat.send(&ctx, "still works").await.unwrap());
    assert_eq!(chat.messages().len(), 1);
}
