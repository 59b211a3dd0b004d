//! Gateway Integration Tests
//!
//! Each test spawns its own gateway on an ephemeral port and drives it over real
//! WebSocket connections.
//!
//! Run with: cargo test -p messenger-integration-tests --test gateway_tests

use messenger_core::{ChannelSummary, ConnectionId, Message, MessageKind};
use messenger_gateway::events::{GatewayEventType, UserList};
use messenger_gateway::protocol::{
    CallTargetPayload, CallUserPayload, ClientEvent, OpCode, SendMessagePayload,
};
use messenger_integration_tests::{
    channel_message, create_channel, join_channel, private_message, test_config, unique_name,
    GatewayClient, TestServer,
};
use reqwest::StatusCode;

async fn wait_for_channel_count(client: &mut GatewayClient, name: &str, members: usize) {
    loop {
        let data = client.wait_for(GatewayEventType::ChannelList).await.unwrap();
        let channels: Vec<ChannelSummary> = serde_json::from_value(data).unwrap();
        if channels
            .iter()
            .any(|c| c.name == name && c.members == members)
        {
            return;
        }
    }
}

async fn wait_for_user_count(client: &mut GatewayClient, count: usize) -> UserList {
    loop {
        let data = client.wait_for(GatewayEventType::UpdateUserList).await.unwrap();
        let users: UserList = serde_json::from_value(data).unwrap();
        if users.len() == count {
            return users;
        }
    }
}

// ============================================================================
// Transport Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_hello_announces_connection() {
    let server = TestServer::start().await.unwrap();

    let a = GatewayClient::connect(&server).await.unwrap();
    let b = GatewayClient::connect(&server).await.unwrap();

    assert_eq!(a.heartbeat_interval, 25_000);
    assert!(!a.connection_id.is_empty());
    assert_ne!(a.connection_id, b.connection_id);
}

#[tokio::test]
async fn test_heartbeat_ack() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server).await.unwrap();

    client.heartbeat(None).await.unwrap();

    let frame = client.next_frame().await.unwrap();
    assert_eq!(frame.op, OpCode::HeartbeatAck);
}

#[tokio::test]
async fn test_malformed_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server).await.unwrap();

    client.send_raw("this is not json").await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_server_op_closes_with_unknown_opcode() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server).await.unwrap();

    client.send_raw(r#"{"op":11}"#).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4001);
}

#[tokio::test]
async fn test_silent_connection_times_out() {
    let mut config = test_config();
    config.heartbeat.interval_ms = 100;
    config.heartbeat.timeout_ms = 300;
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut client = GatewayClient::connect(&server).await.unwrap();
    assert_eq!(client.heartbeat_interval, 100);

    assert_eq!(client.expect_close().await.unwrap(), 4009);
}

#[tokio::test]
async fn test_rejected_payload_keeps_connection_open() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();

    alice
        .send(&ClientEvent::SendMessage(SendMessagePayload {
            room: "General".to_string(),
            is_private: false,
            kind: MessageKind::System,
            content: "spoofed".to_string(),
        }))
        .await
        .unwrap();
    alice.send(&channel_message("General", "genuine")).await.unwrap();

    let message = alice
        .wait_for_message(|m| !m.content.contains("joined"))
        .await
        .unwrap();
    assert_eq!(message.content, "genuine");
    assert_eq!(message.kind, MessageKind::Text);
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_join_announces_to_general() {
    let server = TestServer::start().await.unwrap();
    let alice_name = unique_name("alice");
    let bob_name = unique_name("bob");
    let mut alice = GatewayClient::join(&server, &alice_name).await.unwrap();
    let bob = GatewayClient::join(&server, &bob_name).await.unwrap();

    let users = wait_for_user_count(&mut alice, 2).await;
    let bob_id = ConnectionId::new(bob.connection_id.as_str());
    assert_eq!(users[&bob_id].username, bob_name);

    let notice = alice
        .wait_for_message(|m| m.content == format!("{bob_name} joined General"))
        .await
        .unwrap();
    assert!(notice.is_system());
    assert_eq!(notice.room, "General");
}

#[tokio::test]
async fn test_duplicate_username_is_refused() {
    let server = TestServer::start().await.unwrap();
    let _alice = GatewayClient::join(&server, "alice").await.unwrap();
    let mut impostor = GatewayClient::connect(&server).await.unwrap();

    impostor
        .send(&ClientEvent::Join("alice".to_string()))
        .await
        .unwrap();

    let reason = impostor.wait_for(GatewayEventType::JoinFail).await.unwrap();
    assert_eq!(reason, "Username 'alice' is already taken.");
}

#[tokio::test]
async fn test_disconnect_updates_everyone() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();
    let bob = GatewayClient::join(&server, "bob").await.unwrap();
    wait_for_channel_count(&mut alice, "General", 2).await;

    bob.close().await.unwrap();

    let notice = alice
        .wait_for_message(|m| m.content == "bob left")
        .await
        .unwrap();
    assert!(notice.is_system());
    let users = wait_for_user_count(&mut alice, 1).await;
    assert!(users.values().all(|u| u.username == "alice"));
    wait_for_channel_count(&mut alice, "General", 1).await;
}

// ============================================================================
// Routing Tests
// ============================================================================

#[tokio::test]
async fn test_private_exchange_shows_other_party() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();
    let mut bob = GatewayClient::join(&server, "bob").await.unwrap();

    alice.send(&private_message("bob", "hi bob")).await.unwrap();

    let seen_by_alice = alice
        .wait_for_message(|m| m.content == "hi bob")
        .await
        .unwrap();
    let seen_by_bob = bob.wait_for_message(|m| m.content == "hi bob").await.unwrap();
    assert_eq!(seen_by_alice.room, "bob");
    assert_eq!(seen_by_bob.room, "alice");
    assert!(seen_by_bob.is_private);
    assert_eq!(seen_by_bob.sender_name(), Some("alice"));

    bob.send(&private_message("alice", "hi alice")).await.unwrap();

    let reply = alice
        .wait_for_message(|m| m.content == "hi alice")
        .await
        .unwrap();
    assert_eq!(reply.room, "bob");
}

#[tokio::test]
async fn test_private_message_to_offline_user() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();

    alice.send(&private_message("ghost", "anyone?")).await.unwrap();

    let notice = alice
        .wait_for_message(|m| m.room == "ghost")
        .await
        .unwrap();
    assert!(notice.is_system());
    assert_eq!(notice.content, "User ghost is offline.");
}

#[tokio::test]
async fn test_join_private_loads_history() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();
    let mut bob = GatewayClient::join(&server, "bob").await.unwrap();
    alice.send(&private_message("bob", "first")).await.unwrap();
    bob.wait_for_message(|m| m.content == "first").await.unwrap();

    bob.send(&ClientEvent::JoinPrivate("alice".to_string()))
        .await
        .unwrap();

    let data = bob.wait_for(GatewayEventType::LoadMessages).await.unwrap();
    let history: Vec<Message> = serde_json::from_value(data).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].room, "alice");
    assert!(history[0].read_by.contains("bob"));
}

#[tokio::test]
async fn test_password_channel_flow() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();
    let mut bob = GatewayClient::join(&server, "bob").await.unwrap();

    alice.send(&create_channel("dev", Some("x"))).await.unwrap();
    let created = alice
        .wait_for_message(|m| m.room == "dev")
        .await
        .unwrap();
    assert_eq!(
        created.content,
        "Channel 'dev' created successfully. You have been added to it."
    );
    wait_for_channel_count(&mut bob, "dev", 1).await;

    bob.send(&join_channel("dev", Some("y"))).await.unwrap();
    let reason = bob.wait_for(GatewayEventType::JoinFail).await.unwrap();
    assert_eq!(reason, "Wrong password for channel.");

    bob.send(&join_channel("dev", Some("x"))).await.unwrap();
    bob.wait_for(GatewayEventType::LoadMessages).await.unwrap();
    let joined = bob.wait_for_message(|m| m.room == "dev").await.unwrap();
    assert_eq!(joined.content, "You joined dev");
    wait_for_channel_count(&mut bob, "dev", 2).await;
    wait_for_channel_count(&mut alice, "dev", 2).await;

    bob.send(&channel_message("dev", "hello dev")).await.unwrap();
    let message = alice
        .wait_for_message(|m| m.content == "hello dev")
        .await
        .unwrap();
    assert_eq!(message.room, "dev");
}

#[tokio::test]
async fn test_channel_join_replays_history() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();
    alice.send(&create_channel("dev", None)).await.unwrap();
    for i in 0..3 {
        alice
            .send(&channel_message("dev", &format!("m{i}")))
            .await
            .unwrap();
    }
    alice.wait_for_message(|m| m.content == "m2").await.unwrap();

    let mut bob = GatewayClient::join(&server, "bob").await.unwrap();
    bob.send(&join_channel("dev", None)).await.unwrap();

    let data = bob.wait_for(GatewayEventType::LoadMessages).await.unwrap();
    let history: Vec<Message> = serde_json::from_value(data).unwrap();
    let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m0", "m1", "m2"]);
    assert!(history.iter().all(|m| m.read_by.contains("bob")));
}

#[tokio::test]
async fn test_call_relay() {
    let server = TestServer::start().await.unwrap();
    let mut alice = GatewayClient::join(&server, "alice").await.unwrap();
    let mut bob = GatewayClient::join(&server, "bob").await.unwrap();

    alice
        .send(&ClientEvent::CallUser(CallUserPayload {
            user_to_call: "bob".to_string(),
            signal_data: serde_json::json!({"sdp": "offer"}),
            video: false,
        }))
        .await
        .unwrap();

    let call = bob.wait_for(GatewayEventType::IncomingCall).await.unwrap();
    assert_eq!(call["name"], "alice");
    assert_eq!(call["fromSocketId"], alice.connection_id.as_str());
    assert_eq!(call["signal"]["sdp"], "offer");

    bob.send(&ClientEvent::RejectCall(CallTargetPayload {
        to_socket_id: alice.connection_id.clone(),
    }))
    .await
    .unwrap();

    alice.wait_for(GatewayEventType::CallEnded).await.unwrap();
}
