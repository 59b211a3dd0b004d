//! WebSocket test client
//!
//! Speaks the gateway frame format over a real socket.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use futures_util::{SinkExt, StreamExt};
use messenger_core::Message;
use messenger_gateway::events::GatewayEventType;
use messenger_gateway::protocol::{ClientEvent, GatewayMessage, HelloPayload, OpCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::helpers::TestServer;

/// How long to wait for any single frame
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connected gateway client
pub struct GatewayClient {
    stream: WsStream,
    /// Connection id announced in Hello
    pub connection_id: String,
    /// Heartbeat interval announced in Hello, in milliseconds
    pub heartbeat_interval: u64,
}

impl GatewayClient {
    /// Connect and consume the Hello frame
    pub async fn connect(server: &TestServer) -> Result<Self> {
        let (stream, _) = connect_async(server.gateway_url()).await?;
        let mut client = Self {
            stream,
            connection_id: String::new(),
            heartbeat_interval: 0,
        };

        let hello = client.next_frame().await?;
        if hello.op != OpCode::Hello {
            bail!("Expected Hello, got {hello}");
        }
        let payload: HelloPayload =
            serde_json::from_value(hello.d.ok_or_else(|| anyhow!("Hello without data"))?)?;
        client.connection_id = payload.connection_id;
        client.heartbeat_interval = payload.heartbeat_interval;

        Ok(client)
    }

    /// Connect and claim a username
    pub async fn join(server: &TestServer, username: &str) -> Result<Self> {
        let mut client = Self::connect(server).await?;
        client.send(&ClientEvent::Join(username.to_string())).await?;
        client.wait_for(GatewayEventType::JoinSuccess).await?;
        Ok(client)
    }

    /// Send a client event as a Request frame
    pub async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        let frame = GatewayMessage::request(event)?;
        self.send_raw(&frame.to_json()?).await
    }

    /// Send a Heartbeat frame
    pub async fn heartbeat(&mut self, last_sequence: Option<u64>) -> Result<()> {
        let frame = GatewayMessage::heartbeat(last_sequence);
        self.send_raw(&frame.to_json()?).await
    }

    /// Send raw text
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream.send(WsMessage::Text(text.to_string())).await?;
        Ok(())
    }

    /// Next gateway frame, skipping control frames
    pub async fn next_frame(&mut self) -> Result<GatewayMessage> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .map_err(|_| anyhow!("Timed out waiting for a frame"))?
                .ok_or_else(|| anyhow!("Connection ended"))??;

            match msg {
                WsMessage::Text(text) => return Ok(GatewayMessage::from_json(&text)?),
                WsMessage::Close(frame) => bail!("Connection closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Skip frames until a dispatch of `event` arrives and return its data
    pub async fn wait_for(&mut self, event: GatewayEventType) -> Result<Value> {
        loop {
            let frame = self.next_frame().await?;
            if frame.op == OpCode::Dispatch && frame.t.as_deref() == Some(event.as_str()) {
                return Ok(frame.d.unwrap_or(Value::Null));
            }
        }
    }

    /// Skip frames until a `receiveMessage` matching `predicate` arrives
    pub async fn wait_for_message<F>(&mut self, predicate: F) -> Result<Message>
    where
        F: Fn(&Message) -> bool,
    {
        loop {
            let data = self.wait_for(GatewayEventType::ReceiveMessage).await?;
            let message: Message = serde_json::from_value(data)?;
            if predicate(&message) {
                return Ok(message);
            }
        }
    }

    /// Wait for the server to close the socket and return the close code
    pub async fn expect_close(&mut self) -> Result<u16> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .map_err(|_| anyhow!("Timed out waiting for close"))?
                .ok_or_else(|| anyhow!("Connection ended without close frame"))??;

            if let WsMessage::Close(frame) = msg {
                let frame = frame.ok_or_else(|| anyhow!("Close frame without code"))?;
                return Ok(u16::from(frame.code));
            }
        }
    }

    /// Close the socket from the client side
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
