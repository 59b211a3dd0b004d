//! Gateway protocol definitions
//!
//! Defines the WebSocket protocol including op codes, frame format, close codes,
//! and the client request payloads.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;
mod requests;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::{Direction, OpCode, UnknownOpCode};
pub use payloads::HelloPayload;
pub use requests::{
    AnswerCallPayload, CallTargetPayload, CallUserPayload, ChannelRequestPayload, ClientEvent,
    SendMessagePayload,
};
