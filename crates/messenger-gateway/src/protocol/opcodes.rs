//! Gateway operation codes
//!
//! Numbered like the rest of the frame format: `0..=2` carry traffic, `10..` are
//! transport bookkeeping. Each op travels in one direction only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Frame operation code, serialized as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OpCode {
    /// Named server event with a sequence number
    Dispatch,
    /// Client liveness ping, optionally echoing the last seen sequence
    Heartbeat,
    /// Named client event such as `join` or `sendMessage`
    Request,
    /// First frame on every connection
    Hello,
    /// Reply to `Heartbeat`
    HeartbeatAck,
}

/// Who may send a given op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

impl OpCode {
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Heartbeat | Self::Request => Direction::ClientToServer,
            Self::Dispatch | Self::Hello | Self::HeartbeatAck => Direction::ServerToClient,
        }
    }

    /// Whether a client is allowed to send this op
    #[must_use]
    pub const fn is_client_op(self) -> bool {
        matches!(self.direction(), Direction::ClientToServer)
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Request => 2,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = UnknownOpCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Request,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(UnknownOpCode(other)),
        })
    }
}

/// Integer outside the op code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid op code: {0}")]
pub struct UnknownOpCode(pub u8);

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({})", u8::from(*self))
    }
}
