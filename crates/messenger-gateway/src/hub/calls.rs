//! Call signaling relay
//!
//! Signaling blobs are passed through untouched; the hub only resolves the target
//! connection. Unknown targets are dropped.

use super::{Hub, Outbox};
use crate::events::{CallAnsweredEvent, IncomingCallEvent, ServerEvent};
use crate::protocol::{AnswerCallPayload, CallTargetPayload, CallUserPayload};
use messenger_core::{ConnectionId, DomainError};

impl Hub {
    /// Ring another user
    pub fn call_user(
        &self,
        from: &ConnectionId,
        payload: CallUserPayload,
    ) -> Result<Outbox, DomainError> {
        let caller = self.registry.require(from)?.username.clone();
        let Some(callee) = self.registry.connection_of(&payload.user_to_call).cloned() else {
            tracing::debug!(connection_id = %from, callee = %payload.user_to_call, "Call to offline user dropped");
            return Ok(Outbox::new());
        };

        tracing::debug!(connection_id = %from, callee = %payload.user_to_call, video = payload.video, "Call relayed");

        Ok(Outbox::single(
            callee,
            ServerEvent::IncomingCall(IncomingCallEvent {
                signal: payload.signal_data,
                name: caller,
                from_socket_id: from.clone(),
                video: payload.video,
            }),
        ))
    }

    /// Relay the callee's answer to the caller
    pub fn answer_call(
        &self,
        from: &ConnectionId,
        payload: AnswerCallPayload,
    ) -> Result<Outbox, DomainError> {
        self.registry.require(from)?;
        let Some(target) = self.call_target(&payload.to_socket_id) else {
            return Ok(Outbox::new());
        };
        Ok(Outbox::single(
            target,
            ServerEvent::CallAnswered(CallAnsweredEvent {
                signal: payload.signal,
            }),
        ))
    }

    /// Relay a rejection or hang-up
    pub fn end_call(
        &self,
        from: &ConnectionId,
        payload: &CallTargetPayload,
    ) -> Result<Outbox, DomainError> {
        self.registry.require(from)?;
        let Some(target) = self.call_target(&payload.to_socket_id) else {
            return Ok(Outbox::new());
        };
        Ok(Outbox::single(target, ServerEvent::CallEnded))
    }

    fn call_target(&self, raw: &str) -> Option<ConnectionId> {
        let target = ConnectionId::new(raw);
        if self.connections.contains(&target) {
            Some(target)
        } else {
            tracing::debug!(to_socket_id = %raw, "Call relay target not connected");
            None
        }
    }
}
