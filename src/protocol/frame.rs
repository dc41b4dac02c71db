//! Wire frame type.
//!
//! Every message exchanged over the transport, in either direction, is one
//! structured frame:
//!
//! ```json
//! { "topic": "room:lobby", "event": "shout", "payload": { "message": "hi" }, "ref": 2 }
//! ```
//!
//! # Events
//!
//! | Event | Direction | Purpose |
//! |-------|-----------|---------|
//! | `phx_join` | outbound | join a channel topic |
//! | `shout` | outbound/inbound | user message on a topic |
//! | `ping` | outbound | keepalive (topic fixed to `keepalive`) |
//! | `phx_reply` | inbound | server reply, clears the join-ack flag |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};
use crate::ids::{Ref, Topic};

// ============================================================================
// Event Names
// ============================================================================

/// Named frame events.
pub mod events {
    /// Channel join request.
    pub const JOIN: &str = "phx_join";

    /// User message.
    pub const SHOUT: &str = "shout";

    /// Keepalive ping.
    pub const PING: &str = "ping";

    /// Server reply to a prior request.
    pub const REPLY: &str = "phx_reply";
}

// ============================================================================
// Frame
// ============================================================================

/// One structured message unit exchanged over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Channel topic the frame belongs to.
    pub topic: Topic,

    /// Event name, see [`events`].
    pub event: String,

    /// Event payload.
    pub payload: Value,

    /// Frame reference for request/response correlation.
    #[serde(rename = "ref")]
    pub reference: Ref,
}

// ============================================================================
// Frame - Constructors
// ============================================================================

impl Frame {
    /// Creates a join frame for a topic.
    #[inline]
    #[must_use]
    pub fn join(topic: Topic, reference: Ref) -> Self {
        Self {
            topic,
            event: events::JOIN.to_string(),
            payload: Value::Object(Map::new()),
            reference,
        }
    }

    /// Creates a shout frame carrying a user message.
    #[inline]
    #[must_use]
    pub fn shout(topic: Topic, message: Value, reference: Ref) -> Self {
        Self {
            topic,
            event: events::SHOUT.to_string(),
            payload: json!({ "message": message }),
            reference,
        }
    }

    /// Creates the fixed keepalive ping frame.
    #[inline]
    #[must_use]
    pub fn keepalive() -> Self {
        Self {
            topic: Topic::keepalive(),
            event: events::PING.to_string(),
            payload: Value::Object(Map::new()),
            reference: Ref::ZERO,
        }
    }
}

// ============================================================================
// Frame - Codec
// ============================================================================

impl Frame {
    /// Serializes the frame to its wire text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Json)
    }

    /// Parses a frame from inbound wire text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the text is not a valid frame.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::decode(e.to_string()))
    }
}

// ============================================================================
// Frame - Accessors
// ============================================================================

impl Frame {
    /// Returns `true` if this is a server reply frame.
    #[inline]
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.event == events::REPLY
    }

    /// Returns the `message` field of the payload.
    ///
    /// Returns [`Value::Null`] when the field is absent.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Value {
        self.payload.get("message").cloned().unwrap_or(Value::Null)
    }
}

// ============================================================================
// Tests
// ============================================================================
