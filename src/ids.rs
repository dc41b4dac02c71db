//! Type-safe identifiers for socket entities.
//!
//! Newtype wrappers prevent mixing incompatible values at compile time:
//!
//! - [`Topic`] - channel topic string (`room:<name>`, `keepalive`)
//! - [`Ref`] - frame reference number for request/response correlation
//! - [`RefSeq`] - monotonically increasing per-connection [`Ref`] source
//! - [`ChannelId`] - process-unique identity of one channel instance

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// Topic
// ============================================================================

/// A channel topic.
///
/// Topics name one logical channel multiplexed over the shared connection.
/// Room channels use the `room:<name>` form; the keepalive frame uses the
/// fixed [`Topic::KEEPALIVE`] topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Topic of the keepalive ping frame.
    pub const KEEPALIVE: &'static str = "keepalive";

    /// Creates a room topic from a room name.
    ///
    /// # Example
    ///
    /// ```
    /// use sockmux::Topic;
    ///
    /// assert_eq!(Topic::room("lobby").as_str(), "room:lobby");
    /// ```
    #[inline]
    #[must_use]
    pub fn room(name: impl AsRef<str>) -> Self {
        Self(format!("room:{}", name.as_ref()))
    }

    /// Creates the keepalive topic.
    #[inline]
    #[must_use]
    pub fn keepalive() -> Self {
        Self(Self::KEEPALIVE.to_string())
    }

    /// Returns the topic as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Topic {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Ref
// ============================================================================

/// A frame reference number.
///
/// Outbound frames carry a reference so a future acknowledgement scheme can
/// correlate replies with the requests that caused them. References are
/// assigned from a [`RefSeq`] and are unique within one physical connection;
/// the keepalive frame always carries [`Ref::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ref(u64);

impl Ref {
    /// The fixed reference of keepalive frames.
    pub const ZERO: Ref = Ref(0);

    /// Returns the raw reference value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RefSeq
// ============================================================================

/// Monotonically increasing [`Ref`] source.
///
/// One `RefSeq` exists per physical connection; it restarts at 1 when the
/// driver establishes a new link, so references stay correlated with the
/// connection that issued them.
#[derive(Debug)]
pub struct RefSeq(u64);

impl RefSeq {
    /// Creates a sequence whose first reference is 1.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns the next reference in the sequence.
    #[inline]
    pub fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref(self.0)
    }
}

impl Default for RefSeq {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ChannelId
// ============================================================================

/// Process-unique identity of one channel instance.
///
/// Distinguishes a replacement channel from the channel it replaced on the
/// same topic, so the driver can tell whether a join already went out on the
/// current connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Returns the next channel identity.
    #[must_use]
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
