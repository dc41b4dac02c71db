//! Socket entities: manager, channels, driver.
//!
//! This module contains the core of the crate:
//!
//! - [`SocketManager`] - owns the physical connection lifecycle and the
//!   channel set; public entry point
//! - [`Channel`] - one topic-scoped subscription over the shared connection
//! - `driver` - the per-manager event loop task (internal)
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Channel handle, listeners, topic registry |
//! | `config` | Socket configuration and endpoint URL |
//! | `driver` | Connection event loop (internal) |
//! | `event` | Connection-level events and listener registry |
//! | `manager` | Public socket manager handle |

// ============================================================================
// Submodules
// ============================================================================

/// Channel handle and topic registry.
pub mod channel;

/// Socket configuration.
pub mod config;

/// Connection event loop.
mod driver;

/// Connection-level events.
pub mod event;

/// Public socket manager handle.
pub mod manager;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{Channel, MessageListener};
pub use config::{DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_INTERVAL, SocketConfig};
pub use event::{SocketEvent, SocketEventKind, SocketListener};
pub use manager::{SocketManager, SocketState};
