//! Minimal chat client over a multiplexed socket.
//!
//! Demonstrates:
//! - Creating a SocketManager and registering connection listeners
//! - Joining a room channel and listening for messages
//! - Sending a shout and enabling keepalive
//!
//! Usage:
//!   cargo run --example chat -- <host:port> <room>
//!   cargo run --example chat -- publish.ip1.cc:4000 lobby

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use sockmux::{SocketConfig, SocketEventKind, SocketManager};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "127.0.0.1:4000".to_string());
    let room = args.next().unwrap_or_else(|| "lobby".to_string());

    if let Err(e) = run(&server, &room).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(server: &str, room: &str) -> Result<()> {
    println!("=== sockmux chat ===\n");
    println!("[1] Connecting to {server}...");

    let manager = SocketManager::new(
        SocketConfig::new(server).with_reconnect(5, Duration::from_secs(3)),
    )?;

    manager.on(SocketEventKind::Open, |_| println!("    ✓ Socket open"));
    manager.on(SocketEventKind::Close, |_| println!("    - Socket closed"));
    manager.on(SocketEventKind::Error, |event| {
        println!("    ✗ Socket error: {event:?}");
    });

    manager.set_keepalive_interval(Duration::from_secs(30));

    // ========================================================================
    // Join Channel
    // ========================================================================

    println!("[2] Joining room:{room}...");

    let channel = manager.join_channel(room);
    let topic = channel.topic().clone();
    channel.on_message(move |message| println!("    [{topic}] {message}"));

    channel.send(&"hello from sockmux")?;

    // ========================================================================
    // Run
    // ========================================================================

    println!("[3] Listening (ctrl-c to exit)...\n");
    tokio::signal::ctrl_c().await.ok();

    println!("\n[Cleanup] Shutting down...");
    manager.shutdown();
    println!("          ✓ Done");

    Ok(())
}
