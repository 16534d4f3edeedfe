//! tiktak server library - session-scoped tic-tac-toe over HTTP and MCP
//!
//! # Architecture
//!
//! - **Session**: [`SessionRegistry`] maps session IDs to live games
//! - **Server**: axum REST API over a registry
//! - **Adapter**: MCP tools for agents, forwarding to the REST API or a
//!   local registry
//! - **Config**: TOML file, environment and CLI settings
//!
//! # Example
//!
//! ```
//! use tiktak_server::SessionRegistry;
//!
//! let registry = SessionRegistry::new();
//! let view = registry.create_session();
//! let report = registry
//!     .make_move(&view.session_id.to_string(), 1, 1)
//!     .expect("session exists");
//! assert!(report.move_result.success);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod api;
pub mod cli;
pub mod config;
pub mod server;
pub mod session;

// Crate-level exports - Session management
pub use session::{
    GameHandle, MoveReport, SessionError, SessionId, SessionMetadata, SessionRegistry,
    SessionSummary, SessionView,
};

// Crate-level exports - Server
pub use server::{ApiError, router, serve};

// Crate-level exports - Configuration
pub use config::{AdapterConfig, AppConfig, ConfigError, ServerConfig};
