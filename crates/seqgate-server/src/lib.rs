//! seqgate-server: Configuration and request handlers
//!
//! This crate contains the controller-facing layer of the seqgate
//! gateway:
//! - Authorize handler for access-group checks
//! - Fileinfo handler for query-to-file-set resolution
//! - Configuration management
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               seqgate-server                 │
//! ├─────────────────────────────────────────────┤
//! │  config.rs   - Configuration management     │
//! │  handlers/   - Request handlers             │
//! │    authorize.rs - Access-group checks       │
//! │    fileinfo.rs  - File-set resolution       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod handlers;

// Re-exports for convenience
pub use config::{ConfigLoadError, GatewayConfig};
pub use handlers::{AuthorizeHandler, FileinfoHandler};
