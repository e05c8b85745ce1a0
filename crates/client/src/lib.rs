//! # Corpografo Client
//!
//! The Remote Entity Client: configuration, HTTP transport, the user
//! session, and the response classification shared by every page.
//!
//! ## Example
//!
//! ```rust,ignore
//! use corpografo_client::{ConsoleConfig, EntityClient, SessionStore};
//!
//! let config = ConsoleConfig::from_env()?;
//! let session = SessionStore::open(config.session_file.as_deref());
//! let client = EntityClient::from_config(&config, session, shell)?;
//! let corpora = client.fetch_collection(EntityType::Corpus).await?;
//! ```

pub mod client;
pub mod config;
pub mod record;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{
    EntityClient, OPERATION_SUCCESSFUL, SESSION_INVALID_MARKERS, UNEXPECTED_BEHAVIOR,
    failure_message, failure_notification, session_invalid_marker,
};
pub use config::{ConsoleConfig, DEFAULT_API_URL, default_session_file};
pub use record::{EntityRecord, EntitySummary, RelatedSummary};
pub use session::{SessionState, SessionStore};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
