//! Dashboard backend: segments, campaigns, message suggestions and the
//! signed-in session.
//!
//! Data is held in memory (development); a real deployment would back
//! [`CrmRepository`] with a database.

pub mod auth;
pub mod dispatch;
pub mod handlers;
pub mod models;
pub mod router;
pub mod service;
pub mod store;

pub use auth::{IdentityProvider, SessionManager, TrustedIdentityProvider};
pub use handlers::ManagementState;
pub use router::management_router;
pub use service::CrmService;
pub use store::{CrmRepository, InMemoryStore};
