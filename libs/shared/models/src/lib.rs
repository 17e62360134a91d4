pub mod api;
pub mod error;
pub mod user;

pub use api::{AuthResponse, Envelope};
pub use error::ClientError;
pub use user::{User, UserRole, UserSummary};
