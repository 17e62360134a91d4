pub mod context;

pub use context::{Session, SessionContext};
