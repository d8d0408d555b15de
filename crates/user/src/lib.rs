mod command;
pub mod identity;
mod query;
pub mod session;

pub use command::*;
pub use identity::{IdentityKey, IdentityVerifier};
pub use query::*;
pub use session::{AuthUser, generate_token, validate_token};
