pub mod auth;

pub use auth::{Auth, auth_middleware, optional_auth};
