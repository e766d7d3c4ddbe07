pub mod access_jwt;
pub mod factory;
pub mod key_source;

pub use access_jwt::{AuthError, AuthOptions, AuthService, ClaimPolicy, Identity};
pub use factory::build_auth_service;
