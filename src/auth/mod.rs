//! Authentication and authorization
//!
//! Provides:
//! - Fixed credential list with Argon2 password hashes
//! - JWT token generation and validation
//! - Caller roles and the authenticate/authorize request check

pub mod credentials;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod permissions;

pub use credentials::{Credential, CredentialStore};
pub use guard::{authenticate, authorize};
pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenInput};
pub use password::{hash_password, verify_password, HashScheme};
pub use permissions::Role;
