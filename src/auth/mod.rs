//! Authentication and access control
//!
//! Token issuance/verification, the per-request authentication gate, and the
//! path-based access policy enforced after it.

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{Claims, SigningKey, TokenCodec, TokenError, DEFAULT_TOKEN_TTL_SECS};
pub use middleware::{
    authentication_gate, extract_token, resolve_auth_context, CurrentUser, RequestAuthContext,
};
pub use password::PasswordHasher;
pub use policy::{access_policy_middleware, AccessPolicy, AccessRule, Requirement};
