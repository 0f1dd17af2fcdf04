//! Path-based access policy
//!
//! A fixed table of path prefixes, consulted after the authentication gate
//! has resolved the caller. First match wins; paths matching no rule require
//! an identity.

use crate::{auth::middleware::RequestAuthContext, error::AppError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// What a path demands of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    RequiresIdentity,
}

/// One row of the policy table. `prefix` matches itself and every path below it.
#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    pub prefix: &'static str,
    pub requirement: Requirement,
}

const STANDARD_RULES: &[AccessRule] = &[
    AccessRule {
        prefix: "/api/auth",
        requirement: Requirement::Public,
    },
    AccessRule {
        prefix: "/api/users",
        requirement: Requirement::RequiresIdentity,
    },
];

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: &'static [AccessRule],
    fallback: Requirement,
}

impl AccessPolicy {
    /// The service's policy: `/api/auth/**` public, everything else needs an identity
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES,
            fallback: Requirement::RequiresIdentity,
        }
    }

    pub fn requirement_for(&self, path: &str) -> Requirement {
        self.rules
            .iter()
            .find(|rule| prefix_matches(rule.prefix, path))
            .map(|rule| rule.requirement)
            .unwrap_or(self.fallback)
    }

    /// Whether a request in `context` may reach `path`
    pub fn permits(&self, path: &str, context: &RequestAuthContext) -> bool {
        match self.requirement_for(path) {
            Requirement::Public => true,
            Requirement::RequiresIdentity => context.is_authenticated(),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Segment-aware prefix match: `/api/auth` matches `/api/auth` and
/// `/api/auth/login`, not `/api/authz`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// 访问策略中间件 - 必须在认证闸门之后运行
pub async fn access_policy_middleware(
    State(policy): State<Arc<AccessPolicy>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    let context = req
        .extensions()
        .get::<RequestAuthContext>()
        .cloned()
        .unwrap_or_default();

    if !policy.permits(path, &context) {
        tracing::debug!(path = %path, "Anonymous request to protected path");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_paths_are_public() {
        let policy = AccessPolicy::standard();
        assert_eq!(policy.requirement_for("/api/auth"), Requirement::Public);
        assert_eq!(policy.requirement_for("/api/auth/login"), Requirement::Public);
        assert_eq!(policy.requirement_for("/api/auth/register"), Requirement::Public);
    }

    #[test]
    fn test_user_paths_require_identity() {
        let policy = AccessPolicy::standard();
        assert_eq!(policy.requirement_for("/api/users"), Requirement::RequiresIdentity);
        assert_eq!(policy.requirement_for("/api/users/5"), Requirement::RequiresIdentity);
        assert_eq!(
            policy.requirement_for("/api/users/update/5"),
            Requirement::RequiresIdentity
        );
    }

    #[test]
    fn test_other_paths_require_identity() {
        let policy = AccessPolicy::standard();
        assert_eq!(policy.requirement_for("/"), Requirement::RequiresIdentity);
        assert_eq!(policy.requirement_for("/health"), Requirement::RequiresIdentity);
        assert_eq!(policy.requirement_for("/api/authz"), Requirement::RequiresIdentity);
        assert_eq!(policy.requirement_for("/api"), Requirement::RequiresIdentity);
    }

    #[test]
    fn test_permits() {
        let policy = AccessPolicy::standard();
        let anonymous = RequestAuthContext::anonymous();
        let alice = RequestAuthContext::authenticated("alice@example.com".to_string());

        assert!(policy.permits("/api/auth/login", &anonymous));
        assert!(!policy.permits("/api/users/5", &anonymous));
        assert!(policy.permits("/api/users/5", &alice));
        assert!(!policy.permits("/anything", &anonymous));
    }
}
