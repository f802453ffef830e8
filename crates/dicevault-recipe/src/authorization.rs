//! Authorization evaluation for authentication requirements.
//!
//! Decides whether the origin (host, path) of a requesting application
//! satisfies a recipe's or unsealing instructions' constraints. Pure
//! functions over their arguments; safe for concurrent use.
//!
//! # Security
//!
//! - The handshake requirement is checked before any host/path matching:
//!   if a handshake is mandatory and absent, nothing else can grant
//!   access.
//! - Host wildcards only ever widen to subdomains of the stated suffix.
//!   `"*.example.com"` matches `example.com` and `sub.example.com` but
//!   never `evil-example.com`.
//! - An absent `allow` list is NOT implicitly permissive: the caller
//!   supplies `allow_null_requirement`, and the per-command call-site
//!   policy in `dicevault-api` defaults it to deny.

use crate::model::{AuthenticationRequirements, WebBasedApplicationIdentity};

/// Path requirement applied when an `allow` entry specifies none.
pub const DEFAULT_PATH_REQUIREMENT: &str = "/--derived-secret-api--/*";

/// The security-relevant identity of a requesting application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    /// Host of the requesting origin.
    pub host: String,
    /// Path of the requesting origin.
    pub path: String,
    /// Whether the caller proved possession of a handshake auth token
    /// bound to its response URL.
    pub validated_by_auth_token: bool,
}

impl SecurityContext {
    /// Context for a caller that has not completed a handshake.
    #[must_use]
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self { host: host.into(), path: path.into(), validated_by_auth_token: false }
    }
}

/// Whether `host` satisfies a requirement host, honoring `"*."` wildcards.
///
/// A wildcard `"*.suffix"` matches the suffix itself or any proper
/// subdomain of it. Non-wildcard hosts require exact equality.
#[must_use]
pub fn satisfies_host(host: &str, requirement: &str) -> bool {
    if let Some(suffix) = requirement.strip_prefix("*.") {
        // "*.example.com" matches "example.com" and "a.example.com",
        // but not "evil-example.com" (the dot must separate labels).
        host == suffix || host.ends_with(&requirement[1..])
    } else {
        host == requirement
    }
}

/// Whether `path` satisfies a path requirement.
///
/// A requirement not starting with `/` is treated as if prefixed with
/// `/`. A requirement ending in `/*` matches the exact prefix without the
/// trailing slash and any path extending it past the slash. A requirement
/// ending in a bare `*` is a literal prefix match. Anything else requires
/// exact equality.
#[must_use]
pub fn satisfies_path(path: &str, requirement: &str) -> bool {
    let normalized: String = if requirement.starts_with('/') {
        requirement.to_string()
    } else {
        format!("/{requirement}")
    };

    if let Some(prefix) = normalized.strip_suffix("/*") {
        path == prefix || path.starts_with(&normalized[..normalized.len() - 1])
    } else if let Some(prefix) = normalized.strip_suffix('*') {
        path.starts_with(prefix)
    } else {
        path == normalized
    }
}

/// Whether a single `allow` entry matches the context.
fn satisfies_identity(context: &SecurityContext, identity: &WebBasedApplicationIdentity) -> bool {
    if !satisfies_host(&context.host, &identity.host) {
        return false;
    }
    match &identity.paths {
        Some(paths) => paths.iter().any(|p| satisfies_path(&context.path, p)),
        None => satisfies_path(&context.path, DEFAULT_PATH_REQUIREMENT),
    }
}

/// Evaluate authentication requirements against a security context.
///
/// Returns `true` iff the context is permitted. When the requirements
/// specify no `allow` list at all, the decision is delegated to
/// `allow_null_requirement` - the caller's policy for "no restriction
/// was specified".
#[must_use]
pub fn satisfies(
    context: &SecurityContext,
    requirements: &impl AuthenticationRequirements,
    allow_null_requirement: bool,
) -> bool {
    if requirements.require_authentication_handshake() && !context.validated_by_auth_token {
        return false;
    }

    match requirements.allow() {
        Some(allow) => allow.iter().any(|identity| satisfies_identity(context, identity)),
        None => allow_null_requirement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Recipe, UnsealingInstructions};

    fn allow_entry(host: &str) -> WebBasedApplicationIdentity {
        WebBasedApplicationIdentity { host: host.to_string(), paths: None }
    }

    #[test]
    fn host_exact_match() {
        assert!(satisfies_host("example.com", "example.com"));
        assert!(!satisfies_host("sub.example.com", "example.com"));
        assert!(!satisfies_host("example.org", "example.com"));
    }

    #[test]
    fn host_wildcard_match() {
        assert!(satisfies_host("example.com", "*.example.com"));
        assert!(satisfies_host("sub.example.com", "*.example.com"));
        assert!(satisfies_host("a.b.example.com", "*.example.com"));
        assert!(!satisfies_host("evil-example.com", "*.example.com"));
        assert!(!satisfies_host("example.com.evil.org", "*.example.com"));
    }

    #[test]
    fn path_default_requirement() {
        assert!(satisfies_path("/--derived-secret-api--/", DEFAULT_PATH_REQUIREMENT));
        assert!(satisfies_path("/--derived-secret-api--", DEFAULT_PATH_REQUIREMENT));
        assert!(satisfies_path("/--derived-secret-api--/foo", DEFAULT_PATH_REQUIREMENT));
        assert!(!satisfies_path("/other", DEFAULT_PATH_REQUIREMENT));
    }

    #[test]
    fn path_requirement_without_leading_slash_is_normalized() {
        assert!(satisfies_path("/app", "app"));
        assert!(satisfies_path("/app/sub", "app/*"));
    }

    #[test]
    fn path_bare_star_is_literal_prefix() {
        assert!(satisfies_path("/app-extra", "/app*"));
        assert!(satisfies_path("/app", "/app*"));
        assert!(!satisfies_path("/ap", "/app*"));
    }

    #[test]
    fn path_exact_match() {
        assert!(satisfies_path("/exact", "/exact"));
        assert!(!satisfies_path("/exact/sub", "/exact"));
    }

    #[test]
    fn handshake_requirement_blocks_without_token() {
        let recipe = Recipe {
            allow: Some(vec![allow_entry("example.com")]),
            require_authentication_handshake: Some(true),
            ..Recipe::default()
        };

        let mut context = SecurityContext::new("example.com", "/--derived-secret-api--/");
        assert!(!satisfies(&context, &recipe, false));

        context.validated_by_auth_token = true;
        assert!(satisfies(&context, &recipe, false));
    }

    #[test]
    fn allow_list_requires_some_entry_to_match() {
        let instructions = UnsealingInstructions {
            allow: Some(vec![allow_entry("a.com"), allow_entry("b.com")]),
            ..UnsealingInstructions::default()
        };

        let ctx_b = SecurityContext::new("b.com", "/--derived-secret-api--/");
        assert!(satisfies(&ctx_b, &instructions, false));

        let ctx_c = SecurityContext::new("c.com", "/--derived-secret-api--/");
        assert!(!satisfies(&ctx_c, &instructions, false));
    }

    #[test]
    fn entry_paths_override_default() {
        let identity = WebBasedApplicationIdentity {
            host: "example.com".to_string(),
            paths: Some(vec!["/custom/*".to_string()]),
        };
        let recipe = Recipe { allow: Some(vec![identity]), ..Recipe::default() };

        let custom = SecurityContext::new("example.com", "/custom/thing");
        assert!(satisfies(&custom, &recipe, false));

        // The default path no longer matches once paths are specified.
        let default_path = SecurityContext::new("example.com", "/--derived-secret-api--/");
        assert!(!satisfies(&default_path, &recipe, false));
    }

    #[test]
    fn null_allow_delegates_to_caller_policy() {
        let recipe = Recipe::default();
        let context = SecurityContext::new("anywhere.com", "/");

        assert!(!satisfies(&context, &recipe, false));
        assert!(satisfies(&context, &recipe, true));
    }
}
