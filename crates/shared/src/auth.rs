//! Caller identity, roles, and JWT claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two account kinds that can authenticate against the API.
///
/// Role checks are done by matching on this enum, never by comparing
/// strings at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A business owner.
    Owner,
    /// A business member (e.g. an independent contractor).
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// The authenticated caller, as resolved from a bearer token.
///
/// Every lifecycle operation takes this explicitly; there is no ambient
/// per-request user slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Owner or member account id, depending on `role`.
    pub id: i32,
    /// The caller's role.
    pub role: Role,
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner or member account id).
    pub sub: i32,
    /// The account's role.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(id: i32, role: Role, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: id,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the caller identity carried by these claims.
    #[must_use]
    pub const fn caller(&self) -> Caller {
        Caller {
            id: self.sub,
            role: self.role,
        }
    }
}

/// Login request payload (owners and members).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Owner registration request payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRegisterRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Display name.
    pub owner_name: String,
}

/// Member registration request payload.
///
/// Business name and code are optional; a member may register unaffiliated
/// and join a business later.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRegisterRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Display name.
    pub member_name: String,
    /// Business to join on registration.
    pub business_name: Option<String>,
    /// Join code of that business.
    pub code: Option<String>,
}

/// Token response returned after successful authentication.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Bearer token.
    pub token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from_str("owner").unwrap(), Role::Owner);
        assert_eq!(Role::from_str("member").unwrap(), Role::Member);
        assert_eq!(Role::Owner.to_string(), "owner");
        assert_eq!(Role::Member.to_string(), "member");
        assert!(Role::from_str("admin").is_err());
    }

    #[test]
    fn test_claims_caller() {
        let expires = Utc::now() + chrono::Duration::minutes(15);
        let claims = Claims::new(42, Role::Member, expires);
        let caller = claims.caller();
        assert_eq!(caller.id, 42);
        assert_eq!(caller.role, Role::Member);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
        let role: Role = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, Role::Member);
    }
}
