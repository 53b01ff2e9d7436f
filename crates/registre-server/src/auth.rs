//! Acting principal
//!
//! Authentication itself belongs to the external session provider, which
//! forwards the authenticated user's id in the `x-user-id` header. The id must
//! resolve to an active user before any handler body runs.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Agent => "agent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated user performing the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActingUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(sqlx::FromRow)]
struct ActingUserRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
}

impl ActingUser {
    /// Load an active user by id
    pub async fn load(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, ActingUserRow>(
            "SELECT id, name, email, role FROM users WHERE id = $1 AND is_active",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.and_then(|row| {
            let role = Role::parse(&row.role)?;
            Some(Self {
                id: row.id,
                name: row.name,
                email: row.email,
                role,
            })
        }))
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Fail with `FORBIDDEN` unless the user holds one of `roles`
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AppError> {
        if self.has_role(roles) {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.id, role = %self.role, "Forbidden: insufficient role");
            Err(AppError::Forbidden(
                "Vous n'avez pas les droits nécessaires pour cette action".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(&[Role::Admin])
    }
}

fn parse_user_id(parts: &Parts) -> Result<Uuid, AppError> {
    let value = parts
        .headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("Authentification requise".to_string()))?;

    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| AppError::Unauthorized("Identifiant utilisateur invalide".to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    PgPool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let id = parse_user_id(parts)?;
        let pool = PgPool::from_ref(state);

        match ActingUser::load(&pool, id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(user_id = %id, "Rejected request from unknown or inactive user");
                Err(AppError::Unauthorized("Utilisateur inconnu ou désactivé".to_string()))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/detainees");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = parse_user_id(&parts_with(None)).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_malformed_header_is_unauthorized() {
        let err = parse_user_id(&parts_with(Some("not-a-uuid"))).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_header_is_parsed() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&parts_with(Some(&format!(" {} ", id)))).unwrap(), id);
    }

    #[test]
    fn test_role_guard() {
        let user = ActingUser {
            id: Uuid::new_v4(),
            name: "Agent Kabila".to_string(),
            email: "agent@registre.cd".to_string(),
            role: Role::Agent,
        };

        assert!(user.require_role(&[Role::Agent, Role::Manager]).is_ok());
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Agent] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }
}
