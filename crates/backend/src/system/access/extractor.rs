use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::access::AppRole;

/// Header carrying the role label set by the identity provider
pub const ROLE_HEADER: &str = "x-user-role";

/// Role of the caller; requests without access are rejected with 403.
/// Usage in handlers: `async fn handler(CurrentRole(role): CurrentRole) -> Response`
pub struct CurrentRole(pub AppRole);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentRole
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let label = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let role = AppRole::from_label(label);

        if !role.has_access() {
            tracing::warn!("Access denied for role label '{}'", label);
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(CurrentRole(role))
    }
}
