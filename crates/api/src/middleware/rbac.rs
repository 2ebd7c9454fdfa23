//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

/// Requires `ADMIN` or `SUPER_ADMIN`. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn export(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_SUPER_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
