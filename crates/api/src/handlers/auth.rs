//! Login handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use coachlog_core::error::CoreError;
use coachlog_db::models::user::Profile;
use coachlog_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub staff_number: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Profile,
}

/// POST /auth/login
///
/// Unknown staff numbers and wrong passwords produce the same 401 so the
/// endpoint does not confirm which staff numbers exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_staff_number(&state.pool, &input.staff_number).await?;

    let Some(user) = user else {
        return Err(invalid_credentials());
    };
    if !verify_password(&input.password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            user: Profile {
                id: user.id,
                staff_number: user.staff_number,
                full_name: user.full_name,
            },
        },
    }))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid staff number or password".into(),
    ))
}
