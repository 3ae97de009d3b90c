//! Account endpoints: registration, login, token refresh, logout and profile

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::UserAppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::{ProfileUpdate, RegisterRequest};

pub const REGISTERED: &str = "Registration successful. JWT tokens are set as HTTP-only cookies.";
pub const LOGGED_IN: &str = "Login successful. JWT tokens are set as HTTP-only cookies.";
pub const REFRESHED: &str =
    "Token refreshed successfully. New access token is set as HTTP-only cookie.";
pub const LOGGED_OUT: &str = "Logout successful. JWT cookies have been cleared.";
pub const MISSING_REFRESH_COOKIE: &str = "Refresh token not found in cookies";

pub fn create_users_router() -> Router<UserAppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh))
        .route("/logout", post(logout))
        .route(
            "/profile",
            get(get_profile).put(update_profile).patch(update_profile),
        )
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterApiRequest {
    pub email: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<RegisterApiRequest> for RegisterRequest {
    fn from(request: RegisterApiRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            password2: request.password2,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginApiRequest {
    pub email: String,
    pub password: String,
}

/// Name fields for PUT and PATCH; anything else in the body is ignored
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ProfileApiUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Public profile; never includes the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            full_name: user.full_name(),
            date_joined: user.date_joined(),
            last_login: user.last_login(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: ProfileResponse,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// POST /register
///
/// Cookies are only attached once the account row exists.
pub async fn register(
    State(state): State<UserAppState>,
    jar: CookieJar,
    Json(request): Json<RegisterApiRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    debug!(email = %request.email, "Registering user");

    let (user, tokens) = state.user_service.register(request.into()).await?;
    let jar = state.cookies.attach(jar, &tokens);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user: ProfileResponse::from(&user),
            message: REGISTERED.to_string(),
        }),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<UserAppState>,
    jar: CookieJar,
    Json(request): Json<LoginApiRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let (user, tokens) = state
        .user_service
        .login(&request.email, &request.password)
        .await?;
    let jar = state.cookies.attach(jar, &tokens);

    Ok((
        jar,
        Json(AuthResponse {
            user: ProfileResponse::from(&user),
            message: LOGGED_IN.to_string(),
        }),
    ))
}

/// POST /token/refresh
///
/// Only the access cookie is replaced; the refresh cookie is left alone.
pub async fn refresh(
    State(state): State<UserAppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let refresh_token = state
        .cookies
        .refresh_token(&jar)
        .ok_or_else(|| ApiError::unauthorized(MISSING_REFRESH_COOKIE))?;

    let access_token = state.user_service.refresh(&refresh_token).await?;
    let jar = state.cookies.attach_access_only(jar, &access_token);

    Ok((jar, MessageResponse::new(REFRESHED)))
}

/// POST /logout
///
/// Clears both cookies. The tokens themselves stay valid until they expire.
pub async fn logout(
    RequireUser(user): RequireUser,
    State(state): State<UserAppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    debug!(user_id = %user.id(), "Logging out");

    (state.cookies.clear(jar), MessageResponse::new(LOGGED_OUT))
}

/// GET /profile
pub async fn get_profile(RequireUser(user): RequireUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

/// PUT or PATCH /profile
pub async fn update_profile(
    RequireUser(user): RequireUser,
    State(state): State<UserAppState>,
    Json(request): Json<ProfileApiUpdate>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .user_service
        .update_profile(
            user.id(),
            ProfileUpdate {
                first_name: request.first_name,
                last_name: request.last_name,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use serde_json::json;

    #[test]
    fn test_profile_response_hides_hash() {
        let user = User::new(UserId::generate(), "a@b.com", "argon2-hash")
            .with_names("Ada", "Lovelace");

        let value = serde_json::to_value(ProfileResponse::from(&user)).unwrap();

        assert_eq!(value["full_name"], json!("Ada Lovelace"));
        assert_eq!(value["last_login"], json!(null));
        assert!(!value.to_string().contains("argon2-hash"));
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn test_profile_update_ignores_unknown_fields() {
        let update: ProfileApiUpdate =
            serde_json::from_value(json!({"first_name": "Ada", "email": "x@y.com"})).unwrap();

        assert_eq!(update.first_name.as_deref(), Some("Ada"));
        assert!(update.last_name.is_none());
    }
}
