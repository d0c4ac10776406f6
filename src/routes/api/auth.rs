use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use axum_extra::extract::{CookieJar, WithRejection};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{AuthError, Role},
    db::entities::user,
    error::AppError,
    middleware::CurrentUser,
    response::ApiResult,
    routes::cookies::{REFRESH_COOKIE, clear_refresh_cookie, refresh_cookie},
    state::AppState,
};

use super::validation::{parse_role, validate_email, validate_password};

const UNKNOWN_USER_AGENT: &str = "unknown";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            role: model.role(),
            created_at: model
                .created_at
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            email: model.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    let auth = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me));

    Router::new().nest("/auth", auth).with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    validate_email(&body.email)?;
    validate_password(&body.password)?;
    let role = parse_role(body.role.as_deref())?;

    let session = state
        .auth
        .register(&body.email, &body.password, role, user_agent(&headers))
        .await?;

    let jar = jar.add(refresh_cookie(
        session.refresh_token,
        state.auth.refresh_ttl(),
        state.secure_cookies(),
    ));
    let body = AuthResponse {
        user: session.user.into(),
        access_token: session.access_token,
    };
    Ok((StatusCode::CREATED, jar, Json(body)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let session = state
        .auth
        .login(&body.email, &body.password, user_agent(&headers))
        .await?;

    let jar = jar.add(refresh_cookie(
        session.refresh_token,
        state.auth.refresh_ttl(),
        state.secure_cookies(),
    ));
    let body = AuthResponse {
        user: session.user.into(),
        access_token: session.access_token,
    };
    Ok((jar, Json(body)))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<AccessTokenResponse>)> {
    let token = refresh_token_from(&jar).ok_or(AuthError::MissingCredential)?;
    let pair = state.auth.refresh(&token).await?;

    let jar = jar.add(refresh_cookie(
        pair.refresh_token,
        state.auth.refresh_ttl(),
        state.secure_cookies(),
    ));
    Ok((
        jar,
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    ))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<LogoutResponse>)> {
    let token = refresh_token_from(&jar);
    state.auth.logout(token.as_deref()).await?;

    let jar = jar.add(clear_refresh_cookie(state.secure_cookies()));
    Ok((jar, Json(LogoutResponse { success: true })))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user: user.into() })
}

fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_USER_AGENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use chrono::{DateTime, FixedOffset};
    use uuid::Uuid;

    use crate::db::entities::user;

    use super::{UserResponse, user_agent};

    #[test]
    fn user_response_hides_hash_and_formats_timestamp() {
        let created_at = DateTime::<FixedOffset>::parse_from_rfc3339("2024-03-01T12:30:45.123456+02:00")
            .expect("timestamp should parse");
        let model = user::Model {
            id: Uuid::nil(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: "ADMIN".to_string(),
            created_at,
            updated_at: created_at,
        };

        let json = serde_json::to_value(UserResponse::from(model)).expect("serialize user");

        assert_eq!(json["createdAt"], "2024-03-01T10:30:45.123Z");
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn missing_user_agent_is_unknown() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_agent(&headers), "unknown");

        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        assert_eq!(user_agent(&headers), "curl/8.0");
    }
}
