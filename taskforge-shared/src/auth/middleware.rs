/// Authentication middleware for Axum
///
/// Gates protected routes behind a bearer token check: the token is pulled
/// from the `Authorization` header, verified offline, and on success an
/// [`AuthUser`] is attached to the request extensions for downstream
/// handlers. The gate itself never touches the store.
///
/// Every failure mode — missing header, malformed header, bad signature,
/// expired token — is answered with 401. There is deliberately no 400/403
/// distinction that would leak why the credential was rejected.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskforge_shared::auth::middleware::{create_jwt_middleware, AuthUser};
///
/// async fn protected(Extension(auth): Extension<AuthUser>) -> String {
///     format!("hello, user {}", auth.id)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(create_jwt_middleware("jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};

/// Authenticated identity attached to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Id of the authenticated user
    pub id: i32,
}

/// Error type for the authentication gate
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header absent
    MissingCredentials,

    /// Authorization header present but not a Bearer scheme
    MalformedHeader,

    /// Token failed verification
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials => "Authorization header missing".to_string(),
            AuthError::MalformedHeader => {
                "Authorization header missing or malformed".to_string()
            }
            AuthError::InvalidToken(msg) => msg,
        };

        let body = Json(json!({
            "error": "unauthorized",
            "message": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Bearer token authentication middleware
///
/// On success the request continues with an [`AuthUser`] extension; on any
/// failure the request is answered with 401 before reaching the handler.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken("Invalid or expired token".to_string()),
    })?;

    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}

/// Creates a bearer-auth middleware closure capturing the signing secret
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use taskforge_shared::auth::middleware::create_jwt_middleware;
///
/// let app: Router = Router::new()
///     .route("/protected", get(|| async { "OK" }))
///     .layer(middleware::from_fn(create_jwt_middleware("secret")));
/// ```
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
