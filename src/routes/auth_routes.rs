//! Login endpoint
//!
//! - POST /api/login - Check a credential list entry and issue a JWT

use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::TokenInput;
use crate::routes::response::{error_response, json_response, parse_json_body, BoxBody};
use crate::server::AppState;
use crate::types::ReportError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/login
pub async fn handle_login<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let cors = state.cors_origin.as_str();

    let body: LoginRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(e, cors),
    };

    if body.username.is_empty() || body.password.is_empty() {
        return error_response(
            ReportError::BadRequest("Missing required fields: username, password".into()),
            cors,
        );
    }

    let role = match state.credentials.verify(&body.username, &body.password) {
        Ok(role) => role,
        Err(e) => {
            warn!("Rejected login for '{}'", body.username);
            return error_response(e, cors);
        }
    };

    match state.jwt.generate_token(TokenInput {
        username: body.username.clone(),
        role,
    }) {
        Ok(token) => {
            info!("Login: {} ({})", body.username, role);
            json_response(StatusCode::OK, &LoginResponse { token }, cors)
        }
        Err(e) => error_response(e, cors),
    }
}
