use crate::http::error::AppError;
use crate::http::state::AppState;
use axum::extract::{FromRequest, Request};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::Form;
use holdline_core::signature::{verify_signature, SIGNATURE_HEADER};
use std::collections::BTreeMap;

/// Form-encoded webhook body whose signature has been checked against the
/// configured auth token. Without a token the signature is not checked.
#[derive(Debug)]
pub struct TwilioRequest {
    pub params: BTreeMap<String, String>,
    /// `public_url` when configured, otherwise `http://{Host}`.
    pub origin: Option<String>,
}

impl TwilioRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl FromRequest<AppState> for TwilioRequest {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let origin = request_origin(&parts, state.settings.public_url.as_deref());
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|value| value.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let signature = parts
            .headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let Form(params) =
            Form::<BTreeMap<String, String>>::from_request(Request::from_parts(parts, body), state)
                .await
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        if let Some(token) = state.settings.auth_token.as_deref() {
            let signature = signature
                .ok_or_else(|| AppError::Unauthorized("missing request signature".to_string()))?;
            let url = format!("{}{}", origin.as_deref().unwrap_or_default(), path_and_query);
            if !verify_signature(token, &url, &params, &signature) {
                tracing::warn!(path = %path_and_query, "rejected webhook with bad signature");
                return Err(AppError::Unauthorized(
                    "invalid request signature".to_string(),
                ));
            }
        }

        Ok(Self { params, origin })
    }
}

fn request_origin(parts: &Parts, public_url: Option<&str>) -> Option<String> {
    if let Some(public_url) = public_url {
        return Some(public_url.to_string());
    }
    parts
        .headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(|host| format!("http://{host}"))
}
