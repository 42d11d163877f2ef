//! The `{Data, Error, Status}` envelope every API endpoint answers with.

use crate::auth::{Account, AuthError};
use axum::{
    extract::rejection::BytesRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Payload carried in the envelope's `Data` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Encoded as `null`.
    None,
    Token {
        #[serde(rename = "Token")]
        token: String,
    },
    User {
        #[serde(rename = "User")]
        user: Account,
    },
    Users {
        #[serde(rename = "Users")]
        users: Vec<Account>,
    },
    /// A bare account record (signup).
    Account(Account),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    pub data: ResponseData,
    pub error: String,
    pub status: u16,
}

impl Envelope {
    pub fn ok(data: ResponseData) -> Self {
        Self {
            data,
            error: String::new(),
            status: StatusCode::OK.as_u16(),
        }
    }

    pub fn failure(err: &ApiError) -> Self {
        Self {
            data: ResponseData::None,
            error: err.to_string(),
            status: err.status().as_u16(),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        encode_or_fallback(&self, status)
    }
}

/// Failures an API handler can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("malformed request body: {0}")]
    MalformedRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("request timed out")]
    Timeout,

    #[error("json error")]
    Serialization,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Auth(AuthError::Conflict) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::WrongCredentials) => StatusCode::BAD_REQUEST,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::MalformedRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Envelope::failure(&self).into_response()
    }
}

pub type ApiResult = Result<Envelope, ApiError>;

/// Serialize `body` as JSON; if that fails, answer with the `json error` envelope instead.
fn encode_or_fallback<T: Serialize>(body: &T, status: StatusCode) -> Response {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(bytes) => (status, bytes),
        Err(e) => {
            tracing::error!("Failed to encode response: {e}");
            let fallback = Envelope::failure(&ApiError::Serialization);
            let bytes = serde_json::to_vec(&fallback).unwrap_or_else(|_| {
                br#"{"Data":null,"Error":"json error","Status":500}"#.to_vec()
            });
            (StatusCode::INTERNAL_SERVER_ERROR, bytes)
        }
    };

    (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}
