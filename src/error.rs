use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            104 | 105 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn incomplete_selection_error() -> Error {
    Error {
        code: 102,
        message: "pickup and drop-off must both be selected".into(),
    }
}

pub fn no_route_error() -> Error {
    Error {
        code: 103,
        message: "no route found".into(),
    }
}

pub fn session_not_found_error() -> Error {
    Error {
        code: 104,
        message: "session not found".into(),
    }
}

pub fn quote_not_found_error() -> Error {
    Error {
        code: 105,
        message: "quote not found".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::debug!("reqwest error: {:?}", err);

    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

#[test]
fn client_errors_are_bad_requests() {
    let response = incomplete_selection_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = session_not_found_error().into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = quote_not_found_error().into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn infrastructure_errors_are_masked() {
    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
