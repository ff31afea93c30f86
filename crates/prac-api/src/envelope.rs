use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::ApiError;

/// Headers carried by every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Fixed response shape: status, CORS headers and a JSON-encoded body string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl Envelope {
    pub fn new(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body,
        }
    }

    /// 200 with `body` serialized as JSON.
    pub fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self::new(200, body),
            Err(e) => {
                error!(error = %e, "failed to encode response body");
                Self::error(500, "failed to encode response")
            }
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| String::from(r#"{"error":"internal error"}"#));
        Self::new(status_code, body)
    }

    /// Body-less 200, answered to CORS preflights.
    pub fn empty() -> Self {
        Self::new(200, String::new())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

impl From<ApiError> for Envelope {
    fn from(err: ApiError) -> Self {
        Envelope::error(err.status_code(), &err.to_string())
    }
}

#[cfg(feature = "http")]
mod http {
    use axum::http::{HeaderName, HeaderValue, StatusCode, header::CONTENT_TYPE};
    use axum::response::{IntoResponse, Response};

    use super::Envelope;
    use crate::error::ApiError;

    impl IntoResponse for Envelope {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let has_body = !self.body.is_empty();
            let mut response = (status, self.body).into_response();

            let headers = response.headers_mut();
            if has_body {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            for (name, value) in &self.headers {
                if let (Ok(name), Ok(value)) =
                    (HeaderName::try_from(name.as_str()), HeaderValue::from_str(value))
                {
                    headers.insert(name, value);
                }
            }
            response
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            Envelope::from(self).into_response()
        }
    }
}
