use axum::response::{IntoResponse, Response};
use http::{header::LOCATION, HeaderValue, StatusCode};

use crate::{config::MissingObjectPolicy, error::RedirectError};

/// Transport-independent outcome of a redirect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl RedirectResponse {
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FOUND,
            location: Some(location.into()),
            body: String::new(),
        }
    }

    fn error(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: body.into(),
        }
    }

    pub fn from_result(result: Result<String, RedirectError>, policy: MissingObjectPolicy) -> Self {
        match result {
            Ok(url) => Self::found(url),
            Err(err) => Self::from_error(err, policy),
        }
    }

    pub fn from_error(err: RedirectError, policy: MissingObjectPolicy) -> Self {
        match err {
            RedirectError::NoMatchingObject { prefix } => match policy {
                MissingObjectPolicy::EmptyRedirect => {
                    tracing::warn!("No report under {}, redirecting nowhere.", prefix);
                    Self::found("")
                }
                MissingObjectPolicy::NotFound => {
                    tracing::info!("No report under {}.", prefix);
                    Self::error(StatusCode::NOT_FOUND, "not found")
                }
            },
            err @ (RedirectError::MalformedPath { .. } | RedirectError::MissingParameter(_)) => {
                tracing::info!("Rejecting request: {}", err);
                Self::error(StatusCode::BAD_REQUEST, err.to_string())
            }
            RedirectError::Storage(err) => {
                tracing::error!("Object storage call failed: {:?}", err);
                Self::error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }

    pub fn into_lambda(self) -> Result<lambda_http::Response<lambda_http::Body>, lambda_http::Error> {
        let mut builder = lambda_http::Response::builder().status(self.status);

        if let Some(location) = &self.location {
            let Some(value) = location_header(location) else {
                return Ok(lambda_http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(lambda_http::Body::Empty)
                    .map_err(Box::new)?);
            };

            builder = builder.header(LOCATION, value);
        }

        let body = if self.body.is_empty() {
            lambda_http::Body::Empty
        } else {
            self.body.into()
        };

        Ok(builder.body(body).map_err(Box::new)?)
    }
}

impl IntoResponse for RedirectResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();

        if let Some(location) = self.location {
            let Some(value) = location_header(&location) else {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            };

            response.headers_mut().insert(LOCATION, value);
        }

        response
    }
}

fn location_header(location: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(location) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::error!("Signed url is not a valid header value: {:?}", location);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_success_is_found() {
        let response = RedirectResponse::from_result(
            Ok("https://b.example.com/k".to_owned()),
            MissingObjectPolicy::EmptyRedirect,
        );

        assert_eq!(response, RedirectResponse::found("https://b.example.com/k"));
        assert_eq!(response.status, StatusCode::FOUND);
    }

    #[test]
    fn test_no_match_redirects_to_empty_location_by_default() {
        let response = RedirectResponse::from_error(
            RedirectError::NoMatchingObject {
                prefix: "t1/".to_owned(),
            },
            MissingObjectPolicy::EmptyRedirect,
        );

        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.location.as_deref(), Some(""));
    }

    #[test]
    fn test_no_match_can_be_not_found() {
        let response = RedirectResponse::from_error(
            RedirectError::NoMatchingObject {
                prefix: "t1/".to_owned(),
            },
            MissingObjectPolicy::NotFound,
        );

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.location, None);
    }

    #[test]
    fn test_bad_requests() {
        for err in [
            RedirectError::MalformedPath {
                path: "/b".to_owned(),
            },
            RedirectError::MissingParameter("testId"),
        ] {
            let response = RedirectResponse::from_error(err, MissingObjectPolicy::NotFound);
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_storage_failure_hides_details() {
        let response = RedirectResponse::from_error(
            StorageError::Unavailable("secret detail".to_owned()).into(),
            MissingObjectPolicy::EmptyRedirect,
        );

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.body.contains("secret detail"));
    }

    #[test]
    fn test_into_lambda() {
        let response = RedirectResponse::found("").into_lambda().unwrap();

        assert_eq!(response.status(), 302);
        assert_eq!(response.headers()[LOCATION], "");
        assert!(matches!(response.body(), lambda_http::Body::Empty));
    }

    #[test]
    fn test_invalid_location_is_server_error() {
        let lambda = RedirectResponse::found("https://b.example.com/k\r\nX-Injected: 1")
            .into_lambda()
            .unwrap();

        assert_eq!(lambda.status(), 500);
        assert!(lambda.headers().get(LOCATION).is_none());

        let local = RedirectResponse::found("https://b.example.com/k\r\nX-Injected: 1").into_response();

        assert_eq!(local.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(local.headers().get(LOCATION).is_none());
    }

    #[test]
    fn test_into_axum_response() {
        let response = RedirectResponse::found("https://b.example.com/k?X-Amz-Expires=3600")
            .into_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://b.example.com/k?X-Amz-Expires=3600"
        );
    }
}
