//! HTTP responses module
//!
//! This module contains HTTP response formatting and rejection handling.

use crate::{
    domain::routes::Navigation,
    infrastructure::http::models::{ErrorResponse, NavigationResponse},
    middleware::security_headers::{create_json_response_with_security_headers, with_security_headers},
    shared::error::AppError,
};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{error, warn};
use warp::http::header::{HeaderValue, LOCATION};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

/// Response formatter for HTTP responses
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Format a JSON body with the given status
    pub fn json<T: Serialize>(body: &T, status: StatusCode) -> Response {
        create_json_response_with_security_headers(body, status)
    }

    /// Empty `204 No Content`
    pub fn no_content() -> Response {
        with_security_headers(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT))
    }

    /// `303 See Other` to `location`
    pub fn see_other(location: &str) -> Response {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                let mut response = warp::reply::with_status(warp::reply(), StatusCode::SEE_OTHER).into_response();
                response.headers_mut().insert(LOCATION, value);
                with_security_headers(response)
            }
            Err(e) => {
                warn!(location = %location, error = %e, "Redirect target is not a valid header value");
                Self::from_app_error(&AppError::Internal("Invalid redirect location".to_string()))
            }
        }
    }

    /// Turn a page navigation into a redirect, or a JSON body when it has
    /// no fixed target (going back is up to the browser)
    pub fn navigation(navigation: &Navigation) -> Response {
        match navigation.location() {
            Some(location) => Self::see_other(&location),
            None => Self::json(
                &NavigationResponse { navigation: navigation.clone() },
                StatusCode::OK,
            ),
        }
    }

    /// Format an application error as a JSON error response
    pub fn from_app_error(error: &AppError) -> Response {
        Self::json(&ErrorResponse::from(error), error.http_status_code())
    }

    /// Convert rejections into JSON error responses
    pub async fn handle_rejection(err: warp::Rejection) -> Result<Response, Infallible> {
        if let Some(app_error) = err.find::<AppError>() {
            return Ok(Self::from_app_error(app_error));
        }

        let (status, message) = if err.is_not_found() {
            (StatusCode::NOT_FOUND, "Not found")
        } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
            (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
        } else if err.find::<warp::reject::InvalidQuery>().is_some() {
            (StatusCode::BAD_REQUEST, "Invalid query string")
        } else {
            error!(rejection = ?err, "Unhandled rejection");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        };

        Ok(Self::json(&ErrorResponse::new(status.as_u16(), message), status))
    }
}
