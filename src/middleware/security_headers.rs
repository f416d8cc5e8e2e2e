//! Security headers applied to every checkout response
//!
//! Checkout pages carry payment addresses and amounts, so responses must not
//! be cached, framed, or sniffed.

use warp::http::header::{HeaderName, HeaderValue};
use warp::reply::Response;
use warp::Reply;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "no-referrer"),
    ("cache-control", "no-store"),
    ("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
];

/// Add the standard security headers to any reply
pub fn with_security_headers(reply: impl Reply) -> Response {
    let mut response = reply.into_response();
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

/// Serialize `body` as JSON with the given status and security headers
pub fn create_json_response_with_security_headers<T: serde::Serialize>(
    body: &T,
    status: warp::http::StatusCode,
) -> Response {
    with_security_headers(warp::reply::with_status(warp::reply::json(body), status))
}
