//! HTTP middleware

pub mod security_headers;
