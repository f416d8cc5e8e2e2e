//! Health check handler module

use crate::{
    application::{services::CheckoutService, use_cases::HealthCheckUseCase},
    config::AppConfig,
    infrastructure::http::responses::ResponseFormatter,
};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;

/// Handle health check requests
pub async fn handle_health_request(
    health_use_case: Arc<HealthCheckUseCase>,
    config: AppConfig,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    let health_response = match health_use_case.execute(&config, Some(service)).await {
        Ok(response) => response,
        Err(e) => return Ok(ResponseFormatter::from_app_error(&e)),
    };

    let status = StatusCode::from_u16(health_response.http_status_code()).unwrap_or(StatusCode::OK);
    Ok(ResponseFormatter::json(&health_response, status))
}
