//! Checkout page handlers
//!
//! Handlers for opening, reading, confirming, cancelling and closing
//! checkout pages, plus the result and not-found pages.

use crate::{
    application::services::{CheckoutService, PageOpening},
    domain::checkout::QueryParams,
    domain::routes::Route,
    infrastructure::http::{models::ErrorResponse, responses::ResponseFormatter},
    shared::logging::LoggingUtils,
};
use std::sync::Arc;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::path::FullPath;
use warp::reply::Response;

/// Open a checkout page from `appId` and `paymentKey`
pub async fn handle_open_checkout(
    query: QueryParams,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    let response = match service.open(query).await {
        PageOpening::Redirect(navigation) => ResponseFormatter::navigation(&navigation),
        PageOpening::Opened(view) => ResponseFormatter::json(view.as_ref(), StatusCode::OK),
    };
    Ok(response)
}

/// Current view of a held page
pub async fn handle_get_page(
    page_id: Uuid,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    Ok(match service.view(page_id).await {
        Ok(view) => ResponseFormatter::json(&view, StatusCode::OK),
        Err(e) => ResponseFormatter::from_app_error(&e),
    })
}

/// Start a confirm/refresh; the outcome shows up in later views
pub async fn handle_confirm(
    page_id: Uuid,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    Ok(match service.confirm(page_id).await {
        Ok(view) => ResponseFormatter::json(&view, StatusCode::ACCEPTED),
        Err(e) => ResponseFormatter::from_app_error(&e),
    })
}

/// Cancel a held page
pub async fn handle_cancel(
    page_id: Uuid,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    Ok(match service.cancel(page_id).await {
        Ok(view) => ResponseFormatter::json(&view, StatusCode::OK),
        Err(e) => ResponseFormatter::from_app_error(&e),
    })
}

/// Tear a held page down
pub async fn handle_close(
    page_id: Uuid,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    Ok(match service.close(page_id).await {
        Ok(()) => ResponseFormatter::no_content(),
        Err(e) => ResponseFormatter::from_app_error(&e),
    })
}

/// Result page; a session that cannot be loaded is reported as not found
pub async fn handle_result(
    query: QueryParams,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    let view = service.result(&query).await;
    let status = if view.session.is_some() { StatusCode::OK } else { StatusCode::NOT_FOUND };
    Ok(ResponseFormatter::json(&view, status))
}

/// Leave the result page for the session's return URL, or go back
pub async fn handle_cancel_result(
    query: QueryParams,
    service: Arc<CheckoutService>,
) -> Result<Response, warp::reject::Rejection> {
    let navigation = service.cancel_result(&query).await;
    Ok(ResponseFormatter::navigation(&navigation))
}

/// Not-found page
pub async fn handle_not_found() -> Result<Response, warp::reject::Rejection> {
    Ok(ResponseFormatter::json(
        &ErrorResponse::new(StatusCode::NOT_FOUND.as_u16(), "Payment session not found"),
        StatusCode::NOT_FOUND,
    ))
}

/// Any other GET path is sent to the not-found page
pub async fn handle_unmatched(path: FullPath) -> Result<Response, warp::reject::Rejection> {
    LoggingUtils::log_unmatched_route(path.as_str());
    Ok(ResponseFormatter::see_other(Route::NotFound.path()))
}
