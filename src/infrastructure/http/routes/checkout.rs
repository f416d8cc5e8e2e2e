//! Checkout routes module
//!
//! Page routes of the hosted checkout: the create view and its page
//! actions, the result view, not-found, and the unmatched-path fallback.

use crate::{
    application::services::CheckoutService,
    config::AppConfig,
    domain::checkout::QueryParams,
    infrastructure::http::{
        handlers::{
            handle_cancel, handle_cancel_result, handle_close, handle_confirm, handle_get_page, handle_not_found, handle_open_checkout,
            handle_result, handle_unmatched,
        },
        utils::{with_body_limit, with_checkout_service},
    },
};
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;

/// Checkout routes configuration
pub struct CheckoutRoutes;

impl CheckoutRoutes {
    /// `GET /checkout?appId&paymentKey`
    pub fn create_open_route(
        service: Arc<CheckoutService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("checkout")
            .and(warp::get())
            .and(warp::query::<QueryParams>())
            .and(with_checkout_service(service))
            .and_then(handle_open_checkout)
    }

    /// `GET` and `DELETE /checkout/pages/{pageId}`
    pub fn create_page_route(
        service: Arc<CheckoutService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let view = warp::path!("checkout" / "pages" / Uuid)
            .and(warp::get())
            .and(with_checkout_service(service.clone()))
            .and_then(handle_get_page);

        let close = warp::path!("checkout" / "pages" / Uuid)
            .and(warp::delete())
            .and(with_checkout_service(service))
            .and_then(handle_close);

        view.or(close)
    }

    /// `POST /checkout/pages/{pageId}/confirm` and `/cancel`
    pub fn create_action_routes(
        config: &AppConfig,
        service: Arc<CheckoutService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let limit = config.server.max_request_size as u64;

        let confirm = warp::path!("checkout" / "pages" / Uuid / "confirm")
            .and(warp::post())
            .and(with_body_limit(limit))
            .and(with_checkout_service(service.clone()))
            .and_then(handle_confirm);

        let cancel = warp::path!("checkout" / "pages" / Uuid / "cancel")
            .and(warp::post())
            .and(with_body_limit(limit))
            .and(with_checkout_service(service))
            .and_then(handle_cancel);

        confirm.or(cancel)
    }

    /// `GET /result?appId&paymentKey`
    pub fn create_result_route(
        service: Arc<CheckoutService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("result")
            .and(warp::get())
            .and(warp::query::<QueryParams>())
            .and(with_checkout_service(service))
            .and_then(handle_result)
    }

    /// `POST /result/cancel?appId&paymentKey`
    pub fn create_result_cancel_route(
        config: &AppConfig,
        service: Arc<CheckoutService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("result" / "cancel")
            .and(warp::post())
            .and(with_body_limit(config.server.max_request_size as u64))
            .and(warp::query::<QueryParams>())
            .and(with_checkout_service(service))
            .and_then(handle_cancel_result)
    }

    /// `GET /not-found`
    pub fn create_not_found_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("not-found").and(warp::get()).and_then(handle_not_found)
    }

    /// Any other `GET` is redirected to `/not-found`. Must be mounted last.
    pub fn create_fallback_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::get().and(warp::path::full()).and_then(handle_unmatched)
    }
}
