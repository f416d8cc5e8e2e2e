//! Checkout page state
//!
//! The tagged-union page state, the create/result display mode, and the two
//! identifiers every page is addressed by.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::session::PaymentSession;
use crate::shared::error::{AppError, AppResult};

pub const APP_ID_PARAM: &str = "appId";
pub const PAYMENT_KEY_PARAM: &str = "paymentKey";

/// Query parameters of the current route
pub type QueryParams = HashMap<String, String>;

/// State of one checkout page. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckoutState {
    Loading,
    Loaded { session: PaymentSession },
    Error { error: String },
}

impl CheckoutState {
    pub fn session(&self) -> Option<&PaymentSession> {
        match self {
            CheckoutState::Loaded { session } => Some(session),
            CheckoutState::Loading | CheckoutState::Error { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CheckoutState::Loaded { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            CheckoutState::Loading => "loading",
            CheckoutState::Loaded { .. } => "loaded",
            CheckoutState::Error { .. } => "error",
        }
    }
}

/// Whether the page collects a payment or summarises a resolved one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Create,
    Result,
}

impl DisplayMode {
    pub fn title(&self) -> &'static str {
        match self {
            DisplayMode::Create => "Pay with Crypto",
            DisplayMode::Result => "Payment Result",
        }
    }
}

/// The `(appId, paymentKey)` pair addressing a payment session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutIdentifiers {
    pub app_id: i64,
    pub payment_key: String,
}

impl CheckoutIdentifiers {
    pub fn new(app_id: i64, payment_key: impl Into<String>) -> Self {
        Self { app_id, payment_key: payment_key.into() }
    }

    /// Read both identifiers from query parameters. Absent or empty values
    /// are a parameter error, as is an `appId` that is not an integer.
    pub fn from_query(query: &QueryParams) -> AppResult<Self> {
        let app_id = non_empty(query, APP_ID_PARAM);
        let payment_key = non_empty(query, PAYMENT_KEY_PARAM);

        let (Some(app_id), Some(payment_key)) = (app_id, payment_key) else {
            return Err(AppError::MissingParameters(
                "Required query parameters \"appId\" or \"paymentKey\" are missing.".to_string(),
            ));
        };

        let app_id = app_id
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::MissingParameters(format!("\"appId\" is not numeric: {}", app_id)))?;

        Ok(Self::new(app_id, payment_key))
    }

    /// The identifiers as query parameters, in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (APP_ID_PARAM, self.app_id.to_string()),
            (PAYMENT_KEY_PARAM, self.payment_key.clone()),
        ]
    }
}

fn non_empty<'a>(query: &'a QueryParams, key: &str) -> Option<&'a str> {
    query
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
