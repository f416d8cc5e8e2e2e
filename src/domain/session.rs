//! Payment session domain model
//!
//! The session record is supplied by the upstream payment API and is read-only
//! here, apart from the two timestamps which are normalised to UTC instants
//! when a pending session is loaded.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The only payment state the create view can still act on
pub const PENDING_STATE: &str = "Created";

/// A session timestamp: either still in its raw wire form or parsed to an instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionTime {
    Instant(DateTime<Utc>),
    Raw(String),
}

impl SessionTime {
    /// The parsed instant, if this timestamp has been normalised successfully
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            SessionTime::Instant(at) => Some(*at),
            SessionTime::Raw(_) => None,
        }
    }

    /// Parse a raw value as UTC, leaving it raw when it cannot be parsed
    pub fn normalized_utc(&self) -> SessionTime {
        match self {
            SessionTime::Instant(at) => SessionTime::Instant(*at),
            SessionTime::Raw(raw) => match parse_utc(raw) {
                Some(at) => SessionTime::Instant(at),
                None => SessionTime::Raw(raw.clone()),
            },
        }
    }
}

/// Parse a timestamp as UTC. Values without an offset are taken to be UTC;
/// values with an offset are converted.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Blockchain network of the requested asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,

    /// Asset symbol on that network, e.g. "USDT"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Amount due, in units of the network asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAmount {
    /// Kept as raw JSON: the API may send a number or a numeric string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_network: Option<CryptoNetwork>,
}

impl CryptoAmount {
    /// The amount as a finite number, accepting numbers and numeric strings
    pub fn numeric(&self) -> Option<f64> {
        let value = match self.amount.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) if s.trim().is_empty() => 0.0,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn blockchain(&self) -> Option<&str> {
        self.crypto_network
            .as_ref()
            .and_then(|network| network.blockchain.as_deref())
            .filter(|chain| !chain.is_empty())
    }

    pub fn token(&self) -> Option<&str> {
        self.crypto_network
            .as_ref()
            .and_then(|network| network.token.as_deref())
            .filter(|token| !token.is_empty())
    }
}

/// Payment session as returned by the hosted-page API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    #[serde(default)]
    pub payment_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<SessionTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<SessionTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_wallet_address: Option<String>,

    #[serde(default)]
    pub crypto_amount: CryptoAmount,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

impl PaymentSession {
    /// Whether the create view can still collect this payment
    pub fn is_pending(&self) -> bool {
        self.payment_state.as_deref() == Some(PENDING_STATE)
    }

    /// Normalise both timestamps to UTC instants in place
    pub fn normalize_timestamps(&mut self) {
        self.created_time = self.created_time.as_ref().map(SessionTime::normalized_utc);
        self.expire_at = self.expire_at.as_ref().map(SessionTime::normalized_utc);
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_time.as_ref().and_then(SessionTime::instant)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expire_at.as_ref().and_then(SessionTime::instant)
    }

    /// Whether an expiry value was supplied at all, parsed or not
    pub fn has_expiry(&self) -> bool {
        self.expire_at.is_some()
    }

    /// A non-empty merchant return URL
    pub fn return_url(&self) -> Option<&str> {
        self.return_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.receiver_wallet_address.as_deref().filter(|addr| !addr.is_empty())
    }

    pub fn classification(&self) -> PaymentClassification {
        PaymentClassification::from_state(self.payment_state.as_deref())
    }
}

/// Normalised payment outcome used by the presentation surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentClassification {
    Paid,
    Failed,
    InProgress,
}

impl PaymentClassification {
    /// Classify a raw payment state, case-insensitively
    pub fn from_state(state: Option<&str>) -> Self {
        let Some(state) = state else {
            return PaymentClassification::InProgress;
        };

        match state.to_lowercase().as_str() {
            "paid" | "success" | "completed" => PaymentClassification::Paid,
            "failed" | "error" | "rejected" => PaymentClassification::Failed,
            _ => PaymentClassification::InProgress,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaymentClassification::Paid => "Success",
            PaymentClassification::Failed => "Failed",
            PaymentClassification::InProgress => "Processing",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PaymentClassification::Paid => "Payment Successful",
            PaymentClassification::Failed => "Payment Failed",
            PaymentClassification::InProgress => "Your payment is being processed",
        }
    }
}

/// Format an amount for display: up to 8 fraction digits, thousands
/// separators, trailing zeros trimmed. Never used for payment URIs.
pub fn format_display_amount(amount: f64) -> String {
    let fixed = format!("{:.8}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && (whole != "0" || !fraction.is_empty()) { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}
