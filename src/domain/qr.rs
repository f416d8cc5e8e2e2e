//! Wallet payment URI for the checkout QR code

use crate::domain::session::PaymentSession;

/// Build `<chain>:<address>?amount=<amount>` for a session.
///
/// Falls back to the bare receiving address (or an empty string) when any
/// input is missing or the amount is not a finite number, so the rest of the
/// page can always render.
pub fn payment_uri(session: &PaymentSession) -> String {
    let Some(address) = session.wallet_address() else {
        return String::new();
    };

    let scheme = session.crypto_amount.blockchain().map(str::to_lowercase);
    let amount = session.crypto_amount.numeric();

    match (scheme, amount) {
        (Some(scheme), Some(amount)) => {
            format!("{}:{}?amount={}", scheme, address, plain_decimal(amount))
        }
        _ => address.to_string(),
    }
}

/// Plain numeric-to-string conversion: no grouping, no fixed precision.
fn plain_decimal(amount: f64) -> String {
    // Avoid rendering negative zero as "-0"
    if amount == 0.0 {
        return "0".to_string();
    }
    amount.to_string()
}
