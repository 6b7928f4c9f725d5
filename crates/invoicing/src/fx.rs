//! EUR normalization of monetary amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use corrpay_core::{DomainError, DomainResult};

/// Settlement currency; identity conversion.
pub const EUR: &str = "EUR";

/// Result of resolving an amount to EUR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxResolution {
    pub exchange_rate_to_eur: Decimal,
    pub amount_eur: Decimal,
}

/// Convert an amount in `currency` to EUR using a caller-supplied rate.
///
/// - EUR: the rate is pinned to 1 regardless of any supplied value;
///   `amount_eur` is the amount rounded to 2 decimals.
/// - Other currencies: the rate must be present and strictly positive, else
///   `MissingExchangeRate`; `amount_eur = round(amount × rate, 2)`.
///
/// Rounding is deterministic: 2 decimal places, midpoint away from zero
/// (half-up), matching currency formatting conventions — 120.456 → 120.46.
pub fn resolve(
    currency: &str,
    amount: Decimal,
    exchange_rate_to_eur: Option<Decimal>,
) -> DomainResult<FxResolution> {
    if currency == EUR {
        return Ok(FxResolution {
            exchange_rate_to_eur: Decimal::ONE,
            amount_eur: round_eur(amount),
        });
    }

    let rate = match exchange_rate_to_eur {
        Some(r) if r > Decimal::ZERO => r,
        _ => return Err(DomainError::missing_rate(currency)),
    };

    Ok(FxResolution {
        exchange_rate_to_eur: rate,
        amount_eur: round_eur(amount * rate),
    })
}

fn round_eur(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
