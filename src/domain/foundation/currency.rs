//! Currency helpers: code normalization, country inference and minor units.

use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Country assigned when a currency has no entry in the lookup table.
pub const FALLBACK_COUNTRY: &str = "US";

/// Issuing country (ISO-3166 alpha-2) for single-country currencies.
///
/// Multi-country currencies (EUR, XOF, XAF) map to the largest economy
/// in the currency area; EUR is left out so it falls back.
static CURRENCY_COUNTRIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Africa
        ("NGN", "NG"),
        ("KES", "KE"),
        ("GHS", "GH"),
        ("ZAR", "ZA"),
        ("UGX", "UG"),
        ("TZS", "TZ"),
        ("RWF", "RW"),
        ("XOF", "CI"),
        ("XAF", "CM"),
        ("EGP", "EG"),
        ("MAD", "MA"),
        ("ZMW", "ZM"),
        ("MWK", "MW"),
        ("ETB", "ET"),
        ("SLL", "SL"),
        ("GMD", "GM"),
        // Elsewhere
        ("USD", "US"),
        ("GBP", "GB"),
        ("CAD", "CA"),
        ("AUD", "AU"),
        ("NZD", "NZ"),
        ("CHF", "CH"),
        ("JPY", "JP"),
        ("CNY", "CN"),
        ("INR", "IN"),
        ("BRL", "BR"),
        ("MXN", "MX"),
        ("SGD", "SG"),
        ("AED", "AE"),
    ])
});

/// Upper-cases and trims a currency code.
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Infers the country for a currency code, case-insensitively.
///
/// Unknown codes (including the empty string) yield [`FALLBACK_COUNTRY`].
pub fn country_for_currency(code: &str) -> &'static str {
    CURRENCY_COUNTRIES
        .get(normalize_currency(code).as_str())
        .copied()
        .unwrap_or(FALLBACK_COUNTRY)
}

/// Number of minor-unit digits for a currency (ISO 4217 exponent).
pub fn minor_units(code: &str) -> u32 {
    match normalize_currency(code).as_str() {
        "JPY" | "KRW" | "UGX" | "RWF" | "XOF" | "XAF" | "CLP" | "VND" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
        _ => 2,
    }
}

/// Rounds an amount to the currency's precision using banker's rounding.
///
/// Amounts already within precision are returned unchanged.
pub fn round_to_minor_units(amount: Decimal, currency: &str) -> Decimal {
    let dp = minor_units(currency);
    if amount.scale() <= dp {
        return amount;
    }
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}
