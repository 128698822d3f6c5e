//! Book percentage calculation
//!
//! Pure functions over a runner list; no I/O and no shared state, safe to
//! call from anywhere.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{BookMetric, PriceKind};
use crate::market::RunnerQuote;

/// Sum of implied probabilities over the runners whose selected price is a
/// valid quote.
///
/// A price is valid when it is present and above 1.0 (decimal-odds
/// convention); absent quotes and invalid quotes are both skipped, without
/// being collapsed into a shared sentinel upstream. The result is the
/// running total when at least one valid price was seen, else exactly zero.
///
/// A zero result is therefore ambiguous between "no valid prices" and a
/// vanishingly over-priced book. That matches the observed behaviour and is
/// kept as-is; callers needing the distinction must count valid quotes
/// themselves.
pub fn compute_book_percentage<F>(runners: &[RunnerQuote], select_price: F) -> Decimal
where
    F: Fn(&RunnerQuote) -> Option<Decimal>,
{
    let mut total = Decimal::ZERO;
    let mut valid_prices = 0u32;

    for runner in runners {
        if let Some(price) = select_price(runner) {
            if price > Decimal::ONE {
                total += dec!(100) / price;
                valid_prices += 1;
            }
        }
    }

    if valid_prices > 0 {
        total
    } else {
        Decimal::ZERO
    }
}

/// The three per-fetch metrics, one per price kind, each an independent
/// pass over the same runner set.
pub fn book_metrics(runners: &[RunnerQuote]) -> [BookMetric; 3] {
    [
        BookMetric::new(
            PriceKind::Back,
            compute_book_percentage(runners, |r| r.back_price),
        ),
        BookMetric::new(
            PriceKind::Lay,
            compute_book_percentage(runners, |r| r.lay_price),
        ),
        BookMetric::new(
            PriceKind::LastTraded,
            compute_book_percentage(runners, |r| r.last_price_traded),
        ),
    ]
}
