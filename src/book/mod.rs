//! Book percentage metrics
//!
//! A market's book percentage is the sum of implied probabilities
//! (100 / decimal odds) across its runners. A balanced book sums to roughly
//! 100%; the health tiers flag how far the quoted prices drift from that.

mod calculator;

pub use calculator::{book_metrics, compute_book_percentage};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Which quoted price a metric is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceKind {
    Back,
    Lay,
    LastTraded,
}

impl PriceKind {
    /// Display label for the metric row.
    pub fn label(&self) -> &'static str {
        match self {
            PriceKind::Back => "Back book",
            PriceKind::Lay => "Lay book",
            PriceKind::LastTraded => "Last traded book",
        }
    }
}

/// Health tier for a book percentage.
///
/// Bands: `> 120` severe, `(105, 120]` elevated, `(95, 105]` healthy,
/// `<= 95` underround. The tier is the contract; the colour is only a
/// presentation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookHealth {
    Severe,
    Elevated,
    Healthy,
    Underround,
}

impl BookHealth {
    /// Classify a book percentage into its tier.
    pub fn classify(percentage: Decimal) -> Self {
        if percentage > dec!(120) {
            BookHealth::Severe
        } else if percentage > dec!(105) {
            BookHealth::Elevated
        } else if percentage > dec!(95) {
            BookHealth::Healthy
        } else {
            BookHealth::Underround
        }
    }

    /// Presentation hint for the tier.
    pub fn color_hint(&self) -> &'static str {
        match self {
            BookHealth::Severe => "red",
            BookHealth::Elevated => "orange",
            BookHealth::Healthy => "green",
            BookHealth::Underround => "blue",
        }
    }
}

/// One computed metric for a market fetch. Fully recomputed on every fetch,
/// never carried across fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetric {
    pub kind: PriceKind,
    pub percentage: Decimal,
    pub health: BookHealth,
}

impl BookMetric {
    /// Build a metric, classifying the percentage as it comes in.
    pub fn new(kind: PriceKind, percentage: Decimal) -> Self {
        Self {
            kind,
            percentage,
            health: BookHealth::classify(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_healthy_band() {
        assert_eq!(BookHealth::classify(dec!(100)), BookHealth::Healthy);
        assert_eq!(BookHealth::classify(dec!(95.0001)), BookHealth::Healthy);
    }

    #[test]
    fn test_classify_exact_boundaries() {
        // Boundaries are part of the contract: the upper edge of each band
        // belongs to the lower tier.
        assert_eq!(BookHealth::classify(dec!(95.0)), BookHealth::Healthy);
        assert_eq!(BookHealth::classify(dec!(94.9999)), BookHealth::Underround);
        assert_eq!(BookHealth::classify(dec!(105.0)), BookHealth::Healthy);
        assert_eq!(BookHealth::classify(dec!(105.0001)), BookHealth::Elevated);
        assert_eq!(BookHealth::classify(dec!(120.0)), BookHealth::Elevated);
        assert_eq!(BookHealth::classify(dec!(120.0001)), BookHealth::Severe);
    }

    #[test]
    fn test_classify_zero_is_underround() {
        assert_eq!(BookHealth::classify(Decimal::ZERO), BookHealth::Underround);
    }

    #[test]
    fn test_color_hints_are_distinct() {
        let hints = [
            BookHealth::Severe.color_hint(),
            BookHealth::Elevated.color_hint(),
            BookHealth::Healthy.color_hint(),
            BookHealth::Underround.color_hint(),
        ];
        for (i, a) in hints.iter().enumerate() {
            for b in &hints[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_metric_new_classifies() {
        let metric = BookMetric::new(PriceKind::Back, dec!(130));
        assert_eq!(metric.health, BookHealth::Severe);
        assert_eq!(metric.kind.label(), "Back book");
    }
}
