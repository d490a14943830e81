//! Progressive bracket calculation.
//!
//! This module walks the fixed personal income tax schedule. Each bracket
//! carries its own label so the breakdown rows can never drift out of line
//! with the arithmetic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::BracketLevel;

/// One band of the progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Label reported in the breakdown.
    pub label: &'static str,
    /// Taxable income at which this bracket starts.
    pub lower_bound: Decimal,
    /// Width of the band, `None` for the open-ended top bracket.
    pub width: Option<Decimal>,
    /// Marginal rate applied to income inside the band.
    pub rate: Decimal,
}

impl Bracket {
    /// The most tax this bracket can contribute, `None` when unbounded.
    pub fn max_tax(&self) -> Option<Decimal> {
        self.width.map(|width| width * self.rate)
    }
}

/// The personal income tax schedule, lowest bracket first.
pub const BRACKETS: [Bracket; 5] = [
    Bracket {
        label: "0-150,000",
        lower_bound: dec!(0),
        width: Some(dec!(150000)),
        rate: dec!(0),
    },
    Bracket {
        label: "150,001-500,000",
        lower_bound: dec!(150000),
        width: Some(dec!(350000)),
        rate: dec!(0.10),
    },
    Bracket {
        label: "500,001-1,000,000",
        lower_bound: dec!(500000),
        width: Some(dec!(500000)),
        rate: dec!(0.15),
    },
    Bracket {
        label: "1,000,001-2,000,000",
        lower_bound: dec!(1000000),
        width: Some(dec!(1000000)),
        rate: dec!(0.20),
    },
    Bracket {
        label: "2,000,001 ขึ้นไป",
        lower_bound: dec!(2000000),
        width: None,
        rate: dec!(0.35),
    },
];

/// Tax on a taxable base before withholding, with its breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTax {
    /// Sum of the tax across every bracket.
    pub total: Decimal,
    /// One row per bracket in schedule order.
    pub levels: Vec<BracketLevel>,
}

/// Walks the schedule for `taxable_base`.
///
/// A negative base is treated as zero. The breakdown always has one row per
/// bracket; brackets the base never reaches report zero.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::tax_on;
/// use rust_decimal_macros::dec;
///
/// let result = tax_on(dec!(440000));
/// assert_eq!(result.total, dec!(29000));
/// assert_eq!(result.levels[1].tax, dec!(29000));
/// ```
pub fn tax_on(taxable_base: Decimal) -> BracketTax {
    let mut remaining = taxable_base.max(Decimal::ZERO);
    let mut total = Decimal::ZERO;
    let mut levels = Vec::with_capacity(BRACKETS.len());

    for bracket in &BRACKETS {
        let slice = match bracket.width {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        let tax = slice * bracket.rate;
        remaining -= slice;
        total += tax;
        levels.push(BracketLevel {
            level: bracket.label.to_string(),
            tax,
        });
    }

    BracketTax { total, levels }
}

/// Rebuilds the breakdown from a pre-withholding tax total.
///
/// Fills each bracket up to its maximum tax in order, the top bracket
/// taking whatever is left. For any `total` produced by [`tax_on`] this
/// yields the same rows as walking the base directly. Only valid while
/// withholding is subtracted once from the grand total.
pub fn levels_from_total(total_tax: Decimal) -> Vec<BracketLevel> {
    let mut remaining = total_tax.max(Decimal::ZERO);

    BRACKETS
        .iter()
        .map(|bracket| {
            let share = match bracket.max_tax() {
                Some(max_tax) => remaining.min(max_tax),
                None => remaining,
            };
            remaining -= share;
            BracketLevel {
                level: bracket.label.to_string(),
                tax: share,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level_taxes(levels: &[BracketLevel]) -> Vec<Decimal> {
        levels.iter().map(|l| l.tax).collect()
    }

    #[test]
    fn test_brackets_are_contiguous() {
        for pair in BRACKETS.windows(2) {
            let width = pair[0].width.expect("only the last bracket is open-ended");
            assert_eq!(pair[0].lower_bound + width, pair[1].lower_bound);
        }
        assert!(BRACKETS[BRACKETS.len() - 1].width.is_none());
    }

    #[test]
    fn test_zero_base_has_no_tax() {
        let result = tax_on(dec!(0));

        assert_eq!(result.total, dec!(0));
        assert_eq!(result.levels.len(), 5);
        assert!(result.levels.iter().all(|l| l.tax.is_zero()));
    }

    #[test]
    fn test_negative_base_is_treated_as_zero() {
        assert_eq!(tax_on(dec!(-25000)).total, dec!(0));
    }

    #[test]
    fn test_base_at_first_threshold_has_no_tax() {
        assert_eq!(tax_on(dec!(150000)).total, dec!(0));
    }

    #[test]
    fn test_one_baht_over_first_threshold() {
        let result = tax_on(dec!(150001));

        assert_eq!(result.total, dec!(0.1));
        assert_eq!(result.levels[1].tax, dec!(0.1));
    }

    #[test]
    fn test_second_bracket_full() {
        let result = tax_on(dec!(500000));

        assert_eq!(result.total, dec!(35000));
        assert_eq!(
            level_taxes(&result.levels),
            vec![dec!(0), dec!(35000), dec!(0), dec!(0), dec!(0)]
        );
    }

    #[test]
    fn test_third_bracket_partial() {
        // 35,000 + 100,000 * 15%
        let result = tax_on(dec!(600000));

        assert_eq!(result.total, dec!(50000));
        assert_eq!(result.levels[2].tax, dec!(15000));
    }

    #[test]
    fn test_top_bracket_is_unbounded() {
        // 35,000 + 75,000 + 200,000 + 1,000,000 * 35%
        let result = tax_on(dec!(3000000));

        assert_eq!(result.total, dec!(660000));
        assert_eq!(
            level_taxes(&result.levels),
            vec![dec!(0), dec!(35000), dec!(75000), dec!(200000), dec!(350000)]
        );
    }

    #[test]
    fn test_labels_follow_schedule_order() {
        let labels: Vec<String> = tax_on(dec!(1)).levels.into_iter().map(|l| l.level).collect();

        assert_eq!(
            labels,
            vec![
                "0-150,000",
                "150,001-500,000",
                "500,001-1,000,000",
                "1,000,001-2,000,000",
                "2,000,001 ขึ้นไป",
            ]
        );
    }

    #[test]
    fn test_levels_from_total_fills_brackets_in_order() {
        let levels = levels_from_total(dec!(120000));

        assert_eq!(
            level_taxes(&levels),
            vec![dec!(0), dec!(35000), dec!(75000), dec!(10000), dec!(0)]
        );
    }

    #[test]
    fn test_levels_from_total_overflows_into_top_bracket() {
        let levels = levels_from_total(dec!(320000));

        assert_eq!(levels[3].tax, dec!(200000));
        assert_eq!(levels[4].tax, dec!(10000));
    }

    #[test]
    fn test_max_tax_per_bracket() {
        let max: Vec<Option<Decimal>> = BRACKETS.iter().map(Bracket::max_tax).collect();

        assert_eq!(
            max,
            vec![
                Some(dec!(0)),
                Some(dec!(35000)),
                Some(dec!(75000)),
                Some(dec!(200000)),
                None
            ]
        );
    }

    fn money() -> impl Strategy<Value = Decimal> {
        (0i64..500_000_000).prop_map(|satang| Decimal::new(satang, 2))
    }

    proptest! {
        #[test]
        fn prop_tax_is_monotonic(a in money(), b in money()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tax_on(low).total <= tax_on(high).total);
        }

        #[test]
        fn prop_levels_sum_to_total(base in money()) {
            let result = tax_on(base);
            let sum: Decimal = result.levels.iter().map(|l| l.tax).sum();
            prop_assert_eq!(sum, result.total);
            prop_assert!(result.levels[0].tax.is_zero());
        }

        #[test]
        fn prop_reconstruction_matches_walk(base in money()) {
            let result = tax_on(base);
            prop_assert_eq!(
                level_taxes(&levels_from_total(result.total)),
                level_taxes(&result.levels)
            );
        }
    }
}
