//! Ranked half-open ranges mapping a numeric value onto a severity tier.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, value};
use nom::number::complete::double;
use nom::sequence::{delimited, separated_pair};
use nom::{IResult, Parser};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::SeverityTier;

/// One `[lower, upper)` band of a severity table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityRange {
    pub tier: SeverityTier,
    pub lower: f64,
    pub upper: f64,
}

impl SeverityRange {
    pub fn new(tier: SeverityTier, lower: f64, upper: f64) -> Self {
        Self { tier, lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value < self.upper
    }
}

fn bound(i: &str) -> IResult<&str, f64> {
    delimited(
        multispace0,
        alt((
            value(f64::INFINITY, alt((tag("infinity"), tag("inf")))),
            value(f64::NEG_INFINITY, alt((tag("-infinity"), tag("-inf")))),
            double,
        )),
        multispace0,
    )
    .parse(i)
}

/// Parse a range written as `"[lower, upper)"`
pub fn parse_range(input: &str) -> Result<(f64, f64), String> {
    let parsed = all_consuming(delimited(
        (multispace0, char('[')),
        separated_pair(bound, char(','), bound),
        (char(')'), multispace0),
    ))
    .parse(input);

    match parsed {
        Ok((_, (lower, upper))) => Ok((lower, upper)),
        Err(e) => Err(format!("unparseable range '{}': {}", input, e)),
    }
}

/// Severity ranges sorted ascending by lower bound
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityTable {
    ranges: Vec<SeverityRange>,
}

impl SeverityTable {
    /// Build a table, checking that ranges are well formed, disjoint, and
    /// that tiers ascend with their bounds
    pub fn new(mut ranges: Vec<SeverityRange>) -> Result<Self, String> {
        for range in &ranges {
            if !(range.lower < range.upper) {
                return Err(format!(
                    "{:?} range [{}, {}) is empty or not numeric",
                    range.tier, range.lower, range.upper
                ));
            }
        }

        ranges.sort_by_key(|r| OrderedFloat(r.lower));

        for pair in ranges.windows(2) {
            let (below, above) = (&pair[0], &pair[1]);
            if below.tier == above.tier {
                return Err(format!("{:?} is defined more than once", below.tier));
            }
            if below.upper > above.lower {
                return Err(format!(
                    "{:?} [{}, {}) overlaps {:?} [{}, {})",
                    below.tier, below.lower, below.upper, above.tier, above.lower, above.upper
                ));
            }
            if below.tier > above.tier {
                return Err(format!(
                    "{:?} sits above {:?} but is a lesser tier",
                    above.tier, below.tier
                ));
            }
        }

        Ok(Self { ranges })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[SeverityRange] {
        &self.ranges
    }

    /// Classify a value.
    ///
    /// Values below the lowest range clamp to the lowest tier; values in a
    /// gap or above the highest range belong to the nearest range below.
    pub fn classify(&self, value: f64) -> SeverityTier {
        debug_assert!(!value.is_nan(), "severity of NaN requested");
        let Some(first) = self.ranges.first() else {
            return SeverityTier::None;
        };
        self.ranges
            .iter()
            .rev()
            .find(|r| r.lower <= value)
            .unwrap_or(first)
            .tier
    }

    pub fn range_of(&self, tier: SeverityTier) -> Option<&SeverityRange> {
        self.ranges.iter().find(|r| r.tier == tier)
    }

    /// Lower bound of a tier
    pub fn floor(&self, tier: SeverityTier) -> Option<f64> {
        self.range_of(tier).map(|r| r.lower)
    }

    /// Upper bound of a tier
    pub fn ceiling(&self, tier: SeverityTier) -> Option<f64> {
        self.range_of(tier).map(|r| r.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SeverityTable {
        SeverityTable::new(vec![
            SeverityRange::new(SeverityTier::Minor, 3.0, 5.0),
            SeverityRange::new(SeverityTier::None, 0.0, 1.0),
            SeverityRange::new(SeverityTier::Superficial, 1.0, 3.0),
            SeverityRange::new(SeverityTier::Severe, 8.0, 12.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_ranges_sorted_on_build() {
        let tiers: Vec<_> = table().ranges().iter().map(|r| r.tier).collect();
        assert_eq!(
            tiers,
            vec![
                SeverityTier::None,
                SeverityTier::Superficial,
                SeverityTier::Minor,
                SeverityTier::Severe
            ]
        );
    }

    #[test]
    fn test_half_open_bounds() {
        let t = table();
        assert_eq!(t.classify(1.0), SeverityTier::Superficial);
        assert_eq!(t.classify(0.999), SeverityTier::None);
        assert_eq!(t.classify(3.0), SeverityTier::Minor);
    }

    #[test]
    fn test_clamps_outside_table() {
        let t = table();
        assert_eq!(t.classify(-10.0), SeverityTier::None);
        assert_eq!(t.classify(1e9), SeverityTier::Severe);
        assert_eq!(t.classify(12.0), SeverityTier::Severe);
    }

    #[test]
    fn test_gap_belongs_to_range_below() {
        assert_eq!(table().classify(6.0), SeverityTier::Minor);
    }

    #[test]
    fn test_overlap_rejected() {
        let err = SeverityTable::new(vec![
            SeverityRange::new(SeverityTier::None, 0.0, 2.0),
            SeverityRange::new(SeverityTier::Minor, 1.0, 3.0),
        ])
        .unwrap_err();
        assert!(err.contains("overlaps"));
    }

    #[test]
    fn test_descending_tiers_rejected() {
        assert!(SeverityTable::new(vec![
            SeverityRange::new(SeverityTier::Severe, 0.0, 2.0),
            SeverityRange::new(SeverityTier::Minor, 2.0, 3.0),
        ])
        .is_err());
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(
            SeverityTable::new(vec![SeverityRange::new(SeverityTier::None, 2.0, 2.0)]).is_err()
        );
    }

    #[test]
    fn test_empty_table_is_none() {
        assert_eq!(SeverityTable::empty().classify(50.0), SeverityTier::None);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("[0, 1.5)").unwrap(), (0.0, 1.5));
        assert_eq!(parse_range(" [ 35 , inf ) ").unwrap(), (35.0, f64::INFINITY));
        assert!(parse_range("0..1").is_err());
        assert!(parse_range("[0, 1]").is_err());
    }

    #[test]
    fn test_parse_range_spelled_out_infinity() {
        assert_eq!(
            parse_range("[35, infinity)").unwrap(),
            (35.0, f64::INFINITY)
        );
        assert_eq!(
            parse_range("[-infinity, 0)").unwrap(),
            (f64::NEG_INFINITY, 0.0)
        );
        assert!(parse_range("[35, infinite)").is_err());
    }
}
