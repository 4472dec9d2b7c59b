//! Ordered extraction rules and plausibility filters.

use regex::Regex;

/// One pattern in a field's fallback chain, tagged by capture strategy.
#[derive(Clone, Copy)]
pub enum CaptureRule<'r> {
    /// Tightly labeled pattern; group 1 is the value.
    Labeled(&'r Regex),
    /// Value delimited by a known following token.
    Delimited(&'r Regex),
    /// Loose post-marker capture, last resort.
    Generic(&'r Regex),
}

impl<'r> CaptureRule<'r> {
    fn regex(&self) -> &'r Regex {
        match *self {
            CaptureRule::Labeled(re) | CaptureRule::Delimited(re) | CaptureRule::Generic(re) => re,
        }
    }
}

/// Ordered rules for one schema field.
///
/// Evaluation stops at the first rule whose group-1 capture is non-empty
/// after trimming; later rules never override an earlier match.
pub struct RuleChain<'r> {
    rules: &'r [CaptureRule<'r>],
}

impl<'r> RuleChain<'r> {
    pub fn new(rules: &'r [CaptureRule<'r>]) -> Self {
        Self { rules }
    }

    pub fn apply(&self, text: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            rule.regex()
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }
}

/// Inclusive numeric plausibility bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Select the last candidate whose integer value lies inside `bounds`.
///
/// Stray currency-shaped numbers show up early in line-item tables; the
/// true total is normally the last plausible amount before document end.
/// Returns the winning candidate with thousands separators and cents
/// stripped.
pub fn last_in_range(candidates: &[String], bounds: Bounds) -> Option<String> {
    candidates.iter().rev().find_map(|candidate| {
        let cleaned = candidate.replace(',', "");
        let integer = cleaned.split('.').next().unwrap_or("").to_string();
        integer
            .parse::<i64>()
            .ok()
            .filter(|v| bounds.contains(*v))
            .map(|_| integer)
    })
}
