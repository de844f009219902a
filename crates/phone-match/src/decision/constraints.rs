use serde::{Deserialize, Serialize};

use super::domain::{Condition, OsFilter, PriceBook, ScreenFilter};
use super::filter::effective_price;

/// Upper bound for either budget field unless configured otherwise.
pub const DEFAULT_BUDGET_CEILING: u32 = 5000;
pub const DEFAULT_BUDGET_MIN: u32 = 250;
pub const DEFAULT_BUDGET_MAX: u32 = 1000;

/// Hard constraints. Only user input mutates these; the engine reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    #[serde(default)]
    pub os: OsFilter,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default = "default_budget_min")]
    pub budget_min: u32,
    #[serde(default = "default_budget_max")]
    pub budget_max: u32,
    #[serde(default)]
    pub screen: ScreenFilter,
    #[serde(default)]
    pub excluded_brands: BrandExclusions,
}

fn default_budget_min() -> u32 {
    DEFAULT_BUDGET_MIN
}

fn default_budget_max() -> u32 {
    DEFAULT_BUDGET_MAX
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            os: OsFilter::All,
            condition: Condition::All,
            budget_min: DEFAULT_BUDGET_MIN,
            budget_max: DEFAULT_BUDGET_MAX,
            screen: ScreenFilter::All,
            excluded_brands: BrandExclusions::default(),
        }
    }
}

impl ConstraintSet {
    /// Applies a raw edit of the minimum budget field. The result never
    /// exceeds the current maximum.
    pub fn set_budget_min(&mut self, raw: &str) {
        self.budget_min = sanitize_amount(raw).min(self.budget_max);
    }

    /// Applies a raw edit of the maximum budget field. The result stays
    /// within `[budget_min, ceiling]`.
    pub fn set_budget_max(&mut self, raw: &str, ceiling: u32) {
        let ceiling = ceiling.max(self.budget_min);
        self.budget_max = sanitize_amount(raw).clamp(self.budget_min, ceiling);
    }

    /// Clamps a constraint set received whole (API body, CLI flags) into a
    /// well-formed range. Returns `true` if anything had to change.
    pub fn normalize(&mut self, ceiling: u32) -> bool {
        let before = (self.budget_min, self.budget_max);
        self.budget_max = self.budget_max.min(ceiling);
        self.budget_min = self.budget_min.min(self.budget_max);
        before != (self.budget_min, self.budget_max)
    }

    pub fn budget_contains(&self, price: u32) -> bool {
        self.budget_min <= price && price <= self.budget_max
    }

    /// Price used for budget checks under the active condition.
    pub fn effective_price(&self, price: &PriceBook) -> Option<u32> {
        effective_price(price, self.condition)
    }
}

/// Reads the integer part of a free-form amount, dropping any character
/// that is not a digit. Empty input reads as zero; overflow saturates.
pub fn sanitize_amount(raw: &str) -> u32 {
    let integer_part = raw.split('.').next().unwrap_or_default();
    integer_part
        .chars()
        .filter_map(|ch| ch.to_digit(10))
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}

/// Case-insensitive set of excluded brands, kept in insertion order for
/// display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct BrandExclusions(Vec<String>);

impl BrandExclusions {
    /// Adds a brand. Blank input and case-insensitive duplicates are ignored.
    pub fn insert(&mut self, raw: &str) -> bool {
        let brand = raw.trim();
        if brand.is_empty() || self.contains(brand) {
            return false;
        }
        self.0.push(brand.to_string());
        true
    }

    pub fn remove(&mut self, raw: &str) -> bool {
        let wanted = raw.trim().to_lowercase();
        let before = self.0.len();
        self.0.retain(|brand| brand.to_lowercase() != wanted);
        self.0.len() != before
    }

    pub fn contains(&self, brand: &str) -> bool {
        let wanted = brand.to_lowercase();
        self.0.iter().any(|excluded| excluded.to_lowercase() == wanted)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for BrandExclusions {
    fn from(values: Vec<String>) -> Self {
        let mut exclusions = Self::default();
        for value in values {
            exclusions.insert(&value);
        }
        exclusions
    }
}

impl From<BrandExclusions> for Vec<String> {
    fn from(value: BrandExclusions) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_discards_noise_and_keeps_integer_part() {
        assert_eq!(sanitize_amount("$1,200"), 1200);
        assert_eq!(sanitize_amount(""), 0);
        assert_eq!(sanitize_amount("abc"), 0);
        assert_eq!(sanitize_amount("799.99"), 799);
        assert_eq!(sanitize_amount("99999999999999"), u32::MAX);
    }

    #[test]
    fn budget_edits_keep_range_well_formed() {
        let mut constraints = ConstraintSet::default();

        constraints.set_budget_min("2000");
        assert_eq!(constraints.budget_min, 1000);

        constraints.set_budget_max("10", DEFAULT_BUDGET_CEILING);
        assert_eq!(constraints.budget_max, 1000);

        constraints.set_budget_min("100");
        constraints.set_budget_max("9000", DEFAULT_BUDGET_CEILING);
        assert_eq!(constraints.budget_min, 100);
        assert_eq!(constraints.budget_max, DEFAULT_BUDGET_CEILING);

        constraints.set_budget_max("50", DEFAULT_BUDGET_CEILING);
        assert_eq!(constraints.budget_max, 100);
    }

    #[test]
    fn normalize_clamps_incoming_ranges() {
        let mut constraints = ConstraintSet {
            budget_min: 7000,
            budget_max: 9000,
            ..ConstraintSet::default()
        };
        assert!(constraints.normalize(DEFAULT_BUDGET_CEILING));
        assert_eq!(constraints.budget_min, DEFAULT_BUDGET_CEILING);
        assert_eq!(constraints.budget_max, DEFAULT_BUDGET_CEILING);

        let mut sane = ConstraintSet::default();
        assert!(!sane.normalize(DEFAULT_BUDGET_CEILING));
    }

    #[test]
    fn brand_exclusions_are_case_insensitive_and_deduplicated() {
        let mut brands = BrandExclusions::default();
        assert!(brands.insert(" Samsung "));
        assert!(!brands.insert("samsung"));
        assert!(!brands.insert("   "));
        assert!(brands.contains("SAMSUNG"));
        assert!(brands.remove("SaMsUnG"));
        assert!(brands.is_empty());
    }

    #[test]
    fn constraint_set_deserializes_with_defaults() {
        let parsed: ConstraintSet =
            serde_json::from_str(r#"{"os":"iOS","excluded_brands":["Apple","apple"]}"#)
                .expect("constraints parse");
        assert_eq!(parsed.os, OsFilter::Ios);
        assert_eq!(parsed.condition, Condition::All);
        assert_eq!(parsed.budget_min, DEFAULT_BUDGET_MIN);
        assert_eq!(parsed.budget_max, DEFAULT_BUDGET_MAX);
        assert_eq!(parsed.excluded_brands.iter().count(), 1);
    }
}
