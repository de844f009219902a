use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::domain::{SubFactor, TraitKey};
use super::{round_half_up, DecisionError};

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 10;

/// Number of dials presented as top priorities.
pub const PRIORITY_DIALS: usize = 5;

fn clamp_weight(value: i64) -> u8 {
    value.clamp(i64::from(MIN_WEIGHT), i64::from(MAX_WEIGHT)) as u8
}

/// Base importance per trait, each in `[1, 10]`.
///
/// Deserializes from a partial map: traits not named keep their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<TraitKey, i64>",
    into = "BTreeMap<TraitKey, u8>"
)]
pub struct WeightVector([u8; TraitKey::COUNT]);

impl WeightVector {
    /// Weights in canonical trait order; each value is clamped into range.
    pub fn from_values(values: [u8; TraitKey::COUNT]) -> Self {
        Self(values.map(|value| clamp_weight(i64::from(value))))
    }

    pub fn uniform(value: u8) -> Self {
        Self::from_values([value; TraitKey::COUNT])
    }

    pub fn get(&self, key: TraitKey) -> u8 {
        self.0[key.index()]
    }

    /// Stores a user-supplied weight, clamped to `[1, 10]`.
    pub fn set(&mut self, key: TraitKey, value: i64) {
        self.0[key.index()] = clamp_weight(value);
    }

    pub fn with(mut self, key: TraitKey, value: i64) -> Self {
        self.set(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitKey, u8)> + '_ {
        TraitKey::ordered()
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }

    /// Traits ordered for display, heaviest first. Equal weights keep
    /// canonical order.
    pub fn dial_order(&self) -> Vec<WeightDial> {
        let mut keys = TraitKey::ordered();
        keys.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        keys.into_iter()
            .enumerate()
            .map(|(position, key)| WeightDial {
                key,
                label: key.label(),
                weight: self.get(key),
                priority: position < PRIORITY_DIALS,
            })
            .collect()
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Preset::Balanced.weights()
    }
}

impl From<BTreeMap<TraitKey, i64>> for WeightVector {
    fn from(overrides: BTreeMap<TraitKey, i64>) -> Self {
        overrides
            .into_iter()
            .fold(Self::default(), |weights, (key, value)| weights.with(key, value))
    }
}

impl From<WeightVector> for BTreeMap<TraitKey, u8> {
    fn from(weights: WeightVector) -> Self {
        weights.iter().collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightDial {
    pub key: TraitKey,
    pub label: &'static str,
    pub weight: u8,
    pub priority: bool,
}

/// Named weight vectors that replace the current weights wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Balanced,
    Photography,
    Performance,
    Longevity,
    Value,
}

impl Preset {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Balanced,
            Self::Photography,
            Self::Performance,
            Self::Longevity,
            Self::Value,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Photography => "photography",
            Self::Performance => "performance",
            Self::Longevity => "longevity",
            Self::Value => "value",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::Photography => "Photography first",
            Self::Performance => "Gaming & performance",
            Self::Longevity => "Keep it for years",
            Self::Value => "Best bang for the buck",
        }
    }

    pub fn weights(self) -> WeightVector {
        // performance, battery, camera, display, build,
        // reliability, software, safety, design, value
        let values = match self {
            Self::Balanced => [7, 7, 7, 6, 6, 8, 7, 7, 5, 7],
            Self::Photography => [6, 6, 10, 8, 5, 6, 6, 5, 6, 5],
            Self::Performance => [10, 8, 5, 9, 6, 6, 6, 4, 4, 5],
            Self::Longevity => [6, 8, 5, 5, 9, 10, 9, 7, 3, 6],
            Self::Value => [6, 7, 5, 5, 5, 7, 5, 5, 3, 10],
        };
        WeightVector::from_values(values)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Preset {
    type Err = DecisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ordered()
            .into_iter()
            .find(|preset| preset.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DecisionError::UnknownPreset(wanted.to_string()))
    }
}

/// Sub-factor dials for traits the user has expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<TraitKey, BTreeMap<SubFactor, i64>>",
    into = "BTreeMap<TraitKey, BTreeMap<SubFactor, u8>>"
)]
pub struct SubWeights(BTreeMap<TraitKey, BTreeMap<SubFactor, u8>>);

impl SubWeights {
    /// Sets one sub-factor dial, clamped to `[1, 10]`. The factor must belong
    /// to the named trait.
    pub fn set(
        &mut self,
        trait_key: TraitKey,
        factor: SubFactor,
        value: i64,
    ) -> Result<(), DecisionError> {
        if factor.parent() != trait_key {
            return Err(DecisionError::MisplacedSubFactor { trait_key, factor });
        }
        self.0
            .entry(trait_key)
            .or_default()
            .insert(factor, clamp_weight(value));
        Ok(())
    }

    /// Collapses a trait's dials so its base weight passes through unchanged.
    pub fn clear(&mut self, trait_key: TraitKey) -> bool {
        self.0.remove(&trait_key).is_some()
    }

    pub fn is_expanded(&self, trait_key: TraitKey) -> bool {
        self.0
            .get(&trait_key)
            .map(|factors| !factors.is_empty())
            .unwrap_or(false)
    }

    fn totals(&self, trait_key: TraitKey) -> Option<(i64, i64)> {
        let factors = self.0.get(&trait_key)?;
        if factors.is_empty() {
            return None;
        }
        let sum = factors.values().map(|value| i64::from(*value)).sum();
        Some((sum, factors.len() as i64))
    }
}

impl TryFrom<BTreeMap<TraitKey, BTreeMap<SubFactor, i64>>> for SubWeights {
    type Error = DecisionError;

    fn try_from(raw: BTreeMap<TraitKey, BTreeMap<SubFactor, i64>>) -> Result<Self, Self::Error> {
        let mut weights = Self::default();
        for (trait_key, factors) in raw {
            for (factor, value) in factors {
                weights.set(trait_key, factor, value)?;
            }
        }
        Ok(weights)
    }
}

impl From<SubWeights> for BTreeMap<TraitKey, BTreeMap<SubFactor, u8>> {
    fn from(value: SubWeights) -> Self {
        value.0
    }
}

/// Weights actually used for scoring. Derived, never edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "BTreeMap<TraitKey, i64>")]
pub struct EffectiveWeights([i64; TraitKey::COUNT]);

impl EffectiveWeights {
    /// Raw weights in canonical trait order, unchecked.
    #[cfg(test)]
    pub(crate) const fn from_values(values: [i64; TraitKey::COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, key: TraitKey) -> i64 {
        self.0[key.index()]
    }

    pub fn sum(&self) -> i64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitKey, i64)> + '_ {
        TraitKey::ordered()
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }
}

impl From<EffectiveWeights> for BTreeMap<TraitKey, i64> {
    fn from(value: EffectiveWeights) -> Self {
        value.iter().collect()
    }
}

/// Scales each expanded trait's base weight by the mean of its sub-factor
/// dials over ten, rounded half up and clamped to `[1, 10]`. Traits without
/// dials pass through.
pub fn resolve(base: &WeightVector, sub_weights: &SubWeights) -> EffectiveWeights {
    let mut resolved = [0i64; TraitKey::COUNT];
    for (key, weight) in base.iter() {
        let weight = i64::from(weight);
        resolved[key.index()] = match sub_weights.totals(key) {
            // weight * (sum / count) / 10
            Some((sum, count)) => round_half_up(weight * sum, 10 * count)
                .clamp(i64::from(MIN_WEIGHT), i64::from(MAX_WEIGHT)),
            None => weight,
        };
    }
    EffectiveWeights(resolved)
}
