//! Filtering, scoring, ranking, and explanation of catalog phones against a
//! user's constraints and weighted priorities.
//!
//! Every stage is a pure function of its inputs. [`DecisionEngine::evaluate`]
//! runs the whole pipeline for one [`DecisionSnapshot`]; [`DecisionSession`]
//! reruns it after each edit and keeps only the latest results.

pub mod constraints;
pub mod domain;
pub mod explain;
pub mod filter;
pub mod ranking;
pub mod scoring;
mod session;
pub mod views;
pub mod weights;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::EngineConfig;

pub use constraints::{BrandExclusions, ConstraintSet};
pub use domain::{
    Condition, OperatingSystem, OsFilter, Phone, PhoneId, PriceBook, Screen, ScreenClass,
    ScreenFilter, SubFactor, TraitKey, TraitRatings,
};
pub use session::DecisionSession;
pub use views::{PresetView, RankedMatchView, RankedResultsView, TraitView};
pub use weights::{EffectiveWeights, Preset, SubWeights, WeightDial, WeightVector};

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("unknown trait '{0}'")]
    UnknownTrait(String),
    #[error("unknown sub-factor '{0}'")]
    UnknownSubFactor(String),
    #[error("sub-factor '{factor}' does not belong to trait '{trait_key}'")]
    MisplacedSubFactor {
        trait_key: TraitKey,
        factor: SubFactor,
    },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("invalid {field} '{value}'")]
    InvalidChoice { field: &'static str, value: String },
}

/// `numerator / denominator` rounded to the nearest integer, halves rounding
/// up. `denominator` must be positive.
pub(crate) fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

/// Every input the pipeline reads, apart from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    #[serde(default)]
    pub constraints: ConstraintSet,
    #[serde(default)]
    pub weights: WeightVector,
    #[serde(default)]
    pub sub_weights: SubWeights,
}

/// One ranked phone with everything the presentation layer shows for it.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub position: usize,
    pub phone: Arc<Phone>,
    pub price: u32,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Output of one recomputation.
#[derive(Debug, Clone)]
pub struct RankedResults {
    pub catalog_size: usize,
    /// Matches before truncation to the result limit.
    pub total_matches: usize,
    pub effective_weights: EffectiveWeights,
    pub entries: Vec<RankedMatch>,
}

impl RankedResults {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stateless pipeline: filter, resolve weights, score, rank, explain.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clamps the snapshot's budget range into the configured ceiling.
    /// Returns `true` when the caller's values were adjusted.
    pub fn normalize(&self, snapshot: &mut DecisionSnapshot) -> bool {
        snapshot.constraints.normalize(self.config.budget_ceiling)
    }

    pub fn evaluate(&self, catalog: &Catalog, snapshot: &DecisionSnapshot) -> RankedResults {
        let effective_weights = weights::resolve(&snapshot.weights, &snapshot.sub_weights);

        let filtered = filter::filter(catalog, &snapshot.constraints);
        let rejected = filtered.rejected;

        let scored = filtered
            .candidates
            .into_iter()
            .map(|candidate| ranking::ScoredCandidate {
                score: scoring::score(&candidate.phone.traits, &effective_weights),
                phone: candidate.phone,
                price: candidate.price,
            })
            .collect();

        let ranked = ranking::rank(scored, self.config.result_limit);

        let entries: Vec<RankedMatch> = ranked
            .top
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| RankedMatch {
                position: index + 1,
                reasons: explain::explain(
                    &candidate.phone,
                    &effective_weights,
                    &snapshot.constraints,
                ),
                phone: candidate.phone,
                price: candidate.price,
                score: candidate.score,
            })
            .collect();

        debug!(
            catalog_size = catalog.len(),
            total_matches = ranked.total_matches,
            returned = entries.len(),
            ?rejected,
            "ranked catalog"
        );

        RankedResults {
            catalog_size: catalog.len(),
            total_matches: ranked.total_matches,
            effective_weights,
            entries,
        }
    }
}
