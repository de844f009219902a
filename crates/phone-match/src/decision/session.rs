use std::sync::Arc;

use tracing::debug;

use super::constraints::ConstraintSet;
use super::domain::{Condition, OsFilter, ScreenFilter, SubFactor, TraitKey};
use super::weights::{Preset, WeightDial};
use super::{DecisionEngine, DecisionError, DecisionSnapshot, RankedResults};
use crate::catalog::Catalog;

/// Interactive decision state. Each edit produces a fresh snapshot and a full
/// recomputation; consumers only ever see the latest results.
#[derive(Debug, Clone)]
pub struct DecisionSession {
    catalog: Catalog,
    engine: DecisionEngine,
    snapshot: Arc<DecisionSnapshot>,
    results: Arc<RankedResults>,
}

impl DecisionSession {
    pub fn new(catalog: Catalog, engine: DecisionEngine) -> Self {
        Self::with_snapshot(catalog, engine, DecisionSnapshot::default())
    }

    pub fn with_snapshot(
        catalog: Catalog,
        engine: DecisionEngine,
        mut snapshot: DecisionSnapshot,
    ) -> Self {
        engine.normalize(&mut snapshot);
        let results = engine.evaluate(&catalog, &snapshot);
        Self {
            catalog,
            engine,
            snapshot: Arc::new(snapshot),
            results: Arc::new(results),
        }
    }

    pub fn snapshot(&self) -> &DecisionSnapshot {
        &self.snapshot
    }

    pub fn results(&self) -> Arc<RankedResults> {
        Arc::clone(&self.results)
    }

    pub fn dial_order(&self) -> Vec<WeightDial> {
        self.snapshot.weights.dial_order()
    }

    pub fn set_os(&mut self, os: OsFilter) -> Arc<RankedResults> {
        self.update(|snapshot| snapshot.constraints.os = os)
    }

    pub fn set_condition(&mut self, condition: Condition) -> Arc<RankedResults> {
        self.update(|snapshot| snapshot.constraints.condition = condition)
    }

    pub fn set_screen(&mut self, screen: ScreenFilter) -> Arc<RankedResults> {
        self.update(|snapshot| snapshot.constraints.screen = screen)
    }

    /// Raw text from the minimum budget field.
    pub fn set_budget_min(&mut self, raw: &str) -> Arc<RankedResults> {
        self.update(|snapshot| snapshot.constraints.set_budget_min(raw))
    }

    /// Raw text from the maximum budget field.
    pub fn set_budget_max(&mut self, raw: &str) -> Arc<RankedResults> {
        let ceiling = self.engine.config().budget_ceiling;
        self.update(|snapshot| snapshot.constraints.set_budget_max(raw, ceiling))
    }

    pub fn exclude_brand(&mut self, brand: &str) -> Arc<RankedResults> {
        self.update(|snapshot| {
            snapshot.constraints.excluded_brands.insert(brand);
        })
    }

    pub fn include_brand(&mut self, brand: &str) -> Arc<RankedResults> {
        self.update(|snapshot| {
            snapshot.constraints.excluded_brands.remove(brand);
        })
    }

    pub fn replace_constraints(&mut self, constraints: ConstraintSet) -> Arc<RankedResults> {
        let ceiling = self.engine.config().budget_ceiling;
        self.update(|snapshot| {
            snapshot.constraints = constraints;
            snapshot.constraints.normalize(ceiling);
        })
    }

    pub fn set_weight(&mut self, key: TraitKey, value: i64) -> Arc<RankedResults> {
        self.update(|snapshot| snapshot.weights.set(key, value))
    }

    /// Replaces every base weight; sub-factor dials are kept.
    pub fn apply_preset(&mut self, preset: Preset) -> Arc<RankedResults> {
        self.update(|snapshot| snapshot.weights = preset.weights())
    }

    pub fn set_sub_weight(
        &mut self,
        key: TraitKey,
        factor: SubFactor,
        value: i64,
    ) -> Result<Arc<RankedResults>, DecisionError> {
        let mut next = (*self.snapshot).clone();
        next.sub_weights.set(key, factor, value)?;
        Ok(self.commit(next))
    }

    pub fn collapse_trait(&mut self, key: TraitKey) -> Arc<RankedResults> {
        self.update(|snapshot| {
            snapshot.sub_weights.clear(key);
        })
    }

    pub fn reset(&mut self) -> Arc<RankedResults> {
        let mut next = DecisionSnapshot::default();
        self.engine.normalize(&mut next);
        self.commit(next)
    }

    fn update<F>(&mut self, edit: F) -> Arc<RankedResults>
    where
        F: FnOnce(&mut DecisionSnapshot),
    {
        let mut next = (*self.snapshot).clone();
        edit(&mut next);
        self.commit(next)
    }

    fn commit(&mut self, next: DecisionSnapshot) -> Arc<RankedResults> {
        if next == *self.snapshot {
            debug!("snapshot unchanged, keeping previous results");
            return self.results();
        }
        self.results = Arc::new(self.engine.evaluate(&self.catalog, &next));
        self.snapshot = Arc::new(next);
        self.results()
    }
}
