use serde::Serialize;

use super::domain::{OperatingSystem, ScreenClass, SubFactor, TraitKey};
use super::weights::{EffectiveWeights, Preset, WeightVector};
use super::{RankedMatch, RankedResults};

/// Tags shown beside each result.
pub const DISPLAYED_TAGS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct RankedMatchView {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub os: OperatingSystem,
    pub os_label: &'static str,
    pub screen_size: String,
    pub screen_class: ScreenClass,
    pub price: u32,
    pub score: u8,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strength_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedResultsView {
    pub catalog_size: usize,
    pub total_matches: usize,
    pub effective_weights: EffectiveWeights,
    pub results: Vec<RankedMatchView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraitView {
    pub key: TraitKey,
    pub label: &'static str,
    pub sub_factors: Vec<SubFactor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetView {
    pub key: &'static str,
    pub label: &'static str,
    pub weights: WeightVector,
}

impl RankedMatch {
    pub fn to_view(&self) -> RankedMatchView {
        let phone = &self.phone;
        RankedMatchView {
            position: self.position,
            id: phone.id.0.clone(),
            name: phone.display_name(),
            brand: phone.brand.clone(),
            model: phone.model.clone(),
            os: phone.os,
            os_label: phone.os.label(),
            screen_size: format!("{:.1}", phone.screen.size_in),
            screen_class: phone.screen.class,
            price: self.price,
            score: self.score,
            reasons: self.reasons.clone(),
            strength_tags: phone
                .strength_tags
                .iter()
                .take(DISPLAYED_TAGS)
                .cloned()
                .collect(),
        }
    }
}

impl RankedResults {
    pub fn view(&self) -> RankedResultsView {
        RankedResultsView {
            catalog_size: self.catalog_size,
            total_matches: self.total_matches,
            effective_weights: self.effective_weights,
            results: self.entries.iter().map(RankedMatch::to_view).collect(),
        }
    }
}

impl TraitView {
    pub fn all() -> Vec<Self> {
        TraitKey::ordered()
            .into_iter()
            .map(|key| TraitView {
                key,
                label: key.label(),
                sub_factors: key.sub_factors().to_vec(),
            })
            .collect()
    }
}

impl PresetView {
    pub fn all() -> Vec<Self> {
        Preset::ordered()
            .into_iter()
            .map(|preset| PresetView {
                key: preset.key(),
                label: preset.label(),
                weights: preset.weights(),
            })
            .collect()
    }
}
