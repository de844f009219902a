use super::domain::TraitRatings;
use super::round_half_up;
use super::weights::EffectiveWeights;

pub const MAX_SCORE: u8 = 100;

/// Weight-normalised average of the trait ratings, rounded half up and
/// clamped to `[0, 100]`. A non-positive weight total scores zero.
pub fn score(traits: &TraitRatings, weights: &EffectiveWeights) -> u8 {
    let weight_sum = weights.sum();
    if weight_sum <= 0 {
        return 0;
    }

    let weighted: i64 = weights
        .iter()
        .map(|(key, weight)| i64::from(traits.get(key)) * weight)
        .sum();

    round_half_up(weighted, weight_sum).clamp(0, i64::from(MAX_SCORE)) as u8
}
