use super::constraints::ConstraintSet;
use super::domain::{Phone, TraitKey};
use super::weights::EffectiveWeights;

pub const MAX_REASONS: usize = 3;
const STRONG_TRAITS: usize = 2;
const CONSTRAINT_BITS: usize = 2;

/// Short justifications for a phone, strongest weighted traits first, then
/// the constraints it satisfies, falling back to its first strength tag.
pub fn explain(phone: &Phone, weights: &EffectiveWeights, constraints: &ConstraintSet) -> Vec<String> {
    let mut reasons: Vec<String> = strongest_traits(phone, weights)
        .into_iter()
        .take(STRONG_TRAITS)
        .map(|(key, weight)| format!("Strong match on {} (weighted {}/10).", key.label(), weight))
        .collect();

    let bits = constraint_bits(phone, constraints);
    if !bits.is_empty() {
        reasons.push(format!(
            "Fits your constraints ({}).",
            bits[..bits.len().min(CONSTRAINT_BITS)].join(", ")
        ));
    } else if let Some(tag) = phone.strength_tags.first() {
        reasons.push(tag.clone());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

/// Traits ordered by `weight * rating`; ties go to the heavier weight, then
/// canonical trait order.
fn strongest_traits(phone: &Phone, weights: &EffectiveWeights) -> Vec<(TraitKey, i64)> {
    let mut ranked: Vec<(TraitKey, i64, i64)> = weights
        .iter()
        .map(|(key, weight)| (key, weight, weight * i64::from(phone.traits.get(key))))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(b.1.cmp(&a.1)));
    ranked
        .into_iter()
        .map(|(key, weight, _)| (key, weight))
        .collect()
}

fn constraint_bits(phone: &Phone, constraints: &ConstraintSet) -> Vec<String> {
    let mut bits = Vec::new();
    if constraints.os.is_active() {
        bits.push(format!("OS: {}", phone.os.label()));
    }
    if let Some(price) = constraints.effective_price(&phone.price) {
        bits.push(format!("Price: ~${price}"));
    }
    if constraints.screen.is_active() {
        bits.push(format!("Size: {}", phone.screen.class.label()));
    }
    bits
}
