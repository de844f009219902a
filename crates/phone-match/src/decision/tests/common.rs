use crate::catalog::Catalog;
use crate::decision::{
    ConstraintSet, DecisionEngine, DecisionSnapshot, OperatingSystem, OsFilter, Phone, PhoneId,
    PriceBook, Screen, ScreenClass, TraitKey, TraitRatings, WeightVector,
};

pub(super) fn phone(
    id: &str,
    brand: &str,
    os: OperatingSystem,
    price: PriceBook,
    traits: TraitRatings,
) -> Phone {
    Phone {
        id: PhoneId(id.to_string()),
        brand: brand.to_string(),
        model: format!("Model {}", id.to_uppercase()),
        os,
        price,
        screen: Screen {
            size_in: 6.1,
            class: ScreenClass::Medium,
        },
        traits,
        strength_tags: vec![format!("{id} strength")],
    }
}

pub(super) fn new_price(amount: u32) -> PriceBook {
    PriceBook {
        new: Some(amount),
        used: None,
    }
}

pub(super) fn used_price(amount: u32) -> PriceBook {
    PriceBook {
        new: None,
        used: Some(amount),
    }
}

/// A: iOS camera specialist, B: Android all-rounder, C: cheap used iOS with a
/// higher baseline.
pub(super) fn three_phone_catalog() -> Catalog {
    Catalog::from_phones(vec![
        phone(
            "a",
            "Apple",
            OperatingSystem::Ios,
            new_price(600),
            TraitRatings::uniform(50).with(TraitKey::Camera, 90),
        ),
        phone(
            "b",
            "Samsung",
            OperatingSystem::Android,
            new_price(400),
            TraitRatings::uniform(50),
        ),
        phone(
            "c",
            "Apple",
            OperatingSystem::Ios,
            used_price(200),
            TraitRatings::uniform(60).with(TraitKey::Camera, 70),
        ),
    ])
}

pub(super) fn camera_snapshot() -> DecisionSnapshot {
    DecisionSnapshot {
        constraints: ConstraintSet {
            os: OsFilter::Ios,
            budget_min: 0,
            budget_max: 1000,
            ..ConstraintSet::default()
        },
        weights: WeightVector::uniform(1).with(TraitKey::Camera, 10),
        ..DecisionSnapshot::default()
    }
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::default()
}

pub(super) fn ids(results: &crate::decision::RankedResults) -> Vec<String> {
    results
        .entries
        .iter()
        .map(|entry| entry.phone.id.0.clone())
        .collect()
}
