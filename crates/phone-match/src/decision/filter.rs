use std::collections::BTreeMap;
use std::sync::Arc;

use super::constraints::ConstraintSet;
use super::domain::{Condition, Phone, PriceBook};
use crate::catalog::Catalog;

/// A phone that passed every hard constraint, with its resolved price.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub phone: Arc<Phone>,
    pub price: u32,
}

/// Why a phone was left out. Only tallied for logging; exclusion itself is
/// silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    Os,
    Screen,
    ExcludedBrand,
    NoPriceForCondition,
    OutsideBudget,
}

/// `New` and `Used` never fall back to the other listing; `All` takes the
/// cheaper of whichever listings exist.
pub fn effective_price(price: &PriceBook, condition: Condition) -> Option<u32> {
    match condition {
        Condition::New => price.new,
        Condition::Used => price.used,
        Condition::All => match (price.new, price.used) {
            (Some(new), Some(used)) => Some(new.min(used)),
            (new, used) => new.or(used),
        },
    }
}

/// Runs every predicate against one phone and returns its effective price
/// when all of them hold.
pub fn check(phone: &Phone, constraints: &ConstraintSet) -> Result<u32, Rejection> {
    if !constraints.os.matches(phone.os) {
        return Err(Rejection::Os);
    }
    if !constraints.screen.matches(phone.screen.class) {
        return Err(Rejection::Screen);
    }
    if constraints.excluded_brands.contains(&phone.brand) {
        return Err(Rejection::ExcludedBrand);
    }
    let price = constraints
        .effective_price(&phone.price)
        .ok_or(Rejection::NoPriceForCondition)?;
    if !constraints.budget_contains(price) {
        return Err(Rejection::OutsideBudget);
    }
    Ok(price)
}

/// Survivors in catalog order, plus how many phones each predicate removed.
#[derive(Debug, Clone, Default)]
pub struct Filtered {
    pub candidates: Vec<Candidate>,
    pub rejected: BTreeMap<Rejection, usize>,
}

/// Narrows the catalog to phones satisfying every constraint, preserving
/// catalog order.
pub fn filter(catalog: &Catalog, constraints: &ConstraintSet) -> Filtered {
    let mut filtered = Filtered::default();
    for phone in catalog.iter() {
        match check(phone, constraints) {
            Ok(price) => filtered.candidates.push(Candidate {
                phone: Arc::clone(phone),
                price,
            }),
            Err(reason) => *filtered.rejected.entry(reason).or_default() += 1,
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::domain::{
        OperatingSystem, OsFilter, PhoneId, Screen, ScreenClass, ScreenFilter, TraitRatings,
    };

    fn phone(id: &str, brand: &str, os: OperatingSystem, new: Option<u32>, used: Option<u32>) -> Phone {
        Phone {
            id: PhoneId(id.to_string()),
            brand: brand.to_string(),
            model: id.to_uppercase(),
            os,
            price: PriceBook { new, used },
            screen: Screen {
                size_in: 6.1,
                class: ScreenClass::Medium,
            },
            traits: TraitRatings::uniform(50),
            strength_tags: Vec::new(),
        }
    }

    #[test]
    fn effective_price_follows_condition() {
        let both = PriceBook {
            new: Some(500),
            used: Some(300),
        };
        assert_eq!(effective_price(&both, Condition::New), Some(500));
        assert_eq!(effective_price(&both, Condition::Used), Some(300));
        assert_eq!(effective_price(&both, Condition::All), Some(300));

        let used_only = PriceBook {
            new: None,
            used: Some(400),
        };
        assert_eq!(effective_price(&used_only, Condition::New), None);
        assert_eq!(effective_price(&used_only, Condition::All), Some(400));

        assert_eq!(effective_price(&PriceBook::default(), Condition::All), None);
    }

    #[test]
    fn each_predicate_reports_its_rejection() {
        let apple = phone("a", "Apple", OperatingSystem::Ios, Some(600), None);
        let mut constraints = ConstraintSet::default();
        assert_eq!(check(&apple, &constraints), Ok(600));

        constraints.os = OsFilter::Android;
        assert_eq!(check(&apple, &constraints), Err(Rejection::Os));
        constraints.os = OsFilter::All;

        constraints.screen = ScreenFilter::Large;
        assert_eq!(check(&apple, &constraints), Err(Rejection::Screen));
        constraints.screen = ScreenFilter::All;

        constraints.excluded_brands.insert("apple");
        assert_eq!(check(&apple, &constraints), Err(Rejection::ExcludedBrand));
        constraints.excluded_brands.remove("apple");

        constraints.condition = Condition::Used;
        assert_eq!(check(&apple, &constraints), Err(Rejection::NoPriceForCondition));
        constraints.condition = Condition::All;

        constraints.budget_max = 599;
        assert_eq!(check(&apple, &constraints), Err(Rejection::OutsideBudget));
    }

    #[test]
    fn budget_bounds_are_inclusive() {
        let edge = phone("edge", "Google", OperatingSystem::Android, Some(250), Some(1000));
        let mut constraints = ConstraintSet::default();
        constraints.condition = Condition::New;
        assert_eq!(check(&edge, &constraints), Ok(250));
        constraints.condition = Condition::Used;
        assert_eq!(check(&edge, &constraints), Ok(1000));
    }

    #[test]
    fn filter_keeps_catalog_order() {
        let catalog = Catalog::from_phones(vec![
            phone("c", "Google", OperatingSystem::Android, Some(700), None),
            phone("a", "Apple", OperatingSystem::Ios, Some(800), None),
            phone("b", "Samsung", OperatingSystem::Android, None, None),
            phone("d", "Apple", OperatingSystem::Ios, None, Some(300)),
        ]);
        let filtered = filter(&catalog, &ConstraintSet::default());
        let kept: Vec<_> = filtered
            .candidates
            .iter()
            .map(|candidate| candidate.phone.id.0.clone())
            .collect();
        assert_eq!(kept, vec!["c", "a", "d"]);
        assert_eq!(
            filtered.rejected,
            BTreeMap::from([(Rejection::NoPriceForCondition, 1)])
        );
    }
}
