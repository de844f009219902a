use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use super::CatalogError;
use crate::decision::domain::{
    OperatingSystem, Phone, PhoneId, PriceBook, Screen, ScreenClass, TraitKey, TraitRatings,
};

const SMALL_SCREEN_BELOW_IN: f32 = 6.0;
const LARGE_SCREEN_FROM_IN: f32 = 6.5;

pub(crate) fn parse_phones<R: Read>(reader: R) -> Result<Vec<Phone>, CatalogError> {
    let document: CatalogDocument = serde_json::from_reader(reader)?;
    let mut seen = HashSet::new();
    let mut phones = Vec::with_capacity(document.phones.len());

    for row in document.phones {
        let id = row.id.trim().to_string();
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId(id));
        }
        phones.push(row.into_phone(id));
    }

    Ok(phones)
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    phones: Vec<PhoneRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneRow {
    id: String,
    brand: String,
    model: String,
    os: OperatingSystem,
    #[serde(default)]
    price: PriceBook,
    screen: ScreenRow,
    #[serde(default)]
    traits: BTreeMap<String, i32>,
    #[serde(default, deserialize_with = "non_blank_tags")]
    strength_tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenRow {
    size_in: f32,
    #[serde(default)]
    class: Option<ScreenClass>,
}

impl PhoneRow {
    fn into_phone(self, id: String) -> Phone {
        let screen = Screen {
            size_in: self.screen.size_in,
            class: self
                .screen
                .class
                .unwrap_or_else(|| classify_screen(self.screen.size_in)),
        };

        Phone {
            id: PhoneId(id),
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            os: self.os,
            price: self.price,
            screen,
            traits: ratings_from_map(&self.traits),
            strength_tags: self.strength_tags,
        }
    }
}

/// Unlisted traits rate 0; keys outside the fixed trait set are ignored.
fn ratings_from_map(raw: &BTreeMap<String, i32>) -> TraitRatings {
    raw.iter().fold(TraitRatings::default(), |ratings, (name, rating)| {
        match name.parse::<TraitKey>() {
            Ok(key) => ratings.with(key, *rating),
            Err(_) => ratings,
        }
    })
}

pub(crate) fn classify_screen(size_in: f32) -> ScreenClass {
    if size_in < SMALL_SCREEN_BELOW_IN {
        ScreenClass::Small
    } else if size_in < LARGE_SCREEN_FROM_IN {
        ScreenClass::Medium
    } else {
        ScreenClass::Large
    }
}

fn non_blank_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_unknown_traits_are_tolerated() {
        let json = r#"{"phones":[{
            "id":"x1","brand":" Acme ","model":"One","os":"Android",
            "price":{"used":199},
            "screen":{"sizeIn":6.7},
            "traits":{"camera":80,"charisma":99},
            "strengthTags":["  ", "Cheap"]
        }]}"#;

        let phones = parse_phones(json.as_bytes()).expect("catalog parses");
        let phone = &phones[0];
        assert_eq!(phone.brand, "Acme");
        assert_eq!(phone.price.new, None);
        assert_eq!(phone.price.used, Some(199));
        assert_eq!(phone.screen.class, ScreenClass::Large);
        assert_eq!(phone.traits.get(TraitKey::Camera), 80);
        assert_eq!(phone.traits.get(TraitKey::Battery), 0);
        assert_eq!(phone.strength_tags, vec!["Cheap".to_string()]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"phones":[
            {"id":"dup","brand":"A","model":"1","os":"iOS","screen":{"sizeIn":6.1,"class":"medium"}},
            {"id":"dup","brand":"B","model":"2","os":"iOS","screen":{"sizeIn":6.1,"class":"medium"}}
        ]}"#;
        match parse_phones(json.as_bytes()) {
            Err(CatalogError::DuplicateId(id)) => assert_eq!(id, "dup"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn missing_phone_list_is_an_empty_catalog() {
        let phones = parse_phones("{}".as_bytes()).expect("empty document parses");
        assert!(phones.is_empty());
    }

    #[test]
    fn screen_classes_derive_from_size() {
        assert_eq!(classify_screen(5.4), ScreenClass::Small);
        assert_eq!(classify_screen(6.1), ScreenClass::Medium);
        assert_eq!(classify_screen(6.5), ScreenClass::Large);
    }
}
