//! Read-only phone catalog shared by every recomputation.

mod parser;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::decision::domain::Phone;

const BUNDLED_US_CATALOG: &str = include_str!("../../data/phones.us.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate phone id '{0}' in catalog")]
    DuplicateId(String),
}

/// Immutable, cheaply clonable collection of phones in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    phones: Arc<[Arc<Phone>]>,
}

impl Catalog {
    pub fn from_phones(phones: Vec<Phone>) -> Self {
        Self {
            phones: phones.into_iter().map(Arc::new).collect(),
        }
    }

    /// The US catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_reader(BUNDLED_US_CATALOG.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        parser::parse_phones(reader).map(Self::from_phones)
    }

    /// Loads from `path` when given, otherwise the bundled catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Phone>> {
        self.phones.iter()
    }
}
