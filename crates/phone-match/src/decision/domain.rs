use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DecisionError;

/// The ten qualitative categories every phone is rated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKey {
    Performance,
    Battery,
    Camera,
    Display,
    Build,
    Reliability,
    Software,
    Safety,
    Design,
    Value,
}

impl TraitKey {
    pub const COUNT: usize = 10;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Performance,
            Self::Battery,
            Self::Camera,
            Self::Display,
            Self::Build,
            Self::Reliability,
            Self::Software,
            Self::Safety,
            Self::Design,
            Self::Value,
        ]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Battery => "battery",
            Self::Camera => "camera",
            Self::Display => "display",
            Self::Build => "build",
            Self::Reliability => "reliability",
            Self::Software => "software",
            Self::Safety => "safety",
            Self::Design => "design",
            Self::Value => "value",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Performance => "Performance",
            Self::Battery => "Battery",
            Self::Camera => "Camera",
            Self::Display => "Display",
            Self::Build => "Build",
            Self::Reliability => "Reliability",
            Self::Software => "Software",
            Self::Safety => "Safety",
            Self::Design => "Design",
            Self::Value => "Value",
        }
    }

    /// Finer-grained dials nested under this trait.
    pub const fn sub_factors(self) -> &'static [SubFactor] {
        use SubFactor::*;
        match self {
            Self::Performance => &[Cpu, Gpu, Thermals],
            Self::Battery => &[Endurance, Charging],
            Self::Camera => &[MainSensor, LowLight, Video, Zoom],
            Self::Display => &[Brightness, RefreshRate, ColorAccuracy],
            Self::Build => &[Materials, WaterResistance],
            Self::Reliability => &[Longevity, Repairability],
            Self::Software => &[UpdatePolicy, CleanExperience],
            Self::Safety => &[Privacy, EmergencyFeatures],
            Self::Design => &[SizeFeel, Aesthetics],
            Self::Value => &[Resale, PriceToPerformance],
        }
    }
}

impl fmt::Display for TraitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TraitKey {
    type Err = DecisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ordered()
            .into_iter()
            .find(|key| key.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DecisionError::UnknownTrait(wanted.to_string()))
    }
}

/// Sub-preference keys. Each belongs to exactly one [`TraitKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubFactor {
    Cpu,
    Gpu,
    Thermals,
    Endurance,
    Charging,
    MainSensor,
    LowLight,
    Video,
    Zoom,
    Brightness,
    RefreshRate,
    ColorAccuracy,
    Materials,
    WaterResistance,
    Longevity,
    Repairability,
    UpdatePolicy,
    CleanExperience,
    Privacy,
    EmergencyFeatures,
    SizeFeel,
    Aesthetics,
    Resale,
    PriceToPerformance,
}

impl SubFactor {
    pub const fn parent(self) -> TraitKey {
        use SubFactor::*;
        match self {
            Cpu | Gpu | Thermals => TraitKey::Performance,
            Endurance | Charging => TraitKey::Battery,
            MainSensor | LowLight | Video | Zoom => TraitKey::Camera,
            Brightness | RefreshRate | ColorAccuracy => TraitKey::Display,
            Materials | WaterResistance => TraitKey::Build,
            Longevity | Repairability => TraitKey::Reliability,
            UpdatePolicy | CleanExperience => TraitKey::Software,
            Privacy | EmergencyFeatures => TraitKey::Safety,
            SizeFeel | Aesthetics => TraitKey::Design,
            Resale | PriceToPerformance => TraitKey::Value,
        }
    }

    pub const fn key(self) -> &'static str {
        use SubFactor::*;
        match self {
            Cpu => "cpu",
            Gpu => "gpu",
            Thermals => "thermals",
            Endurance => "endurance",
            Charging => "charging",
            MainSensor => "main_sensor",
            LowLight => "low_light",
            Video => "video",
            Zoom => "zoom",
            Brightness => "brightness",
            RefreshRate => "refresh_rate",
            ColorAccuracy => "color_accuracy",
            Materials => "materials",
            WaterResistance => "water_resistance",
            Longevity => "longevity",
            Repairability => "repairability",
            UpdatePolicy => "update_policy",
            CleanExperience => "clean_experience",
            Privacy => "privacy",
            EmergencyFeatures => "emergency_features",
            SizeFeel => "size_feel",
            Aesthetics => "aesthetics",
            Resale => "resale",
            PriceToPerformance => "price_to_performance",
        }
    }
}

impl fmt::Display for SubFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SubFactor {
    type Err = DecisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        TraitKey::ordered()
            .into_iter()
            .flat_map(|key| key.sub_factors().iter().copied())
            .find(|factor| factor.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DecisionError::UnknownSubFactor(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    #[serde(rename = "iOS")]
    Ios,
    Android,
}

impl OperatingSystem {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
        }
    }
}

/// OS constraint. `All` disables the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OsFilter {
    #[serde(rename = "iOS")]
    Ios,
    #[default]
    All,
    Android,
}

impl OsFilter {
    pub fn matches(self, os: OperatingSystem) -> bool {
        match self {
            Self::All => true,
            Self::Ios => os == OperatingSystem::Ios,
            Self::Android => os == OperatingSystem::Android,
        }
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, Self::All)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::All => "All",
        }
    }
}

impl FromStr for OsFilter {
    type Err = DecisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "all" => Ok(Self::All),
            other => Err(DecisionError::InvalidChoice {
                field: "os",
                value: other.to_string(),
            }),
        }
    }
}

/// Purchase condition; decides which listed price is used for budgeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Condition {
    New,
    #[default]
    All,
    Used,
}

impl Condition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Used => "Used",
            Self::All => "All",
        }
    }
}

impl FromStr for Condition {
    type Err = DecisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "used" => Ok(Self::Used),
            "all" => Ok(Self::All),
            other => Err(DecisionError::InvalidChoice {
                field: "condition",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenClass {
    Small,
    Medium,
    Large,
}

impl ScreenClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenFilter {
    Small,
    Medium,
    Large,
    #[default]
    All,
}

impl ScreenFilter {
    pub fn matches(self, class: ScreenClass) -> bool {
        match self {
            Self::All => true,
            Self::Small => class == ScreenClass::Small,
            Self::Medium => class == ScreenClass::Medium,
            Self::Large => class == ScreenClass::Large,
        }
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, Self::All)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::All => "all",
        }
    }
}

impl FromStr for ScreenFilter {
    type Err = DecisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "all" => Ok(Self::All),
            other => Err(DecisionError::InvalidChoice {
                field: "screen",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneId(pub String);

impl fmt::Display for PhoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listed prices in whole dollars. Either condition may be unlisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    #[serde(rename = "sizeIn")]
    pub size_in: f32,
    pub class: ScreenClass,
}

/// Per-trait ratings. Values are kept exactly as supplied; the scorer clamps
/// only its final output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraitRatings([i32; TraitKey::COUNT]);

impl TraitRatings {
    pub const fn uniform(rating: i32) -> Self {
        Self([rating; TraitKey::COUNT])
    }

    pub fn get(&self, key: TraitKey) -> i32 {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: TraitKey, rating: i32) {
        self.0[key.index()] = rating;
    }

    pub fn with(mut self, key: TraitKey, rating: i32) -> Self {
        self.set(key, rating);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitKey, i32)> + '_ {
        TraitKey::ordered()
            .into_iter()
            .map(move |key| (key, self.get(key)))
    }
}

impl Serialize for TraitRatings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(TraitKey::COUNT))?;
        for (key, rating) in self.iter() {
            map.serialize_entry(key.key(), &rating)?;
        }
        map.end()
    }
}

/// A catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub id: PhoneId,
    pub brand: String,
    pub model: String,
    pub os: OperatingSystem,
    pub price: PriceBook,
    pub screen: Screen,
    pub traits: TraitRatings,
    pub strength_tags: Vec<String>,
}

impl Phone {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}
