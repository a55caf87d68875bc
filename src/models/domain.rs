use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Specialties a provider may be listed under
pub const MEDICAL_SPECIALTIES: &[&str] = &[
    "Medicina General",
    "Emergencia Médica",
    "Cardiología",
    "Pediatría",
    "Dermatología",
    "Ginecología",
    "Traumatología",
    "Neurología",
    "Psiquiatría",
    "Oftalmología",
];

pub const EMERGENCY_SPECIALTY: &str = "Emergencia Médica";

/// Check whether a specialty tag belongs to the known set
pub fn is_known_specialty(specialty: &str) -> bool {
    MEDICAL_SPECIALTIES.contains(&specialty)
}

/// A WGS84 latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A single position fix of the user
///
/// Each successful fix produces a new value; the previous one is replaced,
/// never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub coordinates: Coordinates,
    #[serde(rename = "accuracyMeters")]
    pub accuracy_meters: f64,
    pub timestamp: DateTime<Utc>,
}

/// Raw fix as reported by the location collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub coordinates: Coordinates,
    pub accuracy_meters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationType {
    Virtual,
    HomeVisit,
    InPerson,
}

impl ConsultationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationType::Virtual => "virtual",
            ConsultationType::HomeVisit => "home_visit",
            ConsultationType::InPerson => "in_person",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Now,
    Today,
    ThisWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when the two ranges share at least one price
    #[inline]
    pub fn overlaps(&self, other: &PriceRange) -> bool {
        self.max >= other.min && self.min <= other.max
    }
}

/// Local clock window a provider declares as working hours, `HH:MM` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(serialize_with = "serialize_clock", deserialize_with = "deserialize_clock")]
    pub start: NaiveTime,
    #[serde(serialize_with = "serialize_clock", deserialize_with = "deserialize_clock")]
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build from `HH:MM` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: NaiveTime::parse_from_str(start, CLOCK_FORMAT)?,
            end: NaiveTime::parse_from_str(end, CLOCK_FORMAT)?,
        })
    }

    /// Windows such as 22:00-06:00 that cross midnight
    pub fn is_overnight(&self) -> bool {
        self.start > self.end
    }
}

const CLOCK_FORMAT: &str = "%H:%M";

fn serialize_clock<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format(CLOCK_FORMAT).to_string())
}

fn deserialize_clock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_clock(&raw).map_err(serde::de::Error::custom)
}

fn parse_clock(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, CLOCK_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| format!("invalid clock time {:?}: {}", raw, e))
}

/// `HH:MM` serde for an optional clock time
pub(crate) mod optional_clock {
    use super::*;

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serialize_clock(time, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_clock(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

/// A provider record as held by the engine
///
/// Everything except `distance` is owned by the directory. `distance` is
/// filled in by the engine for the fix used in the search that produced
/// this copy and is `None` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorLocation {
    pub id: String,
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    #[serde(rename = "doctorName")]
    pub doctor_name: String,
    pub specialty: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(rename = "consultationTypes", default)]
    pub consultation_types: Vec<ConsultationType>,
    #[serde(rename = "workingHours")]
    pub working_hours: WorkingHours,
    #[serde(rename = "serviceRadius")]
    pub service_radius: f64,
    #[serde(rename = "priceRange")]
    pub price_range: PriceRange,
    pub rating: f64,
    #[serde(rename = "isAvailable", default)]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl DoctorLocation {
    #[inline]
    pub fn offers(&self, consultation: ConsultationType) -> bool {
        self.consultation_types.contains(&consultation)
    }
}

/// Ordering requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    #[default]
    Distance,
    Rating,
    Price,
}

/// Aggregates over the current result set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total_doctors: usize,
    pub available_now: usize,
    pub virtual_available: usize,
    pub home_visit_available: usize,
    pub average_rating: f64,
    pub average_distance: f64,
}
