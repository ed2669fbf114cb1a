#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset definition and region record types.
//!
//! Defines the TOML schema for the static per-state datasets (two
//! delimited tables and two JSON documents) and the [`RegionRecord`]
//! shape every dataset is parsed into. Region names are kept exactly as
//! they appear in the source file; matching happens at lookup time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifier of one of the static datasets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetId {
    /// Population, literacy, religion, and economy per state.
    Demographics,
    /// Land utilization statistics per state.
    LandUse,
    /// Major infrastructure projects keyed by state.
    Infrastructure,
    /// Recent natural disasters per state.
    Disasters,
}

impl DatasetId {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Demographics,
            Self::LandUse,
            Self::Infrastructure,
            Self::Disasters,
        ]
    }
}

/// A static dataset definition, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Which dataset this definition describes.
    pub id: DatasetId,
    /// Human-readable name (e.g. "State demographics").
    pub name: String,
    /// File name relative to the dataset source (e.g. `"land_use.csv"`).
    pub file: String,
    /// How to parse the file.
    pub format: DatasetFormat,
}

/// How a dataset file is laid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetFormat {
    /// Delimited text with a header row, one row per region (after
    /// filtering).
    Tabular {
        /// Header of the column holding the region name. Spelling differs
        /// between tables, so this is configured per dataset.
        region_column: String,
        /// Field delimiter (defaults to `,`).
        #[serde(default = "default_delimiter")]
        delimiter: char,
        /// Only rows passing this filter are records of the dataset.
        #[serde(default)]
        row_filter: Option<RowFilter>,
    },
    /// JSON object keyed by exact-cased region name, each value a list of
    /// infrastructure projects.
    JsonKeyed,
    /// JSON array of objects, each naming its region in `region_field`
    /// and listing disaster events in `items_field`.
    JsonArray {
        /// Field holding the region name (e.g. `"state"`).
        region_field: String,
        /// Field holding the event list (e.g. `"recent_disasters"`).
        items_field: String,
    },
}

const fn default_delimiter() -> char {
    ','
}

/// Keeps only rows whose `column` equals `equals` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    /// Column header to test.
    pub column: String,
    /// Required cell value.
    pub equals: String,
}

impl RowFilter {
    /// Returns `true` if the cell value passes the filter.
    #[must_use]
    pub fn accepts(&self, cell: Option<&str>) -> bool {
        cell.is_some_and(|value| value.trim() == self.equals)
    }
}

/// A single cell of a tabular dataset.
///
/// Source tables mix numbers, free text ("Hindi", "Hindu"), and the
/// literal `NA` for missing values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFieldValue")]
pub enum FieldValue {
    /// A numeric cell.
    Number(f64),
    /// A non-numeric, non-empty cell.
    Text(String),
    /// `NA`, `N/A`, or an empty cell.
    NotAvailable,
}

impl FieldValue {
    /// Parses a raw cell.
    ///
    /// Thousands separators are accepted in numbers (`"1,234.5"`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
        {
            return Self::NotAvailable;
        }

        let numeric = trimmed.replace(',', "");
        match numeric.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(trimmed.to_owned()),
        }
    }

    /// Returns the numeric value, if any.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) | Self::NotAvailable => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::NotAvailable => serializer.serialize_str("NA"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldValue {
    Number(f64),
    Text(String),
}

impl From<RawFieldValue> for FieldValue {
    fn from(raw: RawFieldValue) -> Self {
        match raw {
            RawFieldValue::Number(n) => Self::Number(n),
            RawFieldValue::Text(s) => Self::parse(&s),
        }
    }
}

/// An infrastructure project listed for a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureProject {
    /// Project name.
    #[serde(default)]
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Sector (e.g. "Transport", "Energy").
    #[serde(default)]
    pub sector: String,
}

/// A past disaster listed for a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterEvent {
    /// Event title (e.g. "2018 Kerala floods").
    #[serde(default)]
    pub event: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Link to further reading.
    #[serde(default)]
    pub link: String,
}

/// The dataset-specific payload of a region record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RecordData {
    /// Named cells of a tabular row (region column included).
    Tabular(BTreeMap<String, FieldValue>),
    /// Infrastructure projects.
    Infrastructure(Vec<InfrastructureProject>),
    /// Past disasters.
    Disasters(Vec<DisasterEvent>),
}

/// One region's record within a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Region name exactly as written in the source file.
    pub region: String,
    /// Dataset-specific payload.
    #[serde(flatten)]
    pub data: RecordData,
}

impl RegionRecord {
    /// Returns the tabular cells, if this is a tabular record.
    #[must_use]
    pub const fn fields(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match &self.data {
            RecordData::Tabular(fields) => Some(fields),
            RecordData::Infrastructure(_) | RecordData::Disasters(_) => None,
        }
    }
}

/// A fully parsed dataset, records in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedDataset {
    /// Which dataset was loaded.
    pub id: DatasetId,
    /// Records in the order they appear in the source.
    pub records: Vec<RegionRecord>,
}
