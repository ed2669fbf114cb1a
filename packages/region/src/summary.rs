//! Derived views over tabular region records.
//!
//! The demographics table carries religion shares as separate columns and
//! the land use table carries one column per land category. The detail
//! view charts both; these types pick the relevant columns out of a
//! record's fields.

use std::collections::BTreeMap;

use mausam_map_dataset_models::FieldValue;
use serde::Serialize;

/// Religion columns of the demographics table, in display order.
pub const RELIGION_COLUMNS: [&str; 6] = ["Hindu", "Muslim", "Christian", "Buddhist", "Sikhs", "Others"];

/// Land category columns of the land use table, in display order.
pub const LAND_USE_CATEGORIES: [&str; 8] = [
    "Forests",
    "Not available for cultivation",
    "Permanent pastures and other grazing lands",
    "Land under miscellaneous tree crops & groves",
    "Culturable wasteland",
    "Fallow lands other than current fallows",
    "Current fallows",
    "Net area sown",
];

fn number(fields: &BTreeMap<String, FieldValue>, column: &str) -> f64 {
    fields.get(column).and_then(FieldValue::as_f64).unwrap_or(0.0)
}

/// Religion shares of a state's population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReligionShares {
    pub hindu: f64,
    pub muslim: f64,
    pub christian: f64,
    pub buddhist: f64,
    pub sikhs: f64,
    pub others: f64,
}

impl ReligionShares {
    /// Reads the religion columns; missing or `NA` cells count as zero.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<String, FieldValue>) -> Self {
        let [hindu, muslim, christian, buddhist, sikhs, others] =
            RELIGION_COLUMNS.map(|column| number(fields, column));

        Self {
            hindu,
            muslim,
            christian,
            buddhist,
            sikhs,
            others,
        }
    }
}

/// One slice of a land use distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandUseShare {
    /// Category column name.
    pub category: String,
    /// Area as reported in the table.
    pub area: f64,
    /// Percent of the summed category areas.
    pub percent: f64,
}

/// Land use of a state as percentages of the summed category areas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandUseDistribution {
    /// Sum of every category area.
    pub total_area: f64,
    /// Non-zero categories in display order.
    pub shares: Vec<LandUseShare>,
}

impl LandUseDistribution {
    /// Builds the distribution from the eight category columns.
    ///
    /// Missing or `NA` cells count as zero, and zero-valued categories
    /// are left out. An all-zero row yields an empty distribution.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<String, FieldValue>) -> Self {
        let areas: Vec<(&str, f64)> = LAND_USE_CATEGORIES
            .iter()
            .map(|category| (*category, number(fields, category)))
            .filter(|(_, area)| *area > 0.0)
            .collect();
        let total_area: f64 = areas.iter().map(|(_, area)| area).sum();

        let shares = areas
            .into_iter()
            .map(|(category, area)| LandUseShare {
                category: category.to_owned(),
                area,
                percent: area / total_area * 100.0,
            })
            .collect();

        Self { total_area, shares }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), FieldValue::parse(v)))
            .collect()
    }

    #[test]
    fn reads_religion_shares_with_missing_as_zero() {
        let shares = ReligionShares::from_fields(&fields(&[
            ("Hindu", "0.3849"),
            ("Muslim", "0.0193"),
            ("Christian", "NA"),
            ("Sikhs", "0.5769"),
            ("Others", "0.0051"),
        ]));

        assert!((shares.hindu - 0.3849).abs() < f64::EPSILON);
        assert!(shares.christian.abs() < f64::EPSILON);
        assert!(shares.buddhist.abs() < f64::EPSILON);
        assert!((shares.sikhs - 0.5769).abs() < f64::EPSILON);
    }

    #[test]
    fn land_use_percentages_sum_to_one_hundred() {
        let distribution = LandUseDistribution::from_fields(&fields(&[
            ("Total geographical area", "5036"),
            ("Forests", "293"),
            ("Not available for cultivation", "513"),
            ("Permanent pastures and other grazing lands", "4"),
            ("Land under miscellaneous tree crops & groves", "4"),
            ("Culturable wasteland", "3"),
            ("Fallow lands other than current fallows", "9"),
            ("Current fallows", "83"),
            ("Net area sown", "4124"),
        ]));

        assert_eq!(distribution.shares.len(), 8);
        assert!((distribution.total_area - 5033.0).abs() < 1e-9);
        let sum: f64 = distribution.shares.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(distribution.shares[0].category, "Forests");
    }

    #[test]
    fn drops_zero_and_missing_categories() {
        let distribution = LandUseDistribution::from_fields(&fields(&[
            ("Forests", "NA"),
            ("Not available for cultivation", "8"),
            ("Current fallows", "0"),
            ("Net area sown", "2"),
        ]));

        let categories: Vec<_> = distribution
            .shares
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Not available for cultivation", "Net area sown"]);
        assert!((distribution.shares[0].percent - 80.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_row_is_empty() {
        let distribution = LandUseDistribution::from_fields(&BTreeMap::new());
        assert!(distribution.shares.is_empty());
        assert!(distribution.total_area.abs() < f64::EPSILON);
    }
}
