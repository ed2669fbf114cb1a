//! Compile-time registry of dataset definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Pointing a dataset at a differently laid out file only requires editing
//! its TOML under `datasets/`.

use mausam_map_dataset_models::{DatasetDefinition, DatasetId};

/// Embedded TOML dataset definitions.
const DATASET_TOMLS: &[(&str, &str)] = &[
    ("demographics", include_str!("../datasets/demographics.toml")),
    ("land_use", include_str!("../datasets/land_use.toml")),
    (
        "infrastructure",
        include_str!("../datasets/infrastructure.toml"),
    ),
    ("disasters", include_str!("../datasets/disasters.toml")),
];

/// Returns all registered dataset definitions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_definitions() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse dataset definition '{name}': {e}"))
        })
        .collect()
}

/// Returns the definition for a dataset.
///
/// # Panics
///
/// Panics if an embedded definition is malformed or a [`DatasetId`] has
/// no definition; both are enforced by tests.
#[must_use]
pub fn definition(id: DatasetId) -> DatasetDefinition {
    all_definitions()
        .into_iter()
        .find(|def| def.id == id)
        .unwrap_or_else(|| panic!("No dataset definition registered for '{id}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mausam_map_dataset_models::DatasetFormat;
    use std::collections::BTreeSet;

    #[test]
    fn every_dataset_id_has_exactly_one_definition() {
        let definitions = all_definitions();
        assert_eq!(definitions.len(), DatasetId::all().len());

        let mut seen = BTreeSet::new();
        for def in &definitions {
            assert!(seen.insert(def.id), "Duplicate dataset definition: {}", def.id);
        }
        for id in DatasetId::all() {
            assert!(seen.contains(id), "Missing dataset definition: {id}");
        }
    }

    #[test]
    fn definitions_name_their_files() {
        for def in &all_definitions() {
            assert!(!def.name.is_empty(), "Dataset {} has empty name", def.id);
            assert!(!def.file.is_empty(), "Dataset {} has empty file", def.id);
        }
    }

    #[test]
    fn region_columns_differ_between_tables() {
        let column = |id| match definition(id).format {
            DatasetFormat::Tabular { region_column, .. } => region_column,
            other => panic!("{id} is not tabular: {other:?}"),
        };

        assert_eq!(column(DatasetId::Demographics), "States/Uts");
        assert_eq!(column(DatasetId::LandUse), "States/UTs");
    }

    #[test]
    fn land_use_keeps_only_area_rows() {
        match definition(DatasetId::LandUse).format {
            DatasetFormat::Tabular { row_filter, .. } => {
                let filter = row_filter.expect("land use has a row filter");
                assert_eq!(filter.column, "Category");
                assert_eq!(filter.equals, "Area");
            }
            other => panic!("land use is not tabular: {other:?}"),
        }
    }
}
