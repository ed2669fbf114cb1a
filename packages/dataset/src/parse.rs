//! Parses dataset text into [`LoadedDataset`] values.
//!
//! Uses the definition's [`DatasetFormat`] to find the region name and
//! payload of each record, regardless of how the particular file spells
//! its headers or nests its data.

use std::collections::BTreeMap;

use mausam_map_dataset_models::{
    DatasetDefinition, DatasetFormat, DatasetId, DisasterEvent, FieldValue, InfrastructureProject,
    LoadedDataset, RecordData, RegionRecord, RowFilter,
};

use crate::DatasetError;

/// Parses the full text of a dataset file according to its definition.
///
/// # Errors
///
/// Returns [`DatasetError::Parse`] if the document is structurally
/// invalid (no header row, missing region column, JSON of the wrong
/// shape). Individual malformed rows are skipped, not fatal.
pub fn parse_dataset(def: &DatasetDefinition, text: &str) -> Result<LoadedDataset, DatasetError> {
    let records = match &def.format {
        DatasetFormat::Tabular {
            region_column,
            delimiter,
            row_filter,
        } => parse_tabular(def.id, text, region_column, *delimiter, row_filter.as_ref())?,
        DatasetFormat::JsonKeyed => parse_json_keyed(def.id, text)?,
        DatasetFormat::JsonArray {
            region_field,
            items_field,
        } => parse_json_array(def.id, text, region_field, items_field)?,
    };

    log::debug!("{}: parsed {} records", def.id, records.len());

    Ok(LoadedDataset {
        id: def.id,
        records,
    })
}

fn parse_error(id: DatasetId, message: impl Into<String>) -> DatasetError {
    DatasetError::Parse {
        id,
        message: message.into(),
    }
}

/// Parses delimited text with a header row.
///
/// A row becomes a record only if it has at least as many cells as the
/// header, a non-empty region cell, and passes `row_filter`.
fn parse_tabular(
    id: DatasetId,
    text: &str,
    region_column: &str,
    delimiter: char,
    row_filter: Option<&RowFilter>,
) -> Result<Vec<RegionRecord>, DatasetError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| parse_error(id, format!("delimiter {delimiter:?} is not ASCII")))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(id, format!("unreadable header row: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(parse_error(id, "file contains no header row"));
    }

    let region_idx = headers
        .iter()
        .position(|h| h == region_column)
        .ok_or_else(|| parse_error(id, format!("missing region column '{region_column}'")))?;

    let filter_idx = match row_filter {
        Some(filter) => Some(
            headers
                .iter()
                .position(|h| *h == filter.column)
                .ok_or_else(|| {
                    parse_error(id, format!("missing filter column '{}'", filter.column))
                })?,
        ),
        None => None,
    };

    let mut records = Vec::new();

    for (line, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::debug!("{id}: skipping unreadable row {}: {e}", line + 2);
                continue;
            }
        };

        if row.len() < headers.len() {
            log::debug!(
                "{id}: skipping short row {} ({} of {} cells)",
                line + 2,
                row.len(),
                headers.len()
            );
            continue;
        }

        if let (Some(filter), Some(idx)) = (row_filter, filter_idx)
            && !filter.accepts(row.get(idx))
        {
            continue;
        }

        let region = row.get(region_idx).unwrap_or("").trim();
        if region.is_empty() {
            log::debug!("{id}: skipping row {} with empty region", line + 2);
            continue;
        }

        let fields: BTreeMap<String, FieldValue> = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), FieldValue::parse(cell)))
            .collect();

        records.push(RegionRecord {
            region: region.to_owned(),
            data: RecordData::Tabular(fields),
        });
    }

    Ok(records)
}

/// Parses a JSON object keyed by region name.
///
/// Records come out in document order. Every value must be a project
/// list; anything else fails the whole document.
fn parse_json_keyed(id: DatasetId, text: &str) -> Result<Vec<RegionRecord>, DatasetError> {
    let document: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| parse_error(id, e.to_string()))?;

    document
        .into_iter()
        .map(|(region, projects)| {
            let projects: Vec<InfrastructureProject> = serde_json::from_value(projects)
                .map_err(|e| parse_error(id, format!("projects for '{region}': {e}")))?;
            Ok(RegionRecord {
                region,
                data: RecordData::Infrastructure(projects),
            })
        })
        .collect()
}

/// Parses a JSON array of per-region objects.
///
/// Entries without a region name or with a malformed event list are
/// skipped.
fn parse_json_array(
    id: DatasetId,
    text: &str,
    region_field: &str,
    items_field: &str,
) -> Result<Vec<RegionRecord>, DatasetError> {
    let document: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|e| parse_error(id, e.to_string()))?;

    let mut records = Vec::with_capacity(document.len());

    for (idx, entry) in document.into_iter().enumerate() {
        let Some(region) = entry
            .get(region_field)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            log::debug!("{id}: skipping entry {idx} without '{region_field}'");
            continue;
        };

        let events = match entry.get(items_field) {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(items) => match serde_json::from_value::<Vec<DisasterEvent>>(items.clone()) {
                Ok(events) => events,
                Err(e) => {
                    log::debug!("{id}: skipping entry '{region}' with malformed '{items_field}': {e}");
                    continue;
                }
            },
        };

        records.push(RegionRecord {
            region: region.to_owned(),
            data: RecordData::Disasters(events),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::definition;

    const DEMOGRAPHICS_CSV: &str = "\
States/Uts,population(2024),Hindu,Muslim,Language
Kerala,35699443,0.5473,0.2656,Malayalam
Jammu & Kashmir,NA,0.2844,0.6831,Kashmiri
short,row
,123,0.1,0.1,Nowhere
";

    const LAND_USE_CSV: &str = "\
States/UTs,Category,Forests,Net area sown
Punjab,Area,293,4124
Punjab,Percentage,5.8,82.1
Haryana,Area,39,3523
";

    #[test]
    fn parses_tabular_rows_and_skips_bad_ones() {
        let dataset =
            parse_dataset(&definition(DatasetId::Demographics), DEMOGRAPHICS_CSV).unwrap();

        let regions: Vec<&str> = dataset.records.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Kerala", "Jammu & Kashmir"]);

        let fields = dataset.records[1].fields().unwrap();
        assert_eq!(fields["population(2024)"], FieldValue::NotAvailable);
        assert_eq!(fields["Muslim"], FieldValue::Number(0.6831));
        assert_eq!(fields["Language"], FieldValue::Text("Kashmiri".to_owned()));
    }

    #[test]
    fn land_use_keeps_only_area_rows() {
        let dataset = parse_dataset(&definition(DatasetId::LandUse), LAND_USE_CSV).unwrap();

        assert_eq!(dataset.records.len(), 2);
        let punjab = dataset.records[0].fields().unwrap();
        assert_eq!(punjab["Category"], FieldValue::Text("Area".to_owned()));
        assert_eq!(punjab["Forests"], FieldValue::Number(293.0));
    }

    #[test]
    fn missing_region_column_is_a_parse_error() {
        let err = parse_dataset(
            &definition(DatasetId::LandUse),
            "State,Category\nPunjab,Area\n",
        )
        .unwrap_err();

        assert!(matches!(err, DatasetError::Parse { id: DatasetId::LandUse, .. }));
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        let err = parse_dataset(&definition(DatasetId::Demographics), "").unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn parses_keyed_json() {
        let text = r#"{
            "Punjab": [{"name": "Amritsar Metro", "description": "Light rail", "sector": "Transport"}],
            "Haryana": []
        }"#;

        let dataset = parse_dataset(&definition(DatasetId::Infrastructure), text).unwrap();

        assert_eq!(dataset.records.len(), 2);
        let punjab = dataset
            .records
            .iter()
            .find(|r| r.region == "Punjab")
            .unwrap();
        match &punjab.data {
            RecordData::Infrastructure(projects) => {
                assert_eq!(projects[0].sector, "Transport");
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn keyed_json_keeps_document_order() {
        let text = r#"{
            "Goa ": [{"name": "Mopa Airport", "description": "Greenfield airport", "sector": "Aviation"}],
            "Andhra Pradesh": [],
            "Goa": [{"name": "Zuari Bridge", "description": "Cable-stayed bridge", "sector": "Transport"}]
        }"#;

        let dataset = parse_dataset(&definition(DatasetId::Infrastructure), text).unwrap();

        let regions: Vec<&str> = dataset.records.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Goa ", "Andhra Pradesh", "Goa"]);
    }

    #[test]
    fn keyed_json_with_malformed_project_list_is_a_parse_error() {
        let err = parse_dataset(
            &definition(DatasetId::Infrastructure),
            r#"{"Punjab": "Amritsar Metro"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn keyed_json_of_wrong_shape_is_a_parse_error() {
        let err =
            parse_dataset(&definition(DatasetId::Infrastructure), r#"["Punjab"]"#).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn parses_array_json_and_skips_nameless_entries() {
        let text = r#"[
            {"state": "Kerala", "recent_disasters": [
                {"event": "2018 floods", "description": "Monsoon floods", "link": "https://example.org/kerala"}
            ]},
            {"recent_disasters": []},
            {"state": "Goa"}
        ]"#;

        let dataset = parse_dataset(&definition(DatasetId::Disasters), text).unwrap();

        let regions: Vec<&str> = dataset.records.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Kerala", "Goa"]);
        assert_eq!(dataset.records[1].data, RecordData::Disasters(Vec::new()));
    }

    #[test]
    fn truncated_json_is_a_parse_error() {
        let err = parse_dataset(&definition(DatasetId::Disasters), r#"[{"state": "Ker"#)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }
}
