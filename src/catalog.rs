//! Read-only catalog of precomputed business plans keyed by industry pair.
//!
//! Built once at startup from a CSV dataset and shared behind an `Arc`.
//! Lookups are exact and case-sensitive; nothing is trimmed or folded.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{PlanError, Result};
use crate::models::{CatalogEntry, PlanRecord};

pub const COL_MAIN_INDUSTRY: &str = "Main Industry";
pub const COL_SUB_INDUSTRY: &str = "Sub-Industry";
pub const COL_BUSINESS_GOALS: &str = "Business Goals";
pub const COL_CHALLENGES: &str = "Challenges";
pub const COL_TARGET_AUDIENCE: &str = "Target Audience";
pub const COL_REVENUE_STREAMS: &str = "Revenue Streams";

/// Columns the dataset must carry, in canonical order
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_MAIN_INDUSTRY,
    COL_SUB_INDUSTRY,
    COL_BUSINESS_GOALS,
    COL_CHALLENGES,
    COL_TARGET_AUDIENCE,
    COL_REVENUE_STREAMS,
];

/// Header positions of the required columns
struct ColumnIndex {
    main: usize,
    sub: usize,
    goals: usize,
    challenges: usize,
    audience: usize,
    revenue: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(PlanError::DataLoad {
                message: format!("dataset is missing required columns: {}", missing.join(", ")),
            });
        }

        // All present after the check above.
        let at = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            main: at(COL_MAIN_INDUSTRY),
            sub: at(COL_SUB_INDUSTRY),
            goals: at(COL_BUSINESS_GOALS),
            challenges: at(COL_CHALLENGES),
            audience: at(COL_TARGET_AUDIENCE),
            revenue: at(COL_REVENUE_STREAMS),
        })
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<(String, String), usize>,
    main_industries: Vec<String>,
    sub_industries: HashMap<String, Vec<String>>,
}

impl Catalog {
    /// Load the catalog from a CSV file with a header row.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PlanError::DataLoad {
            message: format!("cannot open dataset {}: {}", path.display(), e),
        })?;
        let catalog = Self::from_reader(file)?;
        info!(
            "Loaded catalog from {} ({} entries, {} main industries)",
            path.display(),
            catalog.len(),
            catalog.main_industries.len()
        );
        Ok(catalog)
    }

    /// Load the catalog from any CSV source with a header row.
    ///
    /// Fails if a required column is missing, a row is malformed, or a row
    /// has an empty key or core field. Duplicate keys keep the first row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let cols = ColumnIndex::from_headers(&headers)?;

        let mut entries = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result?;
            let field = |idx: usize, name: &str| -> Result<String> {
                match record.get(idx) {
                    Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
                    _ => Err(PlanError::DataLoad {
                        message: format!("row {}: column '{}' is empty", row, name),
                    }),
                }
            };

            entries.push(CatalogEntry {
                main_industry: field(cols.main, COL_MAIN_INDUSTRY)?,
                sub_industry: field(cols.sub, COL_SUB_INDUSTRY)?,
                plan: PlanRecord {
                    business_goals: field(cols.goals, COL_BUSINESS_GOALS)?,
                    challenges: field(cols.challenges, COL_CHALLENGES)?,
                    target_audience: field(cols.audience, COL_TARGET_AUDIENCE)?,
                    revenue_streams: field(cols.revenue, COL_REVENUE_STREAMS)?,
                    profit_range: None,
                },
            });
        }

        Ok(Self::from_entries(entries))
    }

    /// Build a catalog from in-memory entries. Duplicate keys keep the first entry.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            let key = (entry.main_industry.clone(), entry.sub_industry.clone());
            if catalog.index.contains_key(&key) {
                warn!(
                    "Duplicate catalog entry ({:?}, {:?}); keeping the first",
                    key.0, key.1
                );
                continue;
            }

            if !catalog.sub_industries.contains_key(&entry.main_industry) {
                catalog.main_industries.push(entry.main_industry.clone());
            }
            let subs = catalog
                .sub_industries
                .entry(entry.main_industry.clone())
                .or_default();
            if !subs.contains(&entry.sub_industry) {
                subs.push(entry.sub_industry.clone());
            }

            catalog.index.insert(key, catalog.entries.len());
            catalog.entries.push(entry);
        }
        debug!("Catalog built with {} entries", catalog.entries.len());
        catalog
    }

    /// Unique main industries in first-seen order
    pub fn list_main_industries(&self) -> &[String] {
        &self.main_industries
    }

    /// Unique sub-industries under an exact main industry; empty if unknown
    pub fn list_sub_industries(&self, main_industry: &str) -> &[String] {
        self.sub_industries
            .get(main_industry)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exact, case-sensitive lookup on both labels
    pub fn lookup(&self, main_industry: &str, sub_industry: &str) -> Option<&PlanRecord> {
        self.index
            .get(&(main_industry.to_string(), sub_industry.to_string()))
            .map(|&i| &self.entries[i].plan)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
