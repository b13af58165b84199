//! Data model shared by the catalog, the generator fallback and the outer surfaces

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five-field structured business plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub business_goals: String,
    pub challenges: String,
    pub target_audience: String,
    pub revenue_streams: String,
    /// Never populated for catalog-sourced records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_range: Option<String>,
}

/// One row of the catalog: compound key plus its plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub main_industry: String,
    pub sub_industry: String,
    pub plan: PlanRecord,
}

impl CatalogEntry {
    pub fn new(
        main_industry: impl Into<String>,
        sub_industry: impl Into<String>,
        plan: PlanRecord,
    ) -> Self {
        Self {
            main_industry: main_industry.into(),
            sub_industry: sub_industry.into(),
            plan,
        }
    }
}

/// A caller-supplied industry pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub main_industry: String,
    pub sub_industry: String,
}

/// Where a resolved plan came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Catalog,
    Generated,
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::Catalog => write!(f, "catalog"),
            PlanSource::Generated => write!(f, "generated"),
        }
    }
}

/// Labelled sections of a plan, in the order the prompt asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BusinessGoals,
    Challenges,
    TargetAudience,
    RevenueStreams,
    ProfitRange,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::BusinessGoals,
        Section::Challenges,
        Section::TargetAudience,
        Section::RevenueStreams,
        Section::ProfitRange,
    ];

    /// Human-readable label as it appears in prompts and dataset headers
    pub fn label(self) -> &'static str {
        match self {
            Section::BusinessGoals => "Business Goals",
            Section::Challenges => "Challenges",
            Section::TargetAudience => "Target Audience",
            Section::RevenueStreams => "Revenue Streams",
            Section::ProfitRange => "Profit Range",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of a resolution: the plan, its source, and what the fallback could not find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub record: PlanRecord,
    pub source: PlanSource,
    /// Sections the extraction rule found no marker for. Empty for catalog hits.
    #[serde(default)]
    pub missing_sections: Vec<Section>,
    /// Raw model text for generated plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl Resolution {
    pub fn from_catalog(record: PlanRecord) -> Self {
        Self {
            record,
            source: PlanSource::Catalog,
            missing_sections: Vec::new(),
            raw_response: None,
        }
    }

    /// True when a generated plan is missing one or more sections
    pub fn is_degraded(&self) -> bool {
        !self.missing_sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&PlanSource::Generated).unwrap();
        assert_eq!(json, "\"generated\"");
        assert_eq!(PlanSource::Catalog.to_string(), "catalog");
    }

    #[test]
    fn absent_profit_range_is_omitted() {
        let record = PlanRecord {
            business_goals: "Grow".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("profit_range").is_none());
        assert_eq!(value["business_goals"], "Grow");
    }

    #[test]
    fn catalog_resolution_is_not_degraded() {
        let res = Resolution::from_catalog(PlanRecord::default());
        assert_eq!(res.source, PlanSource::Catalog);
        assert!(!res.is_degraded());
        assert!(res.raw_response.is_none());
    }
}
