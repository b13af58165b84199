//! Plan resolution: catalog first, generator on a miss.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{PlanError, Result};
use crate::extract::extract_plan;
use crate::generator::Generator;
use crate::models::{PlanSource, Resolution, ResolutionRequest};

/// Resolves an industry pair to a plan. Holds no per-request state, so one
/// instance can be shared across concurrent requests.
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<Catalog>,
    generator: Arc<dyn Generator>,
}

impl Resolver {
    pub fn new(catalog: Arc<Catalog>, generator: Arc<dyn Generator>) -> Self {
        Self { catalog, generator }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn resolve_request(&self, request: &ResolutionRequest) -> Result<Resolution> {
        self.resolve(&request.main_industry, &request.sub_industry)
            .await
    }

    /// Exact catalog match wins; otherwise ask the generator once and
    /// extract the five sections from its text.
    pub async fn resolve(&self, main_industry: &str, sub_industry: &str) -> Result<Resolution> {
        if main_industry.is_empty() || sub_industry.is_empty() {
            return Err(PlanError::InvalidRequest {
                message: "both main_industry and sub_industry must be non-empty".to_string(),
            });
        }

        if let Some(record) = self.catalog.lookup(main_industry, sub_industry) {
            debug!("Catalog hit for ({}, {})", main_industry, sub_industry);
            return Ok(Resolution::from_catalog(record.clone()));
        }

        info!(
            "Catalog miss for ({}, {}), generating with {}",
            main_industry,
            sub_industry,
            self.generator.name()
        );
        let raw = self
            .generator
            .generate(main_industry, sub_industry)
            .await
            .map_err(|e| {
                warn!("Generator failed for ({}, {}): {}", main_industry, sub_industry, e);
                PlanError::from(e)
            })?;

        let extracted = extract_plan(&raw);
        if !extracted.missing.is_empty() {
            let missing: Vec<&str> = extracted.missing.iter().map(|s| s.label()).collect();
            warn!(
                "Generated plan for ({}, {}) is missing sections: {}",
                main_industry,
                sub_industry,
                missing.join(", ")
            );
        }

        Ok(Resolution {
            record: extracted.record,
            source: PlanSource::Generated,
            missing_sections: extracted.missing,
            raw_response: Some(raw),
        })
    }
}
