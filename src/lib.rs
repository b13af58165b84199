//! bizplan: resolve a (main industry, sub industry) pair to a five-section
//! business plan, from a curated catalog when possible and from a language
//! model otherwise.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod http;
pub mod models;
pub mod prompts;
pub mod resolver;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{PlanError, Result};
pub use models::{PlanRecord, PlanSource, Resolution, ResolutionRequest, Section};
pub use resolver::Resolver;

use std::sync::Arc;

/// Load the catalog and generator named by `config` and wire them into a resolver.
pub fn build_resolver(config: &Config) -> Result<Resolver> {
    let catalog = Catalog::from_path(&config.dataset.path)?;
    let generator = generator::create_generator(config)?;
    Ok(Resolver::new(Arc::new(catalog), generator))
}
