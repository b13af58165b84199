//! End-to-end resolution behavior with a counting stub generator

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bizplan::generator::{Generator, GeneratorError};
use bizplan::models::CatalogEntry;
use bizplan::{Catalog, PlanError, PlanRecord, PlanSource, Resolver, Section};

const FULL_REPLY: &str = "1. **Business Goals**: Launch two trucks in year one.\n\
2. **Challenges**: Permits and parking.\n\
3. **Target Audience**: Office workers at lunch.\n\
4. **Revenue Streams**: Street sales and catering.\n\
5. **Profit Range**: 8-15% net margin.";

struct CountingGenerator {
    reply: String,
    calls: AtomicUsize,
    last_pair: std::sync::Mutex<Option<(String, String)>>,
}

impl CountingGenerator {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_pair: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for CountingGenerator {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, main: &str, sub: &str) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_pair.lock().unwrap() = Some((main.to_string(), sub.to_string()));
        Ok(self.reply.clone())
    }
}

fn bakery() -> PlanRecord {
    PlanRecord {
        business_goals: "Expand to 3 cities".into(),
        challenges: "Supply chain".into(),
        target_audience: "Urban millennials".into(),
        revenue_streams: "Subscription boxes".into(),
        profit_range: None,
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_entries(vec![
        CatalogEntry::new("Food & Beverage", "Bakery", bakery()),
        CatalogEntry::new(
            "Retail",
            "Grocery",
            PlanRecord {
                business_goals: "Open a second store".into(),
                challenges: "Thin margins".into(),
                target_audience: "Families".into(),
                revenue_streams: "In-store sales".into(),
                profit_range: None,
            },
        ),
    ]))
}

#[tokio::test]
async fn bakery_is_served_from_catalog() {
    let generator = CountingGenerator::new(FULL_REPLY);
    let resolver = Resolver::new(catalog(), generator.clone());

    let resolution = resolver.resolve("Food & Beverage", "Bakery").await.unwrap();
    assert_eq!(resolution.source, PlanSource::Catalog);
    assert_eq!(resolution.record, bakery());
    assert!(resolution.missing_sections.is_empty());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn food_truck_falls_back_to_generator_once() {
    let generator = CountingGenerator::new(FULL_REPLY);
    let resolver = Resolver::new(catalog(), generator.clone());

    let resolution = resolver
        .resolve("Food & Beverage", "Food Truck")
        .await
        .unwrap();
    assert_eq!(resolution.source, PlanSource::Generated);
    assert_eq!(generator.calls(), 1);
    assert_eq!(
        generator.last_pair.lock().unwrap().clone(),
        Some(("Food & Beverage".to_string(), "Food Truck".to_string()))
    );
    assert_eq!(
        resolution.record.business_goals,
        "Launch two trucks in year one."
    );
    assert_eq!(
        resolution.record.profit_range.as_deref(),
        Some("8-15% net margin.")
    );
    assert!(!resolution.is_degraded());
    assert_eq!(resolution.raw_response.as_deref(), Some(FULL_REPLY));
}

#[tokio::test]
async fn empty_labels_never_reach_generator() {
    let generator = CountingGenerator::new(FULL_REPLY);
    let resolver = Resolver::new(catalog(), generator.clone());

    for (main, sub) in [("", "Bakery"), ("Food & Beverage", ""), ("", "")] {
        let err = resolver.resolve(main, sub).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest { .. }));
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn whitespace_label_reaches_generator_verbatim() {
    let generator = CountingGenerator::new(FULL_REPLY);
    let resolver = Resolver::new(catalog(), generator.clone());

    let resolution = resolver.resolve(" ", "Bakery").await.unwrap();
    assert_eq!(resolution.source, PlanSource::Generated);
    assert_eq!(generator.calls(), 1);
    assert_eq!(
        generator.last_pair.lock().unwrap().clone(),
        Some((" ".to_string(), "Bakery".to_string()))
    );
}

#[tokio::test]
async fn lookup_is_case_sensitive() {
    let generator = CountingGenerator::new(FULL_REPLY);
    let resolver = Resolver::new(catalog(), generator.clone());

    let resolution = resolver.resolve("retail", "Grocery").await.unwrap();
    assert_eq!(resolution.source, PlanSource::Generated);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn missing_marker_degrades_without_error() {
    let reply = "Business Goals: Grow.\nTarget Audience: Teens.\nRevenue Streams: Ads.";
    let generator = CountingGenerator::new(reply);
    let resolver = Resolver::new(catalog(), generator.clone());

    let resolution = resolver.resolve("Media", "Podcast").await.unwrap();
    assert_eq!(resolution.record.challenges, "");
    assert_eq!(resolution.record.target_audience, "Teens.");
    assert_eq!(
        resolution.missing_sections,
        vec![Section::Challenges, Section::ProfitRange]
    );
    assert!(resolution.is_degraded());
}

#[test]
fn unknown_main_has_no_sub_industries() {
    let catalog = catalog();
    assert!(catalog.list_sub_industries("Aerospace").is_empty());
    assert_eq!(catalog.list_sub_industries("Food & Beverage"), ["Bakery"]);
}
