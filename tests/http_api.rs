//! HTTP API routes and error bodies

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use bizplan::generator::{Generator, GeneratorError};
use bizplan::http::{HttpState, router};
use bizplan::models::CatalogEntry;
use bizplan::{Catalog, PlanRecord, Resolver};
use serde_json::Value;
use tower::ServiceExt;

struct CannedGenerator;

#[async_trait]
impl Generator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _: &str, _: &str) -> Result<String, GeneratorError> {
        Ok("Business Goals: Go mobile.\nChallenges: Permits.\nTarget Audience: Commuters.\nRevenue Streams: Street sales.\nProfit Range: 10%".into())
    }
}

fn app() -> axum::Router {
    let catalog = Catalog::from_entries(vec![CatalogEntry::new(
        "Food & Beverage",
        "Bakery",
        PlanRecord {
            business_goals: "Expand to 3 cities".into(),
            challenges: "Supply chain".into(),
            target_audience: "Urban millennials".into(),
            revenue_streams: "Subscription boxes".into(),
            profit_range: None,
        },
    )]);
    let resolver = Resolver::new(Arc::new(catalog), Arc::new(CannedGenerator));
    router(HttpState::new(resolver), Duration::from_secs(5))
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn plan_request(main: &str, sub: &str) -> Request<Body> {
    let body = serde_json::json!({"main_industry": main, "sub_industry": sub});
    Request::post("/plan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn lists_industries_and_sub_industries() {
    let resp = app()
        .oneshot(Request::get("/industries").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["industries"][0], "Food & Beverage");

    let resp = app()
        .oneshot(
            Request::get("/sub-industries?main=Food%20%26%20Beverage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(resp).await;
    assert_eq!(body["main_industry"], "Food & Beverage");
    assert_eq!(body["sub_industries"][0], "Bakery");

    let resp = app()
        .oneshot(
            Request::get("/sub-industries?main=Aerospace")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["sub_industries"], serde_json::json!([]));
}

#[tokio::test]
async fn catalog_hit_over_http() {
    let resp = app()
        .oneshot(plan_request("Food & Beverage", "Bakery"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["source"], "catalog");
    assert_eq!(body["record"]["challenges"], "Supply chain");
    assert!(body["record"].get("profit_range").is_none());
    assert!(body.get("raw_response").is_none());
}

#[tokio::test]
async fn miss_is_generated_over_http() {
    let resp = app()
        .oneshot(plan_request("Food & Beverage", "Food Truck"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["source"], "generated");
    assert_eq!(body["record"]["business_goals"], "Go mobile.");
    assert_eq!(body["record"]["profit_range"], "10%");
    assert_eq!(body["missing_sections"], serde_json::json!([]));
}

#[tokio::test]
async fn blank_label_is_400_with_error_body() {
    let resp = app().oneshot(plan_request("", "Bakery")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["details"].as_str().unwrap().contains("non-empty"));
}
