use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use bizplan::config::{self, Config};
use bizplan::http::{self, HttpState};
use bizplan::{Catalog, PlanSource, Resolution, Section, build_resolver};
use clap::{Parser, Subcommand};
use prettytable::{Table, row};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bizplan")]
#[command(about = "Business plan lookup with language-model fallback")]
struct Cli {
    /// Path to a TOML config file (defaults to BIZPLAN_CONFIG or bizplan.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List main industries in the catalog
    Industries,
    /// List sub-industries recorded under a main industry
    SubIndustries {
        /// Main industry label (exact, case-sensitive)
        main: String,
    },
    /// Resolve a plan for an industry pair
    Resolve {
        main: String,
        sub: String,
        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP API
    Serve {
        /// Override [server] bind
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_env_file();

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bizplan=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Industries => {
            let catalog = Catalog::from_path(&config.dataset.path)?;
            print_industries(&catalog);
        }
        Commands::SubIndustries { main } => {
            let catalog = Catalog::from_path(&config.dataset.path)?;
            let subs = catalog.list_sub_industries(&main);
            if subs.is_empty() {
                println!("No sub-industries recorded for '{}'.", main);
            }
            for sub in subs {
                println!("{}", sub);
            }
        }
        Commands::Resolve { main, sub, json } => {
            let resolver = build_resolver(&config)?;
            let resolution = resolver.resolve(&main, &sub).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                print!("{}", render_plan(&resolution));
            }
        }
        Commands::Serve { bind } => {
            let resolver = build_resolver(&config)?;
            let bind = bind.unwrap_or(config.server.bind);
            info!(
                "Serving {} catalog entries, generator={}",
                resolver.catalog().len(),
                resolver.generator_name()
            );
            let timeout = Duration::from_millis(config.runtime.http_request_timeout_ms);
            http::serve(bind, HttpState::new(resolver), timeout).await?;
        }
    }

    Ok(())
}

fn print_industries(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("Catalog is empty.");
        return;
    }
    let mut table = Table::new();
    table.add_row(row!["Main Industry", "Sub-industries"]);
    for main in catalog.list_main_industries() {
        table.add_row(row![main, catalog.list_sub_industries(main).len()]);
    }
    table.printstd();
}

/// `**Label**: body` per section; Profit Range only when present.
fn render_plan(resolution: &Resolution) -> String {
    let record = &resolution.record;
    let mut out = String::new();
    for section in Section::ALL {
        let body = match section {
            Section::BusinessGoals => record.business_goals.as_str(),
            Section::Challenges => record.challenges.as_str(),
            Section::TargetAudience => record.target_audience.as_str(),
            Section::RevenueStreams => record.revenue_streams.as_str(),
            Section::ProfitRange => match record.profit_range.as_deref() {
                Some(p) => p,
                None => continue,
            },
        };
        out.push_str(&format!("**{}**: {}\n", section.label(), body));
    }
    if resolution.source == PlanSource::Generated && resolution.is_degraded() {
        let missing: Vec<&str> = resolution
            .missing_sections
            .iter()
            .filter(|s| **s != Section::ProfitRange)
            .map(|s| s.label())
            .collect();
        if !missing.is_empty() {
            out.push_str(&format!(
                "\n(generated plan is missing: {})\n",
                missing.join(", ")
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizplan::PlanRecord;

    fn record() -> PlanRecord {
        PlanRecord {
            business_goals: "Grow".into(),
            challenges: "Costs".into(),
            target_audience: "Locals".into(),
            revenue_streams: "Sales".into(),
            profit_range: None,
        }
    }

    #[test]
    fn catalog_plan_omits_profit_range() {
        let text = render_plan(&Resolution::from_catalog(record()));
        assert_eq!(
            text,
            "**Business Goals**: Grow\n**Challenges**: Costs\n**Target Audience**: Locals\n**Revenue Streams**: Sales\n"
        );
    }

    #[test]
    fn generated_plan_shows_profit_range_and_gaps() {
        let mut rec = record();
        rec.challenges.clear();
        rec.profit_range = Some("10-20%".into());
        let resolution = Resolution {
            record: rec,
            source: PlanSource::Generated,
            missing_sections: vec![Section::Challenges],
            raw_response: Some("raw".into()),
        };
        let text = render_plan(&resolution);
        assert!(text.contains("**Profit Range**: 10-20%\n"));
        assert!(text.contains("missing: Challenges"));
    }
}
