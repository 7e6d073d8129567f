use std::fs;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use revenue_engine::{AlertRisk, RulePolicy};
use revenue_pipeline::inventory_health::StockSimulation;
use revenue_pipeline::persistence::{apply_campaign_to_file, restock_in_file};
use revenue_pipeline::sales_loader::load_sales_file;
use revenue_pipeline::table_loader::{
    load_financials_file, load_inventory_file, load_products_file,
};
use revenue_pipeline::{Dashboard, DashboardAssembler, DashboardConfig, DashboardInputs};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "revenue-server")]
#[command(about = "Sales forecasting, recommendations and alerts from CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard from a sales export and optional tables
    Dashboard {
        /// Order-line sales CSV
        #[arg(short, long)]
        sales: String,

        /// Products CSV (product_name, revenue, growth_rate, units_sold)
        #[arg(long)]
        products: Option<String>,

        /// Inventory CSV (product_name, stock, reorder_threshold)
        #[arg(long)]
        inventory: Option<String>,

        /// Financials CSV (date, revenue, expenses, net_cash)
        #[arg(long)]
        financials: Option<String>,

        /// JSON file with `policy` and `dashboard` sections
        #[arg(short, long)]
        config: Option<String>,

        /// Restrict forecasting to one product line
        #[arg(short, long)]
        product: Option<String>,

        /// Number of recommendations to return
        #[arg(short, long)]
        top: Option<usize>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,

        /// Seed for placeholder stock levels
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Boost a product's growth rate and rewrite the products table
    ApplyCampaign {
        #[arg(long)]
        products: String,

        #[arg(short, long)]
        product: String,
    },

    /// Add a restock order to a product and rewrite the inventory table
    Restock {
        #[arg(long)]
        inventory: String,

        #[arg(short, long)]
        product: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    policy: RulePolicy,
    dashboard: DashboardConfig,
}

impl AppConfig {
    fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config '{}'", path))
    }

    fn with_overrides(mut self, top: Option<usize>, seed: Option<u64>) -> Self {
        if let Some(top) = top {
            self.dashboard.recommendation_limit = top;
        }
        if let Some(seed) = seed {
            self.dashboard.stock_simulation = StockSimulation::Seeded { seed };
        }
        self
    }
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DashboardJson<'a> {
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_filter: Option<&'a str>,
    load_ms: u128,
    pipeline_ms: u128,
    #[serde(flatten)]
    dashboard: &'a Dashboard,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
fn format_dollars(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let sign = if amount < 0.0 && whole > 0 { "-" } else { "" };

    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn print_human(dashboard: &Dashboard, product: Option<&str>, load_ms: u128, pipeline_ms: u128) {
    let rule = "\u{2550}".repeat(62);
    println!();
    println!("  \u{2554}{}\u{2557}", rule);
    println!("  \u{2551}{:^62}\u{2551}", "REVENUE DASHBOARD");
    println!("  \u{255a}{}\u{255d}", rule);
    println!();

    let stats = &dashboard.stats;
    println!(
        "  {} product lines  \u{00b7}  {} recommendations  \u{00b7}  {} alerts  \u{00b7}  {} at stock risk",
        stats.total_products, stats.alerts_count, stats.active_alerts, stats.inventory_risk
    );
    if let Some(product) = product {
        println!("  Forecast scope: {}", product);
    }
    println!();

    println!("  Recommendations");
    println!("  {:\u{2500}<64}", "");
    if dashboard.recommendations.is_empty() {
        println!("  Nothing to act on.");
    }
    for (i, rec) in dashboard.recommendations.iter().enumerate() {
        println!(
            "  {}. [{:9}] {:40} {:>3.0}%",
            i + 1,
            rec.kind.to_string(),
            rec.title,
            rec.confidence * 100.0
        );
        println!("       {}  \u{2192} {}", rec.description, rec.action);
    }
    println!();

    if !dashboard.alerts.is_empty() {
        println!("  Alerts");
        println!("  {:\u{2500}<64}", "");
        for alert in &dashboard.alerts {
            let icon = match alert.risk {
                AlertRisk::High => "!!",
                AlertRisk::Low => "! ",
            };
            println!("  {} {:10} {} ({})", icon, alert.kind, alert.title, alert.time);
            println!("       {}", alert.description);
        }
        println!();
    }

    println!("  Forecast");
    println!("  {:\u{2500}<64}", "");
    for report in &dashboard.revenue_forecast {
        let next: Vec<String> = report
            .forecast
            .predictions
            .iter()
            .map(|p| format!("${}", format_dollars(*p)))
            .collect();
        println!(
            "  {:20} {}  (velocity {:.2}, confidence {:.0}%)",
            report.product,
            next.join(" "),
            report.forecast.velocity,
            report.forecast.confidence * 100.0
        );
    }
    println!();

    println!("  Inventory health");
    println!("  {:\u{2500}<64}", "");
    for row in &dashboard.inventory_health {
        let marker = if row.synthetic { "*" } else { " " };
        println!(
            "  {:20} {:>6}{} units  {:>4} days  {}",
            row.product,
            row.stock_level,
            marker,
            row.days_remaining,
            row.status
        );
    }
    if dashboard.inventory_health.iter().any(|r| r.synthetic) {
        println!("  * placeholder stock, not in the inventory table");
    }
    println!();

    println!("  Cash flow");
    println!("  {:\u{2500}<64}", "");
    for period in &dashboard.cash_flow {
        println!(
            "  {:10} revenue ${:>12}  expenses ${:>12}  net ${:>12}",
            period.month,
            format_dollars(period.revenue),
            format_dollars(period.expenses),
            format_dollars(period.net)
        );
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

struct DashboardArgs {
    sales: String,
    products: Option<String>,
    inventory: Option<String>,
    financials: Option<String>,
    config: Option<String>,
    product: Option<String>,
    top: Option<usize>,
    json: bool,
    seed: Option<u64>,
}

fn load_inputs(args: &DashboardArgs) -> Result<DashboardInputs> {
    let sales = load_sales_file(&args.sales)
        .with_context(|| format!("Error loading sales '{}'", args.sales))?;
    let products = match &args.products {
        Some(path) => load_products_file(path)
            .with_context(|| format!("Error loading products '{}'", path))?,
        None => Vec::new(),
    };
    let inventory = match &args.inventory {
        Some(path) => load_inventory_file(path)
            .with_context(|| format!("Error loading inventory '{}'", path))?,
        None => Vec::new(),
    };
    let financials = match &args.financials {
        Some(path) => Some(
            load_financials_file(path)
                .with_context(|| format!("Error loading financials '{}'", path))?,
        ),
        None => None,
    };

    Ok(DashboardInputs {
        sales,
        products,
        inventory,
        financials,
    })
}

async fn run_dashboard(args: DashboardArgs) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref())?.with_overrides(args.top, args.seed);

    let load_start = Instant::now();
    let inputs = load_inputs(&args)?;
    let load_ms = load_start.elapsed().as_millis();
    log::info!(
        "loaded {} sales rows, {} products, {} inventory rows",
        inputs.sales.len(),
        inputs.products.len(),
        inputs.inventory.len()
    );

    let pipeline_start = Instant::now();
    let assembler = DashboardAssembler::new(inputs, config.policy, config.dashboard)
        .context("Input tables failed validation")?;
    let dashboard = assembler.assemble("dashboard-001", args.product.clone()).await;
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if args.json {
        let output = DashboardJson {
            generated_at: Utc::now().to_rfc3339(),
            product_filter: args.product.as_deref(),
            load_ms,
            pipeline_ms,
            dashboard: &dashboard,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_human(&dashboard, args.product.as_deref(), load_ms, pipeline_ms);
    }
    Ok(())
}

fn run_apply_campaign(products: &str, product: &str) -> Result<()> {
    match apply_campaign_to_file(products, product)
        .with_context(|| format!("Error updating products '{}'", products))?
    {
        Some(row) => {
            println!(
                "Campaign applied to {}: growth rate now {:.1}%",
                row.product_name,
                row.growth_rate * 100.0
            );
            Ok(())
        }
        None => bail!("Product '{}' not found in '{}'", product, products),
    }
}

fn run_restock(inventory: &str, product: &str) -> Result<()> {
    match restock_in_file(inventory, product)
        .with_context(|| format!("Error updating inventory '{}'", inventory))?
    {
        Some(row) => {
            println!(
                "Restocked {}: {} units on hand (reorder threshold {})",
                row.product_name, row.stock, row.reorder_threshold
            );
            Ok(())
        }
        None => bail!("Product '{}' not found in '{}'", product, inventory),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard {
            sales,
            products,
            inventory,
            financials,
            config,
            product,
            top,
            json,
            seed,
        } => {
            run_dashboard(DashboardArgs {
                sales,
                products,
                inventory,
                financials,
                config,
                product,
                top,
                json,
                seed,
            })
            .await
        }
        Commands::ApplyCampaign { products, product } => run_apply_campaign(&products, &product),
        Commands::Restock { inventory, product } => run_restock(&inventory, &product),
    }
}
