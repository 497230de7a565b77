//! Salesboard CLI
//!
//! Command-line interface for the sales dashboard:
//! - Browse and search transactions
//! - Monthly statistics and charts
//! - Seed or import the record store
//! - Check server status

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use salesboard::analytics::{BucketCount, CombinedView, Page, Statistics};
use salesboard::api::dto::SeedResponse;
use salesboard::config::{generate_default_config, Config};
use salesboard::import::import_file;
use salesboard::storage::{open_store, CategoryCount, SaleRecord};

#[derive(Parser)]
#[command(name = "salesboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sales dashboard command-line client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:3001", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Config file for offline commands (defaults to the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search transactions
    List {
        /// Text to match in title, description or price
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long)]
        page: Option<i64>,
        #[arg(long)]
        per_page: Option<i64>,
    },

    /// Revenue and sold/unsold counts for a month
    Stats {
        /// Month name, e.g. April
        month: String,
    },

    /// Price histogram for a month
    BarChart { month: String },

    /// Category split for a month
    PieChart { month: String },

    /// All views for a month in one call
    Combined {
        month: String,
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long)]
        page: Option<i64>,
        #[arg(long)]
        per_page: Option<i64>,
    },

    /// Replace the server's records with the seed feed
    Seed {
        /// Import this file into the local store instead of calling the server
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show server status
    Status,

    /// Import a seed JSON file straight into the configured store
    Import {
        #[arg(long)]
        file: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    salesboard::logging::init(&config.logging, true)?;

    let api = ApiClient::new(&cli.api_url);

    match cli.command {
        Commands::List {
            search,
            page,
            per_page,
        } => {
            let query = page_query(search, page, per_page);
            let page: Page<SaleRecord> = api.get("/api/transactions/list", &query).await?;

            match cli.format {
                OutputFormat::Json => print_json(&page)?,
                OutputFormat::Table => print_page(&page),
            }
        }

        Commands::Stats { month } => {
            let stats: Statistics = api
                .get("/api/transactions/statistics", &[("month", month.clone())])
                .await?;

            match cli.format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Table => print_statistics(&month, &stats),
            }
        }

        Commands::BarChart { month } => {
            let buckets: Vec<BucketCount> = api
                .get("/api/transactions/bar-chart", &[("month", month)])
                .await?;

            match cli.format {
                OutputFormat::Json => print_json(&buckets)?,
                OutputFormat::Table => print_histogram(&buckets),
            }
        }

        Commands::PieChart { month } => {
            let categories: Vec<CategoryCount> = api
                .get("/api/transactions/pie-chart", &[("month", month)])
                .await?;

            match cli.format {
                OutputFormat::Json => print_json(&categories)?,
                OutputFormat::Table => print_categories(&categories),
            }
        }

        Commands::Combined {
            month,
            search,
            page,
            per_page,
        } => {
            let mut query = page_query(search, page, per_page);
            query.push(("month", month.clone()));
            let view: CombinedView = api.get("/api/transactions/combined", &query).await?;

            match cli.format {
                OutputFormat::Json => print_json(&view)?,
                OutputFormat::Table => {
                    print_statistics(&month, &view.statistics);
                    println!();
                    print_histogram(&view.bar_chart);
                    println!();
                    print_categories(&view.pie_chart);
                    println!();
                    print_page(&view.transactions);
                }
            }
        }

        Commands::Seed { file: Some(path) } | Commands::Import { file: path } => {
            import_offline(&config, &path).await?;
        }

        Commands::Seed { file: None } => {
            let response: SeedResponse = api.post("/api/transactions/seed").await?;

            match cli.format {
                OutputFormat::Json => print_json(&response)?,
                OutputFormat::Table => {
                    println!("{}", response.message);
                    println!("  Records stored: {}", response.stored);
                    println!("  Without sale date: {}", response.null_dates);
                }
            }
        }

        Commands::Status => match api.get::<serde_json::Value>("/health", &[]).await {
            Ok(health) => {
                if cli.format == OutputFormat::Json {
                    print_json(&health)?;
                } else {
                    println!("Salesboard v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!(
                        "Store: {} ({})",
                        health["storage"].as_str().unwrap_or("unknown"),
                        health["backend"].as_str().unwrap_or("unknown")
                    );
                    if let Some(records) = health["records"].as_u64() {
                        println!("Records: {}", records);
                    }
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
            }
            Err(e) => {
                eprintln!("Cannot reach Salesboard API at {}", cli.api_url);
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the API server is running:");
                eprintln!("  cargo run --bin salesboard");
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Minimal JSON client for the dashboard API
struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Box<dyn std::error::Error>> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, Box<dyn std::error::Error>> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(body) if body["error"].is_object() => format!(
                "{}: {}",
                body["error"]["code"].as_str().unwrap_or("ERROR"),
                body["error"]["message"].as_str().unwrap_or("")
            ),
            _ => text,
        };
        Err(format!("Request failed ({}): {}", status, message).into())
    }
}

fn page_query(search: String, page: Option<i64>, per_page: Option<i64>) -> Vec<(&'static str, String)> {
    let mut query = vec![("search", search)];
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    if let Some(per_page) = per_page {
        query.push(("perPage", per_page.to_string()));
    }
    query
}

async fn import_offline(config: &Config, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        eprintln!("File not found: {:?}", path);
        std::process::exit(1);
    }

    let store = open_store(&config.storage)?;
    let report = import_file(path, store.as_ref()).await?;

    println!("Import results:");
    println!("  Records read: {}", report.fetched);
    println!("  Records stored: {}", report.stored);
    println!("  Without sale date: {}", report.null_dates);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_page(page: &Page<SaleRecord>) {
    if page.docs.is_empty() {
        println!("No transactions (page {} of {})", page.page, page.total_pages);
        return;
    }

    println!(
        "{:<6} {:<36} {:>10} {:<20} {:<6} {}",
        "ID", "Title", "Price", "Category", "Sold", "Date of sale"
    );
    println!("{}", "-".repeat(100));

    for record in &page.docs {
        let date = record
            .date_of_sale
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<6} {:<36} {:>10.2} {:<20} {:<6} {}",
            record.id,
            truncate(&record.title, 36),
            record.price,
            truncate(&record.category, 20),
            if record.sold { "yes" } else { "no" },
            date
        );
    }

    println!();
    println!(
        "Page {} of {} ({} matching)",
        page.page, page.total_pages, page.total_docs
    );
}

fn print_statistics(month: &str, stats: &Statistics) {
    println!("Statistics for {}", month);
    println!("  Total sale amount: {:.2}", stats.total_amount);
    println!("  Sold items:        {}", stats.sold_items);
    println!("  Not sold items:    {}", stats.not_sold_items);
}

fn print_histogram(buckets: &[BucketCount]) {
    let widest = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    println!("{:<10} {:>6}", "Range", "Count");
    println!("{}", "-".repeat(50));
    for bucket in buckets {
        let bar = (bucket.count * 30 / widest) as usize;
        println!("{:<10} {:>6} {}", bucket.range, bucket.count, "#".repeat(bar));
    }
}

fn print_categories(categories: &[CategoryCount]) {
    if categories.is_empty() {
        println!("No sales in this month");
        return;
    }

    println!("{:<30} {:>6}", "Category", "Count");
    println!("{}", "-".repeat(37));
    for entry in categories {
        println!("{:<30} {:>6}", entry.category, entry.count);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
