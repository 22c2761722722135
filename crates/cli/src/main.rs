//! Console front-end over the product rule engine.
//!
//! Every run wires the engine over the seeded in-memory catalog, so this
//! is a demo and manual test bench, not a persistence tool: state lasts for
//! one invocation. Business failures print their message and exit nonzero;
//! internal faults surface as errors.

use anyhow::Context;
use clap::{Parser, Subcommand};

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tradegate_catalog::{NewProduct, Product, ProductDetail};
use tradegate_core::{CategoryId, Entity, Money, ProductId};
use tradegate_engine::{EngineConfig, EngineError, ProductEngine, ProductFilter};
use tradegate_store::{CategoryProvider, InMemoryCatalog, ProductStore};

#[derive(Parser, Debug)]
#[command(name = "tradegate", version, about = "Product catalog rule engine console")]
struct Cli {
    /// Local hour during which the details view is refused.
    #[arg(long, env = "TRADEGATE_MAINTENANCE_HOUR", default_value_t = 15)]
    maintenance_hour: u32,

    /// Seconds a cached listing may be served before recomputation.
    #[arg(long, env = "TRADEGATE_CACHE_TTL_SECS", default_value_t = 600)]
    cache_ttl_secs: i64,

    /// Milliseconds to wait for the mutation gate before giving up.
    #[arg(long, env = "TRADEGATE_GATE_WAIT_MS", default_value_t = 5_000)]
    gate_wait_ms: u64,

    /// Milliseconds after which an operation is logged as slow.
    #[arg(long, env = "TRADEGATE_SLOW_OP_MS", default_value_t = 2_000)]
    slow_op_ms: u64,

    /// Render results as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List products, optionally narrowed by category, name or price.
    List {
        #[arg(long)]
        category: Option<u64>,

        #[arg(long)]
        name: Option<String>,

        /// Lowest unit price to include, e.g. "15" or "15.50".
        #[arg(long)]
        min_price: Option<Money>,

        /// Highest unit price to include.
        #[arg(long)]
        max_price: Option<Money>,
    },

    /// Show one product by id.
    Get { id: u64 },

    /// Show the joined product/category details view.
    Details,

    /// List products in one category.
    ByCategory { category: u64 },

    /// List products inside an inclusive price window.
    ByPrice { min: Money, max: Money },

    /// Validate, rule-check and add a product.
    Add {
        #[arg(long)]
        category: u64,

        #[arg(long)]
        name: String,

        /// Unit price, e.g. "15" or "15.50".
        #[arg(long)]
        price: Money,

        #[arg(long, default_value_t = 0)]
        stock: i64,
    },

    /// Demonstrate transactional rollback (always fails by design).
    AddTx {
        #[arg(long)]
        category: u64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        price: Money,

        #[arg(long, default_value_t = 0)]
        stock: i64,
    },
}

fn main() -> ExitCode {
    tradegate_observability::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!(
        maintenance_hour = cli.maintenance_hour,
        cache_ttl_secs = cli.cache_ttl_secs,
        gate_wait_ms = cli.gate_wait_ms,
        "engine configured"
    );

    let catalog = Arc::new(InMemoryCatalog::seeded());
    let store: Arc<dyn ProductStore> = catalog.clone();
    let categories: Arc<dyn CategoryProvider> = catalog;
    let engine = ProductEngine::new(store, categories).with_config(EngineConfig {
        maintenance_hour: cli.maintenance_hour,
        cache_ttl: ttl_from_secs(cli.cache_ttl_secs)?,
        gate_wait: Duration::from_millis(cli.gate_wait_ms),
        slow_op_threshold: Duration::from_millis(cli.slow_op_ms),
    });
    let json = cli.json;

    match cli.command {
        Commands::List {
            category,
            name,
            min_price,
            max_price,
        } => {
            let filter = ProductFilter {
                category_id: category.map(CategoryId::new),
                name,
                min_price,
                max_price,
            };
            let filter = (!filter.is_empty()).then_some(filter);
            finish(engine.get_all(filter), json, |products| {
                render_products(&products, json)
            })
        }

        Commands::Get { id } => finish(engine.get_by_id(ProductId::new(id)), json, |found| {
            match found {
                Some(product) => render_products(&[product], json),
                None if json => {
                    println!("null");
                    Ok(())
                }
                None => {
                    println!("no product with id {id}");
                    Ok(())
                }
            }
        }),

        Commands::Details => finish(engine.get_product_details(), json, |details| {
            render_details(&details, json)
        }),

        Commands::ByCategory { category } => finish(
            engine.get_products_by_category(CategoryId::new(category)),
            json,
            |products| render_products(&products, json),
        ),

        Commands::ByPrice { min, max } => finish(
            engine.get_products_by_price_range(min, max),
            json,
            |products| render_products(&products, json),
        ),

        Commands::Add {
            category,
            name,
            price,
            stock,
        } => finish(
            engine.add_product(draft(category, name, price, stock)),
            json,
            |id| {
                if json {
                    println!("{}", serde_json::json!({ "product_id": id.value() }));
                } else {
                    println!("added product {id}");
                }
                Ok(())
            },
        ),

        Commands::AddTx {
            category,
            name,
            price,
            stock,
        } => finish(
            engine.add_product_with_transaction(draft(category, name, price, stock)),
            json,
            |()| {
                println!("transaction committed");
                Ok(())
            },
        ),
    }
}

/// `chrono::Duration::seconds` panics out of range; keep flag parsing fallible.
fn ttl_from_secs(secs: i64) -> anyhow::Result<chrono::Duration> {
    chrono::Duration::try_seconds(secs)
        .with_context(|| format!("cache TTL of {secs} seconds is out of range"))
}

fn draft(category: u64, name: String, price: Money, stock: i64) -> NewProduct {
    NewProduct {
        category_id: CategoryId::new(category),
        name,
        unit_price: price,
        units_in_stock: stock,
    }
}

/// Render a success, print a business failure, or bubble up a fault.
fn finish<T>(
    outcome: Result<T, EngineError>,
    json: bool,
    render: impl FnOnce(T) -> anyhow::Result<()>,
) -> anyhow::Result<ExitCode> {
    match outcome {
        Ok(value) => {
            render(value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_business() => {
            if json {
                println!("{}", serde_json::json!({ "failure": err.to_string() }));
            } else {
                println!("FAILED: {err}");
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn render_products(products: &[Product], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(products)?);
        return Ok(());
    }
    if products.is_empty() {
        println!("no products");
        return Ok(());
    }
    for product in products {
        println!(
            "{:>4}  {:<24} {:>12}  stock {:>5}  category {}",
            product.id(),
            product.name(),
            product.unit_price(),
            product.units_in_stock(),
            product.category_id(),
        );
    }
    Ok(())
}

fn render_details(details: &[ProductDetail], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(details)?);
        return Ok(());
    }
    if details.is_empty() {
        println!("no products");
        return Ok(());
    }
    for detail in details {
        println!(
            "{:>4}  {:<24} {:<16}  stock {:>5}",
            detail.product_id, detail.product_name, detail.category_name, detail.units_in_stock,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensible_cache_ttls_parse() {
        assert_eq!(ttl_from_secs(600).unwrap(), chrono::Duration::seconds(600));
        assert_eq!(ttl_from_secs(0).unwrap(), chrono::Duration::zero());
    }

    #[test]
    fn absurd_cache_ttl_errors_instead_of_panicking() {
        let err = ttl_from_secs(i64::MAX).unwrap_err();
        assert!(err.to_string().contains("out of range"), "got: {err:#}");
    }
}
