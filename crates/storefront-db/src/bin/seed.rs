//! # Seed Data Generator
//!
//! Populates a storefront database with the demo catalog and demo buyers.
//!
//! ```bash
//! cargo run -p storefront-db --bin seed
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! cargo run -p storefront-db --bin seed -- --reset
//! ```
//!
//! The catalog is 10 SMT production-line machines with six-figure prices and
//! deliberately small stock counts, so oversell races are easy to reproduce
//! by hand. Two demo buyers come along to place orders with.
//!
//! Seeding is idempotent: a populated catalog makes the binary exit without
//! writing anything. `--reset` wipes all rows first.

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use storefront_core::validation::{validate_email, validate_price_cents, validate_product_name};
use storefront_core::{Product, User};
use storefront_db::{Database, DbConfig};

/// Installs the tracing subscriber for this binary.
///
/// `RUST_LOG` overrides the default filter, which keeps repositories at
/// debug and silences sqlx statement logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The demo catalog: (name, description, price_cents, stock).
///
/// Stock counts are intentionally small so that oversell scenarios can be
/// exercised interactively.
const CATALOG: &[(&str, &str, i64, i64)] = &[
    (
        "JUKI RS-1 Pick-and-Place",
        "High-speed surface-mount placement machine for automated electronics production.",
        28_500_000,
        3,
    ),
    (
        "10-Zone Reflow Oven",
        "Convection reflow oven with ten heating zones and precise thermal profile control.",
        12_500_000,
        5,
    ),
    (
        "Automatic Stencil Printer",
        "Fully automatic solder paste stencil printer for PCB assembly lines.",
        8_500_000,
        8,
    ),
    (
        "AOI Optical Inspection System",
        "Automated optical inspection for solder defects and misplaced components.",
        19_500_000,
        4,
    ),
    (
        "KIC Thermal Profiler",
        "Oven temperature profiler for verifying reflow soldering parameters in real time.",
        4_500_000,
        10,
    ),
    (
        "X-Ray BGA Inspection System",
        "X-ray imaging system for inspecting BGA joints and hidden solder structures.",
        32_000_000,
        2,
    ),
    (
        "SPI Solder Paste Inspector",
        "Inline inspection of solder paste height, volume and shape after printing.",
        16_500_000,
        6,
    ),
    (
        "Wave Soldering Machine",
        "Wave soldering system for through-hole component assembly.",
        18_500_000,
        4,
    ),
    (
        "Conformal Coating Sprayer",
        "Automatic conformal coating sprayer protecting boards from moisture and dust.",
        9_500_000,
        7,
    ),
    (
        "Automatic PCB Cleaner",
        "High-throughput cleaning machine removing flux residue from assembled boards.",
        7_500_000,
        9,
    ),
];

/// Demo buyers: (email, name).
const DEMO_USERS: &[(&str, &str)] = &[
    ("admin@example.com", "Admin User"),
    ("buyer@example.com", "Demo Buyer"),
];

struct SeedArgs {
    db_path: String,
    reset: bool,
}

/// Parses the tiny CLI surface. Returns `None` when help was requested.
fn parse_args() -> Option<SeedArgs> {
    let mut parsed = SeedArgs {
        db_path: "./storefront_dev.db".to_string(),
        reset: false,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                if let Some(path) = args.next() {
                    parsed.db_path = path;
                }
            }
            "--reset" | "-r" => parsed.reset = true,
            "--help" | "-h" => {
                print_help();
                return None;
            }
            _ => {}
        }
    }

    Some(parsed)
}

fn print_help() {
    println!("seed - load the storefront demo catalog and buyers");
    println!();
    println!("usage: seed [--db <path>] [--reset]");
    println!();
    println!("  -d, --db <path>   database file (default ./storefront_dev.db)");
    println!("  -r, --reset       delete all existing rows, then reseed");
    println!("  -h, --help        print this help");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let Some(args) = parse_args() else {
        return Ok(());
    };

    println!("🌱 Seeding storefront database at {}", args.db_path);
    println!();

    // Opening the database applies migrations.
    let db = Database::new(DbConfig::new(&args.db_path)).await?;
    println!("✓ Database open, schema current");

    if args.reset {
        wipe(&db).await?;
        println!("✓ Existing rows deleted");
    }

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {existing} products; nothing to do.");
        println!("  Re-run with --reset to regenerate from scratch.");
        return Ok(());
    }

    println!();
    println!("Catalog:");

    let now = Utc::now();
    for (name, description, price_cents, stock) in CATALOG {
        validate_product_name(name)?;
        validate_price_cents(*price_cents)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            price_cents: *price_cents,
            stock: *stock,
            created_at: now,
            updated_at: now,
        };

        db.products().insert(&product).await?;
        println!(
            "  + {} at {} ({} in stock)",
            product.name,
            product.price(),
            product.stock
        );
    }

    println!();
    println!("Buyers:");

    for (email, name) in DEMO_USERS {
        validate_email(email)?;

        // Users survive --reset-less reruns; skip ones already registered.
        if db.users().find_by_email(email).await?.is_some() {
            println!("  = {email} (already present)");
            continue;
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: (*email).to_string(),
            name: (*name).to_string(),
            created_at: now,
        };
        db.users().insert(&user).await?;
        println!("  + {} <{}>", user.name, user.email);
    }

    println!();
    println!(
        "✓ Seed complete: {} products, {} buyers",
        db.products().count().await?,
        DEMO_USERS.len()
    );

    Ok(())
}

/// Deletes all rows in FK-safe order.
async fn wipe(db: &Database) -> Result<(), storefront_db::DbError> {
    for table in ["order_items", "orders", "products", "users"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(db.pool())
            .await?;
    }
    Ok(())
}
