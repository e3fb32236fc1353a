//! # Seed Data Generator
//!
//! Fills a database with sample products, one stock adjustment and one stock
//! transfer so the admin screens have something to show.
//!
//! ## Usage
//! ```bash
//! # Default: 20 products in the platform data directory
//! cargo run -p stockpile-admin --bin seed
//!
//! # Custom amount, path and business
//! cargo run -p stockpile-admin --bin seed -- --products 50 --db ./data/stockpile.db --business biz-1
//! ```

use chrono::Utc;
use std::env;
use stockpile_admin::commands::{product, stock_adjustment, stock_transfer};
use stockpile_admin::{init_tracing, AdminConfig, AppContext};
use stockpile_core::{
    AdjustmentType, NewProduct, NewStockAdjustment, NewStockTransfer, StockLineItem,
    TransferStatus,
};

/// Sample catalog: (category, name, purchase cents, selling cents)
const CATALOG: &[(&str, &str, i64, i64)] = &[
    ("Beverages", "Cola 330ml", 45, 90),
    ("Beverages", "Orange Juice 1L", 120, 220),
    ("Beverages", "Mineral Water 500ml", 20, 60),
    ("Snacks", "Salted Crisps", 60, 130),
    ("Snacks", "Chocolate Bar", 55, 120),
    ("Snacks", "Peanuts 200g", 90, 180),
    ("Dairy", "Whole Milk 1L", 70, 125),
    ("Dairy", "Cheddar 250g", 210, 380),
    ("Grocery", "Basmati Rice 1kg", 150, 260),
    ("Grocery", "Pasta 500g", 65, 140),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 20;
    let mut db_path: Option<String> = None;
    let mut business: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--business" | "-b" => {
                if i + 1 < args.len() {
                    business = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockpile Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>   Number of products to generate (default: 20)");
                println!("  -d, --db <PATH>      Database file path (default: STOCKPILE_DB_PATH or data dir)");
                println!("  -b, --business <ID>  Business to seed (default: STOCKPILE_BUSINESS_ID)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();

    let mut config = match db_path {
        Some(path) => AdminConfig::for_path(path),
        None => AdminConfig::from_env()?,
    };
    if business.is_some() {
        config.business_id = business;
    }

    println!("Stockpile Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!("Business: {}", config.business_id.as_deref().unwrap_or("(none)"));
    println!("Products: {}", count);
    println!();

    let ctx = AppContext::open(config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = ctx.db().products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        ctx.shutdown().await;
        return Ok(());
    }

    println!();
    println!("Generating products...");
    let start = std::time::Instant::now();

    let mut created = Vec::with_capacity(count);
    for (index, (category, name, purchase, selling)) in
        CATALOG.iter().cycle().take(count).enumerate()
    {
        let batch = index / CATALOG.len();
        let name = if batch == 0 {
            name.to_string()
        } else {
            format!("{} #{}", name, batch + 1)
        };

        let input = NewProduct {
            business_id: None,
            name,
            category: Some(category.to_string()),
            stock: (index % 7 * 12 + 10) as f64,
            purchase_price_cents: *purchase,
            selling_price_cents: *selling,
        };

        match product::create_product(&ctx, input).await {
            Ok(product) => created.push(product),
            Err(e) => eprintln!("Failed to insert product: {}", e),
        }
    }

    println!("✓ Generated {} products in {:?}", created.len(), start.elapsed());

    if created.len() >= 2 {
        let adjustment = NewStockAdjustment {
            date: Utc::now(),
            location: "Main Store".to_string(),
            adjustment_type: AdjustmentType::Abnormal,
            items: vec![StockLineItem {
                product_id: created[0].id.clone(),
                quantity: -2.0,
                unit_price_cents: created[0].purchase_price_cents,
            }],
            reference_no: None,
            recovered_amount_cents: Some(0),
            reason: Some("Damaged in storage".to_string()),
            notes: None,
            author_id: "seed".to_string(),
        };
        let adjustment = stock_adjustment::add_stock_adjustment(&ctx, adjustment, None).await?;
        println!("✓ Stock adjustment {}", adjustment.reference_no);

        let transfer = NewStockTransfer {
            business_id: None,
            date: Utc::now(),
            from_location: "Warehouse".to_string(),
            to_location: "Main Store".to_string(),
            status: TransferStatus::Completed,
            items: vec![StockLineItem {
                product_id: created[1].id.clone(),
                quantity: 6.0,
                unit_price_cents: created[1].purchase_price_cents,
            }],
            shipping_charge_cents: 250,
            reference_no: None,
            notes: Some("Weekly restock".to_string()),
            author_id: "seed".to_string(),
        };
        let transfer = stock_transfer::add_stock_transfer(&ctx, transfer).await?;
        println!("✓ Stock transfer {}", transfer.reference_no);
    }

    ctx.shutdown().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
