use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::{Connection, params};
use time::{Duration, OffsetDateTime};

use atelier_rs::initialize_db;

/// A utility for creating a populated test database for the atelier workshop dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// A sale to insert, with dates relative to today so the dashboard's recent
/// windows always have data.
struct SaleSeed {
    days_ago: i64,
    client_id: i64,
    price: f64,
    discount: f64,
    status: &'static str,
    payment_method: Option<&'static str>,
    days_to_delivery: Option<i64>,
    /// Line items as (product id, quantity, size).
    items: &'static [(i64, u32, Option<&'static str>)],
}

/// A material order to insert.
struct OrderSeed {
    material_id: Option<i64>,
    supplier: Option<&'static str>,
    reference: Option<&'static str>,
    quantity: u32,
    unit_price: Option<f64>,
    status: &'static str,
    days_ago: i64,
}

/// A repair report to insert.
struct RepairSeed {
    tool_id: Option<i64>,
    description: &'static str,
    reporter: &'static str,
    days_ago: i64,
    cost: Option<f64>,
}

const CLIENTS: &[&str] = &["Lucia Romero", "Marta Vidal", "Teresa Alonso", "Pilar Navarro"];

const PRODUCTS: &[&str] = &[
    "Linen shirt",
    "Wool coat",
    "Summer dress",
    "Silk scarf",
    "Pleated skirt",
];

// The fresh database assigns row ids starting at 1, so the foreign keys below
// refer to positions in the tables above.
const SALES: &[SaleSeed] = &[
    SaleSeed {
        days_ago: 0,
        client_id: 1,
        price: 120.0,
        discount: 0.0,
        status: "Completed",
        payment_method: Some("Cash"),
        days_to_delivery: Some(0),
        items: &[(1, 2, Some("M"))],
    },
    SaleSeed {
        days_ago: 0,
        client_id: 2,
        price: 80.0,
        discount: 0.0,
        status: "Pending",
        payment_method: None,
        days_to_delivery: None,
        items: &[(3, 1, Some("S"))],
    },
    SaleSeed {
        days_ago: 1,
        client_id: 3,
        price: 250.0,
        discount: 25.0,
        status: "In progress",
        payment_method: Some("Credit card"),
        days_to_delivery: None,
        items: &[(2, 1, Some("L")), (4, 2, None)],
    },
    SaleSeed {
        days_ago: 3,
        client_id: 1,
        price: 95.0,
        discount: 0.0,
        status: "Completed",
        payment_method: Some("Transfer"),
        days_to_delivery: Some(2),
        items: &[(5, 1, Some("M"))],
    },
    SaleSeed {
        days_ago: 5,
        client_id: 4,
        price: 60.0,
        discount: 0.0,
        status: "Cancelled",
        payment_method: None,
        days_to_delivery: None,
        items: &[(4, 1, None)],
    },
    SaleSeed {
        days_ago: 8,
        client_id: 2,
        price: 180.0,
        discount: 10.0,
        status: "Completed",
        payment_method: Some("Credit"),
        days_to_delivery: Some(4),
        items: &[(2, 1, Some("M"))],
    },
    SaleSeed {
        days_ago: 13,
        client_id: 3,
        price: 75.0,
        discount: 0.0,
        status: "Completed",
        payment_method: Some("Debit card"),
        days_to_delivery: Some(6),
        items: &[(1, 1, Some("XL")), (4, 1, None)],
    },
    SaleSeed {
        days_ago: 21,
        client_id: 1,
        price: 140.0,
        discount: 0.0,
        status: "Pending",
        payment_method: None,
        days_to_delivery: None,
        items: &[(3, 2, Some("M"))],
    },
    SaleSeed {
        days_ago: 34,
        client_id: 4,
        price: 320.0,
        discount: 40.0,
        status: "Completed",
        payment_method: Some("Cash"),
        days_to_delivery: Some(9),
        items: &[(2, 2, Some("S"))],
    },
    SaleSeed {
        days_ago: 36,
        client_id: 2,
        price: 110.0,
        discount: 0.0,
        status: "In progress",
        payment_method: Some("Transfer"),
        days_to_delivery: None,
        items: &[(5, 2, Some("L"))],
    },
    SaleSeed {
        days_ago: 67,
        client_id: 3,
        price: 90.0,
        discount: 0.0,
        status: "Completed",
        payment_method: Some("Transfer"),
        days_to_delivery: Some(3),
        items: &[(1, 3, Some("M"))],
    },
    SaleSeed {
        days_ago: 95,
        client_id: 1,
        price: 205.0,
        discount: 15.0,
        status: "Completed",
        payment_method: Some("Cash"),
        days_to_delivery: Some(7),
        items: &[(3, 1, Some("M")), (4, 3, None)],
    },
    SaleSeed {
        days_ago: 123,
        client_id: 4,
        price: 130.0,
        discount: 0.0,
        status: "Completed",
        payment_method: Some("Credit card"),
        days_to_delivery: Some(5),
        items: &[(5, 1, Some("S"))],
    },
    SaleSeed {
        days_ago: 150,
        client_id: 2,
        price: 85.0,
        discount: 5.0,
        status: "Completed",
        payment_method: Some("Cash"),
        days_to_delivery: Some(2),
        items: &[(1, 1, Some("L"))],
    },
];

// Wool sits below its minimum and the silk thread is exhausted so all three
// stock levels show up on the dashboard.
const MATERIALS: &[(&str, i64, i64)] = &[
    ("Linen", 45, 10),
    ("Wool", 6, 8),
    ("Silk thread", 0, 5),
    ("Buttons", 120, 40),
];

const ORDERS: &[OrderSeed] = &[
    OrderSeed {
        material_id: Some(1),
        supplier: Some("Textiles Ruiz"),
        reference: Some("OC-2024-017"),
        quantity: 40,
        unit_price: Some(2.5),
        status: "Received",
        days_ago: 6,
    },
    OrderSeed {
        material_id: Some(2),
        supplier: Some("Textiles Ruiz"),
        reference: Some("OC-2024-012"),
        quantity: 20,
        unit_price: Some(5.0),
        status: "Received",
        days_ago: 20,
    },
    OrderSeed {
        material_id: Some(3),
        supplier: Some("Sedas del Sur"),
        reference: Some("OC-2024-019"),
        quantity: 15,
        unit_price: None,
        status: "Pending",
        days_ago: 2,
    },
    OrderSeed {
        material_id: Some(4),
        supplier: Some("Botones SA"),
        reference: Some("OC-2024-003"),
        quantity: 200,
        unit_price: Some(0.1),
        status: "Received",
        days_ago: 45,
    },
    OrderSeed {
        material_id: None,
        supplier: Some("Botones SA"),
        reference: None,
        quantity: 50,
        unit_price: Some(0.25),
        status: "Pending",
        days_ago: 1,
    },
    OrderSeed {
        material_id: Some(1),
        supplier: None,
        reference: None,
        quantity: 10,
        unit_price: Some(2.4),
        status: "Received",
        days_ago: 3,
    },
];

// (name, role, salary, days since hiring)
const WORKERS: &[(&str, &str, Option<f64>, Option<i64>)] = &[
    ("Carmen Ortiz", "Seamstress", Some(1150.0), Some(820)),
    ("Ana Jimenez", "Pattern maker", Some(1300.0), Some(512)),
    ("Rosa Martin", "Apprentice", None, Some(45)),
];

const TOOLS: &[&str] = &["Overlock machine", "Industrial iron", "Cutting table"];

const REPAIRS: &[RepairSeed] = &[
    RepairSeed {
        tool_id: Some(1),
        description: "Jammed feed dog",
        reporter: "Carmen Ortiz",
        days_ago: 4,
        cost: Some(40.0),
    },
    RepairSeed {
        tool_id: Some(2),
        description: "Thermostat replaced",
        reporter: "Ana Jimenez",
        days_ago: 30,
        cost: Some(85.5),
    },
    RepairSeed {
        tool_id: Some(3),
        description: "Worn guide rail",
        reporter: "Rosa Martin",
        days_ago: 1,
        cost: None,
    },
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating clients and products...");

    for name in CLIENTS {
        conn.execute("INSERT INTO client (name) VALUES (?1)", (name,))?;
    }

    for name in PRODUCTS {
        conn.execute("INSERT INTO product (name) VALUES (?1)", (name,))?;
    }

    println!("Creating sales...");

    for seed in SALES {
        let start_date = today - Duration::days(seed.days_ago);
        let delivery_date = seed
            .days_to_delivery
            .map(|days| start_date + Duration::days(days));

        conn.execute(
            "INSERT INTO sale (client_id, price, discount, status, payment_method, start_date, delivery_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                seed.client_id,
                seed.price,
                seed.discount,
                seed.status,
                seed.payment_method,
                start_date,
                delivery_date
            ],
        )?;
        let sale_id = conn.last_insert_rowid();

        for (product_id, quantity, size) in seed.items {
            conn.execute(
                "INSERT INTO sale_item (sale_id, product_id, quantity, size)
                VALUES (?1, ?2, ?3, ?4)",
                params![sale_id, product_id, quantity, size],
            )?;
        }
    }

    println!("Creating materials and orders...");

    for (name, stock, minimum_stock) in MATERIALS {
        conn.execute(
            "INSERT INTO material (name, stock, minimum_stock) VALUES (?1, ?2, ?3)",
            params![name, stock, minimum_stock],
        )?;
    }

    for seed in ORDERS {
        conn.execute(
            "INSERT INTO material_order (material_id, supplier, reference, quantity_requested, unit_price, status, order_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                seed.material_id,
                seed.supplier,
                seed.reference,
                seed.quantity,
                seed.unit_price,
                seed.status,
                today - Duration::days(seed.days_ago)
            ],
        )?;
    }

    println!("Creating workers, tools and repair reports...");

    for (name, role, salary, hired_days_ago) in WORKERS {
        let hired_on = hired_days_ago.map(|days| today - Duration::days(days));

        conn.execute(
            "INSERT INTO worker (name, role, salary, hired_on) VALUES (?1, ?2, ?3, ?4)",
            params![name, role, salary, hired_on],
        )?;
    }

    for name in TOOLS {
        conn.execute("INSERT INTO tool (name) VALUES (?1)", (name,))?;
    }

    for seed in REPAIRS {
        conn.execute(
            "INSERT INTO repair_report (tool_id, description, reporter, report_date, repair_cost)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                seed.tool_id,
                seed.description,
                seed.reporter,
                today - Duration::days(seed.days_ago),
                seed.cost
            ],
        )?;
    }

    println!("Success!");

    Ok(())
}
