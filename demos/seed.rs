//! Seeds a ledger data directory with customers, reservations and a few balance top-ups.
//!
//! The resulting snapshots can be inspected with the `hotel-ledger` binary.
//!
//! Example (50 customers):
//! ```bash
//! cargo run --example seed 50 /tmp/hotel
//! HOTEL_LEDGER_DATA_DIR=/tmp/hotel cargo run -- customers
//! ```
//!
//! Customer `i` (1-based) is created with balance `100·i` and, for even `i`,
//! topped up by `10·i`. Every customer gets one reservation for `i % 4 + 1` guests.

use std::env;
use std::error::Error;
use std::path::PathBuf;

use hotel_ledger::{Config, HotelLedger, ReservationRequest};

const ROOM_TYPES: [&str; 3] = ["single", "double", "suite"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: cargo run --example seed <num_customers> <data_dir>");
        std::process::exit(1);
    }
    let num_customers: u64 = args[1].parse()?;
    let config = Config {
        data_dir: Some(PathBuf::from(&args[2])),
        ..Config::default()
    };

    let ledger = HotelLedger::open(&config).await?;
    for i in 1..=num_customers {
        let name = format!("Guest {i}");
        let customer = ledger.create_user(name.clone(), 100 * i).await?;
        if i % 2 == 0 {
            ledger.add_balance(&customer.id, 10 * i).await?;
        }
        ledger
            .add_hotel_room_reservation(ReservationRequest {
                check_in_date: format!("2024-06-{:02}", i % 28 + 1),
                guest_name: name,
                check_out_date: format!("2024-07-{:02}", i % 28 + 1),
                amount: 120 * i,
                room_type: ROOM_TYPES[(i % 3) as usize].to_string(),
                number_of_guests: i % 4 + 1,
            })
            .await?;
    }
    ledger.checkpoint().await?;

    println!(
        "Seeded {} customers and {} reservations into {}",
        ledger.read_customers().await.len(),
        ledger.get_room_list().await.len(),
        args[2]
    );
    Ok(())
}
