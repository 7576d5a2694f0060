use std::io::Write;

use crate::csv_utils::write_csv;
use crate::{Error, HotelLedger, Identifier, ReservationRequest};

pub const USAGE: &str = "Usage: hotel-ledger <command> [args...]

Commands:
  create-user <guestName> <amount>
  customers
  customer <id>
  reserve <checkInDate> <guestName> <checkOutDate> <amount> <roomType> <numberOfGuests>
  rooms
  room <id>
  add-balance <id> <amount>";

/// One call-handler invocation, parsed from command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateUser { guest_name: String, amount: u64 },
    ReadCustomers,
    ReadCustomer { id: Identifier },
    AddReservation(ReservationRequest),
    RoomList,
    RoomDetails { id: Identifier },
    AddBalance { id: Identifier, amount: u64 },
}

impl Command {
    /// Parses the arguments following the program name.
    pub fn parse(args: &[String]) -> Result<Self, Error> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["create-user", guest_name, amount] => Ok(Self::CreateUser {
                guest_name: guest_name.to_string(),
                amount: parse_u64("amount", amount)?,
            }),
            ["customers"] => Ok(Self::ReadCustomers),
            ["customer", id] => Ok(Self::ReadCustomer { id: id.parse()? }),
            [
                "reserve",
                check_in_date,
                guest_name,
                check_out_date,
                amount,
                room_type,
                number_of_guests,
            ] => Ok(Self::AddReservation(ReservationRequest {
                check_in_date: check_in_date.to_string(),
                guest_name: guest_name.to_string(),
                check_out_date: check_out_date.to_string(),
                amount: parse_u64("amount", amount)?,
                room_type: room_type.to_string(),
                number_of_guests: parse_u64("numberOfGuests", number_of_guests)?,
            })),
            ["rooms"] => Ok(Self::RoomList),
            ["room", id] => Ok(Self::RoomDetails { id: id.parse()? }),
            ["add-balance", id, amount] => Ok(Self::AddBalance {
                id: id.parse()?,
                amount: parse_u64("amount", amount)?,
            }),
            _ => Err(Error::Usage(USAGE.to_string())),
        }
    }

    /// Whether the command changes ledger state and needs a checkpoint.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateUser { .. } | Self::AddReservation(_) | Self::AddBalance { .. }
        )
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64, Error> {
    value
        .parse()
        .map_err(|_| {
            Error::Usage(format!(
                "{name} must be an unsigned 64-bit integer, got {value:?}"
            ))
        })
}

/// Runs a single command against the ledger and writes its result to the provided writer.
///
/// Records are written as CSV with a header row; a lookup miss writes nothing.
/// Balance updates write their outcome message as a single line.
/// Mutating commands checkpoint the ledger before anything is written, so a
/// failed checkpoint produces no output.
///
/// # Errors
/// Returns an error if:
/// * The call-handler fails (identifier generation, overflow, reservation policy)
/// * Writing to the output fails
/// * The checkpoint cannot be written
pub async fn run<W: Write>(
    ledger: &HotelLedger,
    command: Command,
    mut writer: W,
) -> Result<(), Error> {
    let mutating = command.is_mutating();
    let mut output = Vec::new();
    match command {
        Command::CreateUser { guest_name, amount } => {
            let customer = ledger.create_user(guest_name, amount).await?;
            write_csv(&mut output, std::iter::once(customer))?;
        }
        Command::ReadCustomers => {
            write_csv(&mut output, ledger.read_customers().await.into_iter())?
        }
        Command::ReadCustomer { id } => {
            write_csv(&mut output, ledger.read_customer_id(&id).await.into_iter())?
        }
        Command::AddReservation(request) => {
            let reservation = ledger.add_hotel_room_reservation(request).await?;
            write_csv(&mut output, std::iter::once(reservation))?;
        }
        Command::RoomList => {
            write_csv(&mut output, ledger.get_room_list().await.into_iter())?
        }
        Command::RoomDetails { id } => {
            write_csv(&mut output, ledger.get_room_details(&id).await.into_iter())?
        }
        Command::AddBalance { id, amount } => {
            let outcome = ledger.add_balance(&id, amount).await?;
            writeln!(output, "{outcome}")?;
        }
    }
    if mutating {
        ledger.checkpoint().await?;
    }
    writer.write_all(&output)?;
    writer.flush()?;
    Ok(())
}
