use crate::domain::payment::PaymentMethod;
use crate::error::{BookingError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Book,
    Confirm,
    Cancel,
    Checkin,
    Checkout,
    Pay,
    Refund,
}

/// One row of the command stream. Which columns are required depends on the
/// action; empty columns deserialize to `None`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub action: CommandKind,
    pub booking: Option<u32>,
    pub customer: Option<u32>,
    pub room: Option<u32>,
    pub staff: Option<u32>,
    pub payment: Option<u32>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

/// Reads booking commands from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Command>`,
/// handling whitespace trimming and flexible record lengths automatically so
/// large files stream without loading everything into memory.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BookingError::from))
    }
}
