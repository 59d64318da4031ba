use crate::error::{BookingError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    /// Central transition table. Every status change in the engine goes
    /// through here; there are no scattered status comparisons.
    pub fn apply(self, action: BookingAction) -> Result<BookingStatus> {
        use BookingAction::*;
        use BookingStatus::*;
        match (self, action) {
            (Pending, Confirm) => Ok(Confirmed),
            (Pending, Cancel) | (Confirmed, Cancel) => Ok(Cancelled),
            (Confirmed, CheckIn) => Ok(CheckedIn),
            (CheckedIn, CheckOut) => Ok(CheckedOut),
            (status, action) => Err(BookingError::invalid_transition(status, action)),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::CheckedIn => "CheckedIn",
            BookingStatus::CheckedOut => "CheckedOut",
            BookingStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Cancel,
    CheckIn,
    CheckOut,
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Cancel => "cancel",
            BookingAction::CheckIn => "check-in",
            BookingAction::CheckOut => "check-out",
        };
        f.write_str(name)
    }
}

/// A reservation of one room for a half-open date range
/// `[check_in, check_out)`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Booking {
    pub id: u32,
    pub customer: u32,
    pub room: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub booked_at: NaiveDateTime,
    pub status: BookingStatus,
    pub total: Decimal,
    pub notes: Option<String>,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open interval test: checkout on another booking's check-in day is
    /// not an overlap, so same-day turnover is allowed.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && self.check_out > check_in
    }

    /// A booking holds its room slot until it is cancelled or the stay ends.
    /// Pending bookings block the slot: rooms are reserved on request.
    pub fn blocks_room(&self) -> bool {
        !matches!(
            self.status,
            BookingStatus::Cancelled | BookingStatus::CheckedOut
        )
    }

    /// Whether this booking occupied its room on the given night. Completed
    /// stays still count on their historical nights.
    pub fn occupies(&self, day: NaiveDate) -> bool {
        matches!(
            self.status,
            BookingStatus::Confirmed | BookingStatus::CheckedIn | BookingStatus::CheckedOut
        ) && self.check_in <= day
            && day < self.check_out
    }
}
