use crate::error::{BookingError, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Refunded => "Refunded",
        };
        f.write_str(name)
    }
}

/// A captured payment against a booking. The receipt number is unique across
/// the ledger; the store rejects duplicates.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: u32,
    pub booking: u32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub paid_at: NaiveDateTime,
    pub status: PaymentStatus,
    pub receipt: String,
}

impl Payment {
    /// Refunds are only valid against a completed payment.
    pub fn refund(&mut self) -> Result<()> {
        if self.status == PaymentStatus::Completed {
            self.status = PaymentStatus::Refunded;
            Ok(())
        } else {
            Err(BookingError::invalid_transition(self.status, "refund"))
        }
    }
}
