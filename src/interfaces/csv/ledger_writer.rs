use crate::domain::booking::Booking;
use crate::error::Result;
use std::io::Write;

/// Writes the final booking ledger as CSV.
pub struct LedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    pub fn write_bookings(&mut self, bookings: &[Booking]) -> Result<()> {
        self.writer.write_record([
            "booking",
            "customer",
            "room",
            "check_in",
            "check_out",
            "nights",
            "status",
            "total",
        ])?;
        for booking in bookings {
            self.writer.write_record([
                booking.id.to_string(),
                booking.customer.to_string(),
                booking.room.to_string(),
                booking.check_in.to_string(),
                booking.check_out.to_string(),
                booking.nights().to_string(),
                booking.status.to_string(),
                booking.total.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_format() {
        let booking = Booking {
            id: 1,
            customer: 7,
            room: 101,
            check_in: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
            booked_at: NaiveDate::from_ymd_opt(2026, 8, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            status: BookingStatus::Confirmed,
            total: dec!(450.00),
            notes: None,
        };

        let mut out = Vec::new();
        LedgerWriter::new(&mut out).write_bookings(&[booking]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("booking,customer,room,check_in,check_out,nights,status,total")
        );
        assert_eq!(
            lines.next(),
            Some("1,7,101,2026-09-01,2026-09-04,3,Confirmed,450.00")
        );
    }
}
