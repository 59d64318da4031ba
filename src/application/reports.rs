use super::engine::BookingEngine;
use crate::domain::booking::BookingStatus;
use crate::domain::payment::{PaymentMethod, PaymentStatus};
use crate::error::{BookingError, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, PartialEq)]
pub struct DayOccupancy {
    pub date: NaiveDate,
    pub occupied: usize,
    pub available: usize,
    /// Percent of rooms occupied, rounded to one decimal.
    pub rate: f64,
}

#[derive(Debug, PartialEq)]
pub struct OccupancyReport {
    pub total_rooms: usize,
    pub average_rate: f64,
    pub peak_rate: f64,
    pub total_room_nights: usize,
    pub days: Vec<DayOccupancy>,
}

#[derive(Debug, PartialEq)]
pub struct MethodRevenue {
    pub method: PaymentMethod,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, PartialEq)]
pub struct MonthRevenue {
    /// Calendar month, `YYYY-MM`.
    pub month: String,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

#[derive(Debug, PartialEq)]
pub struct RevenueReport {
    pub total: Decimal,
    pub transactions: usize,
    pub average: Decimal,
    pub by_method: Vec<MethodRevenue>,
    pub by_month: Vec<MonthRevenue>,
}

#[derive(Debug, PartialEq)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, PartialEq)]
pub struct BookingMixReport {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl BookingEngine {
    /// Daily occupancy over `[start, end]` inclusive. A day counts a booking
    /// as occupying when its status is Confirmed, CheckedIn or CheckedOut and
    /// the day falls inside the stay's half-open range.
    pub async fn occupancy_report(&self, start: NaiveDate, end: NaiveDate) -> Result<OccupancyReport> {
        if end < start {
            return Err(BookingError::InvalidDateRange);
        }

        let total_rooms = self.rooms.rooms().await?.len();
        let bookings = self.bookings.bookings().await?;

        let mut days = Vec::new();
        let mut total_room_nights = 0;
        let mut day = start;
        while day <= end {
            let occupied = bookings.iter().filter(|b| b.occupies(day)).count();
            total_room_nights += occupied;
            let rate = if total_rooms > 0 {
                round1(occupied as f64 / total_rooms as f64 * 100.0)
            } else {
                0.0
            };
            days.push(DayOccupancy {
                date: day,
                occupied,
                available: total_rooms.saturating_sub(occupied),
                rate,
            });
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        let average_rate = if !days.is_empty() && total_rooms > 0 {
            round1(total_room_nights as f64 / (days.len() * total_rooms) as f64 * 100.0)
        } else {
            0.0
        };
        let peak_rate = days.iter().map(|d| d.rate).fold(0.0, f64::max);

        Ok(OccupancyReport {
            total_rooms,
            average_rate,
            peak_rate,
            total_room_nights,
            days,
        })
    }

    /// Completed payments with a payment date inside `[start, end]`, grouped
    /// by method (largest first) and by calendar month (ascending).
    pub async fn revenue_report(&self, start: NaiveDate, end: NaiveDate) -> Result<RevenueReport> {
        if end < start {
            return Err(BookingError::InvalidDateRange);
        }

        let payments: Vec<_> = self
            .payments
            .payments()
            .await?
            .into_iter()
            .filter(|p| {
                let day = p.paid_at.date();
                p.status == PaymentStatus::Completed && start <= day && day <= end
            })
            .collect();

        let total: Decimal = payments.iter().map(|p| p.amount).sum();
        let transactions = payments.len();
        let average = if transactions > 0 {
            (total / Decimal::from(transactions as u64)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let mut methods: HashMap<PaymentMethod, (Decimal, usize)> = HashMap::new();
        let mut months: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
        for payment in &payments {
            let by_method = methods.entry(payment.method).or_insert((Decimal::ZERO, 0));
            by_method.0 += payment.amount;
            by_method.1 += 1;

            let key = format!("{:04}-{:02}", payment.paid_at.year(), payment.paid_at.month());
            let by_month = months.entry(key).or_insert((Decimal::ZERO, 0));
            by_month.0 += payment.amount;
            by_month.1 += 1;
        }

        let mut by_method: Vec<MethodRevenue> = methods
            .into_iter()
            .map(|(method, (total, count))| MethodRevenue {
                method,
                total,
                count,
            })
            .collect();
        by_method.sort_by(|a, b| b.total.cmp(&a.total));

        let by_month = months
            .into_iter()
            .map(|(month, (total, count))| MonthRevenue {
                month,
                total,
                count,
                average: (total / Decimal::from(count as u64)).round_dp(2),
            })
            .collect();

        Ok(RevenueReport {
            total,
            transactions,
            average,
            by_method,
            by_month,
        })
    }

    /// Bookings created inside `[start, end]`, counted per status with their
    /// share of the total, largest first.
    pub async fn booking_mix_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BookingMixReport> {
        if end < start {
            return Err(BookingError::InvalidDateRange);
        }

        let in_range: Vec<_> = self
            .bookings
            .bookings()
            .await?
            .into_iter()
            .filter(|b| {
                let day = b.booked_at.date();
                start <= day && day <= end
            })
            .collect();
        let total = in_range.len();

        let mut counts: HashMap<BookingStatus, usize> = HashMap::new();
        for booking in &in_range {
            *counts.entry(booking.status).or_insert(0) += 1;
        }

        let mut by_status: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount {
                status,
                count,
                share: if total > 0 {
                    round1(count as f64 / total as f64 * 100.0)
                } else {
                    0.0
                },
            })
            .collect();
        by_status.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(BookingMixReport { total, by_status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Payment;
    use crate::domain::ports::FixedClock;
    use crate::domain::room::{Room, RoomStatus, RoomType};
    use crate::infrastructure::in_memory::{
        InMemoryBookingStore, InMemoryLogStore, InMemoryPaymentStore, InMemoryRoomStore,
    };
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn engine_with_rooms(count: u32) -> BookingEngine {
        let engine = BookingEngine::new(
            Box::new(InMemoryRoomStore::new()),
            Box::new(InMemoryBookingStore::new()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(InMemoryLogStore::new()),
            Box::new(FixedClock(date("2026-02-01"))),
        );
        engine
            .register_room_type(RoomType {
                id: 1,
                name: "Double".to_string(),
                base_price: dec!(100.00),
                capacity: 2,
            })
            .await
            .unwrap();
        for id in 1..=count {
            engine
                .register_room(Room {
                    id,
                    number: format!("{}", 100 + id),
                    room_type: 1,
                    floor: 1,
                    status: RoomStatus::Available,
                })
                .await
                .unwrap();
        }
        engine
    }

    async fn confirmed_booking(engine: &BookingEngine, room: u32, check_in: &str, check_out: &str) {
        let booking = engine
            .create_booking(1, room, date(check_in), date(check_out), None)
            .await
            .unwrap();
        engine.confirm(booking.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_occupancy_average_and_peak() {
        // 10 rooms, occupied counts [6,7,8,9,5] over 2026-03-01..05.
        let engine = engine_with_rooms(10).await;
        for room in 1..=5 {
            confirmed_booking(&engine, room, "2026-03-01", "2026-03-06").await;
        }
        confirmed_booking(&engine, 6, "2026-03-01", "2026-03-04").await;
        confirmed_booking(&engine, 7, "2026-03-02", "2026-03-05").await;
        confirmed_booking(&engine, 8, "2026-03-03", "2026-03-05").await;
        confirmed_booking(&engine, 9, "2026-03-04", "2026-03-05").await;
        confirmed_booking(&engine, 10, "2026-03-04", "2026-03-05").await;

        let report = engine
            .occupancy_report(date("2026-03-01"), date("2026-03-05"))
            .await
            .unwrap();

        let occupied: Vec<usize> = report.days.iter().map(|d| d.occupied).collect();
        assert_eq!(occupied, vec![6, 7, 8, 9, 5]);
        assert_eq!(report.total_rooms, 10);
        assert_eq!(report.total_room_nights, 35);
        assert_eq!(report.average_rate, 70.0);
        assert_eq!(report.peak_rate, 90.0);
        assert_eq!(report.days[3].rate, 90.0);
        assert_eq!(report.days[3].available, 1);
    }

    #[tokio::test]
    async fn test_occupancy_ignores_pending_and_cancelled() {
        let engine = engine_with_rooms(2).await;
        // Pending only.
        engine
            .create_booking(1, 1, date("2026-03-01"), date("2026-03-03"), None)
            .await
            .unwrap();
        // Cancelled.
        let cancelled = engine
            .create_booking(1, 2, date("2026-03-01"), date("2026-03-03"), None)
            .await
            .unwrap();
        engine.cancel(cancelled.id).await.unwrap();

        let report = engine
            .occupancy_report(date("2026-03-01"), date("2026-03-02"))
            .await
            .unwrap();
        assert_eq!(report.total_room_nights, 0);
        assert_eq!(report.average_rate, 0.0);
    }

    #[tokio::test]
    async fn test_occupancy_rejects_reversed_range() {
        let engine = engine_with_rooms(1).await;
        let err = engine
            .occupancy_report(date("2026-03-05"), date("2026-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidDateRange));
    }

    fn payment(
        id_hint: u32,
        amount: Decimal,
        method: PaymentMethod,
        status: PaymentStatus,
        paid_on: &str,
    ) -> Payment {
        Payment {
            id: 0,
            booking: id_hint,
            amount,
            method,
            paid_at: date(paid_on).and_hms_opt(10, 0, 0).unwrap(),
            status,
            receipt: format!("RCP-20260301-{id_hint:04}"),
        }
    }

    #[tokio::test]
    async fn test_revenue_report_groups_and_rounds() {
        let engine = engine_with_rooms(1).await;
        let store = &engine.payments;
        store
            .insert(payment(1, dec!(450.00), PaymentMethod::Card, PaymentStatus::Completed, "2026-03-02"))
            .await
            .unwrap();
        store
            .insert(payment(2, dec!(150.00), PaymentMethod::Card, PaymentStatus::Completed, "2026-03-10"))
            .await
            .unwrap();
        store
            .insert(payment(3, dec!(100.00), PaymentMethod::Cash, PaymentStatus::Completed, "2026-04-01"))
            .await
            .unwrap();
        // Refunded and out-of-range payments stay out of the totals.
        store
            .insert(payment(4, dec!(999.00), PaymentMethod::Online, PaymentStatus::Refunded, "2026-03-05"))
            .await
            .unwrap();
        store
            .insert(payment(5, dec!(777.00), PaymentMethod::Card, PaymentStatus::Completed, "2026-06-01"))
            .await
            .unwrap();

        let report = engine
            .revenue_report(date("2026-03-01"), date("2026-04-30"))
            .await
            .unwrap();

        assert_eq!(report.total, dec!(700.00));
        assert_eq!(report.transactions, 3);
        assert_eq!(report.average, dec!(233.33));

        assert_eq!(report.by_method.len(), 2);
        assert_eq!(report.by_method[0].method, PaymentMethod::Card);
        assert_eq!(report.by_method[0].total, dec!(600.00));
        assert_eq!(report.by_method[0].count, 2);
        assert_eq!(report.by_method[1].method, PaymentMethod::Cash);

        assert_eq!(report.by_month.len(), 2);
        assert_eq!(report.by_month[0].month, "2026-03");
        assert_eq!(report.by_month[0].total, dec!(600.00));
        assert_eq!(report.by_month[0].average, dec!(300.00));
        assert_eq!(report.by_month[1].month, "2026-04");
        assert_eq!(report.by_month[1].count, 1);
    }

    #[tokio::test]
    async fn test_revenue_report_empty_range() {
        let engine = engine_with_rooms(1).await;
        let report = engine
            .revenue_report(date("2026-03-01"), date("2026-03-31"))
            .await
            .unwrap();
        assert_eq!(report.total, Decimal::ZERO);
        assert_eq!(report.transactions, 0);
        assert_eq!(report.average, Decimal::ZERO);
        assert!(report.by_method.is_empty());
        assert!(report.by_month.is_empty());
    }

    #[tokio::test]
    async fn test_booking_mix_counts_by_status() {
        let engine = engine_with_rooms(4).await;
        for room in 1..=3 {
            let booking = engine
                .create_booking(1, room, date("2026-03-01"), date("2026-03-03"), None)
                .await
                .unwrap();
            engine.confirm(booking.id).await.unwrap();
        }
        engine
            .create_booking(1, 4, date("2026-03-01"), date("2026-03-03"), None)
            .await
            .unwrap();

        let report = engine
            .booking_mix_report(date("2026-02-01"), date("2026-02-01"))
            .await
            .unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.by_status[0].status, BookingStatus::Confirmed);
        assert_eq!(report.by_status[0].count, 3);
        assert_eq!(report.by_status[0].share, 75.0);
        assert_eq!(report.by_status[1].status, BookingStatus::Pending);
        assert_eq!(report.by_status[1].share, 25.0);
    }
}
