use super::booking::{Booking, BookingStatus};
use super::log::CheckInOutLog;
use super::payment::{Payment, PaymentStatus};
use super::room::{Room, RoomStatus, RoomType};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn store_room(&self, room: Room) -> Result<()>;
    async fn store_room_type(&self, room_type: RoomType) -> Result<()>;
    async fn room(&self, room_id: u32) -> Result<Option<Room>>;
    async fn room_type(&self, type_id: u32) -> Result<Option<RoomType>>;
    async fn rooms(&self) -> Result<Vec<Room>>;
    async fn set_room_status(&self, room_id: u32, status: RoomStatus) -> Result<()>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts the booking only if no booking still blocking the room
    /// overlaps its date range. The check and the insert are a single atomic
    /// step against the room's booking set. The store assigns the id; any
    /// caller-provided id is ignored. Fails with `RoomUnavailable` on
    /// conflict.
    async fn insert_if_vacant(&self, booking: Booking) -> Result<Booking>;
    /// Writes the booking back only while its stored status still matches
    /// `expected`. Fails with `ConcurrencyConflict` when another writer got
    /// there first.
    async fn update_if_status(&self, booking: Booking, expected: BookingStatus) -> Result<()>;
    async fn booking(&self, booking_id: u32) -> Result<Option<Booking>>;
    async fn bookings(&self) -> Result<Vec<Booking>>;
    async fn bookings_for_room(&self, room_id: u32) -> Result<Vec<Booking>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// The store assigns the id and rejects duplicate receipt numbers.
    async fn insert(&self, payment: Payment) -> Result<Payment>;
    async fn update_if_status(&self, payment: Payment, expected: PaymentStatus) -> Result<()>;
    async fn payment(&self, payment_id: u32) -> Result<Option<Payment>>;
    async fn payments(&self) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait LogStore: Send + Sync {
    async fn append(&self, entry: CheckInOutLog) -> Result<CheckInOutLog>;
    async fn entries_for_booking(&self, booking_id: u32) -> Result<Vec<CheckInOutLog>>;
}

pub type RoomStoreBox = Box<dyn RoomStore>;
pub type BookingStoreBox = Box<dyn BookingStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type LogStoreBox = Box<dyn LogStore>;

/// Source of "today" for the past-check-in rule and of record timestamps.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a fixed date, for reproducible runs and tests.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn now(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }
}
