use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::log::CheckInOutLog;
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::ports::{BookingStore, LogStore, PaymentStore, RoomStore};
use crate::domain::room::{Room, RoomStatus, RoomType};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for the room catalog.
pub const CF_ROOMS: &str = "rooms";
/// Column Family for room types.
pub const CF_ROOM_TYPES: &str = "room_types";
/// Column Family for the booking ledger.
pub const CF_BOOKINGS: &str = "bookings";
/// Column Family for payments.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for the check-in/out audit trail.
pub const CF_LOGS: &str = "logs";
/// Column Family for id counters.
pub const CF_META: &str = "meta";

/// A persistent store implementation using RocksDB.
///
/// One database holds every entity in its own Column Family with
/// JSON-serialized values and big-endian id keys. Check-then-write
/// operations (overlap-checked inserts, status compare-and-swap, counter
/// bumps) serialize on `write_gate`, the single-process equivalent of a
/// row-level lock on the ledger.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    write_gate: Arc<Mutex<()>>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// every required column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs: Vec<ColumnFamilyDescriptor> =
            [CF_ROOMS, CF_ROOM_TYPES, CF_BOOKINGS, CF_PAYMENTS, CF_LOGS, CF_META]
                .into_iter()
                .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
                .collect();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self {
            db: Arc::new(db),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("{name} column family not found")))
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: u32, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes =
            serde_json::to_vec(value).map_err(|e| internal(format!("serialization error: {e}")))?;
        self.db.put_cf(cf, key.to_be_bytes(), bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, key: u32) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key.to_be_bytes())? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes)
                    .map_err(|e| internal(format!("deserialization error: {e}")))?,
            )),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, bytes) = item?;
            values.push(
                serde_json::from_slice(&bytes)
                    .map_err(|e| internal(format!("deserialization error: {e}")))?,
            );
        }
        Ok(values)
    }

    /// Bumps and returns the named id counter. Callers hold `write_gate`.
    fn next_id(&self, counter: &str) -> Result<u32> {
        let cf = self.cf(CF_META)?;
        let current = match self.db.get_cf(cf, counter.as_bytes())? {
            Some(bytes) => u32::from_be_bytes(
                bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| internal(format!("corrupt {counter} id counter")))?,
            ),
            None => 0,
        };
        let next = current + 1;
        self.db.put_cf(cf, counter.as_bytes(), next.to_be_bytes())?;
        Ok(next)
    }
}

fn internal(message: String) -> BookingError {
    BookingError::Internal(Box::new(std::io::Error::other(message)))
}

#[async_trait]
impl RoomStore for RocksDbStore {
    async fn store_room(&self, room: Room) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.put(CF_ROOMS, room.id, &room)
    }

    async fn store_room_type(&self, room_type: RoomType) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.put(CF_ROOM_TYPES, room_type.id, &room_type)
    }

    async fn room(&self, room_id: u32) -> Result<Option<Room>> {
        self.fetch(CF_ROOMS, room_id)
    }

    async fn room_type(&self, type_id: u32) -> Result<Option<RoomType>> {
        self.fetch(CF_ROOM_TYPES, type_id)
    }

    async fn rooms(&self) -> Result<Vec<Room>> {
        self.scan(CF_ROOMS)
    }

    async fn set_room_status(&self, room_id: u32, status: RoomStatus) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let mut room: Room = self
            .fetch(CF_ROOMS, room_id)?
            .ok_or(BookingError::RoomNotFound(room_id))?;
        room.status = status;
        self.put(CF_ROOMS, room_id, &room)
    }
}

#[async_trait]
impl BookingStore for RocksDbStore {
    async fn insert_if_vacant(&self, booking: Booking) -> Result<Booking> {
        let _gate = self.write_gate.lock().await;
        let existing: Vec<Booking> = self.scan(CF_BOOKINGS)?;
        if existing.iter().any(|b| {
            b.room == booking.room
                && b.blocks_room()
                && b.overlaps(booking.check_in, booking.check_out)
        }) {
            return Err(BookingError::RoomUnavailable(booking.room));
        }

        let mut booking = booking;
        booking.id = self.next_id("booking")?;
        self.put(CF_BOOKINGS, booking.id, &booking)?;
        Ok(booking)
    }

    async fn update_if_status(&self, booking: Booking, expected: BookingStatus) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let current: Booking = self
            .fetch(CF_BOOKINGS, booking.id)?
            .ok_or(BookingError::BookingNotFound(booking.id))?;
        if current.status != expected {
            return Err(BookingError::ConcurrencyConflict);
        }
        self.put(CF_BOOKINGS, booking.id, &booking)
    }

    async fn booking(&self, booking_id: u32) -> Result<Option<Booking>> {
        self.fetch(CF_BOOKINGS, booking_id)
    }

    async fn bookings(&self) -> Result<Vec<Booking>> {
        self.scan(CF_BOOKINGS)
    }

    async fn bookings_for_room(&self, room_id: u32) -> Result<Vec<Booking>> {
        let all: Vec<Booking> = self.scan(CF_BOOKINGS)?;
        Ok(all.into_iter().filter(|b| b.room == room_id).collect())
    }
}

#[async_trait]
impl PaymentStore for RocksDbStore {
    async fn insert(&self, payment: Payment) -> Result<Payment> {
        let _gate = self.write_gate.lock().await;
        let existing: Vec<Payment> = self.scan(CF_PAYMENTS)?;
        if existing.iter().any(|p| p.receipt == payment.receipt) {
            return Err(BookingError::ConcurrencyConflict);
        }

        let mut payment = payment;
        payment.id = self.next_id("payment")?;
        self.put(CF_PAYMENTS, payment.id, &payment)?;
        Ok(payment)
    }

    async fn update_if_status(&self, payment: Payment, expected: PaymentStatus) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let current: Payment = self
            .fetch(CF_PAYMENTS, payment.id)?
            .ok_or(BookingError::PaymentNotFound(payment.id))?;
        if current.status != expected {
            return Err(BookingError::ConcurrencyConflict);
        }
        self.put(CF_PAYMENTS, payment.id, &payment)
    }

    async fn payment(&self, payment_id: u32) -> Result<Option<Payment>> {
        self.fetch(CF_PAYMENTS, payment_id)
    }

    async fn payments(&self) -> Result<Vec<Payment>> {
        self.scan(CF_PAYMENTS)
    }
}

#[async_trait]
impl LogStore for RocksDbStore {
    async fn append(&self, entry: CheckInOutLog) -> Result<CheckInOutLog> {
        let _gate = self.write_gate.lock().await;
        let mut entry = entry;
        entry.id = self.next_id("log")?;
        self.put(CF_LOGS, entry.id, &entry)?;
        Ok(entry)
    }

    async fn entries_for_booking(&self, booking_id: u32) -> Result<Vec<CheckInOutLog>> {
        let all: Vec<CheckInOutLog> = self.scan(CF_LOGS)?;
        let mut entries: Vec<CheckInOutLog> =
            all.into_iter().filter(|e| e.booking == booking_id).collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }
}
