use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::log::CheckInOutLog;
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::ports::{BookingStore, LogStore, PaymentStore, RoomStore};
use crate::domain::room::{Room, RoomStatus, RoomType};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for the room catalog.
///
/// Uses `Arc<RwLock<..>>` to allow shared concurrent access. Ideal for tests
/// and demo runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryRoomStore {
    tables: Arc<RwLock<RoomTables>>,
}

#[derive(Default)]
struct RoomTables {
    rooms: HashMap<u32, Room>,
    room_types: HashMap<u32, RoomType>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn store_room(&self, room: Room) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.rooms.insert(room.id, room);
        Ok(())
    }

    async fn store_room_type(&self, room_type: RoomType) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.room_types.insert(room_type.id, room_type);
        Ok(())
    }

    async fn room(&self, room_id: u32) -> Result<Option<Room>> {
        let tables = self.tables.read().await;
        Ok(tables.rooms.get(&room_id).cloned())
    }

    async fn room_type(&self, type_id: u32) -> Result<Option<RoomType>> {
        let tables = self.tables.read().await;
        Ok(tables.room_types.get(&type_id).cloned())
    }

    async fn rooms(&self) -> Result<Vec<Room>> {
        let tables = self.tables.read().await;
        Ok(tables.rooms.values().cloned().collect())
    }

    async fn set_room_status(&self, room_id: u32, status: RoomStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        let room = tables
            .rooms
            .get_mut(&room_id)
            .ok_or(BookingError::RoomNotFound(room_id))?;
        room.status = status;
        Ok(())
    }
}

/// A thread-safe in-memory booking ledger.
///
/// The whole ledger lives behind one write lock, which doubles as the
/// room-level lock required to make the overlap check and the insert a
/// single atomic step.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    table: Arc<RwLock<BookingTable>>,
}

#[derive(Default)]
struct BookingTable {
    bookings: HashMap<u32, Booking>,
    next_id: u32,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert_if_vacant(&self, booking: Booking) -> Result<Booking> {
        let mut table = self.table.write().await;
        let conflict = table.bookings.values().any(|b| {
            b.room == booking.room
                && b.blocks_room()
                && b.overlaps(booking.check_in, booking.check_out)
        });
        if conflict {
            return Err(BookingError::RoomUnavailable(booking.room));
        }

        table.next_id += 1;
        let mut booking = booking;
        booking.id = table.next_id;
        table.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_if_status(&self, booking: Booking, expected: BookingStatus) -> Result<()> {
        let mut table = self.table.write().await;
        match table.bookings.get(&booking.id) {
            Some(current) if current.status == expected => {
                table.bookings.insert(booking.id, booking);
                Ok(())
            }
            Some(_) => Err(BookingError::ConcurrencyConflict),
            None => Err(BookingError::BookingNotFound(booking.id)),
        }
    }

    async fn booking(&self, booking_id: u32) -> Result<Option<Booking>> {
        let table = self.table.read().await;
        Ok(table.bookings.get(&booking_id).cloned())
    }

    async fn bookings(&self) -> Result<Vec<Booking>> {
        let table = self.table.read().await;
        Ok(table.bookings.values().cloned().collect())
    }

    async fn bookings_for_room(&self, room_id: u32) -> Result<Vec<Booking>> {
        let table = self.table.read().await;
        Ok(table
            .bookings
            .values()
            .filter(|b| b.room == room_id)
            .cloned()
            .collect())
    }
}

/// A thread-safe in-memory payment store enforcing receipt uniqueness.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    table: Arc<RwLock<PaymentTable>>,
}

#[derive(Default)]
struct PaymentTable {
    payments: HashMap<u32, Payment>,
    receipts: HashSet<String>,
    next_id: u32,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, payment: Payment) -> Result<Payment> {
        let mut table = self.table.write().await;
        if !table.receipts.insert(payment.receipt.clone()) {
            return Err(BookingError::ConcurrencyConflict);
        }

        table.next_id += 1;
        let mut payment = payment;
        payment.id = table.next_id;
        table.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn update_if_status(&self, payment: Payment, expected: PaymentStatus) -> Result<()> {
        let mut table = self.table.write().await;
        match table.payments.get(&payment.id) {
            Some(current) if current.status == expected => {
                table.payments.insert(payment.id, payment);
                Ok(())
            }
            Some(_) => Err(BookingError::ConcurrencyConflict),
            None => Err(BookingError::PaymentNotFound(payment.id)),
        }
    }

    async fn payment(&self, payment_id: u32) -> Result<Option<Payment>> {
        let table = self.table.read().await;
        Ok(table.payments.get(&payment_id).cloned())
    }

    async fn payments(&self) -> Result<Vec<Payment>> {
        let table = self.table.read().await;
        Ok(table.payments.values().cloned().collect())
    }
}

/// Append-only in-memory audit log.
#[derive(Default, Clone)]
pub struct InMemoryLogStore {
    table: Arc<RwLock<LogTable>>,
}

#[derive(Default)]
struct LogTable {
    entries: Vec<CheckInOutLog>,
    next_id: u32,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn append(&self, entry: CheckInOutLog) -> Result<CheckInOutLog> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let mut entry = entry;
        entry.id = table.next_id;
        table.entries.push(entry.clone());
        Ok(entry)
    }

    async fn entries_for_booking(&self, booking_id: u32) -> Result<Vec<CheckInOutLog>> {
        let table = self.table.read().await;
        Ok(table
            .entries
            .iter()
            .filter(|e| e.booking == booking_id)
            .cloned()
            .collect())
    }
}
