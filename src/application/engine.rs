use crate::domain::booking::{Booking, BookingAction, BookingStatus};
use crate::domain::log::{CheckInOutLog, LogAction};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::ports::{BookingStoreBox, Clock, LogStoreBox, PaymentStoreBox, RoomStoreBox};
use crate::domain::room::{Room, RoomStatus, RoomType};
use crate::error::{BookingError, Result};
use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// The main entry point for the booking application.
///
/// `BookingEngine` owns the storage ports and runs every booking operation as
/// a single awaited read-then-write against them. The no-double-booking
/// invariant is enforced by the booking store's atomic insert; status changes
/// go through the central transition table and a compare-and-swap write.
pub struct BookingEngine {
    pub(crate) rooms: RoomStoreBox,
    pub(crate) bookings: BookingStoreBox,
    pub(crate) payments: PaymentStoreBox,
    pub(crate) logs: LogStoreBox,
    pub(crate) clock: Box<dyn Clock>,
}

impl BookingEngine {
    pub fn new(
        rooms: RoomStoreBox,
        bookings: BookingStoreBox,
        payments: PaymentStoreBox,
        logs: LogStoreBox,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            bookings,
            payments,
            logs,
            clock,
        }
    }

    /// Seeds one room-type row. Reference data, safe to overwrite.
    pub async fn register_room_type(&self, room_type: RoomType) -> Result<()> {
        self.rooms.store_room_type(room_type).await
    }

    /// Seeds one room. A reloaded catalog must not clobber live room state,
    /// so an already-known room is left untouched.
    pub async fn register_room(&self, room: Room) -> Result<()> {
        if self.rooms.room(room.id).await?.is_some() {
            return Ok(());
        }
        self.rooms.store_room(room).await
    }

    /// Creates a Pending booking for the given stay, pricing it at
    /// nights x the room type's base price. The overlap check and the insert
    /// run as one atomic step inside the booking store, so two concurrent
    /// requests for the same dates cannot both succeed.
    pub async fn create_booking(
        &self,
        customer: u32,
        room_id: u32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        notes: Option<String>,
    ) -> Result<Booking> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }
        if check_in < self.clock.today() {
            return Err(BookingError::PastCheckIn);
        }

        let room = self
            .rooms
            .room(room_id)
            .await?
            .ok_or(BookingError::RoomNotFound(room_id))?;
        let room_type = self
            .rooms
            .room_type(room.room_type)
            .await?
            .ok_or(BookingError::RoomNotFound(room_id))?;

        let nights = (check_out - check_in).num_days();
        let booking = Booking {
            id: 0, // assigned by the store
            customer,
            room: room_id,
            check_in,
            check_out,
            booked_at: self.clock.now(),
            status: BookingStatus::Pending,
            total: Decimal::from(nights) * room_type.base_price,
            notes,
        };

        let booking = self.bookings.insert_if_vacant(booking).await?;
        tracing::info!(
            booking = booking.id,
            room = room_id,
            %check_in,
            %check_out,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn confirm(&self, booking_id: u32) -> Result<Booking> {
        self.transition(booking_id, BookingAction::Confirm).await
    }

    /// Cancelling frees the slot for new bookings. No room status change is
    /// needed: Occupied is only ever set at check-in, and check-in is not
    /// reachable once the booking is Cancelled.
    pub async fn cancel(&self, booking_id: u32) -> Result<Booking> {
        self.transition(booking_id, BookingAction::Cancel).await
    }

    /// Moves a Confirmed booking to CheckedIn, marks the room Occupied and
    /// appends an audit entry. The room write follows the booking write: the
    /// booking row is the serialization point, the room row a derived cache.
    pub async fn check_in(
        &self,
        booking_id: u32,
        staff: u32,
        notes: Option<String>,
    ) -> Result<Booking> {
        let booking = self.transition(booking_id, BookingAction::CheckIn).await?;
        self.rooms
            .set_room_status(booking.room, RoomStatus::Occupied)
            .await?;
        self.logs
            .append(CheckInOutLog {
                id: 0, // assigned by the store
                booking: booking_id,
                staff,
                action: LogAction::CheckIn,
                logged_at: self.clock.now(),
                notes,
            })
            .await?;
        Ok(booking)
    }

    /// Moves a CheckedIn booking to CheckedOut, releases the room and appends
    /// an audit entry.
    pub async fn check_out(
        &self,
        booking_id: u32,
        staff: u32,
        notes: Option<String>,
    ) -> Result<Booking> {
        let booking = self.transition(booking_id, BookingAction::CheckOut).await?;
        self.rooms
            .set_room_status(booking.room, RoomStatus::Available)
            .await?;
        self.logs
            .append(CheckInOutLog {
                id: 0,
                booking: booking_id,
                staff,
                action: LogAction::CheckOut,
                logged_at: self.clock.now(),
                notes,
            })
            .await?;
        Ok(booking)
    }

    async fn transition(&self, booking_id: u32, action: BookingAction) -> Result<Booking> {
        let booking = self
            .bookings
            .booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        let from = booking.status;
        let mut updated = booking;
        updated.status = from.apply(action)?;

        match self
            .bookings
            .update_if_status(updated.clone(), from)
            .await
        {
            Ok(()) => {
                tracing::debug!(booking = booking_id, %from, to = %updated.status, "transition");
                Ok(updated)
            }
            Err(BookingError::ConcurrencyConflict) => Err(self.lost_race(booking_id, action).await?),
            Err(e) => Err(e),
        }
    }

    /// A lost compare-and-swap is reported against the status that actually
    /// won the race: `InvalidTransition` when the action is no longer legal,
    /// `ConcurrencyConflict` when a retry by the caller could still succeed.
    /// The engine itself never retries.
    async fn lost_race(&self, booking_id: u32, action: BookingAction) -> Result<BookingError> {
        let current = self
            .bookings
            .booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;
        match current.status.apply(action) {
            Ok(_) => Ok(BookingError::ConcurrencyConflict),
            Err(e) => Ok(e),
        }
    }

    /// Rooms free for the whole `[check_in, check_out)` range: status
    /// Available and no booking still blocking the room overlaps the range.
    /// Maintenance and Occupied rooms are never returned. Pure read.
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Room>> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }

        let blocked: HashSet<u32> = self
            .bookings
            .bookings()
            .await?
            .into_iter()
            .filter(|b| b.blocks_room() && b.overlaps(check_in, check_out))
            .map(|b| b.room)
            .collect();

        Ok(self
            .rooms
            .rooms()
            .await?
            .into_iter()
            .filter(|r| r.status == RoomStatus::Available && !blocked.contains(&r.id))
            .collect())
    }

    /// Captures a payment against an existing booking. The receipt number is
    /// generated here; uniqueness is enforced by the store.
    pub async fn record_payment(
        &self,
        booking_id: u32,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Payment> {
        self.bookings
            .booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        let payment = Payment {
            id: 0,
            booking: booking_id,
            amount,
            method,
            paid_at: self.clock.now(),
            status: PaymentStatus::Completed,
            receipt: self.receipt_number(),
        };
        let payment = self.payments.insert(payment).await?;
        tracing::info!(payment = payment.id, receipt = %payment.receipt, "payment captured");
        Ok(payment)
    }

    pub async fn refund_payment(&self, payment_id: u32) -> Result<Payment> {
        let mut payment = self
            .payments
            .payment(payment_id)
            .await?
            .ok_or(BookingError::PaymentNotFound(payment_id))?;
        let previous = payment.status;
        payment.refund()?;
        self.payments
            .update_if_status(payment.clone(), previous)
            .await?;
        Ok(payment)
    }

    fn receipt_number(&self) -> String {
        let stamp = self.clock.now().format("%Y%m%d%H%M%S");
        let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
        format!("RCP-{stamp}-{suffix}")
    }

    pub async fn room(&self, room_id: u32) -> Result<Room> {
        self.rooms
            .room(room_id)
            .await?
            .ok_or(BookingError::RoomNotFound(room_id))
    }

    pub async fn booking(&self, booking_id: u32) -> Result<Booking> {
        self.bookings
            .booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))
    }

    pub async fn bookings_for_customer(&self, customer: u32) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .bookings()
            .await?
            .into_iter()
            .filter(|b| b.customer == customer)
            .collect();
        bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(bookings)
    }

    /// Confirmed bookings whose stay should have started by today.
    pub async fn pending_check_ins(&self) -> Result<Vec<Booking>> {
        let today = self.clock.today();
        Ok(self
            .bookings
            .bookings()
            .await?
            .into_iter()
            .filter(|b| b.status == BookingStatus::Confirmed && b.check_in <= today)
            .collect())
    }

    pub async fn current_guests(&self) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .bookings()
            .await?
            .into_iter()
            .filter(|b| b.status == BookingStatus::CheckedIn)
            .collect())
    }

    pub async fn audit_trail(&self, booking_id: u32) -> Result<Vec<CheckInOutLog>> {
        self.logs.entries_for_booking(booking_id).await
    }

    /// Consumes the engine and returns the full booking ledger, by id.
    pub async fn into_ledger(self) -> Result<Vec<Booking>> {
        let mut bookings = self.bookings.bookings().await?;
        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }
}
