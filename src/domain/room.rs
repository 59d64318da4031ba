use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

/// Reference data describing a category of rooms and its nightly rate.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RoomType {
    pub id: u32,
    pub name: String,
    pub base_price: Decimal,
    pub capacity: u32,
}

/// A physical room. `status` is a cached view of the active booking set:
/// check-in flips it to Occupied, check-out back to Available.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Room {
    pub id: u32,
    pub number: String,
    pub room_type: u32,
    pub floor: i32,
    pub status: RoomStatus,
}
