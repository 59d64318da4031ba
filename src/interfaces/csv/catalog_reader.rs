use crate::domain::room::{Room, RoomStatus, RoomType};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    room: u32,
    number: String,
    floor: i32,
    r#type: String,
    price: Decimal,
    capacity: u32,
    status: Option<RoomStatus>,
}

/// Loads the room catalog from a CSV source.
///
/// Each row carries its room type inline; types are deduplicated by name and
/// assigned sequential ids, so the catalog file stays flat and hand-editable.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn catalog(self) -> Result<(Vec<RoomType>, Vec<Room>)> {
        let mut room_types: Vec<RoomType> = Vec::new();
        let mut rooms = Vec::new();

        for record in self.reader.into_deserialize() {
            let record: CatalogRecord = record?;
            let type_id = match room_types.iter().find(|t| t.name == record.r#type) {
                Some(existing) => existing.id,
                None => {
                    let id = room_types.len() as u32 + 1;
                    room_types.push(RoomType {
                        id,
                        name: record.r#type.clone(),
                        base_price: record.price,
                        capacity: record.capacity,
                    });
                    id
                }
            };
            rooms.push(Room {
                id: record.room,
                number: record.number,
                room_type: type_id,
                floor: record.floor,
                status: record.status.unwrap_or_default(),
            });
        }

        Ok((room_types, rooms))
    }
}
