use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum LogAction {
    CheckIn,
    CheckOut,
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogAction::CheckIn => "CheckIn",
            LogAction::CheckOut => "CheckOut",
        };
        f.write_str(name)
    }
}

/// Append-only audit record: who moved which guest in or out, and when.
/// One entry per check-in and one per check-out.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CheckInOutLog {
    pub id: u32,
    pub booking: u32,
    pub staff: u32,
    pub action: LogAction,
    pub logged_at: NaiveDateTime,
    pub notes: Option<String>,
}
