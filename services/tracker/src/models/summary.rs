//! Read-side row shapes produced by the aggregation queries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-location head count for one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationCount {
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub count: i64,
}

/// One roster line: who is where on a given date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub user_name: String,
    pub location_name: String,
    pub emoji: String,
    pub color: String,
}

/// One day of a user's personal calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub location_name: String,
    pub emoji: String,
    pub color: String,
}
