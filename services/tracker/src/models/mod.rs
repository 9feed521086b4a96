//! Tracker service models

pub mod location;
pub mod response;
pub mod summary;
pub mod user;

// Re-export for convenience
pub use location::Location;
pub use response::{Response, SetLocationRequest};
pub use summary::{CalendarEntry, LocationCount, RosterEntry};
pub use user::{CreateUserRequest, SetActiveRequest, User, UserProfile};
