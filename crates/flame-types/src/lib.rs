//! Wire and view models shared by the Flame client crates.
//!
//! Everything here mirrors what the backend sends or expects. None of it is
//! owned by the client beyond the session pair kept in `flame-store`.

pub mod api;
pub mod events;
pub mod models;
