//! Data models for the StaffDesk dashboard.
//!
//! Column names of [`ActivityRecord`] match the persisted activity log header exactly.

mod account;
mod activity;
mod message;
mod page;

pub use account::*;
pub use activity::*;
pub use message::*;
pub use page::*;
