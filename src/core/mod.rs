//! Core business logic - framework-agnostic sheet loading, joining, views and reminders.

/// Login gate and per-user session state
pub mod auth;
/// Optional reminder wording via a generative-text endpoint
pub mod compose;
/// Concurrent three-sheet load and the in-memory dataset
pub mod dashboard;
/// Join-and-derive: statuses, unpaid count and due amount
pub mod ledger;
/// Phone number normalization
pub mod phone;
/// Reminder messages and deep links
pub mod reminder;
/// Sheet fetching and payload parsing
pub mod sheet;
/// Filter, search, summary and pagination
pub mod view;
