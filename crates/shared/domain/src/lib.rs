//! # Domain Models
//!
//! Pure types shared by every Accord crate, with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, networking, or heavy logic; just data and simple helpers.

pub mod account;
pub mod config;
pub mod constants;
