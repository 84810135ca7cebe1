//! Domain logic for the Kafra roster manager.
//!
//! Everything in this crate is pure: no database, no async, no I/O. The
//! persistence and HTTP layers call into it for validation, search and
//! import reconciliation.

pub mod error;
pub mod instance;
pub mod job_class;
pub mod query;
pub mod roster;
pub mod transfer;
pub mod types;
