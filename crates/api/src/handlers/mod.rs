//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input with `kafra_core`, delegate to the repositories
//! in `kafra_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod account;
pub mod catalogue;
pub mod character;
pub mod search;
pub mod ticks;
pub mod transfer;
