//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod account_repo;
pub mod character_repo;
pub mod transfer_repo;

pub use account_repo::AccountRepo;
pub use character_repo::CharacterRepo;
pub use transfer_repo::TransferRepo;
