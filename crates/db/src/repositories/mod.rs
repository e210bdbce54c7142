//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every write runs in its own database transaction and every rule check is
//! delegated to `tally-core`.

pub mod account;
pub mod entry;
pub mod error;
pub mod line;
mod lookup;
pub mod owner;
pub mod report;

pub use account::{AccountRepository, CreateAccountInput};
pub use entry::EntryRepository;
pub use error::RepositoryError;
pub use line::{CreateLineInput, LineRepository};
pub use owner::{CreateOwnerInput, OwnerRepository};
pub use report::ReportRepository;
