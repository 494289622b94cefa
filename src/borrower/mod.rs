//! Borrower records and batch input loading

mod data;
pub mod loader;

pub use data::Borrower;
pub use loader::{load_borrowers, load_borrowers_from_reader};
