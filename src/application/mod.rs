// Application layer: the ledger service owning the loaded ledger and its
// storage, plus the report shapes it hands to front-ends.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
