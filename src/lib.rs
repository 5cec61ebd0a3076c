pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod observability;
pub mod storage;

pub use application::{AppError, LedgerService};
pub use domain::*;
pub use io::DumpError;
pub use storage::LedgerStore;
