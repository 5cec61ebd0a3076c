mod error;
mod export;
mod format;
mod import;

pub use error::*;
pub use export::*;
pub use format::{history_page_name, ACCOUNTS_FILE, FAVORITES_FILE, PAYMENTS_FILE};
pub use import::*;
