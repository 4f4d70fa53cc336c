//! Filesystem storage implementation for the quote storage service.
//!
//! Implements [`QuoteFileStore`](quote_storage_core::quotes::QuoteFileStore)
//! on top of a plain directory tree:
//!
//! ```text
//! <BaseDirectory>/
//!   ShanghaiFuturesExchange/
//!     20230708.csv
//!   WienerBoerse/
//!     20230708.csv
//! ```
//!
//! Saves are written to a temp file in the provider directory and renamed
//! into place, so a reader sees either the old content or the new content.

pub mod layout;
pub mod storage;
mod temp_file;

pub use layout::QuoteFileLayout;
pub use storage::{FileSystemStorage, DIRECTORY_SCAN_THRESHOLD_DAYS};
