//! Quote file management module.
//!
//! - [`model`] - Provider enumeration, file keys and descriptions
//! - [`file_name`] - Parsing of uploaded file names into keys
//! - [`store`] - Storage trait implemented by the database and filesystem backends
//! - [`service`] - Input validation and delegation to the active store
//!
//! ```text
//! HTTP handlers → QuoteFileService → dyn QuoteFileStore
//!                                        ├── storage-sqlite
//!                                        └── storage-fs
//! ```

pub mod errors;
pub mod file_name;
pub mod model;
pub mod service;
pub mod store;


pub use errors::FileNameError;
pub use file_name::parse_file_date;
pub use model::{
    stored_file_name, FileDescription, QuoteKey, QuoteProvider, FILE_DATE_FORMAT, FILE_EXTENSION,
};
pub use service::{validate_upload, QuoteFileService, QuoteFileServiceTrait, CSV_CONTENT_TYPE};
pub use store::{sort_descriptions, QuoteContent, QuoteFileStore, QuoteUpload};
