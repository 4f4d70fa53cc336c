mod model;
mod repository;

pub use model::QuoteFileDB;
pub use repository::QuoteFileRepository;
