// The cleaning/chunking pipeline lives here - the part that has to be right
pub mod chunk;
pub mod config;
pub mod corpus;
pub mod error;
pub mod models;
pub mod normalize;
pub mod records;
pub mod source;

pub use chunk::{basic_clean, clean_and_split};
pub use config::Config;
pub use error::Error;
pub use normalize::normalize;
pub use records::build_records;
pub use source::{ArticleSource, WikipediaSource};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
