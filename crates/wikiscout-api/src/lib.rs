// Wikipedia API client - the corpus has to come from somewhere
pub mod error;
pub mod wikipedia;

pub use error::{ApiError, Result};
pub use wikipedia::{WikiPage, WikipediaClient};
