pub mod etl;
pub mod extractor;
pub mod loader;
pub mod pipeline;
pub mod transformer;

pub use crate::domain::model::PulseDocument;
pub use crate::domain::ports::{DocumentStore, Pipeline};
pub use crate::utils::error::Result;
