pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::mongo::MongoStore;
pub use crate::config::{CliConfig, Settings};
pub use crate::core::{
    etl::EtlEngine, extractor::Extractor, loader::Loader, pipeline::PulsePipeline,
    transformer::Transformer,
};
pub use crate::domain::model::PulseDocument;
pub use crate::domain::ports::{DocumentStore, Pipeline};
pub use crate::utils::error::{EtlError, Result};
