//! Dataset input, in-memory aggregation, and profile output for the
//! calluna pipeline.

mod dataset_provider;
mod domain;
mod error;
mod reader;
mod writer;

pub use dataset_provider::DatasetProvider;
pub use domain::{Dataset, DatasetSchema, Record, RunName};
pub use error::IoError;
pub use reader::DatasetReader;
pub use writer::ProfileWriter;
