pub mod error;
pub mod formats;
pub mod ingest;
pub mod output;
pub mod parser;
pub mod record;
pub mod registry;
pub mod reports;

pub use error::{CheckError, Result};
pub use ingest::Ingestor;
pub use registry::{Line, LineRegistry, Stop};
