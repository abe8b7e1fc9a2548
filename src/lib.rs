// Library surface for the binary, headless tests and reuse.
pub mod aggregate;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod runtime;
pub mod time_series;
pub mod ui;

pub use error::{DataFormatError, Error, Result};
pub use pipeline::{ChartKind, PipelineConfig, PipelineOutput};
pub use record::SessionRecord;
