pub mod config;
pub mod constants;
pub mod csv_io;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod normalize;
pub mod pipeline;
pub mod table;
pub mod types;

pub use config::MappingConfig;
pub use error::{MapperError, Result};
pub use mapper::{map_value, RowMapper};
pub use normalize::{normalization_key, LookupTable, ValueNormalizer};
pub use pipeline::{MappedReport, ReportPipeline, RunSummary};
pub use table::OutputTable;
pub use types::{ColumnSource, ColumnSpec, InputRow, OutputRow};
