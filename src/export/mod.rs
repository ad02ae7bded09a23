pub mod aggregate;
pub mod batch;
pub mod builder;
pub mod progress;
pub mod serializer;

pub use aggregate::{access_rank, aggregate, Aggregation};
pub use batch::{export_organizations, ExportOptions, ExportOutcome, ExportReport, ExportedSnapshot};
pub use builder::SnapshotBuilder;
pub use progress::{log_progress, ProgressCallback, SnapshotProgress};
pub use serializer::{output_path, parse, render, write_snapshot, OutputFormat};
