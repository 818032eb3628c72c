//! Aggregation pipeline services.

pub mod assembler;
pub mod classifier;
pub mod fetcher;
pub mod history;
pub mod links;
pub mod markdown;


pub use assembler::{AssemblerSettings, HistoryFailurePolicy, ReportAssembler};
pub use classifier::{ClassificationRules, classify};
pub use fetcher::{HttpRecordFetcher, RecordFetcher, ResultFilter};
pub use history::HistoryAggregator;
pub use links::ReportLinks;
