//! Batch conversion of a file or directory tree.
//!
//! [`JobPlanner`] turns a source path into [`ConversionJob`](crate::convert::ConversionJob)s
//! whose output directories mirror the source tree, [`BatchRunner`] runs
//! them and reports each one to a [`JobSink`], and the totals end up in a
//! [`BatchSummary`].

mod planner;
mod runner;
mod sink;
mod summary;

pub use planner::{JobPlan, JobPlanner, OutputConflict, DEFAULT_EXTENSIONS};
pub use runner::BatchRunner;
pub use sink::{CollectSink, JobSink, LogSink, Tee};
pub use summary::{BatchSummary, FailedDocument, ImageCount, PartialDocument};
