//! Observers of batch progress.

use crate::convert::{ConversionJob, ConversionOutcome, ConversionReport};

/// Receives job progress from a [`BatchRunner`](super::BatchRunner).
///
/// Calls arrive in plan order from the thread that called `run`.
pub trait JobSink {
    /// A job is about to be reported. `index` is zero-based.
    fn job_started(&mut self, index: usize, total: usize, job: &ConversionJob);

    /// A job finished.
    fn job_finished(&mut self, index: usize, total: usize, report: &ConversionReport);
}

/// Sink writing one log record per job through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl JobSink for LogSink {
    fn job_started(&mut self, index: usize, total: usize, job: &ConversionJob) {
        log::info!(
            "[{}/{}] processing {}",
            index + 1,
            total,
            job.source.display()
        );
    }

    fn job_finished(&mut self, _index: usize, _total: usize, report: &ConversionReport) {
        match &report.outcome {
            ConversionOutcome::Success => {
                log::info!("{}: {}", report.source.display(), report.outcome)
            }
            ConversionOutcome::PartialSuccess { .. } => {
                log::warn!("{}: {}", report.source.display(), report.outcome)
            }
            ConversionOutcome::Failure { .. } => {
                log::error!("{}: {}", report.source.display(), report.outcome)
            }
        }
    }
}

/// Sink keeping every report, in order.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    /// Jobs started
    pub started: Vec<ConversionJob>,

    /// Reports received
    pub reports: Vec<ConversionReport>,
}

impl CollectSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobSink for CollectSink {
    fn job_started(&mut self, _index: usize, _total: usize, job: &ConversionJob) {
        self.started.push(job.clone());
    }

    fn job_finished(&mut self, _index: usize, _total: usize, report: &ConversionReport) {
        self.reports.push(report.clone());
    }
}

impl<S: JobSink + ?Sized> JobSink for &mut S {
    fn job_started(&mut self, index: usize, total: usize, job: &ConversionJob) {
        (**self).job_started(index, total, job);
    }

    fn job_finished(&mut self, index: usize, total: usize, report: &ConversionReport) {
        (**self).job_finished(index, total, report);
    }
}

/// Forwards every call to two sinks.
pub struct Tee<A, B>(pub A, pub B);

impl<A: JobSink, B: JobSink> JobSink for Tee<A, B> {
    fn job_started(&mut self, index: usize, total: usize, job: &ConversionJob) {
        self.0.job_started(index, total, job);
        self.1.job_started(index, total, job);
    }

    fn job_finished(&mut self, index: usize, total: usize, report: &ConversionReport) {
        self.0.job_finished(index, total, report);
        self.1.job_finished(index, total, report);
    }
}
