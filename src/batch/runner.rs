//! Running a plan of conversion jobs.

use std::fs;
use std::sync::Arc;

use rayon::prelude::*;

use crate::convert::{
    ConversionJob, ConversionReport, ConvertOptions, DocumentConverter, DocxConverter,
};
use crate::error::Error;

use super::{BatchSummary, JobPlan, JobSink};

/// Runs every job of a plan, isolating failures per document.
///
/// Jobs are independent: each one writes only under its own output
/// directory, so the parallel mode shares nothing between workers.
pub struct BatchRunner {
    converter: Arc<dyn DocumentConverter>,
    options: ConvertOptions,
    parallel: bool,
}

impl BatchRunner {
    /// Create a sequential runner.
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            converter,
            options: ConvertOptions::default(),
            parallel: false,
        }
    }

    /// Set conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Convert jobs on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create the job's output directory and convert it.
    pub fn run_job(&self, job: &ConversionJob) -> ConversionReport {
        if let Err(e) = fs::create_dir_all(&job.output_dir) {
            let err = Error::write(job.output_dir.clone(), e);
            log::error!("failed to convert {}: {}", job.source.display(), err);
            return ConversionReport::failed(&job.source, &err);
        }
        self.converter.convert_job(job, &self.options)
    }

    /// Run every job and report to `sink` in plan order.
    ///
    /// In sequential mode each `job_started` precedes that job's work. In
    /// parallel mode all jobs finish first and the sink sees the same call
    /// sequence afterwards. Conflicting documents are reported last, as
    /// failures, without being read.
    pub fn run(&self, plan: &JobPlan, sink: &mut dyn JobSink) -> BatchSummary {
        let total = plan.len();
        let mut summary = BatchSummary::new();
        summary.add_skipped(plan.skipped.iter().cloned());

        if self.parallel {
            let reports: Vec<ConversionReport> =
                plan.jobs.par_iter().map(|job| self.run_job(job)).collect();
            for (index, (job, report)) in plan.jobs.iter().zip(&reports).enumerate() {
                sink.job_started(index, total, job);
                sink.job_finished(index, total, report);
                summary.record(report);
            }
        } else {
            for (index, job) in plan.jobs.iter().enumerate() {
                sink.job_started(index, total, job);
                let report = self.run_job(job);
                sink.job_finished(index, total, &report);
                summary.record(&report);
            }
        }

        for (offset, conflict) in plan.conflicts.iter().enumerate() {
            let index = plan.jobs.len() + offset;
            let err = conflict.error();
            log::error!("failed to convert {}: {}", conflict.job.source.display(), err);
            let report = ConversionReport::failed(&conflict.job.source, &err);
            sink.job_started(index, total, &conflict.job);
            sink.job_finished(index, total, &report);
            summary.record(&report);
        }

        summary
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(Arc::new(DocxConverter::new()))
    }
}
