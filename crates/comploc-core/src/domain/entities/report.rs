use serde::Serialize;

/// Maximum number of failure descriptors kept in a report.
pub const MAX_REPORTED_ERRORS: usize = 20;

/// Outcome of a localization run.
///
/// Built once through [`ReportBuilder`] and immutable afterwards. Beyond
/// [`MAX_REPORTED_ERRORS`] failures only the `failed` counter grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    locales: usize,
    applied: usize,
    skipped: usize,
    failed: usize,
    errors: Vec<String>,
}

impl Report {
    pub fn locales(&self) -> usize {
        self.locales
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Failures that were counted but not listed.
    pub fn unlisted_failures(&self) -> usize {
        self.failed.saturating_sub(self.errors.len())
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Accumulates counts while a run is in progress.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new(locales: usize) -> Self {
        Self {
            report: Report {
                locales,
                ..Report::default()
            },
        }
    }

    pub fn applied(&mut self) {
        self.report.applied += 1;
    }

    pub fn skipped(&mut self) {
        self.report.skipped += 1;
    }

    pub fn failed(&mut self, descriptor: impl Into<String>) {
        self.report.failed += 1;
        self.push_error(descriptor.into());
    }

    /// Fold a partial report (e.g. one locale pass) into this one.
    ///
    /// The locale count is left alone; it is fixed at construction.
    pub fn absorb(&mut self, partial: &Report) {
        self.report.applied += partial.applied;
        self.report.skipped += partial.skipped;
        self.report.failed += partial.failed;
        for error in &partial.errors {
            self.push_error(error.clone());
        }
    }

    pub fn build(self) -> Report {
        self.report
    }

    fn push_error(&mut self, descriptor: String) {
        if self.report.errors.len() < MAX_REPORTED_ERRORS {
            self.report.errors.push(descriptor);
        }
    }
}
