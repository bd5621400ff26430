use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    Running,
    Executed,
    Failed,
    Skipped,
    Compensated,
    CompensationFailed,
}

impl StepStatus {
    fn symbol(self) -> &'static str {
        match self {
            Self::Running => "…",
            Self::Executed => "✓",
            Self::Failed => "✗",
            Self::Skipped => "-",
            Self::Compensated => "↩",
            Self::CompensationFailed => "⚠",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub started_at: Instant,
    /// Set once execution, skipping or compensation has finished.
    pub completed_at: Option<Instant>,
    pub compensation_description: Option<String>,
}

/// Chronological record of one saga run.
///
/// Records are addressed by position, so a saga may contain two steps with
/// the same name without their statuses bleeding into each other.
#[derive(Debug, Clone, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the new record.
    pub(crate) fn record_start(&mut self, name: &str) -> usize {
        self.push(name, StepStatus::Running, None)
    }

    pub(crate) fn record_skipped(&mut self, name: &str) {
        let now = Instant::now();
        self.push(name, StepStatus::Skipped, Some(now));
    }

    pub(crate) fn record_success(&mut self, index: usize, compensation_description: String) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_failure(&mut self, index: usize) {
        self.finish(index, StepStatus::Failed);
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        self.finish(index, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize) {
        self.finish(index, StepStatus::CompensationFailed);
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Records with the given status, in execution order.
    pub fn with_status(&self, status: StepStatus) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter(move |r| r.status == status)
    }

    #[must_use]
    pub fn was_compensated(&self) -> bool {
        self.records.iter().any(|r| {
            matches!(
                r.status,
                StepStatus::Compensated | StepStatus::CompensationFailed
            )
        })
    }

    /// One line per step: `✓` executed, `✗` failed, `↩` compensated,
    /// `⚠` compensation failed, `-` skipped.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| format!("{} {}", record.status.symbol(), record.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, name: &str, status: StepStatus, completed_at: Option<Instant>) -> usize {
        self.records.push(StepRecord {
            name: name.to_string(),
            status,
            started_at: Instant::now(),
            completed_at,
            compensation_description: None,
        });
        self.records.len() - 1
    }

    fn finish(&mut self, index: usize, status: StepStatus) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }
}
