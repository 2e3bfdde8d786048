/// Names touched by one reconciliation pass, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Orphans deleted from the registry.
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    /// Definitions identical to the last applied ones; not parsed.
    pub unchanged: Vec<String>,
    /// The parser declined these; they will be retried.
    pub skipped: Vec<String>,
    /// The parser failed or panicked on these; they will be retried.
    pub failed: Vec<String>,
}

impl ReconcileReport {
    /// True when the registry was not modified.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.updated.is_empty()
    }

    /// Number of parser invocations during the pass.
    #[must_use]
    pub fn parsed(&self) -> usize {
        self.added.len() + self.updated.len() + self.skipped.len() + self.failed.len()
    }

    pub(crate) fn sort(&mut self) {
        for names in [
            &mut self.removed,
            &mut self.added,
            &mut self.updated,
            &mut self.unchanged,
            &mut self.skipped,
            &mut self.failed,
        ] {
            names.sort_unstable();
        }
    }
}
