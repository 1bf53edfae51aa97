/// Immutable knobs for the reconciliation pipeline. Instances are passed
/// explicitly into the planner, executor and dispatcher; there is no
/// process-wide configuration state.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Maximum number of conflict retries per notification before the
    /// reconciliation fails fatally.
    pub max_retries: u32,
    /// Upper bound on simultaneously in-flight reconciliations.
    pub concurrency: usize,
    /// What to do when a CANCEL_OR_REFUND notification carries no
    /// recognizable `modification.action` qualifier.
    pub unresolved_modification: UnresolvedModification,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_retries: 20,
            concurrency: 10,
            unresolved_modification: UnresolvedModification::default(),
        }
    }
}

/// Fallback behavior for an unresolved cancel-or-refund qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedModification {
    /// Keep the transaction type the mapping table assigned.
    #[default]
    KeepMapped,
    /// Treat the event as unmapped; only the interaction is logged.
    NoEffect,
}
