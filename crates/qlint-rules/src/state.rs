//! Shared analysis state, threaded explicitly through the rule engine.

use rustc_hash::FxHashSet;

/// Sentinel for "no register size declared": effectively unbounded, so
/// bounds checks stay silent until a construction call establishes one.
pub const UNBOUNDED_QUBITS: i64 = i64::MAX;

/// Per-file analysis state.
///
/// Freshly constructed for every file; nothing persists across files.
/// `declared_qubit_count` is written once by the register-size checker
/// and read-only afterwards. The measured-qubit set is the measurement
/// checker's own accumulating state; parallel checkers each work on
/// their own clone, so no locking is needed.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    /// Register size established by the simulator construction call.
    pub declared_qubit_count: i64,
    measured: FxHashSet<i64>,
    all_measured: bool,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self {
            declared_qubit_count: UNBOUNDED_QUBITS,
            measured: FxHashSet::default(),
            all_measured: false,
        }
    }

    /// Whether a construction call has established a register size.
    pub fn is_bounded(&self) -> bool {
        self.declared_qubit_count != UNBOUNDED_QUBITS
    }

    pub fn mark_measured(&mut self, qubit: i64) {
        self.measured.insert(qubit);
    }

    /// Mark every index from 0 to the declared count as measured. With no
    /// declared bound there is no finite range, so the set switches to
    /// "everything is measured".
    pub fn mark_all_measured(&mut self) {
        if self.is_bounded() {
            self.measured.extend(0..self.declared_qubit_count);
        } else {
            self.all_measured = true;
        }
    }

    pub fn is_measured(&self, qubit: i64) -> bool {
        self.all_measured || self.measured.contains(&qubit)
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_unbounded() {
        let state = AnalysisState::new();
        assert!(!state.is_bounded());
        assert!(!state.is_measured(0));
    }

    #[test]
    fn test_mark_all_with_bound() {
        let mut state = AnalysisState::new();
        state.declared_qubit_count = 3;
        state.mark_all_measured();
        assert!(state.is_measured(0));
        assert!(state.is_measured(2));
        assert!(!state.is_measured(3));
    }

    #[test]
    fn test_mark_all_without_bound() {
        let mut state = AnalysisState::new();
        state.mark_all_measured();
        assert!(state.is_measured(17));
    }
}
