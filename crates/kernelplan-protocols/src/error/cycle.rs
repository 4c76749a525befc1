//! Dependency cycle error.

use thiserror::Error;

/// The dependency relation is not acyclic.
///
/// `cycle` holds the kernels that lie on a cycle; `blocked` holds kernels
/// that are not on a cycle themselves but depend on one. Both keep input
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Circular dependency among kernels: {}", .cycle.join(", "))]
pub struct CycleError {
    pub cycle: Vec<String>,
    pub blocked: Vec<String>,
}

impl CycleError {
    pub fn new(cycle: Vec<String>, blocked: Vec<String>) -> Self {
        Self { cycle, blocked }
    }

    /// Every kernel that could not be placed.
    pub fn unplaced(&self) -> impl Iterator<Item = &str> {
        self.cycle.iter().chain(self.blocked.iter()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_display() {
        let err = CycleError::new(vec!["X".into(), "Y".into()], vec![]);
        assert_eq!(err.to_string(), "Circular dependency among kernels: X, Y");
    }

    #[test]
    fn test_unplaced_includes_blocked() {
        let err = CycleError::new(vec!["X".into()], vec!["Z".into()]);
        let unplaced: Vec<&str> = err.unplaced().collect();
        assert_eq!(unplaced, vec!["X", "Z"]);
    }
}
