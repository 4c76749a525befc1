//! Execution-order engine.
//!
//! Layered Kahn topological sort. Each layer ("wave") holds the kernels
//! whose dependencies were all placed in earlier waves, so kernels within a
//! wave are mutually independent. Ties are broken by input position, never
//! by name, so the author's ordering survives whenever it is legal.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use kernelplan_protocols::{CycleError, KernelGraph};

/// Ordered waves of kernel names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    waves: Vec<Vec<String>>,
}

impl ExecutionPlan {
    pub fn new(waves: Vec<Vec<String>>) -> Self {
        Self { waves }
    }

    pub fn waves(&self) -> &[Vec<String>] {
        &self.waves
    }

    /// Waves concatenated in order. Always a valid topological order.
    pub fn linear_order(&self) -> Vec<&str> {
        self.waves.iter().flatten().map(String::as_str).collect()
    }

    /// Index of the wave containing `name`.
    pub fn wave_index(&self, name: &str) -> Option<usize> {
        self.waves
            .iter()
            .position(|wave| wave.iter().any(|n| n == name))
    }

    /// Number of kernels in the plan.
    pub fn len(&self) -> usize {
        self.waves.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Waves with more than one kernel, i.e. candidates for parallel execution.
    pub fn parallel_groups(&self) -> impl Iterator<Item = &[String]> {
        self.waves
            .iter()
            .filter(|wave| wave.len() > 1)
            .map(Vec::as_slice)
    }
}

/// Compute the execution plan for a graph.
///
/// Later duplicates of a name and unnamed kernels are ignored, as are
/// dependencies on unknown kernels; the validator reports all of those.
pub fn compute_order(graph: &KernelGraph) -> Result<ExecutionPlan, CycleError> {
    let kernels = graph.unique_kernels();
    let position: HashMap<&str, usize> = kernels
        .iter()
        .enumerate()
        .map(|(pos, (_, kernel))| (kernel.name.as_str(), pos))
        .collect();

    let count = kernels.len();
    let mut in_degree = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut requires: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (pos, (_, kernel)) in kernels.iter().enumerate() {
        for dep in kernel.distinct_dependencies() {
            if let Some(&dep_pos) = position.get(dep) {
                in_degree[pos] += 1;
                dependents[dep_pos].push(pos);
                requires[pos].push(dep_pos);
            }
        }
    }

    let mut placed = vec![false; count];
    let mut waves: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<usize> = (0..count).filter(|&pos| in_degree[pos] == 0).collect();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &pos in &current {
            placed[pos] = true;
            for &dependent in &dependents[pos] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    next.push(dependent);
                }
            }
        }
        next.sort_unstable();
        waves.push(
            current
                .iter()
                .map(|&pos| kernels[pos].1.name.clone())
                .collect(),
        );
        current = next;
    }

    let unplaced: Vec<usize> = (0..count).filter(|&pos| !placed[pos]).collect();
    if unplaced.is_empty() {
        debug!(
            "Ordered {} kernels into {} waves",
            count,
            waves.len()
        );
        return Ok(ExecutionPlan::new(waves));
    }

    let (cycle, blocked): (Vec<usize>, Vec<usize>) = unplaced
        .into_iter()
        .partition(|&pos| reaches_itself(pos, &requires, &placed));
    let names = |positions: Vec<usize>| -> Vec<String> {
        positions
            .into_iter()
            .map(|pos| kernels[pos].1.name.clone())
            .collect()
    };

    Err(CycleError::new(names(cycle), names(blocked)))
}

/// Whether `start` can reach itself through unplaced dependencies.
fn reaches_itself(start: usize, requires: &[Vec<usize>], placed: &[bool]) -> bool {
    let mut visited = vec![false; requires.len()];
    let mut stack: Vec<usize> = requires[start].clone();

    while let Some(pos) = stack.pop() {
        if pos == start {
            return true;
        }
        if placed[pos] || visited[pos] {
            continue;
        }
        visited[pos] = true;
        stack.extend(requires[pos].iter().copied());
    }
    false
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
