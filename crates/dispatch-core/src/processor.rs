// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Processor pipeline registration data and ordering.

use crate::dispatch_data::MessageType;
use smol_str::SmolStr;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Stable name identifying one processor in the pipeline; also the
/// dependency-ordering vocabulary processors use to reference each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessorName(SmolStr);

impl ProcessorName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProcessorName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which message types a processor applies to.
#[derive(Debug, Clone)]
pub enum ProcessorApplicability {
    All,
    Only(Vec<MessageType>),
}

impl ProcessorApplicability {
    pub fn applies_to(&self, message_type: MessageType) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.contains(&message_type),
        }
    }
}

/// One processor's place in the pipeline: which messages it applies to and
/// its ordering constraints relative to other named processors.
/// Building a single execution order out of a set of these, and detecting
/// cycles, is [`topological_order`]'s job; dispatch happens in
/// `dispatch-engine`.
#[derive(Debug, Clone)]
pub struct MessageProcessorRegistration {
    pub name: ProcessorName,
    pub applicability: ProcessorApplicability,
    pub runs_before: Vec<ProcessorName>,
    pub runs_after: Vec<ProcessorName>,
}

impl MessageProcessorRegistration {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: ProcessorName::new(name),
            applicability: ProcessorApplicability::All,
            runs_before: Vec::new(),
            runs_after: Vec::new(),
        }
    }

    pub fn only_for(mut self, types: Vec<MessageType>) -> Self {
        self.applicability = ProcessorApplicability::Only(types);
        self
    }

    pub fn after(mut self, name: impl Into<SmolStr>) -> Self {
        self.runs_after.push(ProcessorName::new(name));
        self
    }

    pub fn before(mut self, name: impl Into<SmolStr>) -> Self {
        self.runs_before.push(ProcessorName::new(name));
        self
    }
}

/// Topologically sort a set of processor registrations into pipeline
/// execution order using Kahn's algorithm, breaking ties by declaration
/// order for a deterministic result. Returns the name of a processor caught
/// in a cycle if the dependency graph isn't a DAG.
pub fn topological_order(
    registrations: &[MessageProcessorRegistration],
) -> Result<Vec<ProcessorName>, ProcessorName> {
    let index_of: BTreeMap<&ProcessorName, usize> =
        registrations.iter().enumerate().map(|(i, r)| (&r.name, i)).collect();
    let n = registrations.len();
    let mut in_degree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (i, reg) in registrations.iter().enumerate() {
        for before in &reg.runs_before {
            if let Some(&j) = index_of.get(before) {
                successors[i].push(j);
                in_degree[j] += 1;
            }
        }
        for after in &reg.runs_after {
            if let Some(&j) = index_of.get(after) {
                successors[j].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut ready: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    while let Some(i) = ready.pop_front() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        order.push(registrations[i].name.clone());
        for &j in &successors[i] {
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.push_back(j);
            }
        }
    }

    if order.len() < n {
        let stuck = (0..n)
            .find(|&i| !visited[i])
            .expect("order shorter than n implies an unvisited node remains");
        return Err(registrations[stuck].name.clone());
    }

    Ok(order)
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
