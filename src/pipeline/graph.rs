//! Static "derived-from" relationships between asset steps.
//!
//! Adding a derived step means adding a row to [`STEP_DEPENDENCIES`]; the
//! invalidation walk is generic over whatever the table declares.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Result, StagecraftError};

use super::PipelineStep;

/// Asset steps and the upstream assets each is derived from.
pub const STEP_DEPENDENCIES: &[(PipelineStep, &[PipelineStep])] = &[
    (PipelineStep::Generate, &[]),
    (PipelineStep::Brief, &[PipelineStep::Generate]),
    (PipelineStep::PlatformCopy, &[PipelineStep::Brief]),
];

/// Represents the dependency relationships between asset steps.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Map of step to its direct upstream steps.
    dependencies: BTreeMap<PipelineStep, BTreeSet<PipelineStep>>,
    /// Map of step to steps derived from it.
    dependents: BTreeMap<PipelineStep, BTreeSet<PipelineStep>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Build a graph from a dependency table.
    pub fn from_table(table: &[(PipelineStep, &[PipelineStep])]) -> Result<Self> {
        table
            .iter()
            .fold(Self::builder(), |b, (step, deps)| {
                b.add_step(*step, deps.iter().copied())
            })
            .build()
    }

    /// The graph declared by [`STEP_DEPENDENCIES`].
    pub fn standard() -> Self {
        Self::from_table(STEP_DEPENDENCIES).expect("built-in step dependency table is valid")
    }

    /// Get the direct upstream steps of a step.
    pub fn dependencies_of(&self, step: PipelineStep) -> Option<&BTreeSet<PipelineStep>> {
        self.dependencies.get(&step)
    }

    /// Get steps directly derived from the given step.
    pub fn dependents_of(&self, step: PipelineStep) -> Option<&BTreeSet<PipelineStep>> {
        self.dependents.get(&step)
    }

    /// Check if a step exists in the graph.
    pub fn contains(&self, step: PipelineStep) -> bool {
        self.dependencies.contains_key(&step)
    }

    /// Get the number of steps in the graph.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Get all transitive dependents of a step, in step order.
    ///
    /// Returns steps derived from the given step, directly or indirectly.
    pub fn transitive_dependents(&self, step: PipelineStep) -> BTreeSet<PipelineStep> {
        let mut result = BTreeSet::new();
        let mut to_visit = vec![step];

        while let Some(current) = to_visit.pop() {
            if let Some(dependents) = self.dependents.get(&current) {
                for dep in dependents {
                    if result.insert(*dep) {
                        to_visit.push(*dep);
                    }
                }
            }
        }

        result
    }

    /// Every step that must be populated before `step` can be generated, in step order.
    pub fn transitive_dependencies(&self, step: PipelineStep) -> BTreeSet<PipelineStep> {
        let mut result = BTreeSet::new();
        let mut to_visit = vec![step];

        while let Some(current) = to_visit.pop() {
            if let Some(deps) = self.dependencies.get(&current) {
                for dep in deps {
                    if result.insert(*dep) {
                        to_visit.push(*dep);
                    }
                }
            }
        }

        result
    }

    /// Find a cycle in the graph, returning the path if one exists.
    pub fn find_cycle(&self) -> Option<Vec<PipelineStep>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs(
            node: PipelineStep,
            graph: &DependencyGraph,
            state: &mut HashMap<PipelineStep, State>,
            path: &mut Vec<PipelineStep>,
        ) -> Option<Vec<PipelineStep>> {
            state.insert(node, State::Visiting);
            path.push(node);

            if let Some(deps) = graph.dependencies.get(&node) {
                for dep in deps {
                    match state.get(dep) {
                        Some(State::Visiting) => {
                            let start = path.iter().position(|s| s == dep).unwrap_or(0);
                            let mut cycle = path[start..].to_vec();
                            cycle.push(*dep);
                            return Some(cycle);
                        }
                        Some(State::Unvisited) | None => {
                            if let Some(cycle) = dfs(*dep, graph, state, path) {
                                return Some(cycle);
                            }
                        }
                        Some(State::Visited) => {}
                    }
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let mut state: HashMap<PipelineStep, State> = self
            .dependencies
            .keys()
            .map(|s| (*s, State::Unvisited))
            .collect();
        let mut path = Vec::new();

        for step in self.dependencies.keys() {
            if state.get(step) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(*step, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    dependencies: BTreeMap<PipelineStep, BTreeSet<PipelineStep>>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step with the steps it is derived from.
    pub fn add_step(
        mut self,
        step: PipelineStep,
        depends_on: impl IntoIterator<Item = PipelineStep>,
    ) -> Self {
        self.dependencies.entry(step).or_default().extend(depends_on);
        self
    }

    /// Build the dependency graph.
    ///
    /// Rejects non-asset steps, references to undeclared steps, and cycles.
    pub fn build(self) -> Result<DependencyGraph> {
        for (step, deps) in &self.dependencies {
            if !step.is_asset() {
                return Err(StagecraftError::ConfigValidationError {
                    message: format!("Step '{}' owns no asset and cannot be derived", step),
                });
            }
            for dep in deps {
                if !self.dependencies.contains_key(dep) {
                    return Err(StagecraftError::ConfigValidationError {
                        message: format!("Step '{}' depends on unknown step '{}'", step, dep),
                    });
                }
            }
        }

        let mut dependents: BTreeMap<PipelineStep, BTreeSet<PipelineStep>> = self
            .dependencies
            .keys()
            .map(|s| (*s, BTreeSet::new()))
            .collect();
        for (step, deps) in &self.dependencies {
            for dep in deps {
                dependents.entry(*dep).or_default().insert(*step);
            }
        }

        let graph = DependencyGraph {
            dependencies: self.dependencies,
            dependents,
        };

        if let Some(cycle) = graph.find_cycle() {
            let path: Vec<_> = cycle.iter().map(|s| s.key()).collect();
            return Err(StagecraftError::ConfigValidationError {
                message: format!("Circular dependency detected: {}", path.join(" -> ")),
            });
        }

        Ok(graph)
    }
}
