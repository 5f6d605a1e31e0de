//! Directed repository graph and deployment ordering.

use std::collections::VecDeque;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use ripple_core::errors::DependencyError;
use ripple_core::types::collections::{FxHashMap, FxHashSet};

use super::inference::DependencyAnalyzer;
use super::types::{DependencyEdge, DependencyMatrix, Repository};

/// Repositories and their weighted "depends-on" edges. May be cyclic.
#[derive(Debug, Default)]
pub struct RepositoryDependencyGraph {
    graph: DiGraph<Repository, DependencyEdge>,
    index: FxHashMap<String, NodeIndex>,
}

impl RepositoryDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an inferred matrix. Edge strength comes from the analyzer;
    /// targets outside `repositories` are skipped.
    pub fn from_matrix(
        repositories: &[Repository],
        matrix: &DependencyMatrix,
        analyzer: &DependencyAnalyzer,
    ) -> Self {
        let mut graph = Self::new();
        for repo in repositories {
            graph.add_repository(repo.clone());
        }
        for repo in repositories {
            let Some(targets) = matrix.get(&repo.name) else {
                continue;
            };
            for target in targets {
                let strength = analyzer.calculate_dependency_strength(&repo.name, target, matrix);
                let edge = DependencyEdge::new(repo.name.clone(), target.clone(), strength);
                if let Err(err) = graph.add_dependency(edge) {
                    tracing::warn!(source = %repo.name, error = %err, "skipping dependency");
                }
            }
        }
        tracing::debug!(
            repositories = graph.len(),
            dependencies = graph.graph.edge_count(),
            "dependency graph built"
        );
        graph
    }

    /// Add or replace a repository.
    pub fn add_repository(&mut self, repo: Repository) -> NodeIndex {
        if let Some(&idx) = self.index.get(&repo.name) {
            self.graph[idx] = repo;
            return idx;
        }
        let name = repo.name.clone();
        let idx = self.graph.add_node(repo);
        self.index.insert(name, idx);
        idx
    }

    /// Add an edge, replacing any existing edge between the same pair.
    pub fn add_dependency(&mut self, edge: DependencyEdge) -> Result<(), DependencyError> {
        let source = self.node_index(&edge.source)?;
        let target = self.node_index(&edge.target)?;
        self.graph.update_edge(source, target, edge);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Repositories in insertion order.
    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.graph.edge_weights()
    }

    /// The edge `source → target`, if any.
    pub fn edge_between(&self, source: &str, target: &str) -> Option<&DependencyEdge> {
        let s = *self.index.get(source)?;
        let t = *self.index.get(target)?;
        self.graph.find_edge(s, t).map(|e| &self.graph[e])
    }

    /// Repositories with a direct edge to `name`, in edge insertion order.
    pub fn get_dependents(&self, name: &str) -> Result<Vec<String>, DependencyError> {
        let idx = self.node_index(name)?;
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Incoming).collect();
        edges.sort_by_key(|e| e.id());
        Ok(edges.into_iter().map(|e| e.weight().source.clone()).collect())
    }

    /// Direct outgoing edges of `name`, or with `transitive` every edge
    /// reachable from it (BFS order).
    pub fn get_dependencies(
        &self,
        name: &str,
        transitive: bool,
    ) -> Result<Vec<DependencyEdge>, DependencyError> {
        let start = self.node_index(name)?;
        if !transitive {
            return Ok(self.outgoing(start).into_iter().cloned().collect());
        }

        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        let mut edges = Vec::new();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for edge in self.outgoing(current) {
                edges.push(edge.clone());
                if let Some(&target) = self.index.get(&edge.target) {
                    queue.push_back(target);
                }
            }
        }
        Ok(edges)
    }

    fn outgoing(&self, idx: NodeIndex) -> Vec<&DependencyEdge> {
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
        edges.sort_by_key(|e| e.id());
        edges.into_iter().map(|e| e.weight()).collect()
    }

    /// Deployment order for `repos`: every dependency before its dependents.
    ///
    /// Only edges with both endpoints in `repos` count. Members of a cycle are
    /// left out, so a result shorter than the (deduplicated) input signals a
    /// cycle. Ties keep input order.
    pub fn topological_sort<S: AsRef<str>>(&self, repos: &[S]) -> Result<Vec<String>, DependencyError> {
        let mut subset: Vec<&str> = Vec::with_capacity(repos.len());
        let mut position: FxHashMap<&str, usize> = FxHashMap::default();
        for repo in repos {
            let name = repo.as_ref();
            self.node_index(name)?;
            if !position.contains_key(name) {
                position.insert(name, subset.len());
                subset.push(name);
            }
        }

        let mut in_degree = vec![0usize; subset.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); subset.len()];
        for edge in self.graph.edge_weights() {
            let (Some(&s), Some(&t)) = (
                position.get(edge.source.as_str()),
                position.get(edge.target.as_str()),
            ) else {
                continue;
            };
            dependents[t].push(s);
            in_degree[s] += 1;
        }
        for list in &mut dependents {
            list.sort_unstable();
        }

        let mut queue: VecDeque<usize> = (0..subset.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(subset.len());
        while let Some(i) = queue.pop_front() {
            order.push(subset[i].to_string());
            for &d in &dependents[i] {
                in_degree[d] -= 1;
                if in_degree[d] == 0 {
                    queue.push_back(d);
                }
            }
        }

        if order.len() < subset.len() {
            tracing::debug!(
                requested = subset.len(),
                ordered = order.len(),
                "cycle in deployment subset"
            );
        }
        Ok(order)
    }

    fn node_index(&self, name: &str) -> Result<NodeIndex, DependencyError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DependencyError::missing(name))
    }
}
