// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::Config;

/// Forward edges of the DAG: task id -> ids of the tasks that depend on it.
///
/// Every task has an entry, leaves map to an empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn from_config(cfg: &Config) -> Self {
        let mut graph: HashMap<String, Vec<String>> = cfg
            .tasks
            .iter()
            .map(|t| (t.id.clone(), Vec::new()))
            .collect();

        for task in &cfg.tasks {
            for dependency in &task.depends_on {
                graph
                    .entry(dependency.clone())
                    .or_default()
                    .push(task.id.clone());
            }
        }

        Self(graph)
    }

    pub fn add_dependency(&mut self, task_id: String, dependents: Vec<String>) {
        self.0.insert(task_id, dependents);
    }

    pub fn get_dependents(&self, task_id: &str) -> Option<&Vec<String>> {
        self.0.get(task_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Invert the edges: task id -> ids of the tasks it depends on.
    ///
    /// Every task in the graph gets an entry, including tasks with no upstream.
    pub fn build_reverse_dependencies(&self) -> HashMap<String, Vec<String>> {
        let mut reverse: HashMap<String, Vec<String>> =
            self.0.keys().map(|id| (id.clone(), Vec::new())).collect();

        for (task_id, dependents) in &self.0 {
            for dependent in dependents {
                reverse
                    .entry(dependent.clone())
                    .or_default()
                    .push(task_id.clone());
            }
        }

        for upstream in reverse.values_mut() {
            upstream.sort();
        }
        reverse
    }

    /// Every task reachable downstream of `task_id`, excluding `task_id` itself.
    pub fn transitive_dependents(&self, task_id: &str) -> HashSet<String> {
        let mut reached = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([task_id]);

        while let Some(current) = queue.pop_front() {
            if let Some(dependents) = self.0.get(current) {
                for dependent in dependents {
                    if reached.insert(dependent.clone()) {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        reached.remove(task_id);
        reached
    }
}

impl From<HashMap<String, Vec<String>>> for DependencyGraph {
    fn from(graph: HashMap<String, Vec<String>>) -> Self {
        Self(graph)
    }
}

impl From<DependencyGraph> for HashMap<String, Vec<String>> {
    fn from(graph: DependencyGraph) -> Self {
        graph.0
    }
}
