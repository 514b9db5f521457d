// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Config;

/// Tasks with no upstream dependencies, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPoints(pub Vec<String>);

impl EntryPoints {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self(
            cfg.tasks
                .iter()
                .filter(|t| t.depends_on.is_empty())
                .map(|t| t.id.clone())
                .collect(),
        )
    }

    pub fn add(&mut self, task_id: String) {
        self.0.push(task_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for EntryPoints {
    fn from(entrypoints: Vec<String>) -> Self {
        Self(entrypoints)
    }
}

impl From<EntryPoints> for Vec<String> {
    fn from(value: EntryPoints) -> Self {
        value.0
    }
}
