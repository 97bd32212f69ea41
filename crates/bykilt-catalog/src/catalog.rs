//! In-memory action catalog.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use bykilt_protocols::ActionDefinition;

use crate::error::CatalogError;
use crate::parser::parse_catalog;

/// Action definitions in file order.
///
/// Names are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<ActionDefinition>,
    source: Option<PathBuf>,
}

impl ActionCatalog {
    pub fn new(actions: Vec<ActionDefinition>) -> Self {
        warn_duplicates(&actions);
        Self {
            actions,
            source: None,
        }
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let mut catalog: Self = content.parse()?;
        catalog.source = Some(path.to_path_buf());

        debug!(
            "Loaded {} actions from {}",
            catalog.actions.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// File the catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// First action named `name`.
    pub fn get(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// First action matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<&ActionDefinition>
    where
        P: Fn(&ActionDefinition) -> bool,
    {
        self.actions.iter().find(|a| predicate(a))
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl FromStr for ActionCatalog {
    type Err = CatalogError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(parse_catalog(content)?))
    }
}

fn warn_duplicates(actions: &[ActionDefinition]) {
    let mut seen = HashSet::new();
    for action in actions {
        if action.name.is_empty() {
            continue;
        }
        if !seen.insert(action.name.as_str()) {
            warn!(
                "Duplicate action name '{}' in catalog; the first definition wins",
                action.name
            );
        }
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
