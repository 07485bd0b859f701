//! Strategy registry for loading and looking up health strategies.
//!
//! Strategies are loaded from TOML once at startup and never change after.

use std::path::Path;

use ahash::AHashMap;

use super::schema::StrategyDef;
use super::HealthStrategy;
use crate::core::error::{HealthError, Result};
use crate::core::types::StrategyId;

#[derive(Debug, Default)]
pub struct StrategyRegistry {
    strategies: AHashMap<StrategyId, HealthStrategy>,
    /// Lower-cased name to id
    by_name: AHashMap<String, StrategyId>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a compiled strategy; ids and names must be unique
    pub fn register(&mut self, strategy: HealthStrategy) -> Result<StrategyId> {
        let id = strategy.id;
        let key = strategy.name.to_lowercase();
        if self.strategies.contains_key(&id) {
            return Err(HealthError::config(
                &strategy.name,
                format!("duplicate strategy id {}", id.0),
            ));
        }
        if self.by_name.contains_key(&key) {
            return Err(HealthError::config(&strategy.name, "duplicate strategy name"));
        }

        tracing::info!(
            "Loaded {} strategy '{}' (#{})",
            strategy.kind.label(),
            strategy.name,
            id.0
        );
        self.by_name.insert(key, id);
        self.strategies.insert(id, strategy);
        Ok(id)
    }

    /// Load one strategy from TOML text; `origin` names the source in errors
    pub fn load_str(&mut self, content: &str, origin: &str) -> Result<StrategyId> {
        let def: StrategyDef = toml::from_str(content).map_err(|e| HealthError::Toml {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        let strategy = def.compile()?;
        self.register(strategy)
    }

    /// Load a strategy from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<StrategyId> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content, &path.display().to_string())
    }

    /// Load all .toml files from a directory recursively, in path order
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<StrategyId>> {
        let mut ids = Vec::new();
        self.load_directory_recursive(path, &mut ids)?;
        Ok(ids)
    }

    fn load_directory_recursive(&mut self, path: &Path, ids: &mut Vec<StrategyId>) -> Result<()> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for entry_path in entries {
            if entry_path.is_dir() {
                self.load_directory_recursive(&entry_path, ids)?;
            } else if entry_path.extension().map_or(false, |ext| ext == "toml") {
                ids.push(self.load_file(&entry_path)?);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: StrategyId) -> Option<&HealthStrategy> {
        self.strategies.get(&id)
    }

    /// Case-insensitive lookup by name
    pub fn get_by_name(&self, name: &str) -> Option<&HealthStrategy> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.strategies.get(id))
    }

    /// Lookup by name, failing if absent
    pub fn require(&self, name: &str) -> Result<&HealthStrategy> {
        self.get_by_name(name)
            .ok_or_else(|| HealthError::StrategyNotFound(name.to_string()))
    }

    /// All ids in ascending order
    pub fn ids(&self) -> Vec<StrategyId> {
        let mut ids: Vec<_> = self.strategies.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barrel(id: u32, name: &str) -> String {
        format!(
            r#"
            id = {id}
            name = "{name}"
            kind = "inanimate"

            [formulas]
            lodge = "50"
            max_hp = "40"
            heal_damage = "0"

            [[severity]]
            tier = "minor"
            range = "[0, inf)"
            "#
        )
    }

    #[test]
    fn test_load_and_lookup() {
        let mut registry = StrategyRegistry::new();
        let id = registry.load_str(&barrel(3, "Barrel"), "inline").unwrap();
        assert_eq!(id, StrategyId(3));
        assert!(registry.get(id).is_some());
        assert_eq!(registry.get_by_name("barrel").unwrap().id, id);
        assert_eq!(registry.ids(), vec![StrategyId(3)]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = StrategyRegistry::new();
        registry.load_str(&barrel(3, "Barrel"), "a").unwrap();
        let err = registry.load_str(&barrel(3, "Crate"), "b").unwrap_err();
        assert!(matches!(err, HealthError::StrategyConfig { strategy, .. } if strategy == "Crate"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = StrategyRegistry::new();
        registry.load_str(&barrel(3, "Barrel"), "a").unwrap();
        assert!(registry.load_str(&barrel(4, "BARREL"), "b").is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_malformed_toml_names_origin() {
        let mut registry = StrategyRegistry::new();
        let err = registry.load_str("id = [", "broken.toml").unwrap_err();
        assert!(matches!(err, HealthError::Toml { path, .. } if path == "broken.toml"));
    }

    #[test]
    fn test_require_missing() {
        let registry = StrategyRegistry::new();
        assert!(matches!(
            registry.require("ghost"),
            Err(HealthError::StrategyNotFound(_))
        ));
    }
}
