//! Deduplicating accumulator of asset references.

use super::catalog::AssetType;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path};
use tracing::warn;

/// A (type, base name) pair. The name carries no directory and no extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssetReference {
    pub asset_type: AssetType,
    pub name: String,
}

impl AssetReference {
    pub fn new(asset_type: AssetType, name: impl Into<String>) -> Self {
        Self {
            asset_type,
            name: name.into(),
        }
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asset_type, self.name)
    }
}

#[derive(Debug, Default)]
pub struct ReferenceCollector {
    references: BTreeSet<AssetReference>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference. Blank names and names with directory parts are ignored.
    ///
    /// Returns `true` if the pair was not seen before.
    pub fn add(&mut self, asset_type: AssetType, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        if !is_bare_file_name(name) {
            warn!("Ignoring {} reference with a directory part: {:?}", asset_type, name);
            return false;
        }
        self.references
            .insert(AssetReference::new(asset_type, name))
    }

    pub fn add_all<'a>(
        &mut self,
        asset_type: AssetType,
        names: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        names
            .into_iter()
            .filter(|name| self.add(asset_type, name))
            .count()
    }

    pub fn contains(&self, asset_type: AssetType, name: &str) -> bool {
        self.references
            .contains(&AssetReference::new(asset_type, name))
    }

    /// Snapshot ordered by asset type, then name.
    pub fn all_references(&self) -> Vec<AssetReference> {
        self.references.iter().cloned().collect()
    }

    pub fn count_by_type(&self) -> BTreeMap<AssetType, usize> {
        let mut counts = BTreeMap::new();
        for reference in &self.references {
            *counts.entry(reference.asset_type).or_default() += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Joined under an asset folder, the name must stay inside it.
fn is_bare_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates() {
        let mut collector = ReferenceCollector::new();

        assert!(collector.add(AssetType::Character, "Actor1"));
        assert!(!collector.add(AssetType::Character, "Actor1"));
        assert!(!collector.add(AssetType::Character, "Actor1"));
        // Same name under another type is a distinct reference
        assert!(collector.add(AssetType::Face, "Actor1"));

        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_blank_names_ignored() {
        let mut collector = ReferenceCollector::new();

        assert!(!collector.add(AssetType::Bgm, ""));
        assert!(!collector.add(AssetType::Bgm, "   "));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_names_with_directory_parts_ignored() {
        let mut collector = ReferenceCollector::new();

        assert!(!collector.add(AssetType::Picture, "../../x"));
        assert!(!collector.add(AssetType::Picture, "sub/Map"));
        assert!(!collector.add(AssetType::Picture, "sub\\Map"));
        assert!(!collector.add(AssetType::Picture, ".."));
        assert!(!collector.add(AssetType::Picture, "/etc/passwd"));
        assert!(collector.add(AssetType::Picture, "Map..old"));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_all_references_is_ordered() {
        let mut collector = ReferenceCollector::new();
        collector.add(AssetType::Se, "Cursor1");
        collector.add(AssetType::Character, "Vehicle");
        collector.add(AssetType::Character, "Actor1");
        collector.add(AssetType::Animation, "Hit1");

        let refs = collector.all_references();
        assert_eq!(
            refs,
            vec![
                AssetReference::new(AssetType::Animation, "Hit1"),
                AssetReference::new(AssetType::Character, "Actor1"),
                AssetReference::new(AssetType::Character, "Vehicle"),
                AssetReference::new(AssetType::Se, "Cursor1"),
            ]
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let names = ["Dungeon1", "Field1", "Castle"];

        let mut forward = ReferenceCollector::new();
        forward.add_all(AssetType::Bgm, names.iter().copied());

        let mut backward = ReferenceCollector::new();
        backward.add_all(AssetType::Bgm, names.iter().rev().copied());

        assert_eq!(forward.all_references(), backward.all_references());
    }

    #[test]
    fn test_count_by_type() {
        let mut collector = ReferenceCollector::new();
        let added = collector.add_all(AssetType::Tileset, ["A1", "A2", "A1", ""]);
        collector.add(AssetType::Picture, "Map");

        assert_eq!(added, 2);
        let counts = collector.count_by_type();
        assert_eq!(counts.get(&AssetType::Tileset), Some(&2));
        assert_eq!(counts.get(&AssetType::Picture), Some(&1));
        assert!(collector.contains(AssetType::Tileset, "A2"));
    }
}
