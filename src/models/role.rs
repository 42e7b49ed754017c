//! Role and permission catalog models.
//!
//! A [`Role`] is a named set of permission keys. The keys come from a fixed
//! [`PermissionCatalog`] supplied when the engine is built.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::RoleId;

/// A single grantable permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// Machine-readable key (e.g. "menu.edit").
    pub key: String,
    /// Human-readable label (e.g. "Edit menu items").
    pub label: String,
}

/// The fixed taxonomy of permission keys, grouped by category.
///
/// Categories are things like `menu`, `order`, `staff`, `reporting` and
/// `settings`. The catalog is loaded once and never mutated by the engine.
///
/// # Example
///
/// ```
/// use staff_ops_engine::models::{PermissionCatalog, PermissionEntry};
///
/// let catalog = PermissionCatalog::from_categories([(
///     "menu",
///     vec![PermissionEntry { key: "menu.view".into(), label: "View menu".into() }],
/// )]);
/// assert!(catalog.contains("menu.view"));
/// assert!(!catalog.contains("menu.delete"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionCatalog {
    categories: BTreeMap<String, Vec<PermissionEntry>>,
}

impl PermissionCatalog {
    /// Builds a catalog from `(category, entries)` pairs.
    pub fn from_categories<I, C>(categories: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<PermissionEntry>)>,
        C: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|(name, entries)| (name.into(), entries))
                .collect(),
        }
    }

    /// Returns true if `key` is defined in any category.
    pub fn contains(&self, key: &str) -> bool {
        self.entries().any(|entry| entry.key == key)
    }

    /// Returns the category a key belongs to.
    pub fn category_of(&self, key: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, entries)| entries.iter().any(|e| e.key == key))
            .map(|(name, _)| name.as_str())
    }

    /// Iterates over every permission entry in category order.
    pub fn entries(&self) -> impl Iterator<Item = &PermissionEntry> {
        self.categories.values().flatten()
    }

    /// Returns the categories and their entries.
    pub fn categories(&self) -> &BTreeMap<String, Vec<PermissionEntry>> {
        &self.categories
    }

    /// Returns true if the catalog defines no permissions at all.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

/// A named set of permissions that can be held by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier, assigned by the registry.
    pub id: RoleId,
    /// Display name; never empty.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Permission keys granted by this role. Membership only, no ordering.
    #[serde(default)]
    pub permissions: HashSet<String>,
}

impl Role {
    /// Returns true if the role grants `key`.
    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }
}

/// Partial update for a role. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement permission set.
    #[serde(default)]
    pub permissions: Option<HashSet<String>>,
}
