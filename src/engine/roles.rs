//! Role registry.
//!
//! Owns role definitions and validates every permission key against the
//! permission catalog supplied at construction.

use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::models::{PermissionCatalog, Role, RoleId, RoleUpdate};

use super::ids::IdSequence;

/// Role definitions and their permission sets.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    catalog: PermissionCatalog,
    roles: Vec<Role>,
    ids: IdSequence,
}

impl RoleRegistry {
    /// Creates a registry over an existing role collection.
    pub fn new(catalog: PermissionCatalog, roles: Vec<Role>) -> Self {
        let ids = IdSequence::starting_after(roles.iter().map(|r| r.id));
        Self {
            catalog,
            roles,
            ids,
        }
    }

    /// The permission catalog roles are validated against.
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// All roles, in creation order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Looks up a role by id.
    pub fn get(&self, id: RoleId) -> EngineResult<&Role> {
        self.roles
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::not_found("role", id))
    }

    fn get_mut(&mut self, id: RoleId) -> EngineResult<&mut Role> {
        self.roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::not_found("role", id))
    }

    /// Creates a role.
    ///
    /// Fails with `Validation` if the trimmed name is empty or any permission
    /// key is not in the catalog. The role receives the next unused id.
    ///
    /// # Example
    ///
    /// ```
    /// use staff_ops_engine::engine::RoleRegistry;
    /// use staff_ops_engine::models::{PermissionCatalog, PermissionEntry};
    ///
    /// let catalog = PermissionCatalog::from_categories([(
    ///     "order",
    ///     vec![PermissionEntry { key: "order.create".into(), label: "Create orders".into() }],
    /// )]);
    /// let mut registry = RoleRegistry::new(catalog, Vec::new());
    ///
    /// let role = registry
    ///     .create_role("Cashier", "Front counter", ["order.create".to_string()])
    ///     .unwrap();
    /// assert_eq!(role.id, 1);
    /// assert!(role.has_permission("order.create"));
    /// ```
    pub fn create_role<I>(&mut self, name: &str, description: &str, permissions: I) -> EngineResult<&Role>
    where
        I: IntoIterator<Item = String>,
    {
        let name = validate_name(name)?;
        let permissions: HashSet<String> = permissions.into_iter().collect();
        self.validate_permissions(&permissions)?;

        self.roles.push(Role {
            id: self.ids.next_id(),
            name,
            description: description.trim().to_string(),
            permissions,
        });
        Ok(&self.roles[self.roles.len() - 1])
    }

    /// Applies a partial update. All supplied fields are validated before any
    /// is written.
    pub fn update_role(&mut self, id: RoleId, update: RoleUpdate) -> EngineResult<&Role> {
        self.get(id)?;
        let name = update.name.as_deref().map(validate_name).transpose()?;
        if let Some(permissions) = &update.permissions {
            self.validate_permissions(permissions)?;
        }

        let role = self.get_mut(id)?;
        if let Some(name) = name {
            role.name = name;
        }
        if let Some(description) = update.description {
            role.description = description.trim().to_string();
        }
        if let Some(permissions) = update.permissions {
            role.permissions = permissions;
        }
        Ok(role)
    }

    /// Removes a role and returns it.
    ///
    /// No referential check is made against staff holding the role.
    pub fn delete_role(&mut self, id: RoleId) -> EngineResult<Role> {
        let index = self
            .roles
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::not_found("role", id))?;
        Ok(self.roles.remove(index))
    }

    /// Grants `key` if the role lacks it, revokes it otherwise.
    ///
    /// Two consecutive toggles of the same key restore the original set.
    pub fn toggle_permission(&mut self, role_id: RoleId, key: &str) -> EngineResult<&Role> {
        self.get(role_id)?;
        if !self.catalog.contains(key) {
            return Err(unknown_permission(key));
        }

        let role = self.get_mut(role_id)?;
        if !role.permissions.remove(key) {
            role.permissions.insert(key.to_string());
        }
        Ok(role)
    }

    fn validate_permissions(&self, permissions: &HashSet<String>) -> EngineResult<()> {
        let mut unknown: Vec<&str> = permissions
            .iter()
            .map(String::as_str)
            .filter(|key| !self.catalog.contains(key))
            .collect();
        unknown.sort_unstable();

        match unknown.first() {
            Some(key) => Err(unknown_permission(key)),
            None => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> EngineResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn unknown_permission(key: &str) -> EngineError {
    EngineError::validation(
        "permissions",
        format!("'{}' is not in the permission catalog", key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermissionEntry;

    fn entry(key: &str) -> PermissionEntry {
        PermissionEntry {
            key: key.to_string(),
            label: key.to_string(),
        }
    }

    fn catalog() -> PermissionCatalog {
        PermissionCatalog::from_categories([
            ("menu", vec![entry("menu.view"), entry("menu.edit")]),
            ("order", vec![entry("order.create"), entry("order.void")]),
            ("settings", vec![entry("settings.roles")]),
        ])
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn registry_with_cashier() -> RoleRegistry {
        let mut registry = RoleRegistry::new(catalog(), Vec::new());
        registry
            .create_role("Cashier", "Front counter", keys(&["order.create"]))
            .unwrap();
        registry
    }

    #[test]
    fn test_create_role_assigns_sequential_ids() {
        let mut registry = registry_with_cashier();
        let manager = registry
            .create_role("Manager", "", keys(&["order.void", "settings.roles"]))
            .unwrap();
        assert_eq!(manager.id, 2);
        assert_eq!(manager.permissions.len(), 2);
    }

    #[test]
    fn test_create_role_trims_name() {
        let mut registry = RoleRegistry::new(catalog(), Vec::new());
        let role = registry.create_role("  Chef  ", "", Vec::new()).unwrap();
        assert_eq!(role.name, "Chef");
    }

    #[test]
    fn test_create_role_rejects_blank_name() {
        let mut registry = RoleRegistry::new(catalog(), Vec::new());
        let result = registry.create_role("   ", "", Vec::new());
        assert!(matches!(result, Err(EngineError::Validation { field, .. }) if field == "name"));
        assert!(registry.roles().is_empty());
    }

    #[test]
    fn test_create_role_rejects_unknown_permission() {
        let mut registry = RoleRegistry::new(catalog(), Vec::new());
        let result = registry.create_role("Chef", "", keys(&["menu.view", "kitchen.fire"]));
        match result {
            Err(EngineError::Validation { field, message }) => {
                assert_eq!(field, "permissions");
                assert!(message.contains("kitchen.fire"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert!(registry.roles().is_empty());
    }

    #[test]
    fn test_duplicate_permission_keys_collapse() {
        let mut registry = RoleRegistry::new(catalog(), Vec::new());
        let role = registry
            .create_role("Host", "", keys(&["menu.view", "menu.view"]))
            .unwrap();
        assert_eq!(role.permissions.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut registry = registry_with_cashier();
        registry.delete_role(1).unwrap();
        let role = registry.create_role("Server", "", Vec::new()).unwrap();
        assert_eq!(role.id, 2);
    }

    #[test]
    fn test_update_role_partial_fields() {
        let mut registry = registry_with_cashier();
        let update = RoleUpdate {
            description: Some("Counter and takeaway".to_string()),
            ..Default::default()
        };
        let role = registry.update_role(1, update).unwrap();
        assert_eq!(role.name, "Cashier");
        assert_eq!(role.description, "Counter and takeaway");
        assert!(role.has_permission("order.create"));
    }

    #[test]
    fn test_update_role_is_all_or_nothing() {
        let mut registry = registry_with_cashier();
        let update = RoleUpdate {
            name: Some("Senior Cashier".to_string()),
            permissions: Some(keys(&["order.teleport"]).into_iter().collect()),
            ..Default::default()
        };
        assert!(registry.update_role(1, update).is_err());
        assert_eq!(registry.get(1).unwrap().name, "Cashier");
    }

    #[test]
    fn test_update_unknown_role_is_not_found() {
        let mut registry = registry_with_cashier();
        let result = registry.update_role(99, RoleUpdate::default());
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn test_delete_unknown_role_is_not_found() {
        let mut registry = registry_with_cashier();
        assert!(matches!(
            registry.delete_role(42),
            Err(EngineError::NotFound { .. })
        ));
        assert_eq!(registry.roles().len(), 1);
    }

    #[test]
    fn test_toggle_grants_then_revokes() {
        let mut registry = registry_with_cashier();

        let role = registry.toggle_permission(1, "order.void").unwrap();
        assert!(role.has_permission("order.void"));

        let role = registry.toggle_permission(1, "order.void").unwrap();
        assert!(!role.has_permission("order.void"));
        assert!(role.has_permission("order.create"));
    }

    #[test]
    fn test_toggle_unknown_role_is_not_found() {
        let mut registry = registry_with_cashier();
        assert!(matches!(
            registry.toggle_permission(7, "menu.view"),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_toggle_unknown_key_is_validation_error() {
        let mut registry = registry_with_cashier();
        assert!(matches!(
            registry.toggle_permission(1, "menu.burn"),
            Err(EngineError::Validation { .. })
        ));
    }
}
