/*!
 * # Permissions Module
 *
 * Static role-based permission table. Permissions are organized by
 * resource and action; the `manage` action on a resource implies every
 * other action on it.
 */

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Permission actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Export,
    Manage,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Export => "export",
            Action::Manage => "manage",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "export" => Ok(Action::Export),
            "manage" => Ok(Action::Manage),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// Protected resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Customers,
    Suppliers,
    Products,
    RawMaterials,
    Sales,
    Purchases,
    Inventory,
    Expenses,
    Reports,
    Users,
    Settings,
}

impl Resource {
    pub const ALL: [Resource; 11] = [
        Resource::Customers,
        Resource::Suppliers,
        Resource::Products,
        Resource::RawMaterials,
        Resource::Sales,
        Resource::Purchases,
        Resource::Inventory,
        Resource::Expenses,
        Resource::Reports,
        Resource::Users,
        Resource::Settings,
    ];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resource::Customers => "customers",
            Resource::Suppliers => "suppliers",
            Resource::Products => "products",
            Resource::RawMaterials => "raw_materials",
            Resource::Sales => "sales",
            Resource::Purchases => "purchases",
            Resource::Inventory => "inventory",
            Resource::Expenses => "expenses",
            Resource::Reports => "reports",
            Resource::Users => "users",
            Resource::Settings => "settings",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customers" => Ok(Resource::Customers),
            "suppliers" => Ok(Resource::Suppliers),
            "products" => Ok(Resource::Products),
            "raw_materials" => Ok(Resource::RawMaterials),
            "sales" => Ok(Resource::Sales),
            "purchases" => Ok(Resource::Purchases),
            "inventory" => Ok(Resource::Inventory),
            "expenses" => Ok(Resource::Expenses),
            "reports" => Ok(Resource::Reports),
            "users" => Ok(Resource::Users),
            "settings" => Ok(Resource::Settings),
            other => Err(format!("unknown resource: {}", other)),
        }
    }
}

/// Common permission string constants for compile-time safety
pub mod consts {
    pub const INVENTORY_READ: &str = "inventory:read";
    pub const INVENTORY_CREATE: &str = "inventory:create";
    pub const INVENTORY_UPDATE: &str = "inventory:update";

    pub const PRODUCTS_READ: &str = "products:read";
    pub const REPORTS_READ: &str = "reports:read";
    pub const REPORTS_EXPORT: &str = "reports:export";
}

/// Format a permission string
pub fn format_permission(resource: Resource, action: Action) -> String {
    format!("{}:{}", resource, action)
}

/// Parse a `resource:action` permission string
pub fn parse_permission(permission: &str) -> Result<(Resource, Action), String> {
    let (resource, action) = permission
        .split_once(':')
        .ok_or_else(|| format!("malformed permission: {}", permission))?;
    Ok((resource.parse()?, action.parse()?))
}

type ActionSet = HashSet<Action>;
type ResourceGrants = HashMap<Resource, ActionSet>;

fn grant(grants: &mut ResourceGrants, resource: Resource, actions: &[Action]) {
    grants
        .entry(resource)
        .or_default()
        .extend(actions.iter().copied());
}

fn grant_manage_all(grants: &mut ResourceGrants) {
    for resource in Resource::ALL {
        grant(grants, resource, &[Action::Manage]);
    }
}

// Role permission matrix. Roles are plain strings in tokens; unknown
// roles simply grant nothing.
lazy_static! {
    pub static ref ROLE_GRANTS: HashMap<&'static str, ResourceGrants> = {
        use Action::*;
        let mut roles = HashMap::new();

        // Administrator: full access to every resource
        let mut admin = ResourceGrants::new();
        grant_manage_all(&mut admin);
        roles.insert("admin", admin);

        // Manager: operational control without user or settings management
        let mut manager = ResourceGrants::new();
        for resource in [
            Resource::Customers,
            Resource::Suppliers,
            Resource::Products,
            Resource::RawMaterials,
            Resource::Sales,
            Resource::Purchases,
            Resource::Inventory,
            Resource::Expenses,
        ] {
            grant(&mut manager, resource, &[Manage]);
        }
        grant(&mut manager, Resource::Reports, &[Read, Export]);
        grant(&mut manager, Resource::Users, &[Read]);
        grant(&mut manager, Resource::Settings, &[Read]);
        roles.insert("manager", manager);

        // Sales staff: customer-facing work, read-only elsewhere
        let mut sales = ResourceGrants::new();
        grant(&mut sales, Resource::Customers, &[Create, Read, Update]);
        grant(&mut sales, Resource::Products, &[Read]);
        grant(&mut sales, Resource::Sales, &[Create, Read, Update]);
        grant(&mut sales, Resource::Inventory, &[Read]);
        grant(&mut sales, Resource::Reports, &[Read]);
        roles.insert("sales", sales);

        // Inventory staff: stock control and purchasing visibility
        let mut inventory = ResourceGrants::new();
        grant(&mut inventory, Resource::Products, &[Read]);
        grant(&mut inventory, Resource::RawMaterials, &[Read, Update]);
        grant(
            &mut inventory,
            Resource::Inventory,
            &[Create, Read, Update],
        );
        grant(&mut inventory, Resource::Suppliers, &[Read]);
        grant(&mut inventory, Resource::Purchases, &[Read]);
        grant(&mut inventory, Resource::Reports, &[Read]);
        roles.insert("inventory", inventory);

        // Read-only access to business data
        let mut readonly = ResourceGrants::new();
        for resource in [
            Resource::Customers,
            Resource::Suppliers,
            Resource::Products,
            Resource::RawMaterials,
            Resource::Sales,
            Resource::Purchases,
            Resource::Inventory,
            Resource::Expenses,
            Resource::Reports,
        ] {
            grant(&mut readonly, resource, &[Read]);
        }
        roles.insert("readonly", readonly);

        roles
    };
}

/// Checks whether a role grants an action on a resource.
///
/// A pure table lookup with no side effects. Unknown roles yield `false`,
/// never an error. The `manage` grant on a resource implies every action.
pub fn has_permission(role: &str, resource: Resource, action: Action) -> bool {
    let Some(grants) = ROLE_GRANTS.get(role.to_ascii_lowercase().as_str()) else {
        return false;
    };
    let Some(actions) = grants.get(&resource) else {
        return false;
    };
    actions.contains(&action) || actions.contains(&Action::Manage)
}

/// Checks whether any of the given roles grants an action on a resource.
pub fn roles_have_permission(roles: &[String], resource: Resource, action: Action) -> bool {
    roles
        .iter()
        .any(|role| has_permission(role, resource, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn admin_can_delete_products() {
        assert!(has_permission("admin", Resource::Products, Action::Delete));
    }

    #[test]
    fn sales_cannot_delete_products() {
        assert!(!has_permission("sales", Resource::Products, Action::Delete));
    }

    #[rstest]
    #[case("sales", Resource::Customers, Action::Create, true)]
    #[case("sales", Resource::Sales, Action::Update, true)]
    #[case("sales", Resource::Users, Action::Read, false)]
    #[case("sales", Resource::Inventory, Action::Update, false)]
    #[case("inventory", Resource::Inventory, Action::Update, true)]
    #[case("inventory", Resource::Customers, Action::Read, false)]
    #[case("manager", Resource::Inventory, Action::Delete, true)]
    #[case("manager", Resource::Users, Action::Delete, false)]
    #[case("readonly", Resource::Sales, Action::Read, true)]
    #[case("readonly", Resource::Sales, Action::Create, false)]
    fn role_matrix(
        #[case] role: &str,
        #[case] resource: Resource,
        #[case] action: Action,
        #[case] expected: bool,
    ) {
        assert_eq!(has_permission(role, resource, action), expected);
    }

    #[test]
    fn unknown_role_grants_nothing() {
        assert!(!has_permission(
            "intern",
            Resource::Inventory,
            Action::Read
        ));
        assert!(!has_permission("", Resource::Inventory, Action::Read));
    }

    #[test]
    fn role_lookup_is_case_insensitive() {
        assert!(has_permission("Admin", Resource::Products, Action::Delete));
        assert!(has_permission("ADMIN", Resource::Products, Action::Delete));
    }

    #[test]
    fn manage_implies_every_action() {
        for action in [
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::Export,
        ] {
            assert!(has_permission("manager", Resource::Inventory, action));
        }
    }

    #[test]
    fn parse_permission_round_trips() {
        let (resource, action) = parse_permission("inventory:update").unwrap();
        assert_eq!(resource, Resource::Inventory);
        assert_eq!(action, Action::Update);
        assert_eq!(format_permission(resource, action), "inventory:update");
    }

    #[test]
    fn parse_permission_rejects_malformed_input() {
        assert!(parse_permission("inventory").is_err());
        assert!(parse_permission("inventory:fly").is_err());
        assert!(parse_permission("spaceships:read").is_err());
    }

    #[test]
    fn roles_have_permission_checks_all_roles() {
        let roles = vec!["sales".to_string(), "inventory".to_string()];
        assert!(roles_have_permission(
            &roles,
            Resource::Inventory,
            Action::Update
        ));
        assert!(!roles_have_permission(
            &roles,
            Resource::Users,
            Action::Read
        ));
    }
}
