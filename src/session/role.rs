use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Resource;

/// Role claim carried by the token. Drives menu selection and route gating
/// in the UI only; the backend enforces authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Branch,
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub href: String,
}

impl Role {
    /// Parse the role claim; backends spell it several ways.
    pub fn parse(raw: &str) -> Option<Role> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "superadmin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "branch" | "branchadmin" | "branchmanager" | "branchuser" => Some(Role::Branch),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::Branch => "Branch",
        }
    }

    /// Resources this role's dashboard exposes, in menu order.
    pub fn resources(&self) -> &'static [Resource] {
        match self {
            Role::SuperAdmin => &Resource::ALL,
            Role::Admin => &[
                Resource::Employees,
                Resource::Designations,
                Resource::Items,
                Resource::Orders,
                Resource::Stocks,
                Resource::EmailLogs,
            ],
            Role::Branch => &[Resource::Orders, Resource::Stocks],
        }
    }

    pub fn allows(&self, resource: Resource) -> bool {
        self.resources().contains(&resource)
    }

    /// Branch users only ever see their own branch.
    pub fn is_branch_scoped(&self) -> bool {
        matches!(self, Role::Branch)
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        let mut items = vec![MenuItem { label: "Dashboard", href: "/dashboard".into() }];
        items.extend(self.resources().iter().map(|r| MenuItem {
            label: r.label(),
            href: format!("/r/{}", r.slug()),
        }));
        items
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
