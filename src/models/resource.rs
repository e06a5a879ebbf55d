use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of value a form field or filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Integer,
    Number,
    Date,
    Select,
}

impl FieldKind {
    /// HTML input type used by the panel forms.
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Select => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Integer | FieldKind::Number => "number",
            FieldKind::Date => "date",
        }
    }
}

/// A discrete list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub options: &'static [&'static str],
}

/// A field of a create/update form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: &'static [&'static str],
}

const fn filter(key: &'static str, label: &'static str, kind: FieldKind) -> FilterSpec {
    FilterSpec { key, label, kind, options: &[] }
}

const fn select_filter(key: &'static str, label: &'static str, options: &'static [&'static str]) -> FilterSpec {
    FilterSpec { key, label, kind: FieldKind::Select, options }
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec { name, label, kind, required, options: &[] }
}

const fn select(name: &'static str, label: &'static str, required: bool, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec { name, label, kind: FieldKind::Select, required, options }
}

const ACTIVE_STATUS: &[&str] = &["active", "inactive"];
const ORDER_STATUS: &[&str] = &["pending", "approved", "dispatched", "delivered", "cancelled"];
const USER_ROLES: &[&str] = &["super_admin", "admin", "branch"];
const STOCK_ENTRY_TYPES: &[&str] = &["in", "out", "adjustment"];
const EMAIL_STATUS: &[&str] = &["sent", "failed", "queued"];

const FROM: FilterSpec = filter("from", "From", FieldKind::Date);
const TO: FilterSpec = filter("to", "To", FieldKind::Date);
const BRANCH: FilterSpec = filter("branch_id", "Branch", FieldKind::Integer);

/// Every backend collection the panel manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Employees,
    Branches,
    Designations,
    Items,
    Orders,
    Stocks,
    Users,
    AuditLogs,
    EmailLogs,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Employees,
        Resource::Branches,
        Resource::Designations,
        Resource::Items,
        Resource::Orders,
        Resource::Stocks,
        Resource::Users,
        Resource::AuditLogs,
        Resource::EmailLogs,
    ];

    /// URL segment used by the panel (`/r/<slug>`).
    pub fn slug(&self) -> &'static str {
        match self {
            Resource::Employees => "employees",
            Resource::Branches => "branches",
            Resource::Designations => "designations",
            Resource::Items => "items",
            Resource::Orders => "orders",
            Resource::Stocks => "stocks",
            Resource::Users => "users",
            Resource::AuditLogs => "audit-logs",
            Resource::EmailLogs => "email-logs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resource::Employees => "Employees",
            Resource::Branches => "Branches",
            Resource::Designations => "Designations",
            Resource::Items => "Items",
            Resource::Orders => "Orders",
            Resource::Stocks => "Stock Entries",
            Resource::Users => "Users",
            Resource::AuditLogs => "Audit Logs",
            Resource::EmailLogs => "Email Logs",
        }
    }

    /// Singular noun for flash messages ("Branch created").
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Employees => "Employee",
            Resource::Branches => "Branch",
            Resource::Designations => "Designation",
            Resource::Items => "Item",
            Resource::Orders => "Order",
            Resource::Stocks => "Stock entry",
            Resource::Users => "User",
            Resource::AuditLogs => "Audit log",
            Resource::EmailLogs => "Email log",
        }
    }

    pub fn list_endpoint(&self) -> &'static str {
        match self {
            Resource::Employees => "/admin/all-employees",
            Resource::Branches => "/admin/all-branches",
            Resource::Designations => "/admin/all-designations",
            Resource::Items => "/admin/all-items",
            Resource::Orders => "/admin/all-orders",
            Resource::Stocks => "/admin/all-stocks",
            Resource::Users => "/admin/all-users",
            Resource::AuditLogs => "/admin/audit-logs",
            Resource::EmailLogs => "/admin/email-logs",
        }
    }

    /// Key of the row array in list responses.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Resource::AuditLogs | Resource::EmailLogs => "logs",
            other => other.slug(),
        }
    }

    /// Singular slug of the write endpoints; `None` for read-only logs.
    pub fn record_slug(&self) -> Option<&'static str> {
        match self {
            Resource::Employees => Some("employee"),
            Resource::Branches => Some("branch"),
            Resource::Designations => Some("designation"),
            Resource::Items => Some("item"),
            Resource::Orders => Some("order"),
            Resource::Stocks => Some("stock"),
            Resource::Users => Some("user"),
            Resource::AuditLogs | Resource::EmailLogs => None,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.record_slug().is_some()
    }

    pub fn filters(&self) -> &'static [FilterSpec] {
        const EMPLOYEES: &[FilterSpec] = &[
            select_filter("status", "Status", ACTIVE_STATUS),
            BRANCH,
            filter("designation_id", "Designation", FieldKind::Integer),
        ];
        const BRANCHES: &[FilterSpec] = &[select_filter("status", "Status", ACTIVE_STATUS)];
        const ITEMS: &[FilterSpec] = &[
            filter("category", "Category", FieldKind::Text),
            select_filter("status", "Status", ACTIVE_STATUS),
        ];
        const ORDERS: &[FilterSpec] = &[select_filter("status", "Status", ORDER_STATUS), BRANCH, FROM, TO];
        const STOCKS: &[FilterSpec] = &[BRANCH, filter("item_id", "Item", FieldKind::Integer), FROM, TO];
        const USERS: &[FilterSpec] = &[
            select_filter("role", "Role", USER_ROLES),
            select_filter("status", "Status", ACTIVE_STATUS),
        ];
        const AUDIT: &[FilterSpec] = &[
            filter("action", "Action", FieldKind::Text),
            filter("user_id", "User", FieldKind::Integer),
            FROM,
            TO,
        ];
        const EMAIL: &[FilterSpec] = &[select_filter("status", "Status", EMAIL_STATUS), FROM, TO];
        match self {
            Resource::Employees => EMPLOYEES,
            Resource::Branches => BRANCHES,
            Resource::Designations => &[],
            Resource::Items => ITEMS,
            Resource::Orders => ORDERS,
            Resource::Stocks => STOCKS,
            Resource::Users => USERS,
            Resource::AuditLogs => AUDIT,
            Resource::EmailLogs => EMAIL,
        }
    }

    pub fn filter_spec(&self, key: &str) -> Option<&'static FilterSpec> {
        self.filters().iter().find(|f| f.key == key)
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        const EMPLOYEE: &[FieldSpec] = &[
            field("name", "Name", FieldKind::Text, true),
            field("email", "Email", FieldKind::Email, true),
            field("phone", "Phone", FieldKind::Text, false),
            field("branch_id", "Branch ID", FieldKind::Integer, true),
            field("designation_id", "Designation ID", FieldKind::Integer, true),
            field("joining_date", "Joining date", FieldKind::Date, false),
            select("status", "Status", false, ACTIVE_STATUS),
        ];
        const BRANCH_FIELDS: &[FieldSpec] = &[
            field("name", "Name", FieldKind::Text, true),
            field("code", "Code", FieldKind::Text, true),
            field("address", "Address", FieldKind::Text, false),
            field("phone", "Phone", FieldKind::Text, false),
            select("status", "Status", false, ACTIVE_STATUS),
        ];
        const DESIGNATION: &[FieldSpec] = &[
            field("name", "Name", FieldKind::Text, true),
            field("description", "Description", FieldKind::Text, false),
        ];
        const ITEM: &[FieldSpec] = &[
            field("name", "Name", FieldKind::Text, true),
            field("sku", "SKU", FieldKind::Text, false),
            field("category", "Category", FieldKind::Text, false),
            field("unit", "Unit", FieldKind::Text, true),
            field("price", "Price", FieldKind::Number, true),
            select("status", "Status", false, ACTIVE_STATUS),
        ];
        const ORDER: &[FieldSpec] = &[
            field("branch_id", "Branch ID", FieldKind::Integer, true),
            field("order_date", "Order date", FieldKind::Date, true),
            select("status", "Status", false, ORDER_STATUS),
            field("notes", "Notes", FieldKind::Text, false),
        ];
        const STOCK: &[FieldSpec] = &[
            field("item_id", "Item ID", FieldKind::Integer, true),
            field("branch_id", "Branch ID", FieldKind::Integer, true),
            field("quantity", "Quantity", FieldKind::Number, true),
            select("type", "Entry type", true, STOCK_ENTRY_TYPES),
            field("entry_date", "Entry date", FieldKind::Date, true),
        ];
        const USER: &[FieldSpec] = &[
            field("name", "Name", FieldKind::Text, true),
            field("email", "Email", FieldKind::Email, true),
            select("role", "Role", true, USER_ROLES),
            field("branch_id", "Branch ID", FieldKind::Integer, false),
            field("password", "Password", FieldKind::Password, true),
            select("status", "Status", false, ACTIVE_STATUS),
        ];
        match self {
            Resource::Employees => EMPLOYEE,
            Resource::Branches => BRANCH_FIELDS,
            Resource::Designations => DESIGNATION,
            Resource::Items => ITEM,
            Resource::Orders => ORDER,
            Resource::Stocks => STOCK,
            Resource::Users => USER,
            Resource::AuditLogs | Resource::EmailLogs => &[],
        }
    }

    pub fn from_slug(slug: &str) -> Option<Resource> {
        let normalized = slug.trim().to_lowercase().replace('_', "-");
        Resource::ALL.into_iter().find(|r| r.slug() == normalized)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::from_slug(s).ok_or_else(|| format!("unknown resource '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for r in Resource::ALL {
            assert_eq!(Resource::from_slug(r.slug()), Some(r));
        }
        assert_eq!(Resource::from_slug("audit_logs"), Some(Resource::AuditLogs));
        assert_eq!(Resource::from_slug("recipes"), None);
    }

    #[test]
    fn logs_are_read_only() {
        assert!(!Resource::AuditLogs.is_writable());
        assert!(Resource::EmailLogs.fields().is_empty());
        assert_eq!(Resource::EmailLogs.collection_key(), "logs");
        assert_eq!(Resource::Stocks.record_slug(), Some("stock"));
    }

    #[test]
    fn employees_filter_by_branch() {
        assert_eq!(Resource::Employees.list_endpoint(), "/admin/all-employees");
        assert!(Resource::Employees.filter_spec("branch_id").is_some());
        assert!(Resource::Designations.filter_spec("status").is_none());
    }
}
