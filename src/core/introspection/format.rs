//! Rendering of grants as `GRANT` / `REVOKE` / `CREATE` statements

use crate::core::models::{AccessType, GrantScope, Principal, PrincipalId};
use crate::core::rights::AccessRightsElement;

/// Back-quote a name unless it is a plain identifier
pub fn quote_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "\\`"))
    }
}

/// `*.*`, `db.*` or `db.table`
pub fn format_target(database: Option<&str>, table: Option<&str>) -> String {
    match (database, table) {
        (None, _) => "*.*".to_string(),
        (Some(database), None) => format!("{}.*", quote_identifier(database)),
        (Some(database), Some(table)) => {
            format!("{}.{}", quote_identifier(database), quote_identifier(table))
        }
    }
}

/// A privilege on a scope, e.g. `SELECT(x, y) ON db.table`
pub fn format_privilege(access: AccessType, scope: &GrantScope) -> String {
    format_privileges(&[access], scope)
}

/// Several privileges on one scope, e.g. `SELECT, INSERT ON db.table`
pub fn format_privileges(privileges: &[AccessType], scope: &GrantScope) -> String {
    let (target, columns) = match scope {
        GrantScope::Global => (format_target(None, None), None),
        GrantScope::Database(database) => (format_target(Some(database), None), None),
        GrantScope::Table { database, table } => {
            (format_target(Some(database), Some(table)), None)
        }
        GrantScope::Columns {
            database,
            table,
            columns,
        } => (
            format_target(Some(database), Some(table)),
            Some(join_quoted(columns.as_slice())),
        ),
    };
    let privileges = privileges
        .iter()
        .map(|access| match &columns {
            Some(columns) => format!("{}({})", access, columns),
            None => access.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ON {}", privileges, target)
}

/// `CREATE USER A` / `CREATE ROLE R1`
pub fn create_statement(principal: &Principal) -> String {
    format!(
        "CREATE {} {}",
        principal.kind.keyword(),
        quote_identifier(&principal.name)
    )
}

/// Every statement needed to recreate a principal's grants, in insertion order
///
/// Privilege statements come first, then role grants without and with admin option.
pub fn grant_statements<F>(principal: &Principal, role_name: F) -> Vec<String>
where
    F: Fn(&PrincipalId) -> Option<String>,
{
    let grantee = quote_identifier(&principal.name);
    let mut statements: Vec<String> = group_elements(principal.access.elements())
        .into_iter()
        .map(|group| group.render(&grantee))
        .collect();

    let (with_admin, without_admin): (Vec<_>, Vec<_>) = principal
        .granted_roles
        .iter()
        .filter_map(|granted| {
            role_name(&granted.role).map(|name| (quote_identifier(&name), granted.admin_option))
        })
        .partition(|(_, admin_option)| *admin_option);

    if !without_admin.is_empty() {
        statements.push(format!("GRANT {} TO {}", join_names(&without_admin), grantee));
    }
    if !with_admin.is_empty() {
        statements.push(format!(
            "GRANT {} TO {} WITH ADMIN OPTION",
            join_names(&with_admin),
            grantee
        ));
    }
    statements
}

/// Consecutive elements that render as one statement
struct ElementGroup<'a> {
    first: &'a AccessRightsElement,
    /// Access types in order of appearance; `None` columns mean the whole table or wider
    privileges: Vec<(AccessType, Option<Vec<&'a str>>)>,
}

impl<'a> ElementGroup<'a> {
    fn new(first: &'a AccessRightsElement) -> Self {
        let mut group = Self {
            first,
            privileges: Vec::new(),
        };
        group.push(first);
        group
    }

    fn accepts(&self, element: &AccessRightsElement) -> bool {
        element.is_partial_revoke == self.first.is_partial_revoke
            && element.grant_option == self.first.grant_option
            && element.resource.same_table(&self.first.resource)
    }

    fn push(&mut self, element: &'a AccessRightsElement) {
        let column = element.resource.column.as_deref();
        let existing = self.privileges.iter_mut().find(|(access, columns)| {
            *access == element.access_type && columns.is_some() == column.is_some()
        });
        match (existing, column) {
            (Some((_, Some(columns))), Some(column)) => columns.push(column),
            (Some(_), None) => {}
            (_, column) => self
                .privileges
                .push((element.access_type, column.map(|column| vec![column]))),
        }
    }

    fn render(&self, grantee: &str) -> String {
        let privileges = self
            .privileges
            .iter()
            .map(|(access, columns)| match columns {
                Some(columns) => format!("{}({})", access, join_quoted(columns.as_slice())),
                None => access.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let target = format_target(
            self.first.resource.database.as_deref(),
            self.first.resource.table.as_deref(),
        );

        if self.first.is_partial_revoke {
            format!("REVOKE {} ON {} FROM {}", privileges, target, grantee)
        } else if self.first.grant_option {
            format!("GRANT {} ON {} TO {} WITH GRANT OPTION", privileges, target, grantee)
        } else {
            format!("GRANT {} ON {} TO {}", privileges, target, grantee)
        }
    }
}

fn group_elements(elements: &[AccessRightsElement]) -> Vec<ElementGroup<'_>> {
    let mut groups: Vec<ElementGroup<'_>> = Vec::new();
    for element in elements {
        match groups.last_mut() {
            Some(group) if group.accepts(element) => group.push(element),
            _ => groups.push(ElementGroup::new(element)),
        }
    }
    groups
}

fn join_quoted<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| quote_identifier(name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_names(names: &[(String, bool)]) -> String {
    names
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
