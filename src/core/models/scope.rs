//! Grant scopes and the resources they expand to

use super::access_type::GrantLevel;
use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};

/// Scope named by a grant, revoke or privilege check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrantScope {
    /// `*.*`
    Global,
    /// `db.*`
    Database(String),
    /// `db.table`
    Table { database: String, table: String },
    /// `(c1, c2) ON db.table`
    Columns {
        database: String,
        table: String,
        columns: Vec<String>,
    },
}

impl GrantScope {
    pub fn database(database: impl Into<String>) -> Self {
        GrantScope::Database(database.into())
    }

    pub fn table(database: impl Into<String>, table: impl Into<String>) -> Self {
        GrantScope::Table {
            database: database.into(),
            table: table.into(),
        }
    }

    pub fn columns<I, S>(database: impl Into<String>, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GrantScope::Columns {
            database: database.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a scope from optional components, as they appear in definition files
    pub fn from_parts(
        database: Option<String>,
        table: Option<String>,
        columns: Option<Vec<String>>,
    ) -> Result<Self> {
        match (database, table, columns) {
            (None, None, None) => Ok(GrantScope::Global),
            (Some(database), None, None) => Ok(GrantScope::Database(database)),
            (Some(database), Some(table), None) => Ok(GrantScope::Table { database, table }),
            (Some(database), Some(table), Some(columns)) => Ok(GrantScope::Columns {
                database,
                table,
                columns,
            }),
            _ => Err(AccessError::validation(
                "A table requires a database and columns require a table",
            )),
        }
    }

    pub fn level(&self) -> GrantLevel {
        match self {
            GrantScope::Global => GrantLevel::Global,
            GrantScope::Database(_) => GrantLevel::Database,
            GrantScope::Table { .. } => GrantLevel::Table,
            GrantScope::Columns { .. } => GrantLevel::Column,
        }
    }

    /// One resource per addressed object; a column list yields one per column
    pub fn resources(&self) -> Vec<Resource> {
        match self {
            GrantScope::Global => vec![Resource::global()],
            GrantScope::Database(database) => vec![Resource::database(database)],
            GrantScope::Table { database, table } => vec![Resource::table(database, table)],
            GrantScope::Columns {
                database,
                table,
                columns,
            } => columns
                .iter()
                .map(|column| Resource::column(database, table, column))
                .collect(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let empty = match self {
            GrantScope::Global => false,
            GrantScope::Database(database) => database.is_empty(),
            GrantScope::Table { database, table } => database.is_empty() || table.is_empty(),
            GrantScope::Columns {
                database,
                table,
                columns,
            } => {
                database.is_empty()
                    || table.is_empty()
                    || columns.is_empty()
                    || columns.iter().any(String::is_empty)
            }
        };
        if empty {
            return Err(AccessError::validation(format!(
                "Empty name in grant scope {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// A single addressable object: `*.*`, a database, a table or one column
///
/// Components nest: a table is only set together with a database, a column only together
/// with a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Resource {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn database(database: &str) -> Self {
        Self {
            database: Some(database.to_string()),
            ..Self::default()
        }
    }

    pub fn table(database: &str, table: &str) -> Self {
        Self {
            database: Some(database.to_string()),
            table: Some(table.to_string()),
            column: None,
        }
    }

    pub fn column(database: &str, table: &str, column: &str) -> Self {
        Self {
            database: Some(database.to_string()),
            table: Some(table.to_string()),
            column: Some(column.to_string()),
        }
    }

    pub fn level(&self) -> GrantLevel {
        match (&self.database, &self.table, &self.column) {
            (None, _, _) => GrantLevel::Global,
            (Some(_), None, _) => GrantLevel::Database,
            (Some(_), Some(_), None) => GrantLevel::Table,
            (Some(_), Some(_), Some(_)) => GrantLevel::Column,
        }
    }

    /// True when `self` is equal to or broader than `other`
    pub fn covers(&self, other: &Resource) -> bool {
        fn component(mine: &Option<String>, theirs: &Option<String>) -> Option<bool> {
            match mine {
                None => Some(true),
                Some(name) if theirs.as_ref() == Some(name) => None,
                Some(_) => Some(false),
            }
        }

        if let Some(decided) = component(&self.database, &other.database) {
            return decided;
        }
        if let Some(decided) = component(&self.table, &other.table) {
            return decided;
        }
        component(&self.column, &other.column).unwrap_or(true)
    }

    pub fn overlaps(&self, other: &Resource) -> bool {
        self.covers(other) || other.covers(self)
    }

    /// Whether two resources name the same table (or both none), ignoring columns
    pub(crate) fn same_table(&self, other: &Resource) -> bool {
        self.database == other.database && self.table == other.table
    }
}
