//! Catalog of the departments and issue types a counter may be keyed by.
//!
//! The catalog is compiled once from configuration. Client-supplied names are
//! only turned into [`Department`] / [`IssueType`] through it, so a value of
//! either type always names a catalog entry.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, TallyError};

/// A department that exists in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Department(String);

/// An issue type that exists in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssueType(String);

impl Department {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IssueType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered sets of allowed departments and issue types.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    departments: Vec<String>,
    issue_types: Vec<String>,
}

impl Catalog {
    pub fn new(departments: Vec<String>, issue_types: Vec<String>) -> Result<Self> {
        check_entries("catalog.departments", &departments)?;
        check_entries("catalog.issue_types", &issue_types)?;
        Ok(Self {
            departments,
            issue_types,
        })
    }

    /// Departments in display order.
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    /// Issue types in display order.
    pub fn issue_types(&self) -> &[String] {
        &self.issue_types
    }

    pub fn department(&self, name: &str) -> Result<Department> {
        let name = name.trim();
        self.departments
            .iter()
            .find(|d| d.as_str() == name)
            .map(|d| Department(d.clone()))
            .ok_or_else(|| TallyError::UnknownDepartment(name.to_string()))
    }

    pub fn issue_type(&self, name: &str) -> Result<IssueType> {
        let name = name.trim();
        self.issue_types
            .iter()
            .find(|t| t.as_str() == name)
            .map(|t| IssueType(t.clone()))
            .ok_or_else(|| TallyError::UnknownIssueType(name.to_string()))
    }
}

fn check_entries(field: &str, entries: &[String]) -> Result<()> {
    if entries.is_empty() {
        return Err(TallyError::BadRequest(format!("{field} must not be empty")));
    }
    let mut seen = HashSet::with_capacity(entries.len());
    for e in entries {
        if e.trim().is_empty() {
            return Err(TallyError::BadRequest(format!(
                "{field} must not contain blank entries"
            )));
        }
        if e.trim() != e {
            return Err(TallyError::BadRequest(format!(
                "{field} entry has surrounding whitespace: {e:?}"
            )));
        }
        if !seen.insert(e.as_str()) {
            return Err(TallyError::BadRequest(format!("{field} has duplicate entry: {e}")));
        }
    }
    Ok(())
}
