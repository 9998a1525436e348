//! Table capabilities
//!
//! Describes what a table's execution context can push down. Capabilities
//! are an immutable value handed to the builder alongside the query map and
//! carried on the resulting parameters; nothing in the translator or the
//! in-memory engine enforces them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Filter operators and functions a table may advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegationOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Top,
    Contains,
    StartsWith,
    EndsWith,
    In,
}

impl DelegationOperator {
    /// All operators, in advertisement order
    pub const ALL: [DelegationOperator; 13] = [
        DelegationOperator::Eq,
        DelegationOperator::Ne,
        DelegationOperator::Lt,
        DelegationOperator::Le,
        DelegationOperator::Gt,
        DelegationOperator::Ge,
        DelegationOperator::And,
        DelegationOperator::Or,
        DelegationOperator::Top,
        DelegationOperator::Contains,
        DelegationOperator::StartsWith,
        DelegationOperator::EndsWith,
        DelegationOperator::In,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DelegationOperator::Eq => "eq",
            DelegationOperator::Ne => "ne",
            DelegationOperator::Lt => "lt",
            DelegationOperator::Le => "le",
            DelegationOperator::Gt => "gt",
            DelegationOperator::Ge => "ge",
            DelegationOperator::And => "and",
            DelegationOperator::Or => "or",
            DelegationOperator::Top => "top",
            DelegationOperator::Contains => "contains",
            DelegationOperator::StartsWith => "startswith",
            DelegationOperator::EndsWith => "endswith",
            DelegationOperator::In => "in",
        }
    }
}

impl fmt::Display for DelegationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelegationOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        DelegationOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == lower)
            .ok_or_else(|| format!("unknown delegation operator '{}'", s))
    }
}

/// Immutable capability declaration for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCapabilities {
    filter_functions: BTreeSet<DelegationOperator>,
    non_filterable: Vec<String>,
    unsortable: Vec<String>,
    is_only_server_pagable: bool,
    odata_version: u8,
}

impl Default for TableCapabilities {
    fn default() -> Self {
        Self::common()
    }
}

impl TableCapabilities {
    /// Comparison, logical and top operators
    pub fn common() -> Self {
        Self::with_functions([
            DelegationOperator::Eq,
            DelegationOperator::Ne,
            DelegationOperator::Lt,
            DelegationOperator::Le,
            DelegationOperator::Gt,
            DelegationOperator::Ge,
            DelegationOperator::And,
            DelegationOperator::Or,
            DelegationOperator::Top,
        ])
    }

    /// No pushdown at all
    pub fn non_delegable() -> Self {
        Self::with_functions([])
    }

    /// Exactly the given operators
    pub fn with_functions(functions: impl IntoIterator<Item = DelegationOperator>) -> Self {
        Self {
            filter_functions: functions.into_iter().collect(),
            non_filterable: Vec::new(),
            unsortable: Vec::new(),
            is_only_server_pagable: true,
            odata_version: 3,
        }
    }

    /// Adds an operator to the advertised set
    pub fn with_function(mut self, op: DelegationOperator) -> Self {
        self.filter_functions.insert(op);
        self
    }

    /// Marks a property as not usable in filters
    pub fn with_non_filterable(mut self, property: impl Into<String>) -> Self {
        self.non_filterable.push(property.into());
        self
    }

    /// Marks a property as not usable in ordering
    pub fn with_unsortable(mut self, property: impl Into<String>) -> Self {
        self.unsortable.push(property.into());
        self
    }

    pub fn supports(&self, op: DelegationOperator) -> bool {
        self.filter_functions.contains(&op)
    }

    /// Advertised operators in a stable order
    pub fn filter_functions(&self) -> impl Iterator<Item = DelegationOperator> + '_ {
        self.filter_functions.iter().copied()
    }

    pub fn is_delegable(&self) -> bool {
        !self.filter_functions.is_empty()
    }

    pub fn is_filterable(&self, property: &str) -> bool {
        self.is_delegable() && !self.non_filterable.iter().any(|p| p == property)
    }

    pub fn is_sortable(&self, property: &str) -> bool {
        !self.unsortable.iter().any(|p| p == property)
    }

    pub fn non_filterable(&self) -> &[String] {
        &self.non_filterable
    }

    pub fn unsortable(&self) -> &[String] {
        &self.unsortable
    }

    pub fn is_only_server_pagable(&self) -> bool {
        self.is_only_server_pagable
    }

    pub fn odata_version(&self) -> u8 {
        self.odata_version
    }
}
