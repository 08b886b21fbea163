//! Search filter value object

use serde::{Deserialize, Serialize};

/// A field/value/active-flag triple constraining a search.
///
/// Two filters denote the same constraint when their field and value both
/// match; the active flag carries display state only. A leading `-` on the
/// field name denotes exclusion and is passed through to the backend
/// untouched (e.g. `-alert_status`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
    pub is_active: bool,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            is_active: true,
        }
    }

    pub fn inactive(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_active: false,
            ..Self::new(field, value)
        }
    }

    /// True when `other` constrains the same field/value pair.
    pub fn same_constraint(&self, other: &Filter) -> bool {
        self.field == other.field && self.value == other.value
    }

    /// Query fragment for this filter. Values are emitted verbatim;
    /// escaping of reserved characters is the backend's contract.
    pub fn query_fragment(&self) -> String {
        format!("{}:{}", self.field, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_joins_field_and_value() {
        let f = Filter::new("source:type", "bro");
        assert_eq!(f.query_fragment(), "source:type:bro");
    }

    #[test]
    fn negated_field_passes_through() {
        let f = Filter::new("-alert_status", "RESOLVE");
        assert_eq!(f.query_fragment(), "-alert_status:RESOLVE");
    }

    #[test]
    fn same_constraint_ignores_active_flag() {
        let a = Filter::new("ip_src_addr", "10.0.0.1");
        let b = Filter::inactive("ip_src_addr", "10.0.0.1");
        assert!(a.same_constraint(&b));
        assert!(!a.same_constraint(&Filter::new("ip_src_addr", "10.0.0.2")));
    }
}
