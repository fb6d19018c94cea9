//! Cutting a branch's printed form into its AND-joined conditions.
//!
//! The cut is purely textual. Because binary nodes print fully
//! parenthesized, fragments routinely carry stray `(` or `)` from the
//! enclosing nodes; the repair loop deals with that.

use nearmiss_core::RecordType;

use crate::normalize;

/// Literal AND-connective marker between conditions in the printed form.
pub const AND_MARKER: &str = " AndAlso ";

pub fn split_conditions(branch_text: &str) -> Vec<&str> {
    branch_text.split(AND_MARKER).collect()
}

/// One condition's text, tagged with the record properties it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// Mentioned properties, in the record type's declaration order.
    pub properties: Vec<String>,
}

impl Fragment {
    pub fn tag(text: &str, record_type: &dyn RecordType) -> Fragment {
        let mentioned = normalize::identifiers(text);
        let properties = record_type
            .property_names()
            .into_iter()
            .filter(|name| mentioned.contains(name))
            .map(str::to_string)
            .collect();
        Fragment {
            text: text.to_string(),
            properties,
        }
    }

    /// Fragments that mention no property are decoration left over from
    /// splitting and are never scored.
    pub fn is_scorable(&self) -> bool {
        !self.properties.is_empty()
    }
}
