//! Record type descriptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Int,
    /// Fractional numbers. Fragments mentioning these get decimal-comma
    /// normalization before compilation.
    Decimal,
    Text,
}

/// Capability: describe the properties of the record type under evaluation.
pub trait RecordType {
    /// Property names in declaration order.
    fn property_names(&self) -> Vec<&str>;

    fn property_type(&self, name: &str) -> Option<FieldType>;

    fn has_property(&self, name: &str) -> bool {
        self.property_type(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// An ordered list of typed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDecl>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; re-declaring a name replaces its type in place.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.field_type = field_type,
            None => self.fields.push(FieldDecl { name, field_type }),
        }
        self
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Derive a schema from sample records.
    ///
    /// The first non-null value of a field decides its type, except that an
    /// Int field widens to Decimal when a later record holds a fraction.
    /// Fields seen only as null are typed Text. Fields come out in
    /// lexicographic order.
    pub fn infer<'a>(records: impl IntoIterator<Item = &'a Record>) -> Schema {
        let mut seen: BTreeMap<&'a str, Option<FieldType>> = BTreeMap::new();
        for record in records {
            for (name, value) in record.fields() {
                let slot = seen.entry(name.as_str()).or_insert(None);
                match (*slot, value.field_type()) {
                    (None, observed) => *slot = observed,
                    (Some(FieldType::Int), Some(FieldType::Decimal)) => {
                        *slot = Some(FieldType::Decimal)
                    }
                    _ => {}
                }
            }
        }
        let fields = seen
            .into_iter()
            .map(|(name, ty)| FieldDecl {
                name: name.to_string(),
                field_type: ty.unwrap_or(FieldType::Text),
            })
            .collect();
        Schema { fields }
    }
}

impl RecordType for Schema {
    fn property_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn property_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use rust_decimal::Decimal;

    #[test]
    fn declared_order_is_preserved() {
        let s = Schema::new()
            .field("Income", FieldType::Int)
            .field("Age", FieldType::Int)
            .field("Income", FieldType::Decimal);
        assert_eq!(s.property_names(), vec!["Income", "Age"]);
        assert_eq!(s.property_type("Income"), Some(FieldType::Decimal));
        assert!(!s.has_property("Name"));
    }

    #[test]
    fn infer_widens_int_to_decimal_and_defaults_nulls_to_text() {
        let a = Record::new()
            .with("Price", Value::Int(10))
            .with("Name", Value::Null)
            .with("Active", Value::Bool(true));
        let b = Record::new().with("Price", Value::Decimal(Decimal::new(105, 1)));
        let s = Schema::infer([&a, &b]);
        assert_eq!(s.property_names(), vec!["Active", "Name", "Price"]);
        assert_eq!(s.property_type("Price"), Some(FieldType::Decimal));
        assert_eq!(s.property_type("Name"), Some(FieldType::Text));
        assert_eq!(s.property_type("Active"), Some(FieldType::Bool));
    }

    #[test]
    fn schema_json_format() {
        let s: Schema = serde_json::from_str(
            r#"[{"name": "Price", "type": "Decimal"}, {"name": "Age", "type": "Int"}]"#,
        )
        .unwrap();
        assert_eq!(s.property_names(), vec!["Price", "Age"]);
    }
}
