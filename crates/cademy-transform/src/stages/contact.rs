//! Contact Flattener: promotes the keys of `contact_info` to columns.

use std::collections::HashMap;

use polars::prelude::{DataFrame, NamedFrom, Series};
use serde_json::{Map, Value};
use tracing::warn;

use cademy_model::schema::{
    ADDRESS_COMPONENTS, CONTACT_INFO, NESTED_KEY_SEPARATOR, prefixed_contact_key,
};

use super::RowFailure;
use crate::error::{RecordError, Result};
use crate::frame::text_cells;
use crate::literal::parse_mapping_literal;

/// Result of flattening `contact_info`.
#[derive(Debug, Clone, Default)]
pub struct ContactOutcome {
    /// Columns added to the frame, in first-seen order.
    pub columns: Vec<String>,
    pub failures: Vec<RowFailure>,
}

/// Storage type chosen for a promoted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactKind {
    Text,
    Number,
    Flag,
}

/// Values of one promoted key across the batch.
struct ContactColumn {
    name: String,
    values: Vec<Option<Value>>,
}

impl ContactColumn {
    fn kind(&self) -> ContactKind {
        let mut present = self.values.iter().flatten().peekable();
        if present.peek().is_none() {
            return ContactKind::Text;
        }
        let mut numbers = true;
        let mut flags = true;
        for value in present {
            numbers &= value.is_number();
            flags &= value.is_boolean();
        }
        match (numbers, flags) {
            (true, _) => ContactKind::Number,
            (_, true) => ContactKind::Flag,
            _ => ContactKind::Text,
        }
    }

    fn into_series(self) -> Series {
        let name = self.name.as_str().into();
        match self.kind() {
            ContactKind::Number => {
                let values: Vec<Option<f64>> = self
                    .values
                    .iter()
                    .map(|value| value.as_ref().and_then(Value::as_f64))
                    .collect();
                Series::new(name, values)
            }
            ContactKind::Flag => {
                let values: Vec<Option<bool>> = self
                    .values
                    .iter()
                    .map(|value| value.as_ref().and_then(Value::as_bool))
                    .collect();
                Series::new(name, values)
            }
            ContactKind::Text => {
                let values: Vec<Option<String>> = self
                    .values
                    .into_iter()
                    .map(|value| value.map(value_text))
                    .collect();
                Series::new(name, values)
            }
        }
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Flattens nested mappings into `parent.child` keys; `null` values are dropped.
fn flatten_into(prefix: Option<&str>, map: Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let name = match prefix {
            Some(parent) => format!("{parent}{NESTED_KEY_SEPARATOR}{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(Some(&name), nested, out),
            Value::Null => {}
            other => out.push((name, other)),
        }
    }
}

/// Builds the union of contact keys over the batch.
struct ContactColumns {
    height: usize,
    columns: Vec<ContactColumn>,
    index: HashMap<String, usize>,
}

impl ContactColumns {
    fn new(height: usize) -> Self {
        Self {
            height,
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, row: usize, key: String, value: Value) {
        let idx = match self.index.get(&key) {
            Some(idx) => *idx,
            None => {
                let idx = self.columns.len();
                self.index.insert(key.clone(), idx);
                self.columns.push(ContactColumn {
                    name: key,
                    values: vec![None; self.height],
                });
                idx
            }
        };
        self.columns[idx].values[row] = Some(value);
    }
}

/// Parses `contact_info`, adds one column per key seen in the batch, and
/// removes `contact_info`.
///
/// Nested mappings become `parent.child` columns. A key that collides with
/// an existing column, or with a column the address splitter adds later,
/// is promoted as `contact_info.<key>` instead. Null
/// cells contribute no values; rows that do not parse are returned as
/// failures and get nulls in every contact column.
pub fn flatten_contact_info(df: &mut DataFrame) -> Result<ContactOutcome> {
    let cells = text_cells(df, CONTACT_INFO)?;
    let mut collected = ContactColumns::new(df.height());
    let mut failures = Vec::new();

    for (row, cell) in cells.into_iter().enumerate() {
        let Some(text) = cell else {
            continue;
        };
        match parse_mapping_literal(&text) {
            Ok(map) => {
                let mut entries = Vec::new();
                flatten_into(None, map, &mut entries);
                for (key, value) in entries {
                    collected.insert(row, key, value);
                }
            }
            Err(source) => {
                failures.push(RowFailure::new(
                    row,
                    RecordError::MalformedContactInfo { source },
                ));
            }
        }
    }

    df.drop_in_place(CONTACT_INFO)?;

    let mut columns = Vec::with_capacity(collected.columns.len());
    for mut column in collected.columns {
        if df.column(&column.name).is_ok() || is_reserved(&column.name) {
            let renamed = prefixed_contact_key(&column.name);
            warn!(
                key = %column.name,
                column = %renamed,
                "contact key collides with an existing column"
            );
            column.name = renamed;
        }
        columns.push(column.name.clone());
        df.with_column(column.into_series())?;
    }

    Ok(ContactOutcome { columns, failures })
}

/// Names written by later stages.
fn is_reserved(name: &str) -> bool {
    ADDRESS_COMPONENTS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::LiteralError;
    use polars::prelude::{Column, IntoColumn};

    fn contact_frame(cells: Vec<Option<&str>>) -> DataFrame {
        let height = cells.len();
        let columns: Vec<Column> = vec![
            Series::new("uuid".into(), (1..=height as i64).collect::<Vec<_>>()).into_column(),
            Series::new(CONTACT_INFO.into(), cells).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn promotes_keys_and_drops_source() {
        let mut df = contact_frame(vec![
            Some("{'email': 'a@b.com', 'address': {'zip': '10001'}}"),
            Some("{'email': 'c@d.com'}"),
        ]);
        let outcome = flatten_contact_info(&mut df).unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.columns, vec!["email", "address.zip"]);
        assert!(df.column(CONTACT_INFO).is_err());

        let email = df.column("email").unwrap().str().unwrap();
        assert_eq!(email.get(0), Some("a@b.com"));
        assert_eq!(email.get(1), Some("c@d.com"));
        let zip = df.column("address.zip").unwrap().str().unwrap();
        assert_eq!(zip.get(0), Some("10001"));
        assert_eq!(zip.get(1), None);
    }

    #[test]
    fn infers_numeric_and_boolean_columns() {
        let mut df = contact_frame(vec![
            Some("{'floor': 3, 'vip': True, 'code': 7}"),
            Some("{'floor': 4.5, 'vip': False, 'code': 'A7'}"),
        ]);
        flatten_contact_info(&mut df).unwrap();

        let floor = df.column("floor").unwrap().f64().unwrap();
        assert_eq!(floor.get(0), Some(3.0));
        assert_eq!(floor.get(1), Some(4.5));
        let vip = df.column("vip").unwrap().bool().unwrap();
        assert_eq!(vip.get(0), Some(true));
        let code = df.column("code").unwrap().str().unwrap();
        assert_eq!(code.get(0), Some("7"));
        assert_eq!(code.get(1), Some("A7"));
    }

    #[test]
    fn null_cells_and_failures_get_nulls() {
        let mut df = contact_frame(vec![
            Some("{'email': 'a@b.com'}"),
            None,
            Some("not a mapping"),
        ]);
        let outcome = flatten_contact_info(&mut df).unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].row, 2);
        assert!(matches!(
            outcome.failures[0].error,
            RecordError::MalformedContactInfo { .. }
        ));
        let email = df.column("email").unwrap().str().unwrap();
        assert_eq!(email.get(1), None);
        assert_eq!(email.get(2), None);
    }

    #[test]
    fn colliding_key_is_prefixed() {
        let mut df = contact_frame(vec![Some("{'uuid': 'x-1', 'email': 'a@b.com'}")]);
        let outcome = flatten_contact_info(&mut df).unwrap();

        assert_eq!(outcome.columns, vec!["contact_info.uuid", "email"]);
        let uuid = df.column("uuid").unwrap().i64().unwrap();
        assert_eq!(uuid.get(0), Some(1));
        let promoted = df.column("contact_info.uuid").unwrap().str().unwrap();
        assert_eq!(promoted.get(0), Some("x-1"));
    }

    #[test]
    fn address_component_keys_are_prefixed() {
        let mut df = contact_frame(vec![Some("{'street': 'Contact St', 'zip_code': 10001}")]);
        let outcome = flatten_contact_info(&mut df).unwrap();

        assert_eq!(
            outcome.columns,
            vec!["contact_info.street", "contact_info.zip_code"]
        );
        assert!(df.column("street").is_err());
        let street = df.column("contact_info.street").unwrap().str().unwrap();
        assert_eq!(street.get(0), Some("Contact St"));
    }

    #[test]
    fn deeply_nested_cell_is_a_record_failure() {
        let deep = format!("{{'a': {}", "[".repeat(50_000));
        let mut df = contact_frame(vec![Some("{'email': 'a@b.com'}"), Some(deep.as_str())]);
        let outcome = flatten_contact_info(&mut df).unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].row, 1);
        assert!(matches!(
            outcome.failures[0].error,
            RecordError::MalformedContactInfo {
                source: LiteralError::TooDeep { .. }
            }
        ));
    }

    #[test]
    fn lists_are_kept_as_json_text() {
        let mut df = contact_frame(vec![Some("{'phones': ['555-1234', '555-9876']}")]);
        flatten_contact_info(&mut df).unwrap();
        let phones = df.column("phones").unwrap().str().unwrap();
        assert_eq!(phones.get(0), Some(r#"["555-1234","555-9876"]"#));
    }
}
