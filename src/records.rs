use std::collections::HashMap;

use crate::tokenize::RawRow;

/// Header-keyed view of one data row.
///
/// Keys are normalized header names (see [`header_key`]). Values are stored
/// as found in the row; readers trim on access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value; a repeated key overwrites the earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Trimmed value for `key`, falling back to the upper-case spelling when
    /// the lower-case one is missing or blank. Absent keys read as `""`.
    pub fn get(&self, key: &str) -> &str {
        let direct = self.fields.get(key).map(|v| v.trim()).unwrap_or_default();
        if !direct.is_empty() {
            return direct;
        }
        self.fields
            .get(&key.to_uppercase())
            .map(|v| v.trim())
            .unwrap_or_default()
    }

    /// First non-empty value among `keys`, in order.
    pub fn first_non_empty(&self, keys: &[&str]) -> &str {
        keys.iter()
            .map(|key| self.get(key))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Canonical field name and the header spellings accepted for it, in
/// priority order.
#[derive(Debug, Clone, Copy)]
pub struct FieldAlias {
    pub field: &'static str,
    pub headers: &'static [&'static str],
}

/// Resolution table consulted once per record during normalization.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable(pub &'static [FieldAlias]);

impl AliasTable {
    /// Resolves `field` through its aliases. Fields missing from the table
    /// are read under their own name.
    pub fn resolve<'r>(&self, record: &'r RawRecord, field: &str) -> &'r str {
        match self.0.iter().find(|alias| alias.field == field) {
            Some(alias) => record.first_non_empty(alias.headers),
            None => record.get(field),
        }
    }
}

/// Which keys must be non-empty for a projected record to be kept.
#[derive(Debug, Clone, Copy)]
pub enum RequiredKey {
    Field(&'static str),
    AnyOf(&'static [&'static str]),
}

impl RequiredKey {
    pub fn is_satisfied_by(&self, record: &RawRecord) -> bool {
        match self {
            Self::Field(key) => !record.get(key).is_empty(),
            Self::AnyOf(keys) => keys.iter().any(|key| !record.get(key).is_empty()),
        }
    }
}

/// Lower-cases a header and turns each run of whitespace into one `_`.
pub fn header_key(header: &str) -> String {
    let mut key = String::with_capacity(header.len());
    let mut in_space = false;
    for ch in header.chars() {
        if ch.is_whitespace() {
            if !in_space {
                key.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        key.extend(ch.to_lowercase());
    }
    key
}

/// Zips the header row with every data row.
///
/// Short rows read missing trailing fields as `""`; extra fields are ignored.
/// Rows failing `required` are dropped. Fewer than two rows yields nothing.
pub fn project_records(rows: &[RawRow], required: RequiredKey) -> Vec<RawRecord> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let keys = header.iter().map(|h| header_key(h)).collect::<Vec<_>>();

    let mut records = Vec::with_capacity(data.len());
    for (idx, row) in data.iter().enumerate() {
        let record = keys
            .iter()
            .enumerate()
            .map(|(col, key)| {
                let value = row.get(col).map(String::as_str).unwrap_or_default();
                (key.as_str(), value)
            })
            .collect::<RawRecord>();

        if !required.is_satisfied_by(&record) {
            tracing::debug!(
                row = idx + 1,
                ?required,
                "dropping record without required key"
            );
            continue;
        }
        records.push(record);
    }
    records
}
