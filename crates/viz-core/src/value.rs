//! Nested value trees and dot/bracket key paths
//!
//! Statistics payloads address their leaves with paths like `"a.b[2].c"`.
//! Resolution is total: a missing intermediate or leaf yields zero so that
//! aggregate sums over sparse data never fail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A node of a statistics record.
///
/// `Cell` is only produced by the transformation pipeline when a raw leaf is
/// replaced by its value together with its share of the selection total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Cell { value: f64, share: Option<f64> },
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Empty map node.
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Numeric reading of a terminal node. `Cell` reads as its `value`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Cell { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Inserts `value` at the nested location described by `path`, creating
    /// intermediate maps as needed. Segments are taken literally (no bracket
    /// interpretation): dot segments become nested map levels and the
    /// innermost segment holds the leaf. An existing node at the terminal
    /// segment is replaced; sibling keys are untouched.
    pub fn insert_at(&mut self, path: &KeyPath, value: Value) {
        let mut node = self;
        let (last, inner) = match path.segments.split_last() {
            Some(split) => split,
            None => return,
        };
        for segment in inner {
            let map = match node {
                Value::Map(map) => map,
                other => {
                    *other = Value::map();
                    match other {
                        Value::Map(map) => map,
                        _ => unreachable!(),
                    }
                }
            };
            node = map
                .entry(segment.raw.clone())
                .or_insert_with(Value::map);
        }
        match node {
            Value::Map(map) => {
                map.insert(last.raw.clone(), value);
            }
            other => {
                let mut map = BTreeMap::new();
                map.insert(last.raw.clone(), value);
                *other = Value::Map(map);
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::map()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Malformed key path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty key path")]
    Empty,
    #[error("empty segment in key path {0:?}")]
    EmptySegment(String),
    #[error("invalid index in segment {0:?}")]
    BadIndex(String),
}

/// One dot-separated segment; `name[idx]` denotes indexed access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment text as written, brackets included.
    pub raw: String,
    pub name: String,
    pub index: Option<usize>,
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::EmptySegment(raw.to_string()));
        }
        if raw.ends_with(']') {
            let open = raw
                .find('[')
                .ok_or_else(|| PathError::BadIndex(raw.to_string()))?;
            let index = raw[open + 1..raw.len() - 1]
                .parse::<usize>()
                .map_err(|_| PathError::BadIndex(raw.to_string()))?;
            Ok(Self {
                raw: raw.to_string(),
                name: raw[..open].to_string(),
                index: Some(index),
            })
        } else {
            Ok(Self {
                raw: raw.to_string(),
                name: raw.to_string(),
                index: None,
            })
        }
    }
}

/// Parsed dot/bracket path into a [`Value`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = path
            .split('.')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walks the tree left to right. Any miss (absent key, index out of
    /// bounds, non-numeric terminal) resolves to `0.0`.
    pub fn resolve(&self, root: &Value) -> f64 {
        self.walk(root).and_then(Value::as_number).unwrap_or(0.0)
    }

    /// Terminal `Cell` contents, when the path lands on one.
    pub fn resolve_cell(&self, root: &Value) -> Option<(f64, Option<f64>)> {
        match self.walk(root) {
            Some(Value::Cell { value, share }) => Some((*value, *share)),
            _ => None,
        }
    }

    fn walk<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut node = root;
        for segment in &self.segments {
            let named = match node {
                Value::Map(map) => map.get(&segment.name)?,
                _ => return None,
            };
            node = match segment.index {
                Some(idx) => match named {
                    Value::List(items) => items.get(idx)?,
                    _ => return None,
                },
                None => named,
            };
        }
        Some(node)
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.raw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_resolve_indexed_path() {
        let root = Value::from_entries([(
            "a",
            Value::from_entries([(
                "b",
                Value::List(vec![Value::from_entries([("c", leaf(5.0))])]),
            )]),
        )]);
        let path = KeyPath::parse("a.b[0].c").unwrap();
        assert_eq!(path.resolve(&root), 5.0);
    }

    #[test]
    fn test_resolve_missing_defaults_to_zero() {
        let root = Value::map();
        let path = KeyPath::parse("x.y").unwrap();
        assert_eq!(path.resolve(&root), 0.0);
    }

    #[test]
    fn test_resolve_out_of_bounds_index() {
        let root = Value::from_entries([("a", Value::List(vec![leaf(1.0)]))]);
        assert_eq!(KeyPath::parse("a[4]").unwrap().resolve(&root), 0.0);
        assert_eq!(KeyPath::parse("a[0]").unwrap().resolve(&root), 1.0);
    }

    #[test]
    fn test_resolve_cell_reads_value() {
        let root = Value::from_entries([(
            "sales",
            Value::Cell {
                value: 30.0,
                share: Some(0.3),
            },
        )]);
        let path = KeyPath::parse("sales").unwrap();
        assert_eq!(path.resolve(&root), 30.0);
        assert_eq!(path.resolve_cell(&root), Some((30.0, Some(0.3))));
    }

    #[test]
    fn test_insert_creates_intermediate_maps() {
        let mut root = Value::from_entries([("kept", leaf(1.0))]);
        let path = KeyPath::parse("margin.net").unwrap();
        root.insert_at(&path, leaf(40.0));

        assert_eq!(KeyPath::parse("margin.net").unwrap().resolve(&root), 40.0);
        assert_eq!(KeyPath::parse("kept").unwrap().resolve(&root), 1.0);
    }

    #[test]
    fn test_insert_overrides_only_its_own_key() {
        let mut root = Value::from_entries([(
            "group",
            Value::from_entries([("a", leaf(1.0)), ("b", leaf(2.0))]),
        )]);
        root.insert_at(&KeyPath::parse("group.a").unwrap(), leaf(9.0));

        assert_eq!(KeyPath::parse("group.a").unwrap().resolve(&root), 9.0);
        assert_eq!(KeyPath::parse("group.b").unwrap().resolve(&root), 2.0);
    }

    #[test]
    fn test_parse_rejects_malformed_index() {
        assert!(KeyPath::parse("a[x]").is_err());
        assert!(KeyPath::parse("").is_err());
        assert!(KeyPath::parse("a..b").is_err());
    }
}
