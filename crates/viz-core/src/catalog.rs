//! Dimension catalog: the caller-supplied schema of selectable series
//!
//! The pipeline's correctness depends entirely on this contract, so the
//! catalog is a closed, validated registry rather than loosely-typed
//! objects: reduction is a [`Reducer`] capability with an explicit
//! accumulator, and computed series are [`VirtualRule`] capabilities with an
//! ordered dependency list.

use crate::value::{KeyPath, PathError, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// VALUE KINDS
// ============================================================================

/// Display type of a dimension's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Currency,
    Percent,
    Integer,
    #[default]
    Decimal,
}

// ============================================================================
// REDUCER CAPABILITY
// ============================================================================

/// Explicit fold accumulator. `count` lets averaging reducers finish without
/// carrying ad-hoc state objects through the fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accum {
    pub value: f64,
    pub count: u64,
}

/// Strategy trait for collapsing a period's samples into one value.
///
/// Folding starts from `None`; an empty sequence therefore reduces to a null
/// value rather than a fabricated zero.
pub trait Reducer: Send + Sync {
    fn step(&self, acc: Option<Accum>, value: f64) -> Accum;

    /// Collapses the accumulator to the reported value.
    fn finish(&self, acc: Accum) -> f64 {
        acc.value
    }
}

/// Folds `values` with `reducer`, `None` when the sequence is empty.
pub fn fold_values<I>(reducer: &dyn Reducer, values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = None;
    for value in values {
        acc = Some(reducer.step(acc, value));
    }
    acc.map(|a| reducer.finish(a))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Reducer for Sum {
    fn step(&self, acc: Option<Accum>, value: f64) -> Accum {
        match acc {
            Some(a) => Accum {
                value: a.value + value,
                count: a.count + 1,
            },
            None => Accum { value, count: 1 },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Average;

impl Reducer for Average {
    fn step(&self, acc: Option<Accum>, value: f64) -> Accum {
        match acc {
            Some(a) => Accum {
                value: a.value + value,
                count: a.count + 1,
            },
            None => Accum { value, count: 1 },
        }
    }

    fn finish(&self, acc: Accum) -> f64 {
        acc.value / acc.count as f64
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Reducer for Min {
    fn step(&self, acc: Option<Accum>, value: f64) -> Accum {
        match acc {
            Some(a) => Accum {
                value: a.value.min(value),
                count: a.count + 1,
            },
            None => Accum { value, count: 1 },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Reducer for Max {
    fn step(&self, acc: Option<Accum>, value: f64) -> Accum {
        match acc {
            Some(a) => Accum {
                value: a.value.max(value),
                count: a.count + 1,
            },
            None => Accum { value, count: 1 },
        }
    }
}

/// Keeps the most recent sample (useful for gauge-style series).
#[derive(Debug, Clone, Copy, Default)]
pub struct Last;

impl Reducer for Last {
    fn step(&self, acc: Option<Accum>, value: f64) -> Accum {
        Accum {
            value,
            count: acc.map_or(1, |a| a.count + 1),
        }
    }
}

// ============================================================================
// VIRTUAL DIMENSIONS
// ============================================================================

/// Computed series: an ordered dependency list plus a pure mapping function
/// applied to the real-valued record. Cyclic rules are the caller's
/// responsibility; [`Catalog::validate`] rejects unknown or virtual
/// dependencies.
#[derive(Clone)]
pub struct VirtualRule {
    depends_on: Vec<String>,
    apply: Arc<dyn Fn(&Value) -> f64 + Send + Sync>,
}

impl VirtualRule {
    pub fn new<I, K, F>(depends_on: I, apply: F) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        F: Fn(&Value) -> f64 + Send + Sync + 'static,
    {
        Self {
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            apply: Arc::new(apply),
        }
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn apply(&self, record: &Value) -> f64 {
        (self.apply)(record)
    }
}

impl std::fmt::Debug for VirtualRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualRule")
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// DIMENSIONS
// ============================================================================

/// Category grouping for selector widgets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub key: String,
    pub label: String,
    /// Column label within the group (one column per slot in the grouped
    /// selector table).
    pub slot: String,
    pub depth: u8,
}

impl Group {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        slot: impl Into<String>,
        depth: u8,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            slot: slot.into(),
            depth,
        }
    }
}

/// One selectable series.
#[derive(Clone)]
pub struct Dimension {
    pub key: String,
    pub title: String,
    pub kind: ValueKind,
    pub group: Group,
    pub reducer: Arc<dyn Reducer>,
    pub alt_reducer: Option<Arc<dyn Reducer>>,
    pub rule: Option<VirtualRule>,
}

impl Dimension {
    /// New dimension with the default kind (decimal) and a `Sum` reducer.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            kind: ValueKind::default(),
            group: Group::default(),
            reducer: Arc::new(Sum),
            alt_reducer: None,
            rule: None,
        }
    }

    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    pub fn reducer<R: Reducer + 'static>(mut self, reducer: R) -> Self {
        self.reducer = Arc::new(reducer);
        self
    }

    pub fn alt_reducer<R: Reducer + 'static>(mut self, reducer: R) -> Self {
        self.alt_reducer = Some(Arc::new(reducer));
        self
    }

    pub fn virtual_rule(mut self, rule: VirtualRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn is_virtual(&self) -> bool {
        self.rule.is_some()
    }
}

impl std::fmt::Debug for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dimension")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("group", &self.group)
            .field("virtual", &self.is_virtual())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Catalog contract violation, detected by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate dimension key {0:?}")]
    DuplicateKey(String),
    #[error("dimension {key:?} has an invalid key path")]
    InvalidKey {
        key: String,
        #[source]
        source: PathError,
    },
    #[error("virtual dimension {key:?} depends on unknown dimension {dependency:?}")]
    UnknownDependency { key: String, dependency: String },
    #[error("virtual dimension {key:?} depends on virtual dimension {dependency:?}")]
    VirtualDependency { key: String, dependency: String },
}

/// Insertion-ordered dimension registry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    dimensions: Vec<Dimension>,
    by_key: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions<I>(dimensions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Dimension>,
    {
        let mut catalog = Self::new();
        for dimension in dimensions {
            catalog.insert(dimension)?;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn insert(&mut self, dimension: Dimension) -> Result<(), CatalogError> {
        if self.by_key.contains_key(&dimension.key) {
            return Err(CatalogError::DuplicateKey(dimension.key.clone()));
        }
        self.by_key
            .insert(dimension.key.clone(), self.dimensions.len());
        self.dimensions.push(dimension);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Dimension> {
        self.by_key.get(key).map(|&i| &self.dimensions[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.key.as_str())
    }

    /// Replaces virtual keys by their real dependencies so the data source is
    /// only ever asked for real series. First-seen order, deduplicated.
    pub fn expand_keys(&self, selection: &[String]) -> Vec<String> {
        let mut expanded = Vec::new();
        let mut push = |key: &str| {
            if !expanded.iter().any(|k: &String| k == key) {
                expanded.push(key.to_string());
            }
        };
        for key in selection {
            match self.get(key).and_then(|d| d.rule.as_ref()) {
                Some(rule) => {
                    for dependency in rule.depends_on() {
                        push(dependency);
                    }
                }
                None => push(key),
            }
        }
        expanded
    }

    /// Static contract check: well-formed key paths and rule dependencies
    /// that exist and are themselves real.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for dimension in &self.dimensions {
            KeyPath::parse(&dimension.key).map_err(|source| CatalogError::InvalidKey {
                key: dimension.key.clone(),
                source,
            })?;
            if let Some(rule) = &dimension.rule {
                for dependency in rule.depends_on() {
                    match self.get(dependency) {
                        None => {
                            return Err(CatalogError::UnknownDependency {
                                key: dimension.key.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                        Some(dep) if dep.is_virtual() => {
                            return Err(CatalogError::VirtualDependency {
                                key: dimension.key.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        Ok(())
    }
}
