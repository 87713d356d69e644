//! Chart display mode enums shared by the state layer and the renderers.

use serde::{Deserialize, Serialize};

/// Geometry used to draw each plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    #[default]
    Line,
    Bar,
}

impl GraphKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Line => "Courbe",
            Self::Bar => "Barres",
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Line, Self::Bar]
    }
}

/// Which leaf field of a series cell is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    #[default]
    Value,
    Share,
}

impl Representation {
    /// Leaf field name inside a series cell.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Share => "share",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Value => "Valeur",
            Self::Share => "Part",
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Value, Self::Share]
    }
}
