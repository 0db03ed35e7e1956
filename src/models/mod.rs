// src/models/mod.rs

use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Placeholder leaf returned when a per-bin view comes back empty, so the
/// chart still has something to draw.
pub const NO_SIMILAR_BINS: &str = "No similar bins.";

// ───────────────────────────────────────
// Cells: one dynamically typed SQLite value
// ───────────────────────────────────────
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// True when this cell holds the bin id `n`, whatever column affinity the
    /// store gave it.
    pub fn is_id(&self, n: i64) -> bool {
        match self {
            Cell::Integer(v) => *v == n,
            Cell::Real(v) => *v == n as f64,
            Cell::Text(s) => s.trim().parse::<i64>() == Ok(n),
            Cell::Null | Cell::Blob(_) => false,
        }
    }

    /// Text form used for CSV export. NULL is empty, REAL always keeps a
    /// decimal point.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Integer(v) => v.to_string(),
            Cell::Real(v) => format!("{v:?}"),
            Cell::Text(s) => s.clone(),
            Cell::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

// Reals compare by bit pattern with -0.0 folded into 0.0, so Eq and Hash agree.
fn real_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Real(a), Cell::Real(b)) => real_bits(*a) == real_bits(*b),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Blob(a), Cell::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Integer(v) => v.hash(state),
            Cell::Real(v) => real_bits(*v).hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Blob(b) => b.hash(state),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Integer(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Integer(v) => serializer.serialize_i64(*v),
            Cell::Real(v) => serializer.serialize_f64(*v),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Blob(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
        }
    }
}

pub type Row = Vec<Cell>;

// ───────────────────────────────────────
// Chart trees
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    pub name: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Sized { name: Cell, size: i64 },
    Feature { name: Cell, feature: Cell },
    EntityFeature { entity: Cell, feature: Cell, observed: Cell },
    Leaf { name: Cell },
}

impl Node {
    pub fn sentinel() -> Self {
        Node::Sized { name: Cell::from(NO_SIMILAR_BINS), size: 1 }
    }
}

// ───────────────────────────────────────
// Event rows (secondary store)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    pub category: Cell,
    pub date: Cell,
    pub location: Cell,
}
