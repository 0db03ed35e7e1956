// src/tree/mod.rs
//
// Flat rows in, chart tree out. Nothing here touches the store.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Cell, Node, Row, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// (binID, count) per bin.
    BinCounts,
    /// (binID, count) for bins sharing an entity with `bin`.
    SimilarBins { bin: i64 },
    /// (binID, feature, ..) verbatim.
    BinFeatures,
    /// (entityID, feature, _, observed, ..) verbatim.
    EntityFeatures,
    /// (entID) for members of `bin`.
    BinEntities { bin: i64 },
}

impl Shape {
    pub fn root_name(&self) -> String {
        match self {
            Shape::BinCounts => "BinEnt".to_string(),
            Shape::BinFeatures => "BinFeat".to_string(),
            Shape::EntityFeatures => "EntFeat".to_string(),
            Shape::SimilarBins { bin } | Shape::BinEntities { bin } => format!("Bin{bin}"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("row {row} has {found} columns, {shape:?} needs at least {needed}")]
    TooFewColumns { row: usize, found: usize, needed: usize, shape: Shape },

    #[error("row {row}: count column is not an integer ({value:?})")]
    BadCount { row: usize, value: Cell },
}

pub fn build(shape: Shape, rows: Vec<Row>) -> Result<Tree, ShapeError> {
    let mut children = Vec::with_capacity(rows.len());
    let mut seen = HashSet::new();

    for (idx, row) in rows.into_iter().enumerate() {
        match shape {
            Shape::BinCounts => children.push(sized(shape, idx, row)?),
            Shape::SimilarBins { bin } => {
                let node = sized(shape, idx, row)?;
                if !matches!(&node, Node::Sized { name, .. } if name.is_id(bin)) {
                    children.push(node);
                }
            }
            Shape::BinFeatures => {
                let [name, feature] = take(shape, idx, row, [0, 1])?;
                children.push(Node::Feature { name, feature });
            }
            Shape::EntityFeatures => {
                let [entity, feature, observed] = take(shape, idx, row, [0, 1, 3])?;
                children.push(Node::EntityFeature { entity, feature, observed });
            }
            Shape::BinEntities { .. } => {
                let [name] = take(shape, idx, row, [0])?;
                if seen.insert(name.clone()) {
                    children.push(Node::Leaf { name });
                }
            }
        }
    }

    let wants_sentinel = matches!(shape, Shape::SimilarBins { .. } | Shape::BinEntities { .. });
    if wants_sentinel && children.is_empty() {
        children.push(Node::sentinel());
    }

    Ok(Tree { name: shape.root_name(), children })
}

fn sized(shape: Shape, idx: usize, row: Row) -> Result<Node, ShapeError> {
    let [name, count] = take(shape, idx, row, [0, 1])?;
    let size = count.as_i64().ok_or(ShapeError::BadCount { row: idx, value: count })?;
    Ok(Node::Sized { name, size })
}

/// Pull the cells at `cols` out of `row`, in that order.
fn take<const N: usize>(shape: Shape, idx: usize, mut row: Row, cols: [usize; N]) -> Result<[Cell; N], ShapeError> {
    let needed = cols.iter().max().map_or(0, |m| m + 1);
    if row.len() < needed {
        return Err(ShapeError::TooFewColumns { row: idx, found: row.len(), needed, shape });
    }
    Ok(cols.map(|c| std::mem::replace(&mut row[c], Cell::Null)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int(v: i64) -> Cell {
        Cell::Integer(v)
    }

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    #[test]
    fn bin_counts_keep_store_order_and_total() {
        let tree = build(
            Shape::BinCounts,
            vec![vec![int(3), int(4)], vec![int(1), int(2)], vec![int(2), int(1)]],
        )
        .unwrap();

        assert_eq!(tree.name, "BinEnt");
        let total: i64 = tree
            .children
            .iter()
            .map(|n| match n {
                Node::Sized { size, .. } => *size,
                other => panic!("unexpected node {other:?}"),
            })
            .sum();
        assert_eq!(total, 7);
        assert_eq!(
            serde_json::to_value(&tree).unwrap()["children"][0],
            json!({"name": 3, "size": 4})
        );
    }

    #[test]
    fn similar_bins_drop_the_bin_itself() {
        let tree = build(
            Shape::SimilarBins { bin: 1 },
            vec![vec![int(1), int(2)], vec![int(2), int(1)]],
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"name": "Bin1", "children": [{"name": 2, "size": 1}]})
        );
    }

    #[test]
    fn similar_bins_with_only_self_yield_sentinel() {
        let tree = build(Shape::SimilarBins { bin: 9 }, vec![vec![int(9), int(3)]]).unwrap();
        assert_eq!(tree.children, vec![Node::sentinel()]);
    }

    #[test]
    fn bin_entities_are_distinct_in_first_seen_order() {
        let tree = build(
            Shape::BinEntities { bin: 4 },
            vec![vec![text("e2")], vec![text("e1")], vec![text("e2")]],
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"name": "Bin4", "children": [{"name": "e2"}, {"name": "e1"}]})
        );
    }

    #[test]
    fn signed_zero_entities_count_once() {
        let tree = build(
            Shape::BinEntities { bin: 1 },
            vec![vec![Cell::Real(0.0)], vec![Cell::Real(-0.0)]],
        )
        .unwrap();
        assert_eq!(tree.children, vec![Node::Leaf { name: Cell::Real(0.0) }]);
    }

    #[test]
    fn empty_bin_entities_yield_sentinel() {
        let tree = build(Shape::BinEntities { bin: 4 }, Vec::new()).unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"name": "Bin4", "children": [{"name": "No similar bins.", "size": 1}]})
        );
    }

    #[test]
    fn empty_bin_counts_stay_empty() {
        let tree = build(Shape::BinCounts, Vec::new()).unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn entity_features_read_observed_from_fourth_column() {
        let tree = build(
            Shape::EntityFeatures,
            vec![vec![text("e1"), text("colour"), text("ignored"), int(1), text("extra")]],
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"name": "EntFeat", "children": [{"entity": "e1", "feature": "colour", "observed": 1}]})
        );
    }

    #[test]
    fn bin_features_pass_rows_through() {
        let tree = build(Shape::BinFeatures, vec![vec![int(5), text("tall")]]).unwrap();
        assert_eq!(tree.name, "BinFeat");
        assert_eq!(tree.children, vec![Node::Feature { name: int(5), feature: text("tall") }]);
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = build(Shape::EntityFeatures, vec![vec![text("e1"), text("f")]]).unwrap_err();
        assert!(matches!(err, ShapeError::TooFewColumns { row: 0, found: 2, needed: 4, .. }));
    }

    #[test]
    fn non_integer_counts_are_rejected() {
        let err = build(Shape::BinCounts, vec![vec![int(1), text("many")]]).unwrap_err();
        assert_eq!(err, ShapeError::BadCount { row: 0, value: text("many") });
    }
}
