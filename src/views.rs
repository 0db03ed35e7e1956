// src/views.rs
//
// Every read endpoint is one row of this table: which store, which SQL, and
// how the rows are shaped. Placeholders are always bound, never formatted in.

use crate::db::StoreKind;
use crate::tree::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    AllBins,
    SimilarBins,
    BinFeatures,
    EntityFeatures,
    BinEntities,
    Events,
    RawData,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewQuery {
    pub store: StoreKind,
    pub sql: &'static str,
    /// Whether the path id is bound to `?1`.
    pub binds_id: bool,
}

impl View {
    pub fn query(self) -> ViewQuery {
        let (store, sql, binds_id) = match self {
            View::AllBins => (
                StoreKind::Tree,
                "SELECT binID, count(*) FROM BinEnt GROUP BY binID",
                false,
            ),
            View::SimilarBins => (
                StoreKind::Tree,
                "SELECT binID, count(*) FROM BinEnt \
                 WHERE entID IN (SELECT entID FROM BinEnt WHERE binID = ?1) \
                 GROUP BY binID",
                true,
            ),
            // the path id is validated but does not filter
            View::BinFeatures => (StoreKind::Tree, "SELECT * FROM BinFeat", false),
            View::EntityFeatures => (StoreKind::Tree, "SELECT * FROM EntFeat", false),
            View::BinEntities => (
                StoreKind::Tree,
                "SELECT entID FROM BinEnt WHERE binID = ?1",
                true,
            ),
            View::Events => (
                StoreKind::Events,
                "SELECT Category, Date, Location FROM NPSData2",
                false,
            ),
            View::RawData => (StoreKind::Raw, "SELECT * FROM data", false),
        };
        ViewQuery { store, sql, binds_id }
    }

    /// The view a tree shape is read from, plus the id it binds.
    pub fn for_shape(shape: Shape) -> (View, Option<i64>) {
        match shape {
            Shape::BinCounts => (View::AllBins, None),
            Shape::SimilarBins { bin } => (View::SimilarBins, Some(bin)),
            Shape::BinFeatures => (View::BinFeatures, None),
            Shape::EntityFeatures => (View::EntityFeatures, None),
            Shape::BinEntities { bin } => (View::BinEntities, Some(bin)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [View; 7] = [
        View::AllBins,
        View::SimilarBins,
        View::BinFeatures,
        View::EntityFeatures,
        View::BinEntities,
        View::Events,
        View::RawData,
    ];

    #[test]
    fn placeholders_match_binding() {
        for view in ALL {
            let q = view.query();
            assert_eq!(q.sql.contains("?1"), q.binds_id, "{view:?}");
        }
    }

    #[test]
    fn per_bin_shapes_bind_their_id() {
        for (shape, view) in [
            (Shape::SimilarBins { bin: 3 }, View::SimilarBins),
            (Shape::BinEntities { bin: 8 }, View::BinEntities),
        ] {
            let (found, id) = View::for_shape(shape);
            assert_eq!(found, view);
            assert!(found.query().binds_id);
            assert!(id.is_some());
        }
    }

    #[test]
    fn whole_table_shapes_bind_nothing() {
        for shape in [Shape::BinCounts, Shape::BinFeatures, Shape::EntityFeatures] {
            let (view, id) = View::for_shape(shape);
            assert_eq!(id, None);
            assert!(!view.query().binds_id, "{view:?}");
        }
    }

    #[test]
    fn flat_views_use_their_own_stores() {
        assert_eq!(View::Events.query().store, StoreKind::Events);
        assert_eq!(View::RawData.query().store, StoreKind::Raw);
        assert_eq!(View::AllBins.query().store, StoreKind::Tree);
    }
}
