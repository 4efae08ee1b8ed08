//! Edges and the OSM ways they were sectioned from.

use std::collections::HashSet;
use std::hash::Hash;

use geom::{GPSBounds, PolyLine};

use crate::BfsWalker;

/// One directed, sectioned piece of an OSM way. Two-way roads show up as a main edge plus a
/// reversed copy.
pub trait Edge: Clone + Eq + Hash {
    fn id(&self) -> i64;
    fn osm_id(&self) -> i64;
    fn is_main_edge(&self) -> bool;
    fn out_edges(&self) -> Vec<Self>;
    fn in_edges(&self) -> Vec<Self>;
    fn polyline(&self) -> PolyLine;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    Node,
    Edge,
    Area,
    Line,
    Point,
    Relation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl ItemType {
    /// What kind of OSM element this item came from.
    pub fn osm_type(self) -> OsmType {
        match self {
            ItemType::Node | ItemType::Point => OsmType::Node,
            ItemType::Edge | ItemType::Area | ItemType::Line => OsmType::Way,
            ItemType::Relation => OsmType::Relation,
        }
    }
}

/// Main edges connected to this one that belong to the same OSM way.
pub fn same_osm_way<E: Edge>(edge: &E, queued: &HashSet<E>) -> HashSet<E> {
    edge.out_edges()
        .into_iter()
        .chain(edge.in_edges())
        .filter(|e| e.is_main_edge() && e.osm_id() == edge.osm_id() && !queued.contains(e))
        .collect()
}

/// Builds a collector following out-edges that reach into some area.
pub fn within_bounds<E: Edge>(bounds: GPSBounds) -> impl Fn(&E, &HashSet<E>) -> HashSet<E> {
    move |edge: &E, queued: &HashSet<E>| {
        edge.out_edges()
            .into_iter()
            .filter(|e| !queued.contains(e) && e.polyline().get_bounds().intersects(&bounds))
            .collect()
    }
}

/// Every main edge leading into or out of this one.
pub fn connected_main_edges<E: Edge>(edge: &E, queued: &HashSet<E>) -> HashSet<E> {
    edge.out_edges()
        .into_iter()
        .chain(edge.in_edges())
        .filter(|e| e.is_main_edge() && !queued.contains(e))
        .collect()
}

/// Does following the same OSM way forwards lead back to an edge already seen?
pub fn is_closed_way<E: Edge>(edge: &E) -> bool {
    let mut seen = HashSet::new();
    let mut current = edge.clone();
    loop {
        seen.insert(current.id());
        let next = current
            .out_edges()
            .into_iter()
            .find(|e| e.is_main_edge() && e.osm_id() == edge.osm_id());
        match next {
            Some(e) => {
                if seen.contains(&e.id()) {
                    return true;
                }
                current = e;
            }
            None => {
                return false;
            }
        }
    }
}

/// All main edges sectioned from the same OSM way, sorted by id.
pub fn osm_way_edges<E: Edge>(edge: &E) -> Vec<E> {
    let walker = BfsWalker::new(same_osm_way);
    let mut edges: Vec<E> = walker.collect(edge.clone()).into_iter().collect();
    edges.sort_by_key(|e| e.id());
    edges
}

/// Glues the sections of the OSM way back together. If the way is reversed, so is the result.
/// None if the sections don't line up end-to-end.
pub fn original_osm_way_geometry<E: Edge>(edge: &E, reversed: bool) -> Option<PolyLine> {
    let mut sections = osm_way_edges(edge).into_iter();
    let mut geometry = sections.next()?.polyline();
    for section in sections {
        match geometry.extend(&section.polyline()) {
            Ok(pl) => {
                geometry = pl;
            }
            Err(err) => {
                warn!(
                    "Unable to build geometry for edge {}({}): {}",
                    edge.id(),
                    edge.osm_id(),
                    err
                );
                return None;
            }
        }
    }
    if reversed {
        geometry = geometry.reversed();
    }
    Some(geometry)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use geom::LonLat;

    use super::*;

    /// A tiny in-memory edge graph. Edges connect when one ends where another starts.
    pub struct TestGraph {
        edges: BTreeMap<i64, (i64, PolyLine)>,
    }

    #[derive(Clone)]
    pub struct TestEdge {
        id: i64,
        graph: Rc<TestGraph>,
    }

    impl PartialEq for TestEdge {
        fn eq(&self, other: &TestEdge) -> bool {
            self.id == other.id
        }
    }
    impl Eq for TestEdge {}
    impl Hash for TestEdge {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl TestGraph {
        /// (edge id, OSM way id, points in degrees). Negative ids are reversed copies.
        pub fn new(edges: Vec<(i64, i64, Vec<(f64, f64)>)>) -> Rc<TestGraph> {
            Rc::new(TestGraph {
                edges: edges
                    .into_iter()
                    .map(|(id, osm, pts)| (id, (osm, PolyLine::from_degrees(&pts).unwrap())))
                    .collect(),
            })
        }

        pub fn edge(graph: &Rc<TestGraph>, id: i64) -> TestEdge {
            assert!(graph.edges.contains_key(&id));
            TestEdge {
                id,
                graph: graph.clone(),
            }
        }

        fn matching(graph: &Rc<TestGraph>, pred: impl Fn(&PolyLine) -> bool) -> Vec<TestEdge> {
            graph
                .edges
                .iter()
                .filter(|(_, (_, pl))| pred(pl))
                .map(|(id, _)| TestGraph::edge(graph, *id))
                .collect()
        }
    }

    impl Edge for TestEdge {
        fn id(&self) -> i64 {
            self.id
        }
        fn osm_id(&self) -> i64 {
            self.graph.edges[&self.id].0
        }
        fn is_main_edge(&self) -> bool {
            self.id > 0
        }
        fn out_edges(&self) -> Vec<TestEdge> {
            let end: LonLat = self.polyline().last_pt();
            TestGraph::matching(&self.graph, |pl| pl.first_pt() == end)
                .into_iter()
                .filter(|e| e.id != -self.id)
                .collect()
        }
        fn in_edges(&self) -> Vec<TestEdge> {
            let start = self.polyline().first_pt();
            TestGraph::matching(&self.graph, |pl| pl.last_pt() == start)
                .into_iter()
                .filter(|e| e.id != -self.id)
                .collect()
        }
        fn polyline(&self) -> PolyLine {
            self.graph.edges[&self.id].1.clone()
        }
    }

    fn two_ways() -> Rc<TestGraph> {
        TestGraph::new(vec![
            // Way 100, sectioned in three, two-way
            (1, 100, vec![(0.0, 0.0), (1.0, 0.0)]),
            (2, 100, vec![(1.0, 0.0), (2.0, 0.0)]),
            (3, 100, vec![(2.0, 0.0), (3.0, 0.0)]),
            (-1, 100, vec![(1.0, 0.0), (0.0, 0.0)]),
            (-2, 100, vec![(2.0, 0.0), (1.0, 0.0)]),
            // Way 200 continues from the end of 100
            (4, 200, vec![(3.0, 0.0), (3.0, 1.0)]),
        ])
    }

    fn roundabout() -> Rc<TestGraph> {
        TestGraph::new(vec![
            (10, 300, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            (11, 300, vec![(1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
        ])
    }

    #[test]
    fn item_types() {
        assert_eq!(ItemType::Edge.osm_type(), OsmType::Way);
        assert_eq!(ItemType::Point.osm_type(), OsmType::Node);
        assert_eq!(ItemType::Relation.osm_type(), OsmType::Relation);
    }

    #[test]
    fn sections_of_one_way() {
        let g = two_ways();
        let ids: Vec<i64> = osm_way_edges(&TestGraph::edge(&g, 2))
            .into_iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let pl = original_osm_way_geometry(&TestGraph::edge(&g, 3), false).unwrap();
        assert_eq!(pl.points().len(), 4);
        assert_eq!(pl.first_pt(), LonLat::new(0.0, 0.0));
        let reversed = original_osm_way_geometry(&TestGraph::edge(&g, 3), true).unwrap();
        assert_eq!(reversed.first_pt(), LonLat::new(3.0, 0.0));
    }

    #[test]
    fn closed_ways() {
        assert!(!is_closed_way(&TestGraph::edge(&two_ways(), 1)));
        assert!(is_closed_way(&TestGraph::edge(&roundabout(), 11)));
    }

    #[test]
    fn walking_within_bounds() {
        let g = two_ways();
        let bounds = GPSBounds::from_corners(LonLat::new(0.0, -0.5), LonLat::new(2.5, 0.5));
        let walker = BfsWalker::new(within_bounds(bounds));
        let ids: HashSet<i64> = walker
            .collect(TestGraph::edge(&g, 1))
            .into_iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec![1, 2, 3].into_iter().collect());

        let everything = BfsWalker::new(connected_main_edges).collect(TestGraph::edge(&g, 2));
        assert_eq!(everything.len(), 4);
    }

    #[test]
    fn reversed_copies_are_walked_through_but_not_kept() {
        // A side street leaves from the start of way 100. Against the direction of way 100, it's
        // only reachable through the reversed copies.
        let g = TestGraph::new(vec![
            (1, 100, vec![(0.0, 0.0), (1.0, 0.0)]),
            (2, 100, vec![(1.0, 0.0), (2.0, 0.0)]),
            (-1, 100, vec![(1.0, 0.0), (0.0, 0.0)]),
            (-2, 100, vec![(2.0, 0.0), (1.0, 0.0)]),
            (5, 500, vec![(0.0, 0.0), (0.0, -0.2)]),
        ]);
        let bounds = GPSBounds::from_corners(LonLat::new(-0.5, -0.5), LonLat::new(2.5, 0.5));

        let all: HashSet<i64> = BfsWalker::new(within_bounds(bounds))
            .collect(TestGraph::edge(&g, -2))
            .into_iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(all, vec![-2, -1, 5].into_iter().collect());

        let main_only = BfsWalker::with_decider(within_bounds(bounds), |e: &TestEdge| {
            e.is_main_edge()
        });
        let kept: Vec<i64> = main_only
            .collect(TestGraph::edge(&g, -2))
            .into_iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(kept, vec![5]);
    }
}
