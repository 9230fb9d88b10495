// this file defines the road network that vehicles drive on.  It's a wrapper around a petgraph
// graph whose node and edge indices double as the vertex ids and edge indices of the flat files.
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::graph::EdgeIndex;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::errors::{PlanError, PlanResult};


#[derive(PartialEq, Debug, Clone, Default)]
pub struct Location {
    pub name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct RoadSegment {
    pub cost: f64,
}

/// One edge of the network, as it appears in the edge file.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct EdgeRecord {
    pub index: usize,
    pub from: usize,
    pub to: usize,
    pub cost: f64,
}

/// A directed multigraph over integer vertex ids.  Vertices and edges are never removed, so
/// ids are handed out by a monotonic counter and stay stable as the network grows.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    graph: DiGraph<Location, RoadSegment>,
    num_loaded_vertices: usize,
    num_loaded_edges: usize,
    /// indices of the edges leading from a vertex into one of its copies
    copy_connectors: HashSet<usize>,
}

impl RoadNetwork {
    /// Builds the network from an edge list.  The vertex set is implicitly `0..=max endpoint`.
    pub fn from_edges(edges: &[(usize, usize, f64)]) -> RoadNetwork {
        let num_vertices = edges.iter().map(|(uu, vv, _)| uu.max(vv) + 1).max().unwrap_or(0);
        let mut graph = DiGraph::with_capacity(num_vertices, edges.len());
        for _ in 0..num_vertices {
            graph.add_node(Location::default());
        }
        for (from, to, cost) in edges {
            graph.add_edge(NodeIndex::new(*from), NodeIndex::new(*to), RoadSegment{cost: *cost});
        }

        RoadNetwork {
            graph,
            num_loaded_vertices: num_vertices,
            num_loaded_edges: edges.len(),
            copy_connectors: HashSet::new(),
        }
    }

    /// Attaches names from a mapping file.  Extra names are ignored; missing ones stay unnamed.
    pub fn set_names(&mut self, names: &[String]) {
        if names.len() < self.num_vertices() {
            log::warn!("mapping has {} names but the network has {} vertices",
                       names.len(), self.num_vertices());
        }
        for (ii, name) in names.iter().take(self.num_vertices()).enumerate() {
            self.graph[NodeIndex::new(ii)].name = Some(name.clone());
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    pub fn contains_vertex(&self, vertex: usize) -> bool {
        vertex < self.num_vertices()
    }

    pub fn check_vertex(&self, vertex: usize) -> PlanResult<()> {
        if self.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(PlanError::UnknownVertex{vertex, num_vertices: self.num_vertices()})
        }
    }

    pub fn name(&self, vertex: usize) -> Option<&str> {
        self.graph.node_weight(NodeIndex::new(vertex)).and_then(|loc| loc.name.as_deref())
    }

    pub fn edge(&self, index: usize) -> Option<EdgeRecord> {
        let ei = EdgeIndex::new(index);
        let (from, to) = self.graph.edge_endpoints(ei)?;
        Some(EdgeRecord {
            index,
            from: from.index(),
            to: to.index(),
            cost: self.graph[ei].cost,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        self.graph.edge_references().map(|er| EdgeRecord {
            index: er.id().index(),
            from: er.source().index(),
            to: er.target().index(),
            cost: er.weight().cost,
        })
    }

    /// Edges leaving `vertex`, in ascending index order.
    pub fn out_edges(&self, vertex: usize) -> Vec<EdgeRecord> {
        self.edges_directed(vertex, Direction::Outgoing)
    }

    /// Edges entering `vertex`, in ascending index order.
    pub fn in_edges(&self, vertex: usize) -> Vec<EdgeRecord> {
        self.edges_directed(vertex, Direction::Incoming)
    }

    fn edges_directed(&self, vertex: usize, dir: Direction) -> Vec<EdgeRecord> {
        if ! self.contains_vertex(vertex) {
            return vec![];
        }
        // petgraph lists the newest edge first
        let mut records: Vec<EdgeRecord> = self.graph.edges_directed(NodeIndex::new(vertex), dir)
            .map(|er| EdgeRecord {
                index: er.id().index(),
                from: er.source().index(),
                to: er.target().index(),
                cost: er.weight().cost,
            })
            .collect();
        records.sort_by_key(|er| er.index);
        records
    }

    /// The raw petgraph graph, for algorithms that want to run on it directly.
    pub fn graph(&self) -> &DiGraph<Location, RoadSegment> {
        &self.graph
    }

    pub fn add_vertex(&mut self, name: Option<String>) -> usize {
        self.graph.add_node(Location{name}).index()
    }

    pub fn add_edge(&mut self, from: usize, to: usize, cost: f64) -> usize {
        self.graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), RoadSegment{cost}).index()
    }

    /// Splits `vertex` into a fresh copy.  The copy gets every edge incident to the original
    /// (in both directions) plus a zero-cost connector each way between the two.  Returns the
    /// id of the copy.
    ///
    /// Connectors from a vertex into its own earlier copies are not roads of that vertex, so a
    /// second copy does not inherit them.  Connectors from earlier copies back into the vertex
    /// are inherited.
    pub fn clone_vertex(&mut self, vertex: usize) -> PlanResult<usize> {
        self.check_vertex(vertex)?;
        // snapshot before the new connectors exist, so they don't get copied too
        let outgoing: Vec<EdgeRecord> = self.out_edges(vertex).into_iter()
            .filter(|er| ! self.copy_connectors.contains(&er.index))
            .collect();
        let incoming = self.in_edges(vertex);

        let name = self.name(vertex).map(String::from);
        let copy = self.add_vertex(name);
        if copy == vertex {
            return Err(PlanError::DuplicateAugmentation{vertex: copy});
        }
        self.add_edge(copy, vertex, 0.);
        let connector = self.add_edge(vertex, copy, 0.);
        self.copy_connectors.insert(connector);
        for er in outgoing {
            self.add_edge(copy, er.to, er.cost);
        }
        for er in incoming {
            self.add_edge(er.from, copy, er.cost);
        }
        Ok(copy)
    }

    /// Edges added since the network was loaded, in index order.
    pub fn appended_edges(&self) -> Vec<EdgeRecord> {
        (self.num_loaded_edges..self.num_edges()).filter_map(|ii| self.edge(ii)).collect()
    }

    /// Vertices added since the network was loaded, in id order.
    pub fn appended_vertices(&self) -> std::ops::Range<usize> {
        self.num_loaded_vertices..self.num_vertices()
    }

    /// Maps each (from, to) pair to its cheapest edge, as (cost, edge index).  Ties go to the
    /// lowest index.
    pub fn canonical_edges(&self) -> HashMap<(usize, usize), (f64, usize)> {
        let mut canonical: HashMap<(usize, usize), (f64, usize)> = HashMap::new();
        for er in self.edges() {
            let candidate = (er.cost, er.index);
            canonical.entry((er.from, er.to))
                .and_modify(|best| if candidate < *best { *best = candidate; })
                .or_insert(candidate);
        }
        canonical
    }

    /// All vertices that are the endpoint of some edge, ascending.
    pub fn endpoint_vertices(&self) -> Vec<usize> {
        let endpoints: BTreeSet<usize> = self.edges().flat_map(|er| vec![er.from, er.to])
                                                     .collect();
        endpoints.into_iter().collect()
    }
}
