use petgraph::visit::{Dfs, DfsPostOrder, Reversed, VisitMap};

use super::errors::{PlanError, PlanResult};
use super::road_network::RoadNetwork;


/// Some diagnostic numbers about a reduction, for logging and for callers that care.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SccSummary {
    pub num_components: usize,
    pub largest_size: usize,
    pub kept_edges: usize,
    pub dropped_edges: usize,
}

/// Labels every vertex with its strongly-connected component, using Kosaraju's algorithm.
///
/// The first pass is a depth-first search over the whole graph that records vertices in the
/// order they finish.  The second pass walks the edge-reversed graph, starting from vertices
/// in decreasing finishing order; each search started there stays inside one component.
/// Components are numbered in the order the second pass discovers them.
///
/// Returns the per-vertex labels and the number of components.
pub fn component_labels(network: &RoadNetwork) -> (Vec<usize>, usize) {
    let graph = network.graph();
    let num_vertices = network.num_vertices();

    let mut finish_order = Vec::with_capacity(num_vertices);
    let mut dfs = DfsPostOrder::empty(graph);
    for start in graph.node_indices() {
        if dfs.discovered.is_visited(&start) {
            continue;
        }
        dfs.move_to(start);
        while let Some(node) = dfs.next(graph) {
            finish_order.push(node);
        }
    }

    let reversed = Reversed(graph);
    let mut labels = vec![usize::MAX; num_vertices];
    let mut num_components = 0;
    let mut dfs = Dfs::empty(reversed);
    for &start in finish_order.iter().rev() {
        if dfs.discovered.is_visited(&start) {
            continue;
        }
        dfs.move_to(start);
        while let Some(node) = dfs.next(reversed) {
            labels[node.index()] = num_components;
        }
        num_components += 1;
    }

    (labels, num_components)
}

/// Returns a membership flag per vertex for the component with the most vertices, and the
/// number of components.  On a tie, the component discovered first wins.
pub fn largest_component(network: &RoadNetwork) -> PlanResult<(Vec<bool>, usize)> {
    if network.is_empty() {
        return Err(PlanError::EmptyGraph);
    }
    let (labels, num_components) = component_labels(network);
    let mut sizes = vec![0; num_components];
    for label in &labels {
        sizes[*label] += 1;
    }
    let mut biggest = 0;
    for (comp, size) in sizes.iter().enumerate() {
        if *size > sizes[biggest] {
            biggest = comp;
        }
    }
    log::warn!("there are {} strongly connected components; the largest has {} vertices",
               num_components, sizes[biggest]);
    Ok((labels.iter().map(|label| *label == biggest).collect(), num_components))
}

/// Filters an edge list down to the edges with both endpoints in the largest
/// strongly-connected component.  Edge order is preserved.
pub fn keep_largest_component(edges: &[(usize, usize, f64)])
                              -> PlanResult<(Vec<(usize, usize, f64)>, SccSummary)> {
    let network = RoadNetwork::from_edges(edges);
    let (members, num_components) = largest_component(&network)?;
    let kept: Vec<(usize, usize, f64)> = edges.iter()
        .filter(|(from, to, _)| members[*from] && members[*to])
        .cloned()
        .collect();

    let summary = SccSummary {
        num_components,
        largest_size: members.iter().filter(|mm| **mm).count(),
        kept_edges: kept.len(),
        dropped_edges: edges.len() - kept.len(),
    };
    log::info!("kept {} edges, dropped {}", summary.kept_edges, summary.dropped_edges);
    Ok((kept, summary))
}
