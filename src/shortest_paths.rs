use std::collections::BinaryHeap;
use std::collections::HashMap;
use std::cmp::Ordering;

use rayon::prelude::*;

use super::errors::{PlanError, PlanResult};
use super::road_network::RoadNetwork;


/// The result of one single-source Dijkstra run: a distance and a predecessor (vertex, edge
/// index) for every vertex the network had when the run happened.
#[derive(PartialEq, Debug, Clone)]
pub struct ShortestPathTree {
    origin: usize,
    dists: Vec<f64>,
    parents: Vec<Option<(usize, usize)>>,
}

impl ShortestPathTree {
    /// Runs Dijkstra from `origin` over the first `num_vertices` vertices of `network`.  Edges
    /// leading outside that range are ignored.  Edge costs must be non-negative.
    ///
    /// Among equally short paths, the one found by relaxing edges in index order and settling
    /// the lower vertex id first is kept.  An origin outside the range reaches nothing.
    pub fn compute(network: &RoadNetwork, origin: usize, num_vertices: usize)
                   -> ShortestPathTree {
        let mut dists = vec![f64::INFINITY; num_vertices];
        let mut parents = vec![None; num_vertices];
        if origin >= num_vertices {
            return ShortestPathTree{origin, dists, parents};
        }
        let mut visit_next = BinaryHeap::new();
        dists[origin] = 0.;
        visit_next.push(MinScored(0., origin));

        while let Some(MinScored(node_score, node)) = visit_next.pop() {
            if node_score != dists[node] {
                // a better entry for this node was already popped
                continue;
            }
            for edge in network.out_edges(node) {
                if edge.to >= num_vertices {
                    continue;
                }
                let next_score = node_score + edge.cost;
                if next_score < dists[edge.to] {
                    dists[edge.to] = next_score;
                    parents[edge.to] = Some((node, edge.index));
                    visit_next.push(MinScored(next_score, edge.to));
                }
            }
        }

        ShortestPathTree{origin, dists, parents}
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Infinite if `destination` is unreachable or unknown to this tree.
    pub fn dist(&self, destination: usize) -> f64 {
        self.dists.get(destination).cloned().unwrap_or(f64::INFINITY)
    }

    pub fn parent(&self, vertex: usize) -> Option<(usize, usize)> {
        self.parents.get(vertex).cloned().flatten()
    }

    /// The edge indices of the shortest path from the origin to `destination`, in travel order.
    pub fn path_edges(&self, destination: usize) -> PlanResult<Vec<usize>> {
        let mut edge_idxs = vec![];
        let mut cur_vertex = destination;
        while cur_vertex != self.origin {
            match self.parent(cur_vertex) {
                Some((prev, edge_idx)) => {
                    edge_idxs.push(edge_idx);
                    cur_vertex = prev;
                }
                None => return Err(PlanError::MissingPredecessor {
                    origin: self.origin,
                    vertex: cur_vertex,
                }),
            }
        }
        edge_idxs.reverse();
        Ok(edge_idxs)
    }
}

/// Memoizes shortest-path trees by origin for the length of one planning run.  Each origin is
/// computed at most once; entries are never evicted or recomputed.
///
/// Trees only cover the vertices the network had when the cache was created, so vertices
/// added later (by augmentation) are invisible to it.
#[derive(Debug, Clone)]
pub struct PathCache {
    num_vertices: usize,
    trees: HashMap<usize, ShortestPathTree>,
}

impl PathCache {
    pub fn new(network: &RoadNetwork) -> PathCache {
        PathCache {
            num_vertices: network.num_vertices(),
            trees: HashMap::new(),
        }
    }

    pub fn num_cached(&self) -> usize {
        self.trees.len()
    }

    pub fn is_cached(&self, origin: usize) -> bool {
        self.trees.contains_key(&origin)
    }

    /// The shortest-path tree from `origin`, computing it on first request.
    pub fn tree(&mut self, network: &RoadNetwork, origin: usize) -> &ShortestPathTree {
        let num_vertices = self.num_vertices;
        self.trees.entry(origin).or_insert_with(|| {
            log::debug!("computing shortest paths from {}", origin);
            ShortestPathTree::compute(network, origin, num_vertices)
        })
    }

    /// Least cost from `origin` to `destination`; infinite if there is no path.
    pub fn distance(&mut self, network: &RoadNetwork, origin: usize, destination: usize)
                    -> f64 {
        self.tree(network, origin).dist(destination)
    }

    /// Edge indices along the shortest path from `origin` to `destination`.
    pub fn path_edges(&mut self, network: &RoadNetwork, origin: usize, destination: usize)
                      -> PlanResult<Vec<usize>> {
        for vertex in &[origin, destination] {
            if *vertex >= self.num_vertices {
                return Err(PlanError::UnknownVertex {
                    vertex: *vertex,
                    num_vertices: self.num_vertices,
                });
            }
        }
        self.tree(network, origin).path_edges(destination)
    }

    /// Fills the cache for all of `origins` at once, running the searches in parallel.
    /// Origins that are already cached are skipped.
    pub fn warm(&mut self, network: &RoadNetwork, origins: &[usize]) {
        let num_vertices = self.num_vertices;
        let mut missing: Vec<usize> = origins.iter().cloned()
                                             .filter(|oo| ! self.trees.contains_key(oo))
                                             .collect();
        missing.sort_unstable();
        missing.dedup();
        log::info!("warming shortest-path cache for {} origins", missing.len());
        let trees: Vec<ShortestPathTree> = missing.par_iter()
            .map(|oo| ShortestPathTree::compute(network, *oo, num_vertices))
            .collect();
        for tree in trees {
            self.trees.insert(tree.origin(), tree);
        }
    }
}


/// A heap entry that a `BinaryHeap` pops lowest score first.  Equal scores pop the lower
/// item first.
#[derive(Copy, Clone, Debug)]
pub struct MinScored<K, T>(pub K, pub T);

impl<K: PartialOrd, T: Ord> PartialEq for MinScored<K, T> {
    #[inline]
    fn eq(&self, other: &MinScored<K, T>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd, T: Ord> Eq for MinScored<K, T> {}

impl<K: PartialOrd, T: Ord> PartialOrd for MinScored<K, T> {
    #[inline]
    fn partial_cmp(&self, other: &MinScored<K, T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T: Ord> Ord for MinScored<K, T> {
    #[inline]
    fn cmp(&self, other: &MinScored<K, T>) -> Ordering {
        let a = &self.0;
        let b = &other.0;
        if a == b {
            other.1.cmp(&self.1)
        } else if a < b {
            Ordering::Greater
        } else if a > b {
            Ordering::Less
        } else if a.ne(a) && b.ne(b) {
            // these are the NaN cases
            Ordering::Equal
        } else if a.ne(a) {
            // Order NaN less, so that it is last in the MinScore order
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}
