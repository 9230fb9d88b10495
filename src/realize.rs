use std::collections::HashSet;

use super::errors::{PlanError, PlanResult};
use super::insertion::{Request, Vehicle};
use super::road_network::RoadNetwork;
use super::route_cost::Stop;
use super::shortest_paths::PathCache;


/// One vertex of a concrete route, with the change in passengers on board when the vehicle
/// gets there, and the request that change belongs to.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ConcreteStop {
    pub vertex: usize,
    pub delta: i64,
    pub request: Option<usize>,
}

impl ConcreteStop {
    fn pass_through(vertex: usize) -> ConcreteStop {
        ConcreteStop{vertex, delta: 0, request: None}
    }

    fn serving(stop: &Stop, vertex: usize) -> ConcreteStop {
        ConcreteStop{vertex, delta: stop.occupancy_delta(), request: stop.request}
    }
}

/// Expands an abstract route into the sequence of vertices the vehicle actually drives through.
/// Each leg follows the cached shortest path; a leg between two stops at the same vertex
/// becomes a second entry for that vertex.
pub fn realize_route(route: &[Stop], network: &RoadNetwork, cache: &mut PathCache)
                     -> PlanResult<Vec<ConcreteStop>> {
    let mut concrete = match route.first() {
        Some(first) => vec![ConcreteStop::serving(first, first.vertex)],
        None => return Ok(vec![]),
    };

    for leg in route.windows(2) {
        let (from, to) = (&leg[0], &leg[1]);
        if from.vertex == to.vertex {
            concrete.push(ConcreteStop::serving(to, to.vertex));
            continue;
        }

        let edge_idxs = cache.path_edges(network, from.vertex, to.vertex)?;
        log::debug!("leg {} -> {} takes {} edges", from.vertex, to.vertex, edge_idxs.len());
        for edge_idx in edge_idxs {
            let edge = network.edge(edge_idx).ok_or(PlanError::MissingPredecessor {
                origin: from.vertex,
                vertex: to.vertex,
            })?;
            concrete.push(ConcreteStop::pass_through(edge.to));
        }
        // the last vertex of the leg is where the stop happens
        if let Some(last) = concrete.last_mut() {
            *last = ConcreteStop::serving(to, last.vertex);
        }
    }

    Ok(concrete)
}

pub fn realize_routes(vehicles: &[Vehicle], network: &RoadNetwork, cache: &mut PathCache)
                      -> PlanResult<Vec<Vec<ConcreteStop>>> {
    vehicles.iter().map(|vehicle| realize_route(vehicle.route(), network, cache)).collect()
}

/// Makes every concrete route visit each vertex at most once.  The second and later visits of
/// a vertex within one route are redirected to fresh copies of that vertex, which the network
/// gains along with copies of the vertex's edges.  Returns the number of copies made.
///
/// Must run after all shortest-path queries are done: the cache never sees the new vertices.
pub fn augment_routes(routes: &mut [Vec<ConcreteStop>], network: &mut RoadNetwork)
                      -> PlanResult<usize> {
    let mut num_copies = 0;
    for (veh_idx, route) in routes.iter_mut().enumerate() {
        let mut seen = HashSet::new();
        for stop in route.iter_mut() {
            if seen.insert(stop.vertex) {
                continue;
            }
            let copy = network.clone_vertex(stop.vertex)?;
            if ! seen.insert(copy) {
                return Err(PlanError::DuplicateAugmentation{vertex: copy});
            }
            log::info!("vehicle {} revisits vertex {}; using copy {}", veh_idx, stop.vertex, copy);
            stop.vertex = copy;
            num_copies += 1;
        }
    }
    Ok(num_copies)
}

/// Where each request was really picked up and dropped off, after augmentation.
pub fn served_requests(routes: &[Vec<ConcreteStop>], requests: &[Request]) -> Vec<Request> {
    let mut served = requests.to_vec();
    for stop in routes.iter().flatten() {
        if let Some(req_idx) = stop.request {
            if stop.delta > 0 {
                served[req_idx].origin = stop.vertex;
            } else {
                served[req_idx].destination = stop.vertex;
            }
        }
    }
    served
}

/// The names of the vertices along a route, with consecutive repeats collapsed (copies share a
/// name with the vertex they were made from).  Unnamed vertices show up as their ids.
pub fn named_route(route: &[ConcreteStop], network: &RoadNetwork) -> Vec<String> {
    let mut names: Vec<String> = vec![];
    for stop in route {
        let name = match network.name(stop.vertex) {
            Some(name) => String::from(name),
            None => stop.vertex.to_string(),
        };
        if names.last() != Some(&name) {
            names.push(name);
        }
    }
    names
}
