use std::path::Path;

use super::config::PlanConfig;
use super::encoder::DecisionVariables;
use super::errors::{PlanError, PlanResult};
use super::insertion::{insert_requests, Request, Vehicle};
use super::instance_io;
use super::realize::{augment_routes, named_route, realize_routes, served_requests, ConcreteStop};
use super::road_network::{EdgeRecord, RoadNetwork};
use super::scc::{keep_largest_component, SccSummary};
use super::shortest_paths::PathCache;


/// Everything a planning run produces.  Nothing here has been written anywhere yet.
#[derive(Debug, Clone)]
pub struct Plan {
    /// the vehicle serving each request
    pub assignment: Vec<usize>,
    pub vehicles: Vec<Vehicle>,
    /// concrete routes after augmentation, one per vehicle
    pub routes: Vec<Vec<ConcreteStop>>,
    /// each request's realized pickup and drop-off vertices
    pub served: Vec<Request>,
    pub variables: DecisionVariables,
    pub new_edges: Vec<EdgeRecord>,
    /// names for the vertices augmentation added, in id order
    pub new_names: Vec<String>,
}

/// Builds the initial plan for `vehicles` serving `requests` over `network`.  The network grows
/// by any vertex copies the routes need.
pub fn build_plan(mut vehicles: Vec<Vehicle>, requests: &[Request], network: &mut RoadNetwork,
                  parallel_warmup: bool) -> PlanResult<Plan> {
    if network.is_empty() {
        return Err(PlanError::EmptyGraph);
    }

    let mut cache = PathCache::new(network);
    if parallel_warmup {
        let mut origins: Vec<usize> = vehicles.iter().map(|vv| vv.depot).collect();
        for request in requests {
            origins.push(request.origin);
            origins.push(request.destination);
        }
        // unknown vertices are reported by the insertion below
        origins.retain(|oo| network.contains_vertex(*oo));
        cache.warm(network, &origins);
    }

    let assignment = insert_requests(&mut vehicles, requests, network, &mut cache)?;
    for (veh_idx, vehicle) in vehicles.iter().enumerate() {
        log::info!("vehicle {} serves requests {:?}", veh_idx, vehicle.requests());
    }
    let mut routes = realize_routes(&vehicles, network, &mut cache)?;
    log::info!("realized {} routes using {} cached shortest-path trees", routes.len(),
               cache.num_cached());

    let num_copies = augment_routes(&mut routes, network)?;
    log::info!("augmentation added {} vertices and {} edges", num_copies,
               network.appended_edges().len());
    for (veh_idx, route) in routes.iter().enumerate() {
        log::debug!("vehicle {}: {}", veh_idx, named_route(route, network).join(" -> "));
    }

    let served = served_requests(&routes, requests);
    let variables = DecisionVariables::encode(&routes, requests.len(), network)?;
    let new_names = network.appended_vertices().map(|vv| match network.name(vv) {
        Some(name) => String::from(name),
        None => vv.to_string(),
    }).collect();

    Ok(Plan {
        assignment,
        vehicles,
        routes,
        served,
        variables,
        new_edges: network.appended_edges(),
        new_names,
    })
}

/// Reads the instance a config names, plans it, and writes the results.  All results are
/// computed before the first file is touched.
pub fn run_from_config(cfg: &PlanConfig) -> PlanResult<Plan> {
    let vehicles = instance_io::read_vehicles(&cfg.vehicles_path)?;
    let requests = instance_io::read_requests(&cfg.requests_path)?;
    let edges = instance_io::read_edges(&cfg.edges_path)?;
    let mut network = RoadNetwork::from_edges(&edges);
    if let Some(mapping_path) = &cfg.mapping_path {
        network.set_names(&instance_io::read_mapping(mapping_path)?);
    }
    log::info!("read {} vehicles, {} requests, and {} edges over {} vertices", vehicles.len(),
               requests.len(), network.num_edges(), network.num_vertices());

    let plan = build_plan(vehicles, &requests, &mut network, cfg.parallel_warmup)?;

    instance_io::write_solution(&cfg.solution_path, &plan.variables)?;
    instance_io::write_requests(&cfg.requests_out_path, &plan.served)?;
    if let Some(routes_path) = &cfg.routes_out_path {
        instance_io::write_routes(routes_path, &plan.routes)?;
    }
    if ! plan.new_edges.is_empty() {
        instance_io::append_edges(&cfg.edges_path, &plan.new_edges)?;
    }
    if let Some(mapping_path) = &cfg.mapping_path {
        if ! plan.new_names.is_empty() {
            instance_io::append_names(mapping_path, &plan.new_names)?;
        }
    }
    log::info!("wrote solution to {:?}", cfg.solution_path);
    Ok(plan)
}

pub fn run_from_config_file(config_path: &Path) -> PlanResult<Plan> {
    let cfg = PlanConfig::from_file(config_path)?;
    run_from_config(&cfg)
}

/// Reduces the edge file at `in_path` to its largest strongly-connected component.
pub fn reduce_edge_file(in_path: &Path, out_path: &Path) -> PlanResult<SccSummary> {
    let edges = instance_io::read_edges(in_path)?;
    let (kept, summary) = keep_largest_component(&edges)?;
    instance_io::write_edges(out_path, &kept)?;
    log::info!("kept {} of {} edges", summary.kept_edges, edges.len());
    Ok(summary)
}
