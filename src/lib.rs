// imports of other modules from this crate
mod errors;
pub use errors::{PlanError, PlanResult};

mod road_network;
pub use road_network::{EdgeRecord, Location, RoadNetwork, RoadSegment};

mod scc;
pub use scc::{component_labels, keep_largest_component, largest_component, SccSummary};

mod shortest_paths;
pub use shortest_paths::{PathCache, ShortestPathTree};

mod route_cost;
pub use route_cost::{respects_capacity, route_cost, Stop, StopKind};

mod insertion;
pub use insertion::{best_insertion, insert_requests, Insertion, Request, Vehicle};

mod realize;
pub use realize::{augment_routes, named_route, realize_route, realize_routes, served_requests,
                  ConcreteStop};

mod encoder;
pub use encoder::DecisionVariables;

mod config_utils;

mod config;
pub use config::PlanConfig;

pub mod instance_io;

pub mod generate;

pub mod sumo;

mod planner;
pub use planner::{build_plan, reduce_edge_file, run_from_config, run_from_config_file, Plan};

#[cfg(test)]
mod test_utils;
