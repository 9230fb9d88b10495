use std::io::Write;

use itertools::Itertools;
use ndarray::prelude::*;

use super::errors::{PlanError, PlanResult};
use super::realize::ConcreteStop;
use super::road_network::RoadNetwork;


/// The starting point handed to the downstream optimizer, one row per vehicle in each matrix.
#[derive(PartialEq, Debug, Clone)]
pub struct DecisionVariables {
    /// vehicle x request: 1 if the vehicle serves the request.
    pub assignment: Array2<i64>,
    /// vehicle x vertex: 1 at the vertex where the vehicle's route ends.
    pub route_end: Array2<i64>,
    /// vehicle x edge: 1 if the vehicle drives along the edge.
    pub edge_usage: Array2<i64>,
    /// vehicle x vertex: cumulative travel cost when the vehicle reaches the vertex.
    pub arrival_time: Array2<f64>,
    /// vehicle x vertex: passengers on board when the vehicle reaches the vertex.
    pub occupancy: Array2<i64>,
}

impl DecisionVariables {
    /// Encodes augmented concrete routes (no vertex repeated within a route) over `network`.
    /// Each step between consecutive vertices is charged to the cheapest edge joining them.
    pub fn encode(routes: &[Vec<ConcreteStop>], num_requests: usize, network: &RoadNetwork)
                  -> PlanResult<DecisionVariables> {
        let num_vehicles = routes.len();
        let num_vertices = network.num_vertices();
        let canonical = network.canonical_edges();

        let mut assignment = Array::zeros((num_vehicles, num_requests));
        let mut route_end = Array::zeros((num_vehicles, num_vertices));
        let mut edge_usage = Array::zeros((num_vehicles, network.num_edges()));
        let mut arrival_time = Array::zeros((num_vehicles, num_vertices));
        let mut occupancy = Array::zeros((num_vehicles, num_vertices));

        for (veh_idx, route) in routes.iter().enumerate() {
            for stop in route {
                if let Some(req_idx) = stop.request {
                    assignment[[veh_idx, req_idx]] = 1;
                }
            }
            if let Some(last) = route.last() {
                route_end[[veh_idx, last.vertex]] = 1;
            }

            for step in route.windows(2) {
                let (cur, next) = (step[0].vertex, step[1].vertex);
                let (cost, edge_idx) = *canonical.get(&(cur, next))
                    .ok_or(PlanError::MissingCanonicalEdge{from: cur, to: next})?;
                edge_usage[[veh_idx, edge_idx]] = 1;
                arrival_time[[veh_idx, next]] = arrival_time[[veh_idx, cur]] + cost;
                occupancy[[veh_idx, next]] = occupancy[[veh_idx, cur]] + step[1].delta;
            }
        }

        Ok(DecisionVariables {
            assignment,
            route_end,
            edge_usage,
            arrival_time,
            occupancy,
        })
    }

    /// Writes the five matrices in order, one row per line.  Times get six decimal places.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_int_matrix(&self.assignment, writer)?;
        write_int_matrix(&self.route_end, writer)?;
        write_int_matrix(&self.edge_usage, writer)?;
        for row in self.arrival_time.outer_iter() {
            writeln!(writer, "{}", row.iter().map(|tt| format!("{:.6}", tt)).join(" "))?;
        }
        write_int_matrix(&self.occupancy, writer)
    }
}

fn write_int_matrix<W: Write>(matrix: &Array2<i64>, writer: &mut W) -> std::io::Result<()> {
    for row in matrix.outer_iter() {
        writeln!(writer, "{}", row.iter().join(" "))?;
    }
    Ok(())
}
