use super::road_network::RoadNetwork;
use super::shortest_paths::PathCache;


#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum StopKind {
    Depot,
    Pickup,
    Dropoff,
}

/// One stop of an abstract route: a vertex, what happens there, and which request it serves.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct Stop {
    pub vertex: usize,
    pub kind: StopKind,
    pub request: Option<usize>,
}

impl Stop {
    pub fn depot(vertex: usize) -> Stop {
        Stop{vertex, kind: StopKind::Depot, request: None}
    }

    pub fn pickup(vertex: usize, request: usize) -> Stop {
        Stop{vertex, kind: StopKind::Pickup, request: Some(request)}
    }

    pub fn dropoff(vertex: usize, request: usize) -> Stop {
        Stop{vertex, kind: StopKind::Dropoff, request: Some(request)}
    }

    /// How the number of passengers on board changes at this stop.
    pub fn occupancy_delta(&self) -> i64 {
        match self.kind {
            StopKind::Depot => 0,
            StopKind::Pickup => 1,
            StopKind::Dropoff => -1,
        }
    }

    pub fn is_dropoff(&self) -> bool {
        self.kind == StopKind::Dropoff
    }
}

/// Checks that the number of passengers on board never exceeds `capacity` anywhere along
/// `stops`.
pub fn respects_capacity(stops: &[Stop], capacity: usize) -> bool {
    let mut passengers: i64 = 0;
    for stop in stops {
        passengers += stop.occupancy_delta();
        if passengers > capacity as i64 {
            return false;
        }
    }
    true
}

/// Computes the cost of driving `stops` in order with a vehicle of the given capacity.
///
/// The cost is a sum of sojourn times: leg costs are accumulated in route order into a running
/// total, and every drop-off adds the running total at that point to the cost.  So a request
/// dropped off late in the route pays for every leg before it.
///
/// Returns infinity if the route overloads the vehicle or contains an unreachable leg.
pub fn route_cost(stops: &[Stop], capacity: usize, network: &RoadNetwork,
                  cache: &mut PathCache) -> f64 {
    if ! respects_capacity(stops, capacity) {
        return f64::INFINITY;
    }

    let mut sojourn = 0.;
    let mut cost = 0.;
    for leg in stops.windows(2) {
        sojourn += cache.distance(network, leg[0].vertex, leg[1].vertex);
        if leg[1].is_dropoff() {
            cost += sojourn;
        }
    }
    cost
}
