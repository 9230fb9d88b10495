use super::errors::{PlanError, PlanResult};
use super::road_network::RoadNetwork;
use super::route_cost::{route_cost, Stop};
use super::shortest_paths::PathCache;


#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Request {
    pub origin: usize,
    pub destination: usize,
}

impl Request {
    pub fn new(origin: usize, destination: usize) -> Request {
        Request{origin, destination}
    }
}

/// A vehicle and the abstract route it has been given so far.  The route always starts at the
/// vehicle's depot, and only ever grows.
#[derive(PartialEq, Debug, Clone)]
pub struct Vehicle {
    pub depot: usize,
    pub capacity: usize,
    route: Vec<Stop>,
}

impl Vehicle {
    pub fn new(depot: usize, capacity: usize) -> Vehicle {
        Vehicle {
            depot,
            capacity,
            route: vec![Stop::depot(depot)],
        }
    }

    pub fn route(&self) -> &[Stop] {
        &self.route
    }

    /// Ids of the requests this vehicle serves, in pickup order.
    pub fn requests(&self) -> Vec<usize> {
        self.route.iter().filter(|ss| ! ss.is_dropoff()).filter_map(|ss| ss.request).collect()
    }

    /// The route that would result from putting `pickup` at slot `pickup_pos` and `dropoff` at
    /// slot `dropoff_pos`, both counted in the current route.  When the two slots are equal,
    /// the drop-off directly follows the pickup.
    pub fn with_insertion(&self, pickup: Stop, dropoff: Stop, pickup_pos: usize,
                          dropoff_pos: usize) -> Vec<Stop> {
        let mut route = Vec::with_capacity(self.route.len() + 2);
        route.extend_from_slice(&self.route);
        route.insert(dropoff_pos, dropoff);
        route.insert(pickup_pos, pickup);
        route
    }

    fn commit(&mut self, pickup: Stop, dropoff: Stop, pickup_pos: usize, dropoff_pos: usize) {
        self.route = self.with_insertion(pickup, dropoff, pickup_pos, dropoff_pos);
    }
}

/// Where a request goes and what the resulting route costs.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Insertion {
    pub vehicle: usize,
    pub pickup_pos: usize,
    pub dropoff_pos: usize,
    pub cost: f64,
}

/// Finds the cheapest feasible place to insert `request` into any of the vehicles' routes.
///
/// Candidates are tried vehicle by vehicle, then by pickup slot, then by drop-off slot, and a
/// candidate only replaces the best so far if it is strictly cheaper; so among equal costs the
/// first one tried wins.  Slot 0 (the depot) is never used.
pub fn best_insertion(vehicles: &[Vehicle], request_id: usize, request: &Request,
                      network: &RoadNetwork, cache: &mut PathCache) -> Option<Insertion> {
    let pickup = Stop::pickup(request.origin, request_id);
    let dropoff = Stop::dropoff(request.destination, request_id);
    let mut best: Option<Insertion> = None;

    for (veh_idx, vehicle) in vehicles.iter().enumerate() {
        let route_len = vehicle.route.len();
        for pickup_pos in 1..=route_len {
            for dropoff_pos in pickup_pos..=route_len {
                let candidate = vehicle.with_insertion(pickup, dropoff, pickup_pos, dropoff_pos);
                let cost = route_cost(&candidate, vehicle.capacity, network, cache);
                if cost.is_infinite() {
                    continue;
                }
                let is_better = match &best {
                    Some(bb) => cost < bb.cost,
                    None => true,
                };
                if is_better {
                    best = Some(Insertion{vehicle: veh_idx, pickup_pos, dropoff_pos, cost});
                }
            }
        }
    }
    best
}

/// Assigns every request, in order, to its cheapest feasible insertion, committing each one
/// before looking at the next.  Returns the index of the vehicle serving each request.
///
/// Fails if some vertex is not in the network, or if some request fits nowhere.
pub fn insert_requests(vehicles: &mut [Vehicle], requests: &[Request], network: &RoadNetwork,
                       cache: &mut PathCache) -> PlanResult<Vec<usize>> {
    for vehicle in vehicles.iter() {
        network.check_vertex(vehicle.depot)?;
    }
    for request in requests {
        network.check_vertex(request.origin)?;
        network.check_vertex(request.destination)?;
    }

    let mut assignment = Vec::with_capacity(requests.len());
    for (req_idx, request) in requests.iter().enumerate() {
        let insertion = best_insertion(vehicles, req_idx, request, network, cache)
            .ok_or(PlanError::UnassignableRequest{request: req_idx})?;
        log::info!("assigned vehicle {} to request {} (route cost {})",
                   insertion.vehicle, req_idx, insertion.cost);
        vehicles[insertion.vehicle].commit(
            Stop::pickup(request.origin, req_idx),
            Stop::dropoff(request.destination, req_idx),
            insertion.pickup_pos,
            insertion.dropoff_pos,
        );
        assignment.push(insertion.vehicle);
    }
    Ok(assignment)
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::route_cost::respects_capacity;

    fn triangle() -> RoadNetwork {
        RoadNetwork::from_edges(&[(0, 1, 5.), (1, 2, 3.), (0, 2, 10.), (2, 0, 1.)])
    }

    // 0 -> 1 -> 2 -> 3 -> 0, all of cost 1
    fn ring() -> RoadNetwork {
        RoadNetwork::from_edges(&[(0, 1, 1.), (1, 2, 1.), (2, 3, 1.), (3, 0, 1.)])
    }

    #[test]
    fn test_with_insertion_slots() {
        let vehicle = Vehicle::new(0, 2);
        let route = vehicle.with_insertion(Stop::pickup(1, 0), Stop::dropoff(2, 0), 1, 1);
        assert_eq!(route, vec![Stop::depot(0), Stop::pickup(1, 0), Stop::dropoff(2, 0)]);

        let mut vehicle = vehicle;
        vehicle.commit(Stop::pickup(1, 0), Stop::dropoff(2, 0), 1, 1);
        // slots are counted before either stop goes in
        let route = vehicle.with_insertion(Stop::pickup(3, 1), Stop::dropoff(3, 1), 1, 2);
        assert_eq!(route, vec![
            Stop::depot(0), Stop::pickup(3, 1), Stop::pickup(1, 0), Stop::dropoff(3, 1),
            Stop::dropoff(2, 0),
        ]);
    }

    #[test]
    fn test_single_request_on_triangle() {
        let network = triangle();
        let mut cache = PathCache::new(&network);
        let vehicles = vec![Vehicle::new(0, 1)];
        let insertion = best_insertion(&vehicles, 0, &Request::new(0, 2), &network, &mut cache)
            .unwrap();
        assert_relative_eq!(insertion.cost, 8.);
        assert_eq!((insertion.vehicle, insertion.pickup_pos, insertion.dropoff_pos), (0, 1, 1));
    }

    #[test]
    fn test_full_vehicle_pushes_request_to_another() {
        let network = ring();
        let mut cache = PathCache::new(&network);
        let mut vehicles = vec![Vehicle::new(0, 1), Vehicle::new(2, 1)];
        let requests = vec![Request::new(0, 2), Request::new(0, 2)];
        let assignment = insert_requests(&mut vehicles, &requests, &network, &mut cache)
            .unwrap();
        assert_eq!(assignment, vec![0, 1]);
        assert_eq!(vehicles[1].route(), &[
            Stop::depot(2), Stop::pickup(0, 1), Stop::dropoff(2, 1),
        ][..]);
    }

    #[test]
    fn test_single_vehicle_serves_requests_one_at_a_time() {
        let network = ring();
        let mut cache = PathCache::new(&network);
        let mut vehicles = vec![Vehicle::new(0, 1)];
        let requests = vec![Request::new(0, 2), Request::new(0, 2)];
        insert_requests(&mut vehicles, &requests, &network, &mut cache).unwrap();
        // serving request 1 before or after request 0 costs the same; the earlier slot wins
        assert_eq!(vehicles[0].route(), &[
            Stop::depot(0), Stop::pickup(0, 1), Stop::dropoff(2, 1), Stop::pickup(0, 0),
            Stop::dropoff(2, 0),
        ][..]);
        assert!(respects_capacity(vehicles[0].route(), 1));
    }

    #[test]
    fn test_every_request_assigned_once_and_in_order() {
        let network = ring();
        let mut cache = PathCache::new(&network);
        let mut vehicles = vec![Vehicle::new(0, 2), Vehicle::new(1, 1), Vehicle::new(3, 3)];
        let requests: Vec<Request> = (0..8).map(|ii| Request::new(ii % 4, (ii * 3 + 1) % 4))
                                           .collect();
        let assignment = insert_requests(&mut vehicles, &requests, &network, &mut cache)
            .unwrap();

        for (req_idx, veh_idx) in assignment.iter().enumerate() {
            let mut served_by = vec![];
            for (vv, vehicle) in vehicles.iter().enumerate() {
                let route = vehicle.route();
                let pickup = route.iter().position(|ss| *ss == Stop::pickup(requests[req_idx].origin, req_idx));
                let dropoff = route.iter().position(|ss| *ss == Stop::dropoff(requests[req_idx].destination, req_idx));
                match (pickup, dropoff) {
                    (Some(pp), Some(dd)) => {
                        assert!(pp < dd);
                        served_by.push(vv);
                    }
                    (None, None) => (),
                    _ => panic!("request {} is half-served by vehicle {}", req_idx, vv),
                }
            }
            assert_eq!(served_by, vec![*veh_idx]);
        }

        for vehicle in &vehicles {
            assert_eq!(vehicle.route()[0], Stop::depot(vehicle.depot));
            for end in 1..=vehicle.route().len() {
                assert!(respects_capacity(&vehicle.route()[..end], vehicle.capacity));
            }
        }
    }

    #[test]
    fn test_no_capacity_is_fatal() {
        let network = ring();
        let mut cache = PathCache::new(&network);
        let mut vehicles = vec![Vehicle::new(0, 0)];
        match insert_requests(&mut vehicles, &[Request::new(1, 2)], &network, &mut cache) {
            Err(PlanError::UnassignableRequest{request: 0}) => (),
            other => panic!("expected an unassignable request, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_vertex_is_rejected_up_front() {
        let network = ring();
        let mut cache = PathCache::new(&network);
        let mut vehicles = vec![Vehicle::new(0, 1)];
        match insert_requests(&mut vehicles, &[Request::new(1, 9)], &network, &mut cache) {
            Err(PlanError::UnknownVertex{vertex: 9, num_vertices: 4}) => (),
            other => panic!("expected an unknown vertex, got {:?}", other),
        }
        assert_eq!(cache.num_cached(), 0);
    }

    #[test]
    fn test_requests_listed_in_pickup_order() {
        let mut vehicle = Vehicle::new(0, 2);
        vehicle.commit(Stop::pickup(1, 4), Stop::dropoff(2, 4), 1, 1);
        vehicle.commit(Stop::pickup(3, 7), Stop::dropoff(0, 7), 1, 3);
        assert_eq!(vehicle.requests(), vec![7, 4]);
    }
}
