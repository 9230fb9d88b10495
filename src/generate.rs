// Random instances over the endpoints of an edge list, for trying the planner out.
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_isaac::Isaac64Rng;

use super::errors::{PlanError, PlanResult};
use super::insertion::{Request, Vehicle};


pub static RAND_SEED: u64 = 100;

pub fn seeded_rng(seed: Option<u64>) -> Isaac64Rng {
    Isaac64Rng::seed_from_u64(seed.unwrap_or(RAND_SEED))
}

/// `count` vehicles of the given capacity, each parked at an endpoint chosen uniformly at random.
pub fn random_vehicles<R: Rng>(endpoints: &[usize], count: usize, capacity: usize, rng: &mut R)
                               -> PlanResult<Vec<Vehicle>> {
    let mut vehicles = Vec::with_capacity(count);
    for _ in 0..count {
        let depot = *endpoints.choose(rng).ok_or(PlanError::EmptyGraph)?;
        vehicles.push(Vehicle::new(depot, capacity));
    }
    Ok(vehicles)
}

/// `count` requests whose origins and destinations are drawn independently from `endpoints`.
/// Origin and destination may coincide.
pub fn random_requests<R: Rng>(endpoints: &[usize], count: usize, rng: &mut R)
                               -> PlanResult<Vec<Request>> {
    let mut requests = Vec::with_capacity(count);
    for _ in 0..count {
        let origin = *endpoints.choose(rng).ok_or(PlanError::EmptyGraph)?;
        let destination = *endpoints.choose(rng).ok_or(PlanError::EmptyGraph)?;
        requests.push(Request::new(origin, destination));
    }
    Ok(requests)
}


#[cfg(test)]
mod tests {
    use super::*;

    static ENDPOINTS: [usize; 4] = [0, 2, 5, 9];

    #[test]
    fn test_same_seed_same_instance() {
        let vv1 = random_vehicles(&ENDPOINTS, 20, 3, &mut seeded_rng(None)).unwrap();
        let vv2 = random_vehicles(&ENDPOINTS, 20, 3, &mut seeded_rng(Some(RAND_SEED))).unwrap();
        assert_eq!(vv1, vv2);

        let rr1 = random_requests(&ENDPOINTS, 20, &mut seeded_rng(Some(7))).unwrap();
        let rr2 = random_requests(&ENDPOINTS, 20, &mut seeded_rng(Some(7))).unwrap();
        assert_eq!(rr1, rr2);
    }

    #[test]
    fn test_draws_from_endpoints() {
        let mut rng = seeded_rng(None);
        let vehicles = random_vehicles(&ENDPOINTS, 50, 2, &mut rng).unwrap();
        assert_eq!(vehicles.len(), 50);
        for vehicle in &vehicles {
            assert!(ENDPOINTS.contains(&vehicle.depot));
            assert_eq!(vehicle.capacity, 2);
        }

        let requests = random_requests(&ENDPOINTS, 50, &mut rng).unwrap();
        assert_eq!(requests.len(), 50);
        for request in &requests {
            assert!(ENDPOINTS.contains(&request.origin));
            assert!(ENDPOINTS.contains(&request.destination));
        }
    }

    #[test]
    fn test_no_endpoints() {
        let mut rng = seeded_rng(None);
        assert!(random_vehicles(&[], 1, 2, &mut rng).is_err());
        assert!(random_requests(&[], 1, &mut rng).is_err());
        // nothing asked for, nothing to draw from
        assert!(random_requests(&[], 0, &mut rng).unwrap().is_empty());
    }
}
