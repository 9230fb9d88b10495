// Readers and writers for the flat whitespace-separated files that instances and results live in.
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::config_utils::{parse_field, read_records, read_rows};
use super::encoder::DecisionVariables;
use super::errors::{PlanError, PlanResult};
use super::insertion::{Request, Vehicle};
use super::realize::ConcreteStop;
use super::road_network::EdgeRecord;


/// `position capacity` per line.
pub fn read_vehicles(path: &Path) -> PlanResult<Vec<Vehicle>> {
    read_records(path, 2, |ff| {
        Ok(Vehicle::new(parse_field(ff[0], "position")?, parse_field(ff[1], "capacity")?))
    })
}

/// `origin destination` per line.
pub fn read_requests(path: &Path) -> PlanResult<Vec<Request>> {
    read_records(path, 2, |ff| {
        Ok(Request::new(parse_field(ff[0], "origin")?, parse_field(ff[1], "destination")?))
    })
}

/// `from to cost` per line; the cost may be fractional but must not be negative.
pub fn read_edges(path: &Path) -> PlanResult<Vec<(usize, usize, f64)>> {
    read_records(path, 3, |ff| {
        let cost: f64 = parse_field(ff[2], "cost")?;
        if !(cost >= 0.) {
            return Err(format!("edge cost must be non-negative, got {}", cost));
        }
        Ok((parse_field(ff[0], "from")?, parse_field(ff[1], "to")?, cost))
    })
}

/// One vertex name per line, in vertex id order.
pub fn read_mapping(path: &Path) -> PlanResult<Vec<String>> {
    read_records(path, 1, |ff| Ok(String::from(ff[0])))
}

/// The vertex ids of one route per line, as `write_routes` leaves them.
pub fn read_routes(path: &Path) -> PlanResult<Vec<Vec<usize>>> {
    read_rows(path, |ff| ff.iter().map(|field| parse_field(field, "vertex")).collect())
}

/// Cuts a mapping down to the names of vertices that exist in a network of `num_vertices`.
pub fn trim_mapping(mut names: Vec<String>, num_vertices: usize) -> Vec<String> {
    names.truncate(num_vertices);
    names
}

fn create(path: &Path) -> PlanResult<BufWriter<File>> {
    let file = File::create(path).map_err(|err| PlanError::io(path, err))?;
    Ok(BufWriter::new(file))
}

fn append(path: &Path) -> PlanResult<BufWriter<File>> {
    let file = OpenOptions::new().append(true).create(true).open(path)
        .map_err(|err| PlanError::io(path, err))?;
    Ok(BufWriter::new(file))
}

/// Runs `body` against a buffered writer and flushes it, turning io failures into `PlanError`s
/// that name the file.
fn with_writer<F>(path: &Path, mut writer: BufWriter<File>, body: F) -> PlanResult<()>
    where F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>
{
    body(&mut writer).and_then(|_| writer.flush()).map_err(|err| PlanError::io(path, err))
}

fn write_edge_lines<W: Write>(writer: &mut W, edges: &[(usize, usize, f64)])
                              -> std::io::Result<()> {
    for (from, to, cost) in edges {
        writeln!(writer, "{} {} {}", from, to, cost)?;
    }
    Ok(())
}

pub fn write_edges(path: &Path, edges: &[(usize, usize, f64)]) -> PlanResult<()> {
    with_writer(path, create(path)?, |ww| write_edge_lines(ww, edges))
}

/// Adds edges to the end of an existing edge file.
pub fn append_edges(path: &Path, edges: &[EdgeRecord]) -> PlanResult<()> {
    let triples: Vec<(usize, usize, f64)> = edges.iter().map(|er| (er.from, er.to, er.cost))
                                                 .collect();
    with_writer(path, append(path)?, |ww| write_edge_lines(ww, &triples))
}

pub fn write_names(path: &Path, names: &[String]) -> PlanResult<()> {
    with_writer(path, create(path)?, |ww| {
        names.iter().try_for_each(|name| writeln!(ww, "{}", name))
    })
}

/// Adds names to the end of an existing mapping file.
pub fn append_names(path: &Path, names: &[String]) -> PlanResult<()> {
    with_writer(path, append(path)?, |ww| {
        names.iter().try_for_each(|name| writeln!(ww, "{}", name))
    })
}

pub fn write_vehicles(path: &Path, vehicles: &[Vehicle]) -> PlanResult<()> {
    with_writer(path, create(path)?, |ww| {
        vehicles.iter().try_for_each(|vv| writeln!(ww, "{} {}", vv.depot, vv.capacity))
    })
}

pub fn write_requests(path: &Path, requests: &[Request]) -> PlanResult<()> {
    with_writer(path, create(path)?, |ww| {
        requests.iter().try_for_each(|rr| writeln!(ww, "{} {}", rr.origin, rr.destination))
    })
}

pub fn write_solution(path: &Path, variables: &DecisionVariables) -> PlanResult<()> {
    with_writer(path, create(path)?, |ww| variables.write(ww))
}

/// One line per vehicle: the vertex ids of its concrete route.
pub fn write_routes(path: &Path, routes: &[Vec<ConcreteStop>]) -> PlanResult<()> {
    with_writer(path, create(path)?, |ww| {
        for route in routes {
            let vertices: Vec<String> = route.iter().map(|ss| ss.vertex.to_string()).collect();
            writeln!(ww, "{}", vertices.join(" "))?;
        }
        Ok(())
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{read_lines, write_file};
    use tempfile::tempdir;

    #[test]
    fn test_read_instance_files() {
        let dir = tempdir().unwrap();
        let vpath = write_file(dir.path(), "vehicles.txt", "0 2\n5 1\n");
        let rpath = write_file(dir.path(), "requests.txt", "1 2\n3 0\n4 4\n");
        let epath = write_file(dir.path(), "edges.txt", "0 1 2.5\n1 0 3\n");
        let mpath = write_file(dir.path(), "mapping.txt", "alpha\nbeta\n");

        let vehicles = read_vehicles(&vpath).unwrap();
        assert_eq!(vehicles, vec![Vehicle::new(0, 2), Vehicle::new(5, 1)]);
        let requests = read_requests(&rpath).unwrap();
        assert_eq!(requests, vec![Request::new(1, 2), Request::new(3, 0), Request::new(4, 4)]);
        let edges = read_edges(&epath).unwrap();
        assert_eq!(edges, vec![(0, 1, 2.5), (1, 0, 3.)]);
        let names = read_mapping(&mpath).unwrap();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_bad_inputs() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "edges.txt", "0 1 2.5\n1 0 -3\n");
        assert!(read_edges(&path).is_err());
        let path = write_file(dir.path(), "edges.txt", "0 1 2.5\n1 0 nan\n");
        assert!(read_edges(&path).is_err());
        let path = write_file(dir.path(), "vehicles.txt", "0 -2\n");
        assert!(read_vehicles(&path).is_err());
        let path = write_file(dir.path(), "requests.txt", "0 1 2\n");
        assert!(read_requests(&path).is_err());
    }

    #[test]
    fn test_append_edges_and_names() {
        let dir = tempdir().unwrap();
        let epath = write_file(dir.path(), "edges.txt", "0 1 2.5\n");
        let mpath = write_file(dir.path(), "mapping.txt", "alpha\nbeta\n");
        append_edges(&epath, &[
            EdgeRecord{index: 1, from: 2, to: 0, cost: 0.},
            EdgeRecord{index: 2, from: 0, to: 2, cost: 2.5},
        ]).unwrap();
        append_names(&mpath, &[String::from("alpha")]).unwrap();

        assert_eq!(read_edges(&epath).unwrap(), vec![(0, 1, 2.5), (2, 0, 0.), (0, 2, 2.5)]);
        assert_eq!(read_lines(&mpath), vec!["alpha", "beta", "alpha"]);
    }

    #[test]
    fn test_written_files_read_back() {
        let dir = tempdir().unwrap();
        let epath = dir.path().join("edges.txt");
        write_edges(&epath, &[(3, 1, 0.125), (1, 3, 7.)]).unwrap();
        assert_eq!(read_lines(&epath), vec!["3 1 0.125", "1 3 7"]);

        let vpath = dir.path().join("vehicles.txt");
        write_vehicles(&vpath, &[Vehicle::new(4, 3)]).unwrap();
        assert_eq!(read_vehicles(&vpath).unwrap(), vec![Vehicle::new(4, 3)]);

        let rpath = dir.path().join("requests.txt");
        write_requests(&rpath, &[Request::new(9, 8), Request::new(7, 6)]).unwrap();
        assert_eq!(read_lines(&rpath), vec!["9 8", "7 6"]);
    }

    #[test]
    fn test_write_routes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routes.txt");
        let routes = vec![
            vec![ConcreteStop{vertex: 4, delta: 0, request: None},
                 ConcreteStop{vertex: 2, delta: 1, request: Some(0)}],
            vec![ConcreteStop{vertex: 1, delta: 0, request: None}],
        ];
        write_routes(&path, &routes).unwrap();
        assert_eq!(read_lines(&path), vec!["4 2", "1"]);
        assert_eq!(read_routes(&path).unwrap(), vec![vec![4, 2], vec![1]]);
    }

    #[test]
    fn test_trim_mapping() {
        let names: Vec<String> = vec!["a", "b", "c"].into_iter().map(String::from).collect();
        assert_eq!(trim_mapping(names.clone(), 2), vec!["a", "b"]);
        assert_eq!(trim_mapping(names, 5), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_writing_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("requests.txt");
        match write_requests(&path, &[Request::new(0, 1)]) {
            Err(PlanError::Io{..}) => (),
            other => panic!("expected an io error, got {:?}", other),
        }
    }
}
