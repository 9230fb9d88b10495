// Conversions between SUMO network, trip, and route files and the flat instance files.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use xml::attribute::OwnedAttribute;
use xml::common::Position;
use xml::reader::XmlEvent;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent as WriterEvent};

use super::config_utils::{get_xml_attribute_value, parse_field, xml_parser_from_path};
use super::errors::{PlanError, PlanResult};
use super::insertion::Request;


/// The vehicle type every written route uses.
static VEHICLE_TYPE: [(&str, &str); 7] = [
    ("id", "type1"),
    ("accel", "0.8"),
    ("decel", "4.5"),
    ("sigma", "0.5"),
    ("length", "5"),
    ("maxSpeed", "70"),
    ("vClass", "ignoring"),
];

// A convenience type for parsing csv data
type Row = HashMap<String, String>;

/// The road graph of a SUMO network.  Every non-internal SUMO edge is a vertex, named by its
/// SUMO id, and every connection between two of them is an edge costing the travel time along
/// the SUMO edge it leads onto.
#[derive(PartialEq, Debug, Clone)]
pub struct SumoGraph {
    pub edges: Vec<(usize, usize, f64)>,
    pub names: Vec<String>,
}

fn required_attribute(attributes: &[OwnedAttribute], attr_name: &str) -> Result<String, String> {
    get_xml_attribute_value(attributes, attr_name)
        .ok_or_else(|| format!("missing attribute {:?}", attr_name))
}

/// Reads the graph out of a `.net.xml` file.
///
/// A lane's travel time is its length over its speed, and is recorded for the SUMO edge named
/// by the lane id up to its first underscore; the last lane listed wins.  Vertices are numbered
/// in the order their edges appear.  Repeated connections between the same pair of edges yield
/// a single graph edge.
pub fn read_net_xml(path: &Path) -> PlanResult<SumoGraph> {
    let mut parser = xml_parser_from_path(path)?;
    let mut names: Vec<String> = vec![];
    let mut ids: HashMap<String, usize> = HashMap::new();
    let mut travel_times: HashMap<String, f64> = HashMap::new();
    let mut successors: Vec<Vec<(usize, f64)>> = vec![];

    loop {
        let event = parser.next().map_err(|err| PlanError::Xml {
            path: path.to_path_buf(),
            source: err,
        })?;
        let (element, attributes) = match event {
            XmlEvent::EndDocument => break,
            XmlEvent::StartElement{name, attributes, ..} => (name.local_name, attributes),
            _ => continue,
        };
        let line = parser.position().row as usize + 1;
        let parse_err = |message: String| PlanError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        if let Some(length) = get_xml_attribute_value(&attributes, "length") {
            let length: f64 = parse_field(&length, "length").map_err(parse_err)?;
            let speed = required_attribute(&attributes, "speed").map_err(parse_err)?;
            let speed: f64 = parse_field(&speed, "speed").map_err(parse_err)?;
            let id = required_attribute(&attributes, "id").map_err(parse_err)?;
            let edge_id = id.split('_').next().unwrap_or("");
            travel_times.insert(String::from(edge_id), length / speed);
        }

        match element.as_str() {
            "edge" => {
                let function = get_xml_attribute_value(&attributes, "function");
                if function.as_deref() == Some("internal") {
                    continue;
                }
                let id = required_attribute(&attributes, "id").map_err(parse_err)?;
                if ! ids.contains_key(&id) {
                    ids.insert(id.clone(), names.len());
                    names.push(id);
                    successors.push(vec![]);
                }
            }
            "connection" => {
                let from = required_attribute(&attributes, "from").map_err(parse_err)?;
                let to = required_attribute(&attributes, "to").map_err(parse_err)?;
                if let (Some(&from_idx), Some(&to_idx)) = (ids.get(&from), ids.get(&to)) {
                    let cost = match travel_times.get(&to) {
                        Some(cost) => *cost,
                        None => return Err(parse_err(format!("edge {:?} has no lanes", to))),
                    };
                    let outgoing = &mut successors[from_idx];
                    if ! outgoing.iter().any(|(succ, _)| *succ == to_idx) {
                        outgoing.push((to_idx, cost));
                    }
                }
            }
            _ => (),
        }
    }

    let edges: Vec<(usize, usize, f64)> = successors.iter().enumerate()
        .flat_map(|(from, outgoing)| outgoing.iter().map(move |(to, cost)| (from, *to, *cost)))
        .collect();
    log::info!("read {} vertices and {} edges from {:?}", names.len(), edges.len(), path);
    Ok(SumoGraph{edges, names})
}

/// Reads requests from a `;`-separated trips file with `trip_from` and `trip_to` columns naming
/// SUMO edges.  A name is resolved to the first vertex in `names` that carries it.
pub fn read_trips_csv(path: &Path, names: &[String]) -> PlanResult<Vec<Request>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (ii, name) in names.iter().enumerate() {
        index.entry(name.as_str()).or_insert(ii);
    }

    let file = File::open(path).map_err(|err| PlanError::io(path, err))?;
    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(file);
    let mut requests = vec![];
    for (ii, result) in reader.deserialize().enumerate() {
        let row: Row = result.map_err(|err| PlanError::Csv {
            path: path.to_path_buf(),
            source: err,
        })?;
        let vertex_in = |column: &str| -> PlanResult<usize> {
            let name = row.get(column).ok_or_else(|| PlanError::Parse {
                path: path.to_path_buf(),
                // the header is line 1
                line: ii + 2,
                message: format!("missing column {:?}", column),
            })?;
            let name = name.trim();
            index.get(name).copied().ok_or_else(|| PlanError::UnknownName {
                name: String::from(name),
            })
        };
        requests.push(Request::new(vertex_in("trip_from")?, vertex_in("trip_to")?));
    }
    Ok(requests)
}

fn emit_routes<W: Write>(writer: &mut EventWriter<W>, named_routes: &[String])
                         -> Result<(), xml::writer::Error> {
    writer.write(WriterEvent::start_element("routes"))?;
    let mut vehicle_type = WriterEvent::start_element("vType");
    for (key, value) in VEHICLE_TYPE.iter() {
        vehicle_type = vehicle_type.attr(*key, value);
    }
    writer.write(vehicle_type)?;
    writer.write(WriterEvent::end_element())?;

    for (veh_idx, edges) in named_routes.iter().enumerate() {
        let id = veh_idx.to_string();
        writer.write(WriterEvent::start_element("vehicle")
                     .attr("id", &id)
                     .attr("type", "type1")
                     .attr("depart", "0"))?;
        writer.write(WriterEvent::start_element("route").attr("edges", edges))?;
        writer.write(WriterEvent::end_element())?;
        writer.write(WriterEvent::end_element())?;
    }
    writer.write(WriterEvent::end_element())
}

/// Writes routes given as vertex ids to a SUMO routes file, one vehicle per route, all departing
/// at time 0.  Each route lists the names of its vertices, with consecutive repeats collapsed
/// so a vertex and its copies appear once.
pub fn write_routes_xml(path: &Path, routes: &[Vec<usize>], names: &[String])
                        -> PlanResult<()> {
    let mut named_routes = Vec::with_capacity(routes.len());
    for route in routes {
        let mut named: Vec<&str> = Vec::with_capacity(route.len());
        for vertex in route {
            match names.get(*vertex) {
                Some(name) => named.push(name),
                None => return Err(PlanError::UnknownVertex {
                    vertex: *vertex,
                    num_vertices: names.len(),
                }),
            }
        }
        named.dedup();
        named_routes.push(named.join(" "));
    }

    let file = File::create(path).map_err(|err| PlanError::io(path, err))?;
    let mut writer = EmitterConfig::new().perform_indent(true)
                                         .create_writer(BufWriter::new(file));
    emit_routes(&mut writer, &named_routes).map_err(|err| PlanError::XmlWrite {
        path: path.to_path_buf(),
        source: err,
    })?;
    writer.into_inner().flush().map_err(|err| PlanError::io(path, err))
}
