use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use rust_rideshare_init::generate;
use rust_rideshare_init::instance_io;
use rust_rideshare_init::sumo;
use rust_rideshare_init::{reduce_edge_file, run_from_config_file, RoadNetwork};


#[derive(Parser)]
#[command(name = "rideshare_init")]
#[command(author, version, about)]
#[command(long_about = "Builds a feasible initial plan for a pickup-and-delivery fleet.\n\n\
    Examples:\n  \
    rideshare_init net-to-graph --net city.net.xml --edges-out edges.txt --mapping-out mapping.txt\n  \
    rideshare_init scc edges.txt edges_scc.txt      Keep the largest strongly-connected part\n  \
    rideshare_init plan run.yaml                     Plan the instance a config describes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the instance described by a YAML config
    Plan {
        config: PathBuf,
    },

    /// Reduce an edge file to its largest strongly-connected component
    Scc {
        edges_in: PathBuf,
        edges_out: PathBuf,
    },

    /// Write vehicles parked at random vertices of an edge file
    RandomVehicles {
        #[arg(long)]
        edges: PathBuf,

        #[arg(long)]
        count: usize,

        #[arg(long)]
        capacity: usize,

        #[arg(short, long)]
        output: PathBuf,

        /// Seed for the random generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write requests between random vertices of an edge file
    RandomRequests {
        #[arg(long)]
        edges: PathBuf,

        #[arg(long)]
        count: usize,

        #[arg(short, long)]
        output: PathBuf,

        /// Seed for the random generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Drop the names of vertices an edge file doesn't have
    TrimMapping {
        #[arg(long)]
        edges: PathBuf,

        #[arg(long)]
        mapping: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract the road graph and its vertex names from a SUMO network
    NetToGraph {
        #[arg(long)]
        net: PathBuf,

        #[arg(long)]
        edges_out: PathBuf,

        #[arg(long)]
        mapping_out: PathBuf,
    },

    /// Turn a `;`-separated SUMO trips file into requests
    FormatTrips {
        #[arg(long)]
        trips: PathBuf,

        #[arg(long)]
        mapping: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Turn a routes file into a SUMO routes file
    FormatRoutes {
        #[arg(long)]
        routes: PathBuf,

        #[arg(long)]
        mapping: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn endpoints_of(edges_path: &Path) -> Result<Vec<usize>, Box<dyn Error>> {
    let edges = instance_io::read_edges(edges_path)?;
    Ok(RoadNetwork::from_edges(&edges).endpoint_vertices())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { config } => {
            let plan = run_from_config_file(&config)?;
            println!("assigned {} requests to {} vehicles", plan.assignment.len(),
                     plan.vehicles.len());
        }
        Commands::Scc { edges_in, edges_out } => {
            let summary = reduce_edge_file(&edges_in, &edges_out)?;
            println!("{} components; kept {} edges over {} vertices",
                     summary.num_components, summary.kept_edges, summary.largest_size);
        }
        Commands::RandomVehicles { edges, count, capacity, output, seed } => {
            let endpoints = endpoints_of(&edges)?;
            let mut rng = generate::seeded_rng(seed);
            let vehicles = generate::random_vehicles(&endpoints, count, capacity, &mut rng)?;
            instance_io::write_vehicles(&output, &vehicles)?;
        }
        Commands::RandomRequests { edges, count, output, seed } => {
            let endpoints = endpoints_of(&edges)?;
            let mut rng = generate::seeded_rng(seed);
            let requests = generate::random_requests(&endpoints, count, &mut rng)?;
            instance_io::write_requests(&output, &requests)?;
        }
        Commands::TrimMapping { edges, mapping, output } => {
            let edges = instance_io::read_edges(&edges)?;
            let num_vertices = RoadNetwork::from_edges(&edges).num_vertices();
            let names = instance_io::trim_mapping(instance_io::read_mapping(&mapping)?,
                                                  num_vertices);
            instance_io::write_names(&output, &names)?;
        }
        Commands::NetToGraph { net, edges_out, mapping_out } => {
            let graph = sumo::read_net_xml(&net)?;
            instance_io::write_edges(&edges_out, &graph.edges)?;
            instance_io::write_names(&mapping_out, &graph.names)?;
            println!("{} vertices, {} edges", graph.names.len(), graph.edges.len());
        }
        Commands::FormatTrips { trips, mapping, output } => {
            let names = instance_io::read_mapping(&mapping)?;
            let requests = sumo::read_trips_csv(&trips, &names)?;
            instance_io::write_requests(&output, &requests)?;
        }
        Commands::FormatRoutes { routes, mapping, output } => {
            let names = instance_io::read_mapping(&mapping)?;
            let routes = instance_io::read_routes(&routes)?;
            sumo::write_routes_xml(&output, &routes, &names)?;
        }
    }
    Ok(())
}
