use std::path::PathBuf;

use thiserror::Error;


/// Everything that can stop a planning run.  None of these are recoverable: the pipeline is
/// deterministic, so the only fix is different input.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?}, line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to read XML from {path:?}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: xml::reader::Error,
    },

    #[error("failed to write XML to {path:?}: {source}")]
    XmlWrite {
        path: PathBuf,
        #[source]
        source: xml::writer::Error,
    },

    #[error("failed to read CSV from {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no vertex is named {name:?}")]
    UnknownName { name: String },

    #[error("bad config: {0}")]
    Config(String),

    #[error("the edge list is empty")]
    EmptyGraph,

    #[error("vertex {vertex} is outside the graph ({num_vertices} vertices)")]
    UnknownVertex { vertex: usize, num_vertices: usize },

    #[error("no vehicle can feasibly serve request {request}")]
    UnassignableRequest { request: usize },

    #[error("no shortest-path predecessor recorded for vertex {vertex} from origin {origin}")]
    MissingPredecessor { origin: usize, vertex: usize },

    #[error("route steps from {from} to {to} but no such edge exists")]
    MissingCanonicalEdge { from: usize, to: usize },

    #[error("augmentation produced vertex {vertex}, which the route already visits")]
    DuplicateAugmentation { vertex: usize },
}

pub type PlanResult<T> = Result<T, PlanError>;

impl PlanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> PlanError {
        PlanError::Io { path: path.into(), source }
    }
}
