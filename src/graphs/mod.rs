use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod road_graph;
pub mod vec_vec_graph;

pub type Vertex = u32;
pub type Distance = u32;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unable to read graph: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unable to decode graph: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("edge {tail} -> {head} references a vertex outside of 0..{number_of_vertices}")]
    VertexOutOfRange {
        tail: Vertex,
        head: Vertex,
        number_of_vertices: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedEdge {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Distance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaillessEdge {
    pub head: Vertex,
    pub weight: Distance,
}

impl TaillessEdge {
    pub fn set_tail(&self, tail: Vertex) -> WeightedEdge {
        WeightedEdge {
            tail,
            head: self.head,
            weight: self.weight,
        }
    }
}

/// A directed graph exposing exactly one cost per edge. This is the view the
/// searches run on.
pub trait Graph: Send + Sync {
    fn number_of_vertices(&self) -> u32;

    fn number_of_edges(&self) -> u32 {
        (0..self.number_of_vertices())
            .map(|vertex| self.edges(vertex).len() as u32)
            .sum::<u32>()
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_>;
}
