use crate::graphs::{Distance, Graph, Vertex};

/// Trait for handling data access in Dijkstra's algorithm.
pub trait DijkstraData {
    /// Clears all stored data, preparing for a new search.
    fn clear(&mut self);

    /// Retrieves the tentative distance of a given vertex. Unreached vertices
    /// report `Distance::MAX`.
    fn get_distance(&self, vertex: Vertex) -> Distance;

    /// Sets the tentative distance of a given vertex.
    fn set_distance(&mut self, vertex: Vertex, distance: Distance);
}

/// Tentative distances stored in a vector indexed by vertex. Only the entries
/// touched by the last search are reset on `clear`, so repeated searches that
/// stop early stay cheap on large graphs.
pub struct DijkstraDataVec {
    distances: Vec<Distance>,
    touched: Vec<Vertex>,
}

impl DijkstraDataVec {
    /// Constructs a new `DijkstraDataVec` for a given graph.
    pub fn new(graph: &dyn Graph) -> Self {
        DijkstraDataVec {
            distances: vec![Distance::MAX; graph.number_of_vertices() as usize],
            touched: Vec::new(),
        }
    }
}

impl DijkstraData for DijkstraDataVec {
    fn clear(&mut self) {
        for &vertex in self.touched.iter() {
            self.distances[vertex as usize] = Distance::MAX;
        }
        self.touched.clear();
    }

    fn get_distance(&self, vertex: Vertex) -> Distance {
        self.distances[vertex as usize]
    }

    fn set_distance(&mut self, vertex: Vertex, distance: Distance) {
        if self.distances[vertex as usize] == Distance::MAX {
            self.touched.push(vertex);
        }
        self.distances[vertex as usize] = distance;
    }
}
