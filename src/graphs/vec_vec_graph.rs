use serde::{Deserialize, Serialize};

use super::{Distance, Graph, TaillessEdge, Vertex, WeightedEdge};

/// Adjacency list graph with a single weight per edge. Edges sharing a tail
/// are kept sorted by head, parallel edges collapse to their minimum weight.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VecVecGraph {
    edges: Vec<Vec<TaillessEdge>>,
}

impl VecVecGraph {
    /// Creates a graph without edges on `number_of_vertices` vertices.
    pub fn with_vertices(number_of_vertices: u32) -> VecVecGraph {
        VecVecGraph {
            edges: vec![Vec::new(); number_of_vertices as usize],
        }
    }

    pub fn from_edges(edges: &[WeightedEdge]) -> VecVecGraph {
        let mut graph = VecVecGraph::default();

        edges.iter().for_each(|edge| {
            if edge.weight < graph.get_weight(edge.tail, edge.head).unwrap_or(Distance::MAX) {
                graph.set_weight(edge.tail, edge.head, edge.weight);
            }
        });

        graph
    }

    pub fn get_weight(&self, tail: Vertex, head: Vertex) -> Option<Distance> {
        // Retrieve the vector of edges sharing the same tail, if it exists.
        let edges_sharing_tail = self.edges.get(tail as usize)?;

        let edge_index = edges_sharing_tail
            .binary_search_by_key(&head, |tailless_edge| tailless_edge.head)
            .ok()?;

        Some(edges_sharing_tail[edge_index].weight)
    }

    pub fn set_weight(&mut self, tail: Vertex, head: Vertex, weight: Distance) {
        // Ensure the edge endpoints are within the bounds of self.edges.
        let max_edge_endpoint = std::cmp::max(tail, head) as usize;
        if max_edge_endpoint >= self.edges.len() {
            self.edges.resize(max_edge_endpoint + 1, Vec::new());
        }

        let edges_sharing_tail = &mut self.edges[tail as usize];

        match edges_sharing_tail.binary_search_by_key(&head, |other| other.head) {
            Ok(index) => edges_sharing_tail[index].weight = weight,
            Err(index) => edges_sharing_tail.insert(index, TaillessEdge { head, weight }),
        }
    }
}

impl Graph for VecVecGraph {
    fn number_of_vertices(&self) -> u32 {
        self.edges.len() as u32
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_> {
        // Define a struct for iterating over edges with the same tail. Struct is needed
        // as tail would otherwise not live long enough.
        struct EdgeIterator<'a> {
            edge_iter: std::slice::Iter<'a, TaillessEdge>,
            tail: Vertex,
        }

        impl<'a> Iterator for EdgeIterator<'a> {
            type Item = WeightedEdge;

            fn next(&mut self) -> Option<Self::Item> {
                self.edge_iter
                    .next()
                    .map(|tailless_edge| tailless_edge.set_tail(self.tail))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.edge_iter.size_hint()
            }
        }

        impl<'a> ExactSizeIterator for EdgeIterator<'a> {
            fn len(&self) -> usize {
                self.edge_iter.len()
            }
        }

        let edges: &[TaillessEdge] = self.edges.get(tail as usize).map_or(&[], Vec::as_slice);

        Box::new(EdgeIterator {
            edge_iter: edges.iter(),
            tail,
        })
    }
}
