use super::collections::{
    dijkstra_data::{DijkstraData, DijkstraDataVec},
    vertex_distance_queue::{VertexDistanceQueue, VertexDistanceQueueBinaryHeap},
    vertex_expanded_data::{VertexExpandedData, VertexExpandedDataVec},
};
use crate::graphs::{Distance, Graph, Vertex};

/// Single source Dijkstra that is advanced one settled vertex at a time.
///
/// Vertices are settled in order of non-decreasing distance, vertices at equal
/// distance in order of increasing id. The buffers are allocated once and
/// reused by every search started with [`Dijkstra::init`].
pub struct Dijkstra<'a> {
    graph: &'a dyn Graph,
    data: DijkstraDataVec,
    expanded: VertexExpandedDataVec,
    queue: VertexDistanceQueueBinaryHeap,
    number_of_settled: u32,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a dyn Graph) -> Self {
        Dijkstra {
            graph,
            data: DijkstraDataVec::new(graph),
            expanded: VertexExpandedDataVec::new(graph),
            queue: VertexDistanceQueueBinaryHeap::new(),
            number_of_settled: 0,
        }
    }

    /// Resets all state of the previous search and starts a new one at
    /// `source`.
    pub fn init(&mut self, source: Vertex) {
        self.data.clear();
        self.expanded.clear();
        self.queue.clear();
        self.number_of_settled = 0;

        self.data.set_distance(source, 0);
        self.queue.insert(source, 0);
    }

    /// Settles the next vertex and returns it together with its final
    /// distance, or `None` once every reachable vertex is settled.
    pub fn settle_next(&mut self) -> Option<(Vertex, Distance)> {
        let graph = self.graph;
        let (tail, distance_tail) = loop {
            let (vertex, distance) = self.queue.pop()?;
            // skip stale queue entries
            if !self.expanded.expand(vertex) {
                break (vertex, distance);
            }
        };
        self.number_of_settled += 1;

        for edge in graph.edges(tail) {
            let current_distance_head = self.data.get_distance(edge.head);
            let alternative_distance_head = distance_tail.saturating_add(edge.weight);
            if alternative_distance_head < current_distance_head {
                self.data.set_distance(edge.head, alternative_distance_head);
                self.queue.insert(edge.head, alternative_distance_head);
            }
        }

        Some((tail, distance_tail))
    }

    /// Number of vertices settled since the last `init`. This is the Dijkstra
    /// rank of the last settled vertex.
    pub fn number_of_settled(&self) -> u32 {
        self.number_of_settled
    }

    /// Tentative distance of `vertex`, final once it is settled.
    pub fn get_distance(&self, vertex: Vertex) -> Option<Distance> {
        let distance = self.data.get_distance(vertex);
        if distance == Distance::MAX {
            return None;
        }
        Some(distance)
    }

    pub fn is_settled(&self, vertex: Vertex) -> bool {
        self.expanded.is_expanded(vertex)
    }
}

/// Runs a complete search from `source` and returns the settled vertices in
/// settlement order.
pub fn settlement_order(graph: &dyn Graph, source: Vertex) -> Vec<(Vertex, Distance)> {
    let mut dijkstra = Dijkstra::new(graph);
    dijkstra.init(source);
    std::iter::from_fn(|| dijkstra.settle_next()).collect()
}
