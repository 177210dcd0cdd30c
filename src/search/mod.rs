pub mod collections;
pub mod dijkstra;
