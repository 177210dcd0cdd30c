use crate::graphs::{Graph, Vertex};

pub trait VertexExpandedData {
    /// Marks `vertex` as expanded and returns whether it already was.
    fn expand(&mut self, vertex: Vertex) -> bool;

    fn is_expanded(&self, vertex: Vertex) -> bool;

    fn clear(&mut self);
}

/// Expansion flags in a vector. Like `DijkstraDataVec`, clearing only resets
/// the vertices expanded since the last clear.
pub struct VertexExpandedDataVec {
    expanded: Vec<bool>,
    touched: Vec<Vertex>,
}

impl VertexExpandedDataVec {
    pub fn new(graph: &dyn Graph) -> Self {
        VertexExpandedDataVec {
            expanded: vec![false; graph.number_of_vertices() as usize],
            touched: Vec::new(),
        }
    }
}

impl VertexExpandedData for VertexExpandedDataVec {
    fn expand(&mut self, vertex: Vertex) -> bool {
        let is_expanded = self.expanded[vertex as usize];
        if !is_expanded {
            self.expanded[vertex as usize] = true;
            self.touched.push(vertex);
        }
        is_expanded
    }

    fn is_expanded(&self, vertex: Vertex) -> bool {
        self.expanded[vertex as usize]
    }

    fn clear(&mut self) {
        for &vertex in self.touched.iter() {
            self.expanded[vertex as usize] = false;
        }
        self.touched.clear();
    }
}
