use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter},
    path::Path,
};

use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use super::{vec_vec_graph::VecVecGraph, Distance, GraphError, Vertex};

/// Edge attribute used as search weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CostFunction {
    /// Physical length.
    Length,
    /// Travel time in deciseconds.
    #[default]
    TravelTime,
}

impl CostFunction {
    pub fn describe(&self) -> &'static str {
        match self {
            CostFunction::Length => "physical lengths",
            CostFunction::TravelTime => "travel times",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadEdge {
    pub head: Vertex,
    pub length: Distance,
    pub travel_time: Distance,
}

impl RoadEdge {
    pub fn cost(&self, cost_function: CostFunction) -> Distance {
        match cost_function {
            CostFunction::Length => self.length,
            CostFunction::TravelTime => self.travel_time,
        }
    }
}

/// Road network carrying both cost attributes on every edge.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoadGraph {
    edges: Vec<Vec<RoadEdge>>,
}

impl RoadGraph {
    pub fn with_vertices(number_of_vertices: u32) -> RoadGraph {
        RoadGraph {
            edges: vec![Vec::new(); number_of_vertices as usize],
        }
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn number_of_edges(&self) -> u32 {
        self.edges.iter().map(|edges| edges.len() as u32).sum()
    }

    pub fn out_edges(&self, tail: Vertex) -> &[RoadEdge] {
        self.edges.get(tail as usize).map_or(&[], Vec::as_slice)
    }

    /// Inserts an edge. Parallel edges keep the minimum of each attribute.
    pub fn add_edge(&mut self, tail: Vertex, edge: RoadEdge) -> Result<(), GraphError> {
        let number_of_vertices = self.number_of_vertices();
        if tail >= number_of_vertices || edge.head >= number_of_vertices {
            return Err(GraphError::VertexOutOfRange {
                tail,
                head: edge.head,
                number_of_vertices,
            });
        }

        let edges_sharing_tail = &mut self.edges[tail as usize];
        match edges_sharing_tail.binary_search_by_key(&edge.head, |other| other.head) {
            Ok(index) => {
                let existing = &mut edges_sharing_tail[index];
                existing.length = existing.length.min(edge.length);
                existing.travel_time = existing.travel_time.min(edge.travel_time);
            }
            Err(index) => edges_sharing_tail.insert(index, edge),
        }

        Ok(())
    }

    /// Projects the road network onto a single-weight graph under
    /// `cost_function`.
    pub fn to_graph(&self, cost_function: CostFunction) -> VecVecGraph {
        let mut graph = VecVecGraph::with_vertices(self.number_of_vertices());

        for (tail, edges) in self.edges.iter().enumerate() {
            for edge in edges {
                graph.set_weight(tail as Vertex, edge.head, edge.cost(cost_function));
            }
        }

        graph
    }

    /// Reads a `.bincode` file, any other extension is parsed as `.fmi` text.
    pub fn from_file(path: &Path) -> Result<RoadGraph, GraphError> {
        let graph = match path.extension().and_then(|extension| extension.to_str()) {
            Some("bincode") => RoadGraph::from_bincode_file(path)?,
            _ => RoadGraph::from_fmi_file(path)?,
        };

        info!(
            "read graph with {} vertices and {} edges from {}",
            graph.number_of_vertices(),
            graph.number_of_edges(),
            path.display()
        );

        Ok(graph)
    }

    pub fn from_bincode_file(path: &Path) -> Result<RoadGraph, GraphError> {
        let reader = BufReader::new(File::open(path)?);
        let graph: RoadGraph = bincode::deserialize_from(reader)?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_bincode_file(&self, path: &Path) -> Result<(), GraphError> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn from_fmi_file(path: &Path) -> Result<RoadGraph, GraphError> {
        RoadGraph::from_fmi_reader(BufReader::new(File::open(path)?))
    }

    /// Parses the `.fmi` text format: comment lines starting with `#`, the
    /// number of vertices, the number of edges, one line per vertex and one
    /// line per edge `tail head length [type maxspeed]`.
    pub fn from_fmi_reader<R: BufRead>(reader: R) -> Result<RoadGraph, GraphError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(index, line)| line.map(|line| (index + 1, line)))
            .filter_ok(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'));

        let mut next_count = |what: &str| -> Result<u32, GraphError> {
            let (line_number, line) =
                lines.next().transpose()?.ok_or_else(|| GraphError::Parse {
                    line: 0,
                    message: format!("missing {}", what),
                })?;
            parse_field(line.trim(), line_number, what)
        };

        let number_of_vertices = next_count("number of vertices")?;
        let number_of_edges = next_count("number of edges")?;

        let mut graph = RoadGraph::with_vertices(number_of_vertices);

        let mut edge_lines = lines.skip(number_of_vertices as usize);
        for _ in 0..number_of_edges {
            let (line_number, line) =
                edge_lines
                    .next()
                    .transpose()?
                    .ok_or_else(|| GraphError::Parse {
                        line: 0,
                        message: format!("expected {} edges", number_of_edges),
                    })?;
            let (tail, edge) = parse_fmi_edge(&line, line_number)?;
            graph.add_edge(tail, edge)?;
        }

        Ok(graph)
    }

    fn validate(&self) -> Result<(), GraphError> {
        let number_of_vertices = self.number_of_vertices();
        for (tail, edges) in self.edges.iter().enumerate() {
            if let Some(edge) = edges.iter().find(|edge| edge.head >= number_of_vertices) {
                return Err(GraphError::VertexOutOfRange {
                    tail: tail as Vertex,
                    head: edge.head,
                    number_of_vertices,
                });
            }
        }
        Ok(())
    }
}

fn parse_field(value: &str, line: usize, what: &str) -> Result<u32, GraphError> {
    value.parse().map_err(|_| GraphError::Parse {
        line,
        message: format!("unable to parse {} from '{}'", what, value),
    })
}

fn parse_fmi_edge(line: &str, line_number: usize) -> Result<(Vertex, RoadEdge), GraphError> {
    let values = line.split_whitespace().collect_vec();
    if values.len() < 3 {
        return Err(GraphError::Parse {
            line: line_number,
            message: format!("expected 'tail head length', found '{}'", line),
        });
    }

    let tail = parse_field(values[0], line_number, "tail")?;
    let head = parse_field(values[1], line_number, "head")?;
    let length = parse_field(values[2], line_number, "length")?;
    let max_speed = match values.get(4) {
        Some(value) => parse_field(value, line_number, "maxspeed")?,
        None => 0,
    };

    let edge = RoadEdge {
        head,
        length,
        travel_time: travel_time(length, max_speed),
    };

    Ok((tail, edge))
}

/// Travel time in deciseconds for `length` meters at `max_speed` km/h. Falls
/// back to the length if no speed is known.
fn travel_time(length: Distance, max_speed: u32) -> Distance {
    if max_speed == 0 {
        return length;
    }

    let deciseconds = (36 * length as u64).div_ceil(max_speed as u64).max(1);
    deciseconds.min(Distance::MAX as u64) as Distance
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::graphs::Graph;

    const FMI: &str = "# a comment\n\
                       # another comment\n\
                       \n\
                       3\n\
                       3\n\
                       0 0 48.1 9.1 300\n\
                       1 1 48.2 9.2 300\n\
                       2 2 48.3 9.3 300\n\
                       0 1 100 3 50\n\
                       1 2 200 3 100\n\
                       2 0 10\n";

    #[test]
    fn reads_fmi() {
        let graph = RoadGraph::from_fmi_reader(Cursor::new(FMI)).unwrap();

        assert_eq!(graph.number_of_vertices(), 3);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(
            graph.out_edges(0),
            &[RoadEdge {
                head: 1,
                length: 100,
                travel_time: 72
            }]
        );
        assert_eq!(graph.out_edges(1)[0].travel_time, 72);
        assert_eq!(graph.out_edges(2)[0].travel_time, 10);
    }

    #[test]
    fn projection_picks_cost_function() {
        let graph = RoadGraph::from_fmi_reader(Cursor::new(FMI)).unwrap();

        let by_length = graph.to_graph(CostFunction::Length);
        let by_time = graph.to_graph(CostFunction::TravelTime);

        assert_eq!(by_length.get_weight(0, 1), Some(100));
        assert_eq!(by_time.get_weight(0, 1), Some(72));
        assert_eq!(by_time.number_of_vertices(), 3);
        assert_eq!(by_time.number_of_edges(), 3);
    }

    #[test]
    fn rejects_edges_out_of_range() {
        let mut graph = RoadGraph::with_vertices(2);
        let edge = RoadEdge {
            head: 2,
            length: 1,
            travel_time: 1,
        };

        assert!(matches!(
            graph.add_edge(0, edge),
            Err(GraphError::VertexOutOfRange { head: 2, .. })
        ));
    }

    #[test]
    fn reports_line_of_malformed_edge() {
        let fmi = "2\n1\n0\n1\n0 x 3\n";
        let error = RoadGraph::from_fmi_reader(Cursor::new(fmi)).unwrap_err();

        assert!(matches!(error, GraphError::Parse { line: 5, .. }));
    }

    #[test]
    fn reports_missing_edges() {
        let fmi = "2\n2\n0\n1\n0 1 3\n";
        let error = RoadGraph::from_fmi_reader(Cursor::new(fmi)).unwrap_err();

        assert!(matches!(error, GraphError::Parse { .. }));
    }

    #[test]
    fn travel_time_rounds_up() {
        assert_eq!(travel_time(100, 50), 72);
        assert_eq!(travel_time(1, 130), 1);
        assert_eq!(travel_time(7, 0), 7);
    }
}
