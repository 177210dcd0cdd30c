use std::{fs, io::Write};

use od_workloads::{
    graphs::{
        road_graph::{CostFunction, RoadGraph},
        Graph, GraphError,
    },
    od_pairs::{
        config::{GenerationConfig, Methodology},
        generator::OdPairGenerator,
        generate,
        writer::OdPairWriter,
    },
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

// 0 -> 1 is short but slow, 0 -> 2 is long but fast
const FMI: &str = "# Type : maxspeed\n\
                   \n\
                   3\n\
                   3\n\
                   0 100 48.0 9.0 0\n\
                   1 101 48.1 9.1 0\n\
                   2 102 48.2 9.2 0\n\
                   0 1 100 3 10\n\
                   0 2 300 3 120\n\
                   1 2 50 3 10\n";

fn write_fmi(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("graph.fmi");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(FMI.as_bytes()).unwrap();
    path
}

#[test]
fn fmi_and_bincode_agree() {
    let dir = tempdir().unwrap();
    let fmi_path = write_fmi(dir.path());
    let bincode_path = dir.path().join("graph.bincode");

    let from_fmi = RoadGraph::from_file(&fmi_path).unwrap();
    from_fmi.to_bincode_file(&bincode_path).unwrap();
    let from_bincode = RoadGraph::from_file(&bincode_path).unwrap();

    assert_eq!(from_fmi.number_of_vertices(), 3);
    assert_eq!(from_bincode.number_of_vertices(), 3);
    assert_eq!(from_fmi.number_of_edges(), from_bincode.number_of_edges());
    for vertex in 0..3 {
        assert_eq!(from_fmi.out_edges(vertex), from_bincode.out_edges(vertex));
    }
}

#[test]
fn cost_function_changes_settlement_order() {
    let dir = tempdir().unwrap();
    let road_graph = RoadGraph::from_file(&write_fmi(dir.path())).unwrap();

    // length: 1 at 100, 2 at 150. travel time: 2 at 90, 1 at 360
    let by_length = road_graph.to_graph(CostFunction::Length);
    let by_time = road_graph.to_graph(CostFunction::TravelTime);
    assert_eq!(by_length.number_of_edges(), 3);

    let mut generator = OdPairGenerator::new(&by_length, ChaCha8Rng::seed_from_u64(0)).unwrap();
    assert_eq!(generator.destination_by_rank(0, 2).unwrap(), 1);

    let mut generator = OdPairGenerator::new(&by_time, ChaCha8Rng::seed_from_u64(0)).unwrap();
    assert_eq!(generator.destination_by_rank(0, 2).unwrap(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();

    assert!(matches!(
        RoadGraph::from_file(&dir.path().join("missing.fmi")),
        Err(GraphError::Io(_))
    ));
}

#[test]
fn corrupt_bincode_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.bincode");
    fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

    assert!(RoadGraph::from_file(&path).is_err());
}

#[test]
fn writes_csv_file() {
    let dir = tempdir().unwrap();
    let road_graph = RoadGraph::from_file(&write_fmi(dir.path())).unwrap();
    let graph = road_graph.to_graph(CostFunction::TravelTime);
    let output = dir.path().join("pairs.csv");

    let config = GenerationConfig::new(4, Methodology::Random);
    let file = fs::File::create(&output).unwrap();
    let mut writer = OdPairWriter::new(file, "graph.fmi", &config.methodology).unwrap();
    generate(&graph, &config, |pair| writer.write(pair)).unwrap();
    writer.finish().unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3 + 4);
    assert_eq!(lines[1], "# Methodology: random");
    for line in &lines[3..] {
        let fields: Vec<u32> = line.split(',').map(|field| field.parse().unwrap()).collect();
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|&vertex| vertex < graph.number_of_vertices()));
    }
}
