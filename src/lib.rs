pub mod graphs;
pub mod od_pairs;
pub mod search;
pub mod utility;
