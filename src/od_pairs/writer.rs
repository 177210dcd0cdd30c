use std::io::Write;

use super::{config::Methodology, Annotation, OdPair, Result};

pub const CSV_HEADER: &str = "origin,destination,dijkstra_rank";

/// Writes OD-pairs as CSV, preceded by two comment lines naming the input
/// graph and the methodology.
///
/// The header always declares the `dijkstra_rank` column, but only pairs
/// chosen by rank fill it. Rows of other methodologies have two fields.
pub struct OdPairWriter<W: Write> {
    writer: W,
}

impl<W: Write> OdPairWriter<W> {
    pub fn new(mut writer: W, input_graph: &str, methodology: &Methodology) -> Result<Self> {
        writeln!(writer, "# Input graph: {}", input_graph)?;
        writeln!(writer, "# Methodology: {}", methodology)?;
        writeln!(writer, "{}", CSV_HEADER)?;

        Ok(OdPairWriter { writer })
    }

    pub fn write(&mut self, pair: &OdPair) -> Result<()> {
        match pair.annotation {
            Some(Annotation::DijkstraRank(rank)) => writeln!(
                self.writer,
                "{},{},{}",
                pair.origin(),
                pair.destination(),
                rank
            )?,
            Some(Annotation::Distance(_)) | None => {
                writeln!(self.writer, "{},{}", pair.origin(), pair.destination())?
            }
        }
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
