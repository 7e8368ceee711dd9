use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use super::NameIndex;
use crate::{exact::PairingSolution, graph::*};

/// Writes a score matrix in the format understood by [`super::ScoreReader`]. Nodes missing from
/// `names` are written as `#id`.
pub trait ScoreWriter {
    fn try_write_scores<W: Write>(&self, writer: W, names: &NameIndex) -> std::io::Result<()>;

    fn try_write_scores_file<P: AsRef<Path>>(
        &self,
        path: P,
        names: &NameIndex,
    ) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_scores(writer, names)
    }
}

impl ScoreWriter for WeightMatrix {
    fn try_write_scores<W: Write>(&self, mut writer: W, names: &NameIndex) -> std::io::Result<()> {
        writeln!(writer, "first,second,score")?;
        for WeightedEdge(u, v, w) in self.edges() {
            // `{:?}` prints the shortest representation that parses back to the same value
            writeln!(
                writer,
                "{},{},{:?}",
                names.display_name(u),
                names.display_name(v),
                w
            )?;
        }
        writer.flush()
    }
}

/// Writes one line `name_a,name_b,score` per pair followed by a summary comment
pub trait PairingWriter {
    fn try_write_pairing<W: Write, M: WeightLookup>(
        &self,
        writer: W,
        weights: &M,
        names: &NameIndex,
    ) -> std::io::Result<()>;
}

impl PairingWriter for PairingSolution {
    fn try_write_pairing<W: Write, M: WeightLookup>(
        &self,
        mut writer: W,
        weights: &M,
        names: &NameIndex,
    ) -> std::io::Result<()> {
        for &Edge(u, v) in &self.pairing {
            writeln!(
                writer,
                "{},{},{}",
                names.display_name(u),
                names.display_name(v),
                weights.weight(u, v)
            )?;
        }
        writeln!(
            writer,
            "# total: {} ({})",
            self.score,
            if self.optimal { "optimal" } else { "not proven optimal" }
        )?;
        writer.flush()
    }
}
