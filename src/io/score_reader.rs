use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use crate::{
    errors::{InputError, Result},
    graph::*,
};
use log::warn;

/// One line `name_a, name_b, score` of a score file
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRecord {
    pub first: String,
    pub second: String,
    pub score: Score,
}

/// Sorted bijection between student names and node ids
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameIndex {
    names: Vec<String>,
}

impl NameIndex {
    /// Sorts and deduplicates `names`; the i-th smallest name receives id i
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort_unstable();
        names.dedup();
        Self { names }
    }

    pub fn id_of(&self, name: &str) -> Option<Node> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
            .map(|i| i as Node)
    }

    pub fn name_of(&self, u: Node) -> Option<&str> {
        self.names.get(u as usize).map(String::as_str)
    }

    /// Returns the name of `u` or its id if the index does not know `u`
    pub fn display_name(&self, u: Node) -> String {
        self.name_of(u)
            .map_or_else(|| format!("#{u}"), String::from)
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.names.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// How a score file is turned into a [`WeightMatrix`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderOptions {
    /// Score of pairs not listed in the file
    pub fill: Score,
    pub duplicates: DuplicatePolicy,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            fill: 0.0,
            duplicates: DuplicatePolicy::Overwrite,
        }
    }
}

pub trait ScoreFileReader: Sized {
    fn try_read_scores_with<R: BufRead>(
        reader: R,
        options: &ReaderOptions,
    ) -> Result<(Self, NameIndex)>;

    fn try_read_scores<R: BufRead>(reader: R) -> Result<(Self, NameIndex)> {
        Self::try_read_scores_with(reader, &ReaderOptions::default())
    }

    fn try_read_scores_file_with<P: AsRef<Path>>(
        path: P,
        options: &ReaderOptions,
    ) -> Result<(Self, NameIndex)> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_scores_with(buf_reader, options)
    }

    fn try_read_scores_file<P: AsRef<Path>>(path: P) -> Result<(Self, NameIndex)> {
        Self::try_read_scores_file_with(path, &ReaderOptions::default())
    }
}

impl ScoreFileReader for WeightMatrix {
    fn try_read_scores_with<R: BufRead>(
        reader: R,
        options: &ReaderOptions,
    ) -> Result<(Self, NameIndex)> {
        let records = ScoreReader::try_new(reader).collect::<Result<Vec<_>>>()?;

        let names = NameIndex::from_names(
            records
                .iter()
                .flat_map(|r| [r.first.clone(), r.second.clone()]),
        );

        // names stem from the records, hence every lookup succeeds
        let edges = records.iter().map(|r| {
            WeightedEdge(
                names.id_of(&r.first).unwrap_or(Node::MAX),
                names.id_of(&r.second).unwrap_or(Node::MAX),
                r.score,
            )
        });

        let matrix = WeightMatrix::try_from_edges(
            names.number_of_nodes(),
            edges,
            options.fill,
            options.duplicates,
        )?;

        Ok((matrix, names))
    }
}

/// Streams [`ScoreRecord`]s from a tabular source. Fields are separated by `,`, `;` or tabs, or,
/// if none of these occurs in a line, by whitespace. Empty lines and lines starting with `#` are
/// ignored, as is a header, i.e. a first data line with two names whose score column is not a
/// number. Skipping a header is logged, as it may also be a mistyped first record.
pub struct ScoreReader<R> {
    lines: Lines<R>,
    line_number: usize,
    seen_data: bool,
}

macro_rules! raise_error_unless {
    ($cond : expr, $line : expr, $info : expr) => {
        if !($cond) {
            return Err(InputError::InvalidInput(format!("line {}: {}", $line, $info)));
        }
    };
}

impl<R: BufRead> ScoreReader<R> {
    pub fn try_new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            seen_data: false,
        }
    }

    fn next_data_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            self.line_number += 1;
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x.into()),
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) if line.trim_start().starts_with('#') => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_record_line(&mut self) -> Result<Option<ScoreRecord>> {
        loop {
            let Some(line) = self.next_data_line()? else {
                return Ok(None);
            };

            let mut parts: Vec<&str> = line
                .split([',', ';', '\t'])
                .map(str::trim)
                .collect();
            if parts.len() == 1 {
                parts = line.split_whitespace().collect();
            }

            raise_error_unless!(
                parts.len() == 3,
                self.line_number,
                format!("expected 3 fields, found {}", parts.len())
            );

            let score = parts[2].parse::<Score>();
            let has_names = !parts[0].is_empty() && !parts[1].is_empty();
            if score.is_err() && has_names && !self.seen_data {
                warn!(
                    "line {}: treat {:?} as header; its score column is not a number",
                    self.line_number, line
                );
                self.seen_data = true;
                continue;
            }
            self.seen_data = true;

            raise_error_unless!(
                score.is_ok(),
                self.line_number,
                format!("cannot parse score {:?}", parts[2])
            );
            raise_error_unless!(has_names, self.line_number, "empty name");

            return Ok(Some(ScoreRecord {
                first: parts[0].to_owned(),
                second: parts[1].to_owned(),
                score: score.unwrap_or_default(),
            }));
        }
    }
}

impl<R: BufRead> Iterator for ScoreReader<R> {
    type Item = Result<ScoreRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_record_line().transpose()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::get_test_instances;
    use itertools::Itertools;

    const DEMO_FILE: &str = "# pairwise compatibility\nstudent_a,student_b,score\n\nbob, alice, 0.5\ncarol;dave;1.25\n# comment\nalice\tdave\t-2\nbob carol 3e-1\n";

    #[test]
    fn records() {
        let reader = ScoreReader::try_new(DEMO_FILE.as_bytes());
        let records = reader.collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(
            records
                .iter()
                .map(|r| (r.first.as_str(), r.second.as_str(), r.score))
                .collect_vec(),
            [
                ("bob", "alice", 0.5),
                ("carol", "dave", 1.25),
                ("alice", "dave", -2.0),
                ("bob", "carol", 0.3)
            ]
        );
    }

    #[test]
    fn matrix_and_names() {
        let (matrix, names) = WeightMatrix::try_read_scores(DEMO_FILE.as_bytes()).unwrap();

        assert_eq!(matrix.number_of_nodes(), 4);
        assert_eq!(
            (0..4).map(|u| names.name_of(u).unwrap()).collect_vec(),
            ["alice", "bob", "carol", "dave"]
        );
        assert_eq!(names.id_of("carol"), Some(2));
        assert_eq!(names.id_of("eve"), None);
        assert_eq!(names.display_name(7), "#7");

        assert_eq!(matrix.weight(0, 1), 0.5);
        assert_eq!(matrix.weight(3, 0), -2.0);
        assert_eq!(matrix.weight(1, 2), 0.3);
        assert_eq!(matrix.weight(1, 3), 0.0);
    }

    #[test]
    fn errors() {
        for (input, line) in [
            ("a,b,1\nc,d\n", 2),
            ("a,b,1\nc,d,x\n", 2),
            ("# c\n\na,b,1\n,d,1\n", 4),
            (",b,score\na,b,1\n", 1),
            ("a,b,score\nc,d,x\n", 2),
        ] {
            let err = WeightMatrix::try_read_scores(input.as_bytes()).unwrap_err();
            match err {
                InputError::InvalidInput(msg) => {
                    assert!(msg.starts_with(&format!("line {line}:")), "{msg}")
                }
                _ => panic!("unexpected error {err:?}"),
            }
        }

        // three names cannot be paired
        assert!(matches!(
            WeightMatrix::try_read_scores("a,b,1\nb,c,1\n".as_bytes()),
            Err(InputError::InvalidInput(_))
        ));

        // empty file
        assert!(matches!(
            WeightMatrix::try_read_scores("".as_bytes()),
            Err(InputError::InvalidInput(_))
        ));

        let duplicates = "a,b,1\nb,a,2\n";
        let (matrix, _) = WeightMatrix::try_read_scores(duplicates.as_bytes()).unwrap();
        assert_eq!(matrix.weight(0, 1), 2.0);

        let strict = ReaderOptions {
            duplicates: DuplicatePolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            WeightMatrix::try_read_scores_with(duplicates.as_bytes(), &strict),
            Err(InputError::AsymmetricInput { .. })
        ));
    }

    #[test]
    fn header_needs_two_names() {
        // the first data line is taken as header only if both name columns are set
        let (matrix, names) =
            WeightMatrix::try_read_scores("x,y,score\nc,d,1\n".as_bytes()).unwrap();
        assert_eq!(matrix.number_of_nodes(), 2);
        assert_eq!(names.id_of("x"), None);

        assert!(matches!(
            WeightMatrix::try_read_scores("c,,score\nc,d,1\n".as_bytes()),
            Err(InputError::InvalidInput(_))
        ));
    }

    #[test]
    fn fill() {
        let options = ReaderOptions {
            fill: -1.0,
            ..Default::default()
        };
        let (matrix, _) =
            WeightMatrix::try_read_scores_with("a,b,1\nc,d,1\n".as_bytes(), &options).unwrap();
        assert_eq!(matrix.weight(0, 2), -1.0);
        assert_eq!(matrix.weight(2, 3), 1.0);
    }

    #[test]
    fn instances() {
        let mut count = 0;
        for (filename, matrix) in get_test_instances("instances/*/*.csv") {
            assert!(matrix.number_of_nodes() % 2 == 0, "{filename}");
            count += 1;
        }
        assert!(count > 0);
    }
}
