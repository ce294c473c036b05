//! Result table writer and reader

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FEMError, FEMResult};
use crate::results::ResultNode;

/// Column header of the result table
pub const RESULT_HEADER: &str =
    "Node,DisplacementX,DisplacementY,StressX,StressY,StressXY,PriStress1,PriStress2,MisesStress";

/// One row of the result table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub node: usize,
    pub displacement_x: f64,
    pub displacement_y: f64,
    pub stress_x: f64,
    pub stress_y: f64,
    pub stress_xy: f64,
    pub principal_1: f64,
    pub principal_2: f64,
    pub von_mises: f64,
}

impl From<&ResultNode> for ResultRow {
    fn from(node: &ResultNode) -> Self {
        Self {
            node: node.number,
            displacement_x: node.displacement.dx,
            displacement_y: node.displacement.dy,
            stress_x: node.stress.sx,
            stress_y: node.stress.sy,
            stress_xy: node.stress.txy,
            principal_1: node.stress.s1,
            principal_2: node.stress.s2,
            von_mises: node.stress.von_mises,
        }
    }
}

impl ResultRow {
    fn values(&self) -> [f64; 8] {
        [
            self.displacement_x,
            self.displacement_y,
            self.stress_x,
            self.stress_y,
            self.stress_xy,
            self.principal_1,
            self.principal_2,
            self.von_mises,
        ]
    }
}

/// Write the result table, one row per node
pub fn write_results<W: Write>(mut writer: W, nodes: &[ResultNode]) -> FEMResult<()> {
    writeln!(writer, "{RESULT_HEADER}")?;
    for node in nodes {
        let row = ResultRow::from(node);
        write!(writer, "{}", row.node)?;
        for value in row.values() {
            write!(writer, ",{value}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the result table to a file, replacing it if present
pub fn write_results_file(path: impl AsRef<Path>, nodes: &[ResultNode]) -> FEMResult<()> {
    let file = File::create(path.as_ref())?;
    write_results(BufWriter::new(file), nodes)
}

/// Parse a result table back into rows
pub fn read_results(input: &str) -> FEMResult<Vec<ResultRow>> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    match lines.next() {
        Some((_, header)) if header == RESULT_HEADER => {}
        Some((line, _)) => {
            return Err(FEMError::ParseFailure {
                line,
                message: "missing result table header".to_string(),
            })
        }
        None => return Ok(Vec::new()),
    }

    lines
        .map(|(line, text)| {
            let fail = |message: String| FEMError::ParseFailure { line, message };
            let fields: Vec<&str> = text.split(',').map(str::trim).collect();
            if fields.len() != 9 {
                return Err(fail(format!("result row has {} fields, expected 9", fields.len())));
            }

            let node = fields[0]
                .parse()
                .map_err(|_| fail(format!("invalid node number '{}'", fields[0])))?;
            let mut v = [0.0; 8];
            for (slot, field) in v.iter_mut().zip(&fields[1..]) {
                *slot = field
                    .parse()
                    .map_err(|_| fail(format!("invalid value '{field}'")))?;
            }

            Ok(ResultRow {
                node,
                displacement_x: v[0],
                displacement_y: v[1],
                stress_x: v[2],
                stress_y: v[3],
                stress_xy: v[4],
                principal_1: v[5],
                principal_2: v[6],
                von_mises: v[7],
            })
        })
        .collect()
}

/// Read a result table file
pub fn read_results_file(path: impl AsRef<Path>) -> FEMResult<Vec<ResultRow>> {
    let text = fs::read_to_string(path.as_ref())?;
    read_results(&text)
}
