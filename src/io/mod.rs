//! Tabular text input and output

mod input;
mod output;

pub use input::{parse_mesh, read_mesh};
pub use output::{
    read_results, read_results_file, write_results, write_results_file, ResultRow, RESULT_HEADER,
};
