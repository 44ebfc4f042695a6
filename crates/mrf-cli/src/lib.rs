//! Library side of the `mrf` command-line tool.

pub mod logging;
pub mod pipeline;
