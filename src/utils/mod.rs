//! Generic utility primitives with zero deployment knowledge.
//!
//! - `color` - ANSI color codes for terminal diagnostics
//! - `command` - Subprocess execution with tracing and error reporting
//! - `io` - File I/O with consistent error handling

pub mod color;
pub mod command;
pub mod io;

pub use command::{run, subprocess_text_output, RunOptions};
pub use io::mkdir_p;
