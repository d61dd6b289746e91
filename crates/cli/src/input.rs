//! Incident text intake.

use std::io::{self, BufRead};

/// Terminator line, compared after trimming.
pub const END_MARKER: &str = "END";

/// Reads lines until one equal to [`END_MARKER`] or end of input.
///
/// The marker line itself is dropped. Lines are rejoined with `\n`.
pub fn read_incident<R: BufRead>(reader: R) -> io::Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim() == END_MARKER {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
