//! Pretty JSON emission.
//!
//! The output shapes are an external contract: two-space indentation,
//! one element per line, `\n` separators, result fields in a fixed
//! order, scores with exactly eight decimal places, and no trailing
//! newline at end of file. Fixtures compare these bytes verbatim, which
//! is why this is a small hand-rolled writer and not a serializer.

use crate::index::inverted::{InvertedIndex, SearchResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

fn indent(out: &mut impl Write, levels: usize) -> io::Result<()> {
    for _ in 0..levels {
        out.write_all(b"  ")?;
    }
    Ok(())
}

/// Write a quoted string, escaping the two characters that can appear in
/// locations and would otherwise break the output.
fn quoted(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(b"\"")?;
    for c in text.chars() {
        match c {
            '"' => out.write_all(b"\\\"")?,
            '\\' => out.write_all(b"\\\\")?,
            _ => write!(out, "{c}")?,
        }
    }
    out.write_all(b"\"")
}

/// Emit the full index: term → location → ascending positions.
pub fn write_index(index: &InvertedIndex, out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"{\n")?;
    let mut first_term = true;
    for term in index.stems() {
        if !first_term {
            out.write_all(b",\n")?;
        }
        first_term = false;
        indent(out, 1)?;
        quoted(out, term)?;
        out.write_all(b": {\n")?;
        let mut first_location = true;
        for location in index.locations(term) {
            if !first_location {
                out.write_all(b",\n")?;
            }
            first_location = false;
            indent(out, 2)?;
            quoted(out, location)?;
            out.write_all(b": [\n")?;
            let mut first_position = true;
            for position in index.positions(term, location) {
                if !first_position {
                    out.write_all(b",\n")?;
                }
                first_position = false;
                indent(out, 3)?;
                write!(out, "{position}")?;
            }
            if !first_position {
                out.write_all(b"\n")?;
            }
            indent(out, 2)?;
            out.write_all(b"]")?;
        }
        if !first_location {
            out.write_all(b"\n")?;
        }
        indent(out, 1)?;
        out.write_all(b"}")?;
    }
    if !first_term {
        out.write_all(b"\n")?;
    }
    out.write_all(b"}")
}

/// Emit the per-location token counts.
pub fn write_counts(index: &InvertedIndex, out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"{\n")?;
    let mut first = true;
    for (location, count) in index.counts() {
        if !first {
            out.write_all(b",\n")?;
        }
        first = false;
        indent(out, 1)?;
        quoted(out, location)?;
        write!(out, ": {count}")?;
    }
    if !first {
        out.write_all(b"\n")?;
    }
    out.write_all(b"}")
}

/// Emit ranked results keyed by query: `count`, eight-decimal `score`,
/// `where`, in that order.
pub fn write_results(
    results: &BTreeMap<String, Vec<SearchResult>>,
    out: &mut impl Write,
) -> io::Result<()> {
    out.write_all(b"{\n")?;
    let mut first_query = true;
    for (key, rows) in results {
        if !first_query {
            out.write_all(b",\n")?;
        }
        first_query = false;
        indent(out, 1)?;
        quoted(out, key)?;
        out.write_all(b": [\n")?;
        let mut first_row = true;
        for row in rows {
            if !first_row {
                out.write_all(b",\n")?;
            }
            first_row = false;
            indent(out, 2)?;
            out.write_all(b"{\n")?;
            indent(out, 3)?;
            writeln!(out, "\"count\": {},", row.count())?;
            indent(out, 3)?;
            writeln!(out, "\"score\": {:.8},", row.score())?;
            indent(out, 3)?;
            out.write_all(b"\"where\": ")?;
            quoted(out, row.location())?;
            out.write_all(b"\n")?;
            indent(out, 2)?;
            out.write_all(b"}")?;
        }
        if !first_row {
            out.write_all(b"\n")?;
        }
        indent(out, 1)?;
        out.write_all(b"]")?;
    }
    if !first_query {
        out.write_all(b"\n")?;
    }
    out.write_all(b"}")
}

pub fn write_index_file(index: &InvertedIndex, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_index(index, &mut out)?;
    out.flush()
}

pub fn write_counts_file(index: &InvertedIndex, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_counts(index, &mut out)?;
    out.flush()
}

pub fn write_results_file(
    results: &BTreeMap<String, Vec<SearchResult>>,
    path: &Path,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_results(results, &mut out)?;
    out.flush()
}

pub fn index_to_string(index: &InvertedIndex) -> String {
    let mut buf = Vec::new();
    let _ = write_index(index, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn counts_to_string(index: &InvertedIndex) -> String {
    let mut buf = Vec::new();
    let _ = write_counts(index, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn results_to_string(results: &BTreeMap<String, Vec<SearchResult>>) -> String {
    let mut buf = Vec::new();
    let _ = write_results(results, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
