//! Plain-text layout result files
//!
//! ```text
//! # SGD Layout Result - Initial (Randomized)
//! # Timestamp: 2025-12-08 06:30:56
//! # Node count: 3
//! # Edge count: 2
//!
//! # Edges (source target)
//! 0 1
//! 1 2
//!
//! # Positions (x y)
//! 0.12 -0.4
//! ...
//! ```
//!
//! Position line `k` belongs to node `k`. The axis names in the positions
//! header fix the field count (`(x y)` when absent). Unknown `#` lines and
//! blank lines are ignored; data lines with the wrong field count are skipped. Pairs
//! before any section header are read as edges, so a bare edge list parses.

use crate::coordinates::Positions;
use crate::error::{LayoutError, Result};
use crate::graph::Graph;
use chrono::Local;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Edges,
    Positions,
}

/// Contents of one result file
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFile {
    pub title: String,
    pub timestamp: Option<String>,
    pub node_count: usize,
    pub edges: Vec<(usize, usize)>,
    pub positions: Vec<Vec<f64>>,
}

impl ResultFile {
    /// Snapshot a graph and layout, stamped with the current local time
    pub fn new(title: impl Into<String>, graph: &Graph, positions: &Positions) -> Self {
        Self {
            title: title.into(),
            timestamp: Some(Local::now().format(TIMESTAMP_FORMAT).to_string()),
            node_count: graph.node_count(),
            edges: graph.edges().to_vec(),
            positions: positions.iter().map(<[f64]>::to_vec).collect(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "# {}", self.title)?;
        if let Some(ts) = &self.timestamp {
            writeln!(out, "# Timestamp: {}", ts)?;
        }
        writeln!(out, "# Node count: {}", self.node_count)?;
        writeln!(out, "# Edge count: {}", self.edges.len())?;
        writeln!(out)?;
        writeln!(out, "# Edges (source target)")?;
        for (u, v) in &self.edges {
            writeln!(out, "{} {}", u, v)?;
        }
        writeln!(out)?;
        let dimensions = self.positions.first().map_or(2, Vec::len);
        writeln!(out, "# Positions ({})", axis_names(dimensions))?;
        for p in &self.positions {
            let line: Vec<String> = p.iter().map(f64::to_string).collect();
            writeln!(out, "{}", line.join(" "))?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut title = String::new();
        let mut timestamp = None;
        let mut node_count = None;
        let mut edges = Vec::new();
        let mut positions: Vec<Vec<f64>> = Vec::new();
        let mut section = Section::Header;
        let mut dimensions = 2;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim();
                if let Some(value) = comment.strip_prefix("Node count:") {
                    node_count = Some(parse_field::<usize>(value.trim(), line_no)?);
                } else if comment.starts_with("Edge count:") {
                    // recomputed from the edge section
                } else if let Some(value) = comment.strip_prefix("Timestamp:") {
                    timestamp = Some(value.trim().to_string());
                } else if comment.starts_with("Edges") {
                    section = Section::Edges;
                } else if let Some(rest) = comment.strip_prefix("Positions") {
                    section = Section::Positions;
                    dimensions = header_field_count(rest).unwrap_or(2);
                } else if title.is_empty() && section == Section::Header {
                    title = comment.to_string();
                }
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            match section {
                Section::Header | Section::Edges if fields.len() == 2 => {
                    let u = parse_field::<usize>(fields[0], line_no)?;
                    let v = parse_field::<usize>(fields[1], line_no)?;
                    edges.push((u, v));
                }
                Section::Positions if fields.len() == dimensions => {
                    let point = fields
                        .iter()
                        .map(|f| parse_field::<f64>(f, line_no))
                        .collect::<Result<Vec<_>>>()?;
                    positions.push(point);
                }
                Section::Positions => {
                    warn!(
                        line = line_no,
                        expected = dimensions,
                        "skipping position with {} fields",
                        fields.len()
                    );
                }
                _ => {
                    warn!(line = line_no, "skipping unrecognized line");
                }
            }
        }

        let inferred = edges
            .iter()
            .map(|&(u, v)| u.max(v) + 1)
            .max()
            .unwrap_or(0)
            .max(positions.len());

        Ok(Self {
            title,
            timestamp,
            node_count: node_count.unwrap_or(inferred),
            edges,
            positions,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    pub fn graph(&self) -> Result<Graph> {
        Graph::new(self.node_count, self.edges.iter().copied())
    }

    pub fn to_positions(&self) -> Result<Positions> {
        Positions::from_points(self.positions.clone())
    }
}

/// `x y` / `x y z` for up to three axes, `x1 .. xD` beyond
fn axis_names(dimensions: usize) -> String {
    match dimensions {
        1..=3 => ["x", "y", "z"][..dimensions].join(" "),
        _ => (1..=dimensions)
            .map(|k| format!("x{}", k))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Number of axis names in a `(x y ...)` suffix
fn header_field_count(rest: &str) -> Option<usize> {
    let start = rest.find('(')?;
    let end = rest[start..].find(')')? + start;
    match rest[start + 1..end].split_whitespace().count() {
        0 => None,
        n => Some(n),
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, line: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    field.parse::<T>().map_err(|e| LayoutError::Parse {
        line,
        message: format!("{:?}: {}", field, e),
    })
}
