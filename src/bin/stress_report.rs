//! Stress report for saved layouts
//!
//! Reads one or more result files and prints their node/edge counts along
//! with the weighted and raw stress of the stored positions.

use sgd_layout::distance::DistanceMap;
use sgd_layout::result_file::ResultFile;
use sgd_layout::stress::{stress_with, StressMetric};
use std::path::{Path, PathBuf};

fn report(path: &Path) -> sgd_layout::Result<()> {
    let file = ResultFile::load(path)?;
    let graph = file.graph()?;
    let positions = file.to_positions()?;
    let dist = DistanceMap::from_graph(&graph);

    let weighted = stress_with(&dist, &positions, StressMetric::Weighted)?;
    let raw = stress_with(&dist, &positions, StressMetric::Raw)?;

    println!("File: {}", path.display());
    if !file.title.is_empty() {
        println!("  {}", file.title);
    }
    println!("  Nodes: {}, Edges: {}", graph.node_count(), graph.edge_count());
    println!("  Stress (weighted): {:.3}", weighted);
    println!("  Stress (raw):      {:.3}", raw);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() || paths.iter().any(|p| p.as_os_str() == "-h" || p.as_os_str() == "--help") {
        println!("Usage: stress_report FILE [FILE ...]");
        return;
    }

    let mut failed = false;
    for path in &paths {
        if let Err(e) = report(path) {
            eprintln!("Error: {}: {}", path.display(), e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
