//! SGD Layout Driver
//!
//! Lays out a random G(n, p) graph (or the graph of an existing result file),
//! reports stress before and after optimization, and writes the initial and
//! final layouts as result files.

use chrono::Local;
use sgd_layout::generators::gnp_random_graph;
use sgd_layout::result_file::ResultFile;
use sgd_layout::{compute_stress, Graph, LayoutConfig, SgdLayout};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

/// Driver options on top of the layout configuration
#[derive(Debug, Clone)]
struct DriverConfig {
    num_nodes: usize,
    edge_probability: f64,
    graph_seed: u64,
    input: Option<PathBuf>,
    output_dir: PathBuf,
    prefix: String,
    export_json: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            num_nodes: 500,
            edge_probability: 0.005,
            graph_seed: 34,
            input: None,
            output_dir: PathBuf::from("output"),
            prefix: "sgd-layout".to_string(),
            export_json: false,
        }
    }
}

/// Layout flags given on the command line; applied over the JSON config
#[derive(Debug, Clone, Default)]
struct LayoutOverrides {
    iterations: Option<usize>,
    epsilon: Option<f64>,
    dimensions: Option<usize>,
    seed: Option<u64>,
    shuffle_seed: Option<u64>,
    no_center: bool,
}

impl LayoutOverrides {
    fn apply(&self, config: &mut LayoutConfig) {
        if let Some(v) = self.iterations {
            config.iterations = v;
        }
        if let Some(v) = self.epsilon {
            config.epsilon = v;
        }
        if let Some(v) = self.dimensions {
            config.dimensions = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if self.shuffle_seed.is_some() {
            config.shuffle_seed = self.shuffle_seed;
        }
        if self.no_center {
            config.center = false;
        }
    }
}

fn value<T: FromStr>(args: &[String], i: usize) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let flag = &args[i];
    let raw = args
        .get(i + 1)
        .ok_or_else(|| format!("{} expects a value", flag))?;
    raw.parse::<T>()
        .map_err(|e| format!("invalid value {:?} for {}: {}", raw, flag, e))
}

fn print_help() {
    println!("Usage: sgd_layout [OPTIONS]");
    println!();
    println!("Graph:");
    println!("  -n, --nodes NUM         Nodes of the random graph (default: 500)");
    println!("  -p, --prob P            Edge probability (default: 0.005)");
    println!("      --graph-seed NUM    Random graph seed (default: 34)");
    println!("  -i, --input PATH        Use the graph of a result file instead");
    println!();
    println!("Layout:");
    println!("  -c, --config PATH       JSON layout config (flags below override it)");
    println!("      --iterations NUM    Learning-rate schedule length (default: 15)");
    println!("      --epsilon E         Final step multiplier, in (0, 1) (default: 0.1)");
    println!("      --dim NUM           Layout dimensions (default: 2)");
    println!("      --seed NUM          Placement seed (default: 0)");
    println!("      --shuffle-seed NUM  Pair permutation seed (default: derived)");
    println!("      --no-center         Keep layouts uncentered");
    println!();
    println!("Output:");
    println!("  -o, --output-dir DIR    Directory for result files (default: output)");
    println!("      --prefix NAME       File name prefix (default: sgd-layout)");
    println!("      --json              Also export both layouts as JSON");
    println!("  -h, --help              Show this help");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut driver = DriverConfig::default();
    let mut config_path: Option<PathBuf> = None;
    let mut overrides = LayoutOverrides::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--nodes" | "-n" => {
                driver.num_nodes = value(&args, i)?;
                i += 1;
            }
            "--prob" | "-p" => {
                driver.edge_probability = value(&args, i)?;
                i += 1;
            }
            "--graph-seed" => {
                driver.graph_seed = value(&args, i)?;
                i += 1;
            }
            "--input" | "-i" => {
                driver.input = Some(value(&args, i)?);
                i += 1;
            }
            "--config" | "-c" => {
                config_path = Some(value(&args, i)?);
                i += 1;
            }
            "--iterations" => {
                overrides.iterations = Some(value(&args, i)?);
                i += 1;
            }
            "--epsilon" => {
                overrides.epsilon = Some(value(&args, i)?);
                i += 1;
            }
            "--dim" => {
                overrides.dimensions = Some(value(&args, i)?);
                i += 1;
            }
            "--seed" => {
                overrides.seed = Some(value(&args, i)?);
                i += 1;
            }
            "--shuffle-seed" => {
                overrides.shuffle_seed = Some(value(&args, i)?);
                i += 1;
            }
            "--no-center" => {
                overrides.no_center = true;
            }
            "--output-dir" | "-o" => {
                driver.output_dir = value(&args, i)?;
                i += 1;
            }
            "--prefix" => {
                driver.prefix = value(&args, i)?;
                i += 1;
            }
            "--json" => {
                driver.export_json = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                tracing::warn!("ignoring unknown argument {}", other);
            }
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;

    let graph: Graph = match &driver.input {
        Some(path) => ResultFile::load(path)?.graph()?,
        None => gnp_random_graph(driver.num_nodes, driver.edge_probability, driver.graph_seed),
    };

    let degrees = graph.degrees();
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let isolated = degrees.iter().filter(|&&d| d == 0).count();
    let mean_degree = if degrees.is_empty() {
        0.0
    } else {
        2.0 * graph.edge_count() as f64 / degrees.len() as f64
    };

    let layout = SgdLayout::with_config(config);
    let config = layout.config();

    println!("Configuration:");
    println!("  Nodes:       {}", graph.node_count());
    println!("  Edges:       {}", graph.edge_count());
    println!(
        "  Degree:      mean {:.2}, max {}, isolated {}",
        mean_degree, max_degree, isolated
    );
    println!("  Dimensions:  {}", config.dimensions);
    println!("  Iterations:  {}", config.iterations);
    println!("  Epsilon:     {}", config.epsilon);
    println!("  Seed:        {}", config.seed);
    println!("  Center:      {}", if config.center { "yes" } else { "no" });
    println!();

    let start = Instant::now();
    let result = layout.compute(&graph)?;
    let elapsed = start.elapsed();

    let s0 = compute_stress(&graph, &result.initial)?;
    let s1 = compute_stress(&graph, &result.final_positions)?;
    println!("stress (init)  = {:.3}", s0);
    println!("stress (after) = {:.3}", s1);
    println!("layout time    = {:.3}s", elapsed.as_secs_f64());
    println!();

    std::fs::create_dir_all(&driver.output_dir)?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let base = format!("{}-{}", driver.prefix, stamp);

    let files = [
        ("SGD Layout Result - Initial (Randomized)", &result.initial, 0),
        ("SGD Layout Result - Processed", &result.final_positions, 1),
    ];
    for (title, positions, suffix) in files {
        let path = driver.output_dir.join(format!("{}-{}.txt", base, suffix));
        ResultFile::new(title, &graph, positions).save(&path)?;
        println!("Result saved to {}", path.display());
    }

    if driver.export_json {
        let path = driver.output_dir.join(format!("{}.json", base));
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(file, &result)?;
        println!("JSON layout saved to {}", path.display());
    }

    Ok(())
}
