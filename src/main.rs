use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use network_communities::render::{self, Layout, NodeStyle};
use network_communities::report;
use network_communities::{
    gnp_directed, gnp_undirected, to_undirected, CommunityDetector, NetworkAnalysis, Partition,
    TiePolicy,
};
use petgraph::graph::{Graph, NodeIndex, UnGraph};
use petgraph::EdgeType;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Generate a random graph, measure it and split it into communities.
#[derive(Parser, Debug)]
#[command(name = "network-communities", version)]
struct Args {
    /// Number of nodes
    #[arg(short, long, default_value_t = 500)]
    nodes: usize,

    /// Probability of each possible edge
    #[arg(short, long, default_value_t = 0.01)]
    probability: f64,

    /// RNG seed; omit for a different graph every run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generate an undirected graph instead of a directed one
    #[arg(long)]
    undirected: bool,

    /// Number of community partitions to compute
    #[arg(short, long, default_value_t = 1)]
    levels: usize,

    /// Remove only one edge per step when betweenness scores tie
    #[arg(long)]
    remove_first_tie: bool,

    /// Nodes listed in the betweenness table
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Nodes highlighted in the centrality drawing
    #[arg(long, default_value_t = 5)]
    highlight: usize,

    /// Degree histogram bins
    #[arg(long, default_value_t = 30)]
    bins: usize,

    /// Directory for DOT, PNG and CSV output
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Layout engine for the main drawings
    #[arg(long, value_enum, default_value_t = LayoutArg::Spring)]
    layout: LayoutArg,

    /// Render DOT files to PNG with Graphviz
    #[arg(long)]
    render: bool,

    /// Open rendered images in the default viewer
    #[arg(long, requires = "render")]
    open: bool,

    /// Also write per-node metrics as CSV
    #[arg(long)]
    csv: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Spring,
    Circular,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Spring => Layout::Spring,
            LayoutArg::Circular => Layout::Circular,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // 1. Generate the graph
    if args.undirected {
        let graph = gnp_undirected(args.nodes, args.probability, args.seed)
            .context("generating undirected graph")?;
        let undirected = graph.clone();
        run(&graph, &undirected, &args)
    } else {
        let graph = gnp_directed(args.nodes, args.probability, args.seed)
            .context("generating directed graph")?;
        let undirected = to_undirected(&graph);
        run(&graph, &undirected, &args)
    }
}

fn run<Ty>(graph: &Graph<usize, (), Ty>, undirected: &UnGraph<usize, ()>, args: &Args) -> Result<()>
where
    Ty: EdgeType + Sync,
{
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "generated graph"
    );

    // 2. Compute metrics
    let analysis = NetworkAnalysis::new(graph);

    // 3. Detect communities
    let tie_policy = if args.remove_first_tie {
        TiePolicy::RemoveFirst
    } else {
        TiePolicy::RemoveAll
    };
    let detector = CommunityDetector::new(undirected)
        .context("building community detector")?
        .with_tie_policy(tie_policy);
    let partitions: Vec<Partition> = detector.take(args.levels.max(1)).collect();
    let communities = partitions
        .last()
        .context("community detection produced no partition")?;
    for (level, partition) in partitions.iter().enumerate() {
        print!("{}", report::community_summary(level + 1, partition));
    }
    let membership = communities.membership();

    // 4. Drawings
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let top: HashSet<NodeIndex> = analysis
        .top_by_betweenness(args.highlight)
        .into_iter()
        .map(|(node, _)| node)
        .collect();
    let layout = Layout::from(args.layout);
    let drawings = [
        ("layout", NodeStyle::Plain, layout),
        ("top_nodes", NodeStyle::Highlight(&top), layout),
        ("communities", NodeStyle::Communities(&membership), layout),
        ("circular", NodeStyle::Plain, Layout::Circular),
    ];
    for (name, style, layout) in drawings {
        let dot_file = args.out_dir.join(format!("{name}.dot"));
        render::save_dot(graph, &style, &dot_file)
            .with_context(|| format!("writing {}", dot_file.display()))?;
        if args.render {
            draw(&dot_file, &args.out_dir.join(format!("{name}.png")), layout, args.open);
        }
    }

    // 5. Degree distribution
    let bins = analysis.degree_histogram(args.bins)?;
    print!("{}", report::histogram_chart(&bins));

    // 6. Top nodes by centrality
    print!("{}", report::top_nodes_table(&analysis, args.top));
    println!("Average clustering: {:.4}", analysis.average_clustering());

    if args.csv {
        let csv_file = args.out_dir.join("metrics.csv");
        report::write_csv(&csv_file, &analysis, Some(membership.as_slice()))
            .with_context(|| format!("writing {}", csv_file.display()))?;
    }

    Ok(())
}

/// Render one DOT file; Graphviz problems are logged, not fatal.
fn draw(dot_file: &Path, image: &Path, layout: Layout, open: bool) {
    match render::render_dot(dot_file, image, layout) {
        Ok(()) if open => {
            if let Err(e) = render::open_image(image) {
                warn!(error = %e, "could not open image");
            }
        }
        Ok(()) => {}
        Err(e) => warn!(error = %e, "skipping image"),
    }
}
