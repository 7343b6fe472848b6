//! Console tables and CSV export of the analysis.

use crate::analysis::{HistogramBin, NetworkAnalysis};
use crate::error::Result;
use crate::partition::Partition;
use std::path::Path;
use tracing::info;

const HISTOGRAM_WIDTH: usize = 40;

/// The `k` nodes of highest betweenness with their degree, tab separated.
pub fn top_nodes_table(analysis: &NetworkAnalysis, k: usize) -> String {
    let mut out = String::from("Top nodes by betweenness:\nNode\tBetweenness\tDegree\n");
    for (node, score) in analysis.top_by_betweenness(k) {
        out.push_str(&format!(
            "{}\t{:.4}\t{}\n",
            node.index(),
            score,
            analysis.degree()[node.index()]
        ));
    }
    out
}

/// Community count and sizes of one partition, largest first.
pub fn community_summary(level: usize, partition: &Partition) -> String {
    let mut sizes = partition.sizes();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    let mut out = format!(
        "Level {level}: {} communities over {} nodes\n",
        partition.len(),
        partition.node_count()
    );
    for (i, size) in sizes.iter().enumerate() {
        out.push_str(&format!("  community {i}: {size} members\n"));
    }
    out
}

/// Horizontal bar chart of a degree histogram.
pub fn histogram_chart(bins: &[HistogramBin]) -> String {
    let tallest = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut out = String::from("Degree distribution:\n");
    for bin in bins {
        let bar = bin.count * HISTOGRAM_WIDTH / tallest;
        out.push_str(&format!(
            "{:>7.2} - {:<7.2} | {:<width$} {}\n",
            bin.low,
            bin.high,
            "#".repeat(bar),
            bin.count,
            width = HISTOGRAM_WIDTH
        ));
    }
    out
}

/// Write one row per node: `node,degree,betweenness,clustering,community`.
///
/// The community column is empty when no membership is given.
pub fn write_csv(path: &Path, analysis: &NetworkAnalysis, membership: Option<&[usize]>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["node", "degree", "betweenness", "clustering", "community"])?;

    for node in 0..analysis.node_count() {
        let community = membership
            .and_then(|m| m.get(node))
            .map(|c| c.to_string())
            .unwrap_or_default();
        writer.write_record([
            node.to_string(),
            analysis.degree()[node].to_string(),
            format!("{:.6}", analysis.betweenness()[node]),
            format!("{:.6}", analysis.clustering()[node]),
            community,
        ])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = analysis.node_count(), "wrote metrics CSV");
    Ok(())
}
