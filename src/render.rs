//! Graphviz output: DOT documents coloured by community or centrality, and
//! rendering them to images with the Graphviz command-line tools.

use crate::error::{Error, Result};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{EdgeReference, Graph, NodeIndex};
use petgraph::EdgeType;
use std::collections::HashSet;
use std::fmt::Debug;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Colours cycled over community numbers.
pub const COMMUNITY_PALETTE: [&str; 6] = ["red", "green", "blue", "orange", "purple", "yellow"];

const BASE_COLOR: &str = "skyblue";
const HIGHLIGHT_COLOR: &str = "red";

/// How nodes are filled.
#[derive(Debug, Clone, Copy)]
pub enum NodeStyle<'a> {
    Plain,
    /// Listed nodes in red, the rest in the base colour.
    Highlight(&'a HashSet<NodeIndex>),
    /// Community number per node index, mapped onto [`COMMUNITY_PALETTE`].
    Communities(&'a [usize]),
}

impl NodeStyle<'_> {
    fn fill(&self, node: NodeIndex) -> &'static str {
        match self {
            NodeStyle::Plain => BASE_COLOR,
            NodeStyle::Highlight(nodes) if nodes.contains(&node) => HIGHLIGHT_COLOR,
            NodeStyle::Highlight(_) => BASE_COLOR,
            NodeStyle::Communities(membership) => membership
                .get(node.index())
                .map_or(BASE_COLOR, |&c| COMMUNITY_PALETTE[c % COMMUNITY_PALETTE.len()]),
        }
    }
}

/// Graphviz layout engine used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Force-directed spring model.
    #[default]
    Spring,
    /// Nodes on a circle.
    Circular,
}

impl Layout {
    pub fn engine(self) -> &'static str {
        match self {
            Layout::Spring => "fdp",
            Layout::Circular => "circo",
        }
    }
}

/// DOT document for `graph` with unlabeled point-sized nodes filled per
/// `style`.
pub fn to_dot<N, E, Ty>(graph: &Graph<N, E, Ty>, style: &NodeStyle<'_>) -> String
where
    N: Debug,
    E: Debug,
    Ty: EdgeType,
{
    let edge_attrs = |_: &Graph<N, E, Ty>, _: EdgeReference<'_, E>| "color=gray".to_string();
    let node_attrs = |_: &Graph<N, E, Ty>, (node, _): (NodeIndex, &N)| {
        format!(
            "shape=circle, width=0.15, style=filled, fillcolor=\"{}\"",
            style.fill(node)
        )
    };
    let dot = Dot::with_attr_getters(
        graph,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &edge_attrs,
        &node_attrs,
    );
    format!("{:?}", dot)
}

/// Write a DOT document for `graph` to `path`.
pub fn save_dot<N, E, Ty>(graph: &Graph<N, E, Ty>, style: &NodeStyle<'_>, path: &Path) -> Result<()>
where
    N: Debug,
    E: Debug,
    Ty: EdgeType,
{
    std::fs::write(path, to_dot(graph, style))?;
    info!(path = %path.display(), "wrote DOT file");
    Ok(())
}

/// Render a DOT file to PNG with the Graphviz engine for `layout`.
pub fn render_dot(dot_file: &Path, output_image: &Path, layout: Layout) -> Result<()> {
    let mut command = Command::new(layout.engine());
    command.arg("-Tpng").arg(dot_file).arg("-o").arg(output_image);
    run_tool(&mut command, layout.engine())?;
    info!(image = %output_image.display(), engine = layout.engine(), "rendered graph");
    Ok(())
}

/// Open an image with the platform's default viewer.
///
/// Fails with [`Error::Render`] when the viewer cannot be started or exits
/// with a failure.
pub fn open_image(image: &Path) -> Result<()> {
    let mut command = opener_command(image);
    let name = command.get_program().to_string_lossy().into_owned();
    run_tool(&mut command, &name)
}

fn opener_command(image: &Path) -> Command {
    if cfg!(target_os = "windows") {
        // `start` is a cmd builtin; the empty argument is the window title.
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(image);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(image);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(image);
        command
    }
}

/// Run an external tool to completion; spawn failures and failing exits are
/// both [`Error::Render`].
fn run_tool(command: &mut Command, name: &str) -> Result<()> {
    let status = command
        .status()
        .map_err(|e| Error::Render(format!("could not run `{name}`: {e}")))?;
    if !status.success() {
        return Err(Error::Render(format!("`{name}` exited with {status}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::UnGraph;

    #[test]
    fn test_dot_colours_communities() {
        let graph = UnGraph::<usize, ()>::from_edges([(0, 1), (2, 3)]);
        let membership = [0, 0, 1, 7];
        let dot = to_dot(&graph, &NodeStyle::Communities(&membership));

        assert!(dot.starts_with("graph {"));
        assert_eq!(dot.matches("fillcolor=\"red\"").count(), 2);
        // 7 wraps around the palette onto green.
        assert_eq!(dot.matches("fillcolor=\"green\"").count(), 2);
        assert!(dot.contains("0 -- 1"));
    }

    #[test]
    fn test_dot_highlights_nodes() {
        let graph = petgraph::graph::DiGraph::<usize, ()>::from_edges([(0, 1), (1, 2)]);
        let top: HashSet<NodeIndex> = [NodeIndex::new(1)].into_iter().collect();
        let dot = to_dot(&graph, &NodeStyle::Highlight(&top));

        assert!(dot.starts_with("digraph {"));
        assert_eq!(dot.matches("fillcolor=\"red\"").count(), 1);
        assert_eq!(dot.matches("fillcolor=\"skyblue\"").count(), 2);
        assert!(dot.contains("0 -> 1"));
    }

    #[test]
    fn test_render_missing_input_is_render_error() {
        let image = std::env::temp_dir().join(format!("missing-{}.png", std::process::id()));
        let result = render_dot(Path::new("/nonexistent/x.dot"), &image, Layout::Spring);
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn test_failing_tool_is_render_error() {
        let mut spawn_fails = Command::new("/nonexistent/viewer");
        assert!(matches!(
            run_tool(&mut spawn_fails, "viewer"),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn test_opener_command() {
        let command = opener_command(Path::new("graph.png"));
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        if cfg!(target_os = "windows") {
            assert_eq!(command.get_program(), "cmd");
            assert_eq!(args, ["/C", "start", "", "graph.png"]);
        } else if cfg!(target_os = "macos") {
            assert_eq!(command.get_program(), "open");
            assert_eq!(args, ["graph.png"]);
        } else {
            assert_eq!(command.get_program(), "xdg-open");
            assert_eq!(args, ["graph.png"]);
        }
    }

    #[test]
    fn test_layout_engines() {
        assert_eq!(Layout::default().engine(), "fdp");
        assert_eq!(Layout::Circular.engine(), "circo");
    }
}
