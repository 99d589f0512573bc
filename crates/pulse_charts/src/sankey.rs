//! Sankey layout
//!
//! Single-pass layout of a [`FlowGraph`]: nodes are placed in columns by depth (sinks pushed
//! to the last column), stacked with proportional heights, and the leftover vertical space is
//! spread evenly between them. Links attach at stacked offsets along each node edge.

use pulse_core::{Color, Point, Rect};
use smallvec::SmallVec;

use crate::flow::FlowGraph;
use crate::palette::Palette;
use crate::scene::{z, Mark, PathData, Scene, TextAnchor, TextMark};

const LABEL_SIZE: f32 = 10.0;
const LABEL_OFFSET: f32 = 6.0;

type LinkList = SmallVec<[usize; 4]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SankeyOptions {
    pub node_width: f32,
    pub node_padding: f32,
    /// Area the layout fills
    pub extent: Rect,
}

impl SankeyOptions {
    /// Defaults for a canvas of the given size, inset 1px with room at the bottom for labels.
    pub fn for_canvas(width: f32, height: f32) -> Self {
        Self {
            node_width: 20.0,
            node_padding: 15.0,
            extent: Rect::from_corners(1.0, 1.0, width - 1.0, height - 6.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SankeyNode {
    pub index: usize,
    pub name: String,
    pub layer: usize,
    /// Larger of the incoming and outgoing totals
    pub value: f64,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl SankeyNode {
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.x0, self.y0, self.x1, self.y1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SankeyLink {
    /// Index into the graph's edges
    pub edge: usize,
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub width: f32,
    /// Centre of the link where it leaves the source
    pub y0: f32,
    /// Centre of the link where it enters the target
    pub y1: f32,
    pub x0: f32,
    pub x1: f32,
}

impl SankeyLink {
    /// Horizontal cubic from source edge to target edge, control points at the midpoint.
    pub fn path(&self) -> PathData {
        let xm = (self.x0 + self.x1) / 2.0;
        PathData::new().move_to(self.x0, self.y0).cubic_to(
            Point::new(xm, self.y0),
            Point::new(xm, self.y1),
            Point::new(self.x1, self.y1),
        )
    }

    pub fn stroke_width(&self) -> f32 {
        self.width.max(1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SankeyLayout {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

pub fn layout(graph: &FlowGraph, options: &SankeyOptions) -> anyhow::Result<SankeyLayout> {
    let n = graph.nodes().len();
    let edges = graph.edges();

    let mut outgoing: Vec<LinkList> = vec![LinkList::new(); n];
    let mut incoming: Vec<LinkList> = vec![LinkList::new(); n];
    for (i, e) in edges.iter().enumerate() {
        outgoing[e.source].push(i);
        incoming[e.target].push(i);
    }

    let values: Vec<f64> = (0..n)
        .map(|i| graph.incoming_weight(i).max(graph.outgoing_weight(i)))
        .collect();

    // Breadth-first depth; a depth beyond the node count means a cycle.
    let mut depth = vec![0usize; n];
    let mut current: Vec<usize> = (0..n).collect();
    let mut x = 0usize;
    while !current.is_empty() {
        let mut next = Vec::new();
        for &node in &current {
            depth[node] = x;
            for &link in &outgoing[node] {
                let target = edges[link].target;
                if !next.contains(&target) {
                    next.push(target);
                }
            }
        }
        x += 1;
        anyhow::ensure!(x <= n, "flow graph contains a circular link");
        current = next;
    }

    let layers = x.max(1);
    let layer: Vec<usize> = (0..n)
        .map(|i| {
            let l = if outgoing[i].is_empty() { layers - 1 } else { depth[i] };
            l.min(layers - 1)
        })
        .collect();

    let ext = options.extent;
    let (x0, x1, y0, y1) = (ext.x(), ext.right(), ext.y(), ext.bottom());
    let kx = if layers > 1 {
        (x1 - x0 - options.node_width) / (layers - 1) as f32
    } else {
        0.0
    };

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); layers];
    for (i, &l) in layer.iter().enumerate() {
        columns[l].push(i);
    }
    let tallest = columns.iter().map(Vec::len).max().unwrap_or(0);
    let py = if tallest > 1 {
        options.node_padding.min((y1 - y0) / (tallest - 1) as f32)
    } else {
        options.node_padding
    };

    let ky = columns
        .iter()
        .filter_map(|c| {
            let sum: f64 = c.iter().map(|&i| values[i]).sum();
            (sum > 0.0).then(|| (y1 - y0 - (c.len() as f32 - 1.0) * py) / sum as f32)
        })
        .reduce(f32::min)
        .unwrap_or(0.0);

    let mut nodes: Vec<SankeyNode> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let nx0 = x0 + layer[i] as f32 * kx;
            SankeyNode {
                index: i,
                name: name.clone(),
                layer: layer[i],
                value: values[i],
                x0: nx0,
                y0: 0.0,
                x1: nx0 + options.node_width,
                y1: 0.0,
            }
        })
        .collect();

    for column in &columns {
        let mut y = y0;
        for &i in column {
            nodes[i].y0 = y;
            nodes[i].y1 = y + values[i] as f32 * ky;
            y = nodes[i].y1 + py;
        }
        let spread = (y1 - y + py) / (column.len() + 1) as f32;
        for (k, &i) in column.iter().enumerate() {
            let shift = spread * (k + 1) as f32;
            nodes[i].y0 += shift;
            nodes[i].y1 += shift;
        }
    }

    let mut links: Vec<SankeyLink> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| SankeyLink {
            edge: i,
            source: e.source,
            target: e.target,
            value: e.weight,
            width: e.weight as f32 * ky,
            y0: 0.0,
            y1: 0.0,
            x0: nodes[e.source].x1,
            x1: nodes[e.target].x0,
        })
        .collect();

    for node in &nodes {
        let mut out = outgoing[node.index].clone();
        out.sort_by(|&a, &b| {
            nodes[edges[a].target]
                .y0
                .total_cmp(&nodes[edges[b].target].y0)
                .then(a.cmp(&b))
        });
        let mut y = node.y0;
        for link in out {
            links[link].y0 = y + links[link].width / 2.0;
            y += links[link].width;
        }

        let mut inc = incoming[node.index].clone();
        inc.sort_by(|&a, &b| {
            nodes[edges[a].source]
                .y0
                .total_cmp(&nodes[edges[b].source].y0)
                .then(a.cmp(&b))
        });
        let mut y = node.y0;
        for link in inc {
            links[link].y1 = y + links[link].width / 2.0;
            y += links[link].width;
        }
    }

    tracing::debug!(
        "sankey layout: {} nodes in {} columns, ky={}",
        nodes.len(),
        layers,
        ky
    );
    Ok(SankeyLayout { nodes, links })
}

impl SankeyLayout {
    pub fn node(&self, name: &str) -> Option<&SankeyNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Links under nodes, labels on top. Labels on the left half sit right of their node.
    pub fn scene(&self, width: f32, height: f32) -> Scene {
        let mut scene = Scene::new(width, height);
        let link_color = Color::from_hex(0xaaaaaa);

        for link in &self.links {
            scene.push(
                Mark::path(format!("link/{}", link.edge), link.path())
                    .with_stroke(link_color, link.stroke_width())
                    .with_opacity(0.7)
                    .with_z(z::SERIES_STROKE),
            );
        }

        for node in &self.nodes {
            scene.push(
                Mark::rect(format!("node/{}", node.name), node.rect())
                    .with_fill(Palette::CATEGORY10.color(node.index))
                    .with_z(z::NODES),
            );

            let mid = (node.y0 + node.y1) / 2.0 + LABEL_SIZE * 0.35;
            let text = if node.x0 < width / 2.0 {
                TextMark::new(Point::new(node.x1 + LABEL_OFFSET, mid), &node.name)
            } else {
                TextMark::new(Point::new(node.x0 - LABEL_OFFSET, mid), &node.name)
                    .anchor(TextAnchor::End)
            };
            scene.push(
                Mark::text(format!("label/{}", node.name), text.size(LABEL_SIZE))
                    .with_z(z::AXIS_LABELS),
            );
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowEdge;

    fn graph(edges: &[(usize, usize, f64)]) -> FlowGraph {
        let nodes = ["a", "b", "s", "t"].map(String::from).to_vec();
        let edges = edges
            .iter()
            .map(|&(source, target, weight)| FlowEdge {
                source,
                target,
                weight,
            })
            .collect();
        FlowGraph::new(nodes, edges).unwrap()
    }

    fn options() -> SankeyOptions {
        SankeyOptions::for_canvas(600.0, 400.0)
    }

    #[test]
    fn sources_left_sinks_right() {
        let g = graph(&[(0, 2, 3.0), (0, 3, 1.0), (1, 2, 2.0), (1, 3, 2.0)]);
        let l = layout(&g, &options()).unwrap();
        assert_eq!(l.nodes[0].x0, 1.0);
        assert_eq!(l.nodes[2].x1, 599.0);
        assert_eq!(l.nodes[0].layer, 0);
        assert_eq!(l.nodes[3].layer, 1);
    }

    #[test]
    fn node_heights_are_proportional_and_spread() {
        let g = graph(&[(0, 2, 3.0), (0, 3, 1.0), (1, 2, 2.0), (1, 3, 2.0)]);
        let l = layout(&g, &options()).unwrap();
        // both columns sum to 8 over 2 nodes: ky = (393 - 15) / 8
        let ky = 378.0 / 8.0;
        let a = &l.nodes[0];
        assert!((a.y1 - a.y0 - 4.0 * ky).abs() < 1e-3);
        assert!((l.nodes[1].y0 - a.y1 - 15.0).abs() < 1e-3);
        // columns fill the extent exactly, nothing left to spread
        assert!((a.y0 - 1.0).abs() < 1e-3);
        assert!((l.nodes[1].y1 - 394.0).abs() < 1e-3);
    }

    #[test]
    fn short_columns_are_spread_evenly() {
        let g = graph(&[(0, 3, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let l = layout(&g, &options()).unwrap();
        // the three-node column sets the scale, the lone sink is centred
        let t = &l.nodes[3];
        assert!((t.y1 - t.y0 - 363.0).abs() < 1e-3);
        assert!((t.y0 - 16.0).abs() < 1e-3);
        assert!((394.0 - t.y1 - 15.0).abs() < 1e-3);
    }

    #[test]
    fn links_stack_along_node_edges() {
        let g = graph(&[(0, 2, 3.0), (0, 3, 1.0), (1, 2, 2.0), (1, 3, 2.0)]);
        let l = layout(&g, &options()).unwrap();
        let (first, second) = (&l.links[0], &l.links[1]);
        let a = &l.nodes[0];
        assert!((first.y0 - (a.y0 + first.width / 2.0)).abs() < 1e-3);
        assert!((second.y0 - (a.y0 + first.width + second.width / 2.0)).abs() < 1e-3);
        assert_eq!(first.x0, a.x1);
        assert_eq!(first.x1, l.nodes[2].x0);
        assert!(first.path().to_svg_d().starts_with("M21,"));
    }

    #[test]
    fn all_zero_weights_collapse_without_nan() {
        let g = graph(&[(0, 2, 0.0), (1, 3, 0.0)]);
        let l = layout(&g, &options()).unwrap();
        assert!(l.nodes.iter().all(|n| n.y0.is_finite() && n.y0 == n.y1));
        assert!(l.links.iter().all(|k| k.width == 0.0 && k.stroke_width() == 1.0));
    }

    #[test]
    fn cycles_are_rejected() {
        let g = graph(&[(0, 1, 1.0), (1, 0, 1.0)]);
        assert!(layout(&g, &options()).is_err());
    }

    #[test]
    fn scene_labels_face_inward() {
        let g = graph(&[(0, 2, 1.0), (1, 3, 1.0)]);
        let scene = layout(&g, &options()).unwrap().scene(600.0, 400.0);
        let anchor = |id: &str| match &scene.get(id).unwrap().shape {
            crate::scene::Shape::Text(t) => t.anchor,
            _ => unreachable!(),
        };
        assert_eq!(anchor("label/a"), TextAnchor::Start);
        assert_eq!(anchor("label/s"), TextAnchor::End);
        let link = scene.get("link/0").unwrap();
        assert_eq!(link.opacity, 0.7);
        assert!(link.fill.is_none());
    }
}
