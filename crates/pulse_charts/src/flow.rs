//! Condition → treatment flow graph.

use pulse_core::Dataset;
use rustc_hash::FxHashMap;

use crate::aggregate::Indicator;
use crate::normalize::{is_no, is_yes};

pub const SOUGHT_TREATMENT: &str = "Sought Treatment";
pub const DID_NOT_SEEK: &str = "Did Not Seek";

/// Weighted directed edge between node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Small directed weighted graph with named nodes.
#[derive(Clone, Debug)]
pub struct FlowGraph {
    nodes: Vec<String>,
    index: FxHashMap<String, usize>,
    edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn new(nodes: Vec<String>, edges: Vec<FlowEdge>) -> anyhow::Result<Self> {
        anyhow::ensure!(!nodes.is_empty(), "FlowGraph requires at least 1 node");

        let mut index = FxHashMap::default();
        for (i, name) in nodes.iter().enumerate() {
            anyhow::ensure!(
                index.insert(name.clone(), i).is_none(),
                "duplicate flow node '{name}'"
            );
        }

        let n = nodes.len();
        for e in &edges {
            anyhow::ensure!(e.source < n && e.target < n, "edge index out of bounds");
            anyhow::ensure!(
                e.weight.is_finite() && e.weight >= 0.0,
                "edge weight must be finite and non-negative"
            );
        }

        Ok(Self {
            nodes,
            index,
            edges,
        })
    }

    /// Condition nodes followed by the two treatment outcomes, with a "sought" and a
    /// "did not seek" edge per condition. Zero-weight edges are kept.
    pub fn build(
        ds: &Dataset,
        conditions: &[Indicator],
        treatment_field: &str,
    ) -> anyhow::Result<Self> {
        let nodes: Vec<String> = conditions
            .iter()
            .map(|c| c.label.clone())
            .chain([SOUGHT_TREATMENT.to_string(), DID_NOT_SEEK.to_string()])
            .collect();
        let index: FxHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        anyhow::ensure!(
            index.len() == nodes.len(),
            "condition labels must be distinct from each other and from the outcomes"
        );

        let treatment = ds.field(treatment_field);
        let mut named = Vec::with_capacity(conditions.len() * 2);
        for condition in conditions {
            let column = ds.field(&condition.column);
            let (mut sought, mut not_sought) = (0u64, 0u64);
            for record in ds.records() {
                if !is_yes(record.get(column)) {
                    continue;
                }
                let answer = record.get(treatment);
                if is_yes(answer) {
                    sought += 1;
                } else if is_no(answer) {
                    not_sought += 1;
                }
            }
            named.push((condition.label.as_str(), SOUGHT_TREATMENT, sought));
            named.push((condition.label.as_str(), DID_NOT_SEEK, not_sought));
        }

        let mut edges = Vec::with_capacity(named.len());
        for (source, target, weight) in named {
            let (Some(&source), Some(&target)) = (index.get(source), index.get(target)) else {
                anyhow::bail!("unresolved flow edge {source} -> {target}");
            };
            edges.push(FlowEdge {
                source,
                target,
                weight: weight as f64,
            });
        }

        tracing::debug!(
            "flow graph built: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        Self::new(nodes, edges)
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn outgoing_weight(&self, node: usize) -> f64 {
        self.edges
            .iter()
            .filter(|e| e.source == node)
            .map(|e| e.weight)
            .sum()
    }

    pub fn incoming_weight(&self, node: usize) -> f64 {
        self.edges
            .iter()
            .filter(|e| e.target == node)
            .map(|e| e.weight)
            .sum()
    }

    /// Weight of the edge `source -> target`, looked up by node name.
    pub fn weight_between(&self, source: &str, target: &str) -> Option<f64> {
        let (s, t) = (self.node_index(source)?, self.node_index(target)?);
        self.edges
            .iter()
            .find(|e| e.source == s && e.target == t)
            .map(|e| e.weight)
    }
}
