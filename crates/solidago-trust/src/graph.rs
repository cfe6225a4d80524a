//! The vouch graph as a petgraph `DiGraph`.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use solidago_core::model::{Users, Vouches};

/// Users as nodes, vouches of one kind as weighted edges.
///
/// Nodes are added in user-name order and edges in vouch-key order, so
/// node indices and edge iteration are deterministic.
#[derive(Debug, Clone)]
pub struct VouchGraph {
    graph: DiGraph<String, f64>,
}

impl VouchGraph {
    pub fn build(users: &Users, vouches: &Vouches, kind: &str) -> Self {
        let mut names: BTreeSet<&str> = users.names().collect();
        for record in vouches.of_kind(kind) {
            names.insert(record.by);
            names.insert(record.to);
        }

        let mut graph = DiGraph::with_capacity(names.len(), vouches.len());
        let nodes: BTreeMap<&str, NodeIndex> = names
            .iter()
            .map(|name| (*name, graph.add_node(name.to_string())))
            .collect();
        for record in vouches.of_kind(kind) {
            if record.vouch.weight > 0.0 {
                graph.add_edge(nodes[record.by], nodes[record.to], record.vouch.weight);
            }
        }
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Sum of the weights of the vouches given by `node`.
    pub fn out_weight(&self, node: NodeIndex) -> f64 {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| *edge.weight())
            .sum()
    }

    /// Vouchers of `node` with their vouch weights.
    pub fn vouchers(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| (edge.source(), *edge.weight()))
    }
}
