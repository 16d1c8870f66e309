//! Structural diagnostics for flows using petgraph.
//!
//! The interpreter never rejects a flow for its shape; it only stops when
//! traversal reaches a dead end. Diagnostics surface the shapes that will
//! misbehave at runtime so they can be logged when a flow is activated:
//! - references to blocks that do not exist
//! - blocks no conversation can reach
//! - cycles of message blocks with no suspension point in between

use crate::block::BlockKind;
use crate::definition::Flow;
use chatflow_core::BlockId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An advisory finding about a flow's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowDiagnostic {
    /// The start block id is absent or does not resolve.
    MissingStartBlock { start: Option<BlockId> },
    /// A block continues at an id that does not resolve.
    DanglingReference { from: BlockId, to: BlockId },
    /// No path leads from the start block to this block.
    UnreachableBlock { block: BlockId },
    /// The id is declared more than once; only the first declaration is used.
    DuplicateBlockId { block: BlockId },
    /// Message blocks that chain into each other without suspending.
    MessageCycle { blocks: Vec<BlockId> },
}

impl fmt::Display for FlowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartBlock { start: Some(start) } => {
                write!(f, "start block '{start}' does not exist")
            }
            Self::MissingStartBlock { start: None } => write!(f, "flow has no start block"),
            Self::DanglingReference { from, to } => {
                write!(f, "block '{from}' references missing block '{to}'")
            }
            Self::UnreachableBlock { block } => {
                write!(f, "block '{block}' is unreachable from the start block")
            }
            Self::DuplicateBlockId { block } => {
                write!(f, "block id '{block}' is declared more than once")
            }
            Self::MessageCycle { blocks } => {
                let ids: Vec<&str> = blocks.iter().map(BlockId::as_str).collect();
                write!(f, "message blocks loop without suspending: {}", ids.join(" -> "))
            }
        }
    }
}

/// A flow projected onto a directed graph of block ids.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    /// One node per distinct block id, one edge per continuation.
    graph: DiGraph<BlockId, ()>,
    /// Map from BlockId to petgraph's NodeIndex for O(1) lookup.
    node_index_map: HashMap<BlockId, NodeIndex>,
    /// Nodes whose block is a message block.
    message_nodes: HashSet<NodeIndex>,
    start: Option<BlockId>,
    dangling: Vec<(BlockId, BlockId)>,
    duplicates: Vec<BlockId>,
}

impl FlowGraph {
    /// Builds the graph for a flow.
    #[must_use]
    pub fn build(flow: &Flow) -> Self {
        let mut graph = DiGraph::new();
        let mut node_index_map = HashMap::new();
        let mut message_nodes = HashSet::new();
        let mut duplicates = Vec::new();

        for block in flow.blocks() {
            if node_index_map.contains_key(&block.id) {
                duplicates.push(block.id.clone());
                continue;
            }
            let index = graph.add_node(block.id.clone());
            node_index_map.insert(block.id.clone(), index);
            if matches!(block.kind, BlockKind::WriteMessage { .. }) {
                message_nodes.insert(index);
            }
        }

        let mut dangling = Vec::new();
        for (id, &source) in &node_index_map {
            let Some(block) = flow.by_id(id) else {
                continue;
            };
            for target in block.targets() {
                match node_index_map.get(target) {
                    Some(&target_index) => {
                        graph.add_edge(source, target_index, ());
                    }
                    None => dangling.push((id.clone(), target.clone())),
                }
            }
        }
        dangling.sort();

        Self {
            graph,
            node_index_map,
            message_nodes,
            start: flow.start_block_id().cloned(),
            dangling,
            duplicates,
        }
    }

    /// Returns the number of distinct blocks.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of resolved continuations.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the ids reachable from the start block, including itself.
    #[must_use]
    pub fn reachable_from_start(&self) -> HashSet<BlockId> {
        let mut reachable = HashSet::new();
        let Some(&start) = self.start.as_ref().and_then(|s| self.node_index_map.get(s)) else {
            return reachable;
        };

        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(index) = dfs.next(&self.graph) {
            reachable.insert(self.graph[index].clone());
        }
        reachable
    }

    /// Runs every structural check.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<FlowDiagnostic> {
        let mut diagnostics = Vec::new();

        let start_resolves = self
            .start
            .as_ref()
            .is_some_and(|s| self.node_index_map.contains_key(s));
        if !start_resolves {
            diagnostics.push(FlowDiagnostic::MissingStartBlock {
                start: self.start.clone(),
            });
        }

        for block in &self.duplicates {
            diagnostics.push(FlowDiagnostic::DuplicateBlockId {
                block: block.clone(),
            });
        }

        for (from, to) in &self.dangling {
            diagnostics.push(FlowDiagnostic::DanglingReference {
                from: from.clone(),
                to: to.clone(),
            });
        }

        // Without a start block everything is unreachable; the missing
        // start diagnostic already covers that.
        if start_resolves {
            let reachable = self.reachable_from_start();
            for index in self.graph.node_indices() {
                let id = &self.graph[index];
                if !reachable.contains(id) {
                    diagnostics.push(FlowDiagnostic::UnreachableBlock { block: id.clone() });
                }
            }
        }

        for component in tarjan_scc(&self.graph) {
            let only_messages = component.iter().all(|i| self.message_nodes.contains(i));
            let loops = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&i| self.graph.contains_edge(i, i));
            if only_messages && loops {
                let mut members = component;
                members.sort();
                diagnostics.push(FlowDiagnostic::MessageCycle {
                    blocks: members.into_iter().map(|i| self.graph[i].clone()).collect(),
                });
            }
        }

        diagnostics
    }
}
