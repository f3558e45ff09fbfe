//! Validation of the schema-checked payload and construction of the graph.
//!
//! The [`Builder`] walks nodes first, then edges, and reports every problem
//! it finds through a [`DiagnosticCollector`]. The graph is only assembled
//! when no error was emitted.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use flowsketch_core::{
    identifier::Id,
    semantic::{
        Edge, Graph, GraphError, MissingLabelPolicy, Node, NodeKind, UnknownKindPolicy,
    },
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    locate::ElementSpans,
    raw::{RawDocument, RawEdge, RawNode},
    span::Span,
};

/// Policies applied while building a graph from lenient model output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Handling of node `type` values that name no known kind
    pub unknown_kind: UnknownKindPolicy,
    /// Handling of nodes without a label
    pub missing_label: MissingLabelPolicy,
}

impl BuildConfig {
    /// Create a new BuildConfig with the given policies
    pub fn new(unknown_kind: UnknownKindPolicy, missing_label: MissingLabelPolicy) -> Self {
        Self {
            unknown_kind,
            missing_label,
        }
    }
}

pub(crate) struct Builder<'a> {
    cfg: BuildConfig,
    spans: &'a ElementSpans,
    diagnostics: DiagnosticCollector,
    /// Index of the first `nodes` element declaring each id
    declared: HashMap<Id, usize>,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(cfg: BuildConfig, spans: &'a ElementSpans) -> Self {
        Self {
            cfg,
            spans,
            diagnostics: DiagnosticCollector::new(),
            declared: HashMap::new(),
        }
    }

    /// Validates `document` and builds the graph.
    ///
    /// On success the warnings are returned alongside the graph.
    pub(crate) fn build(
        mut self,
        document: RawDocument,
    ) -> Result<(Graph, Vec<Diagnostic>), ParseError> {
        debug!(
            nodes = document.nodes.len(),
            edges = document.edges.len();
            "Validating flowchart payload"
        );

        let nodes = self.build_nodes(document.nodes);
        let edges = self.build_edges(document.edges);
        self.check_orphans(&nodes, &edges);

        let spans = self.spans;
        let warnings = self.diagnostics.finish()?;
        let graph = Graph::new(nodes, edges).map_err(|err| graph_error(err, spans.payload()))?;
        Ok((graph, warnings))
    }

    // ============================================================================
    // Nodes
    // ============================================================================

    fn build_nodes(&mut self, raw_nodes: Vec<RawNode>) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(raw_nodes.len());

        for (index, raw) in raw_nodes.into_iter().enumerate() {
            let span = self.spans.node(index);
            let id = Id::new(&raw.id.to_string());

            if let Some(&first) = self.declared.get(&id) {
                self.diagnostics.emit(
                    Diagnostic::error(format!("duplicate node id `{id}`"))
                        .with_code(ErrorCode::E200)
                        .with_label(span, "duplicate node")
                        .with_secondary_label(self.spans.node(first), "first defined here")
                        .with_help("give every node a unique id"),
                );
                continue;
            }
            self.declared.insert(id, index);

            let kind = self.node_kind(id, raw.kind.as_deref(), span);
            let label = self.node_label(id, raw.label, span);
            let (Some(kind), Some(label)) = (kind, label) else {
                continue;
            };

            let mut node = Node::new(id, kind, label);
            if let Some(detail) = raw.detail.filter(|text| !text.trim().is_empty()) {
                node = node.with_detail(detail);
            }
            if let Some(source) = raw.source.filter(|text| !text.trim().is_empty()) {
                node = node.with_source(source);
            }
            trace!(node:% = node; "Built node");
            nodes.push(node);
        }

        nodes
    }

    /// Resolves a node `type`; returns `None` when the type is rejected.
    fn node_kind(&mut self, id: Id, kind: Option<&str>, span: Span) -> Option<NodeKind> {
        let Some(text) = kind.filter(|text| !text.trim().is_empty()) else {
            return Some(NodeKind::Process);
        };

        let err = match text.parse::<NodeKind>() {
            Ok(kind) => return Some(kind),
            Err(err) => err,
        };

        let known = NodeKind::ALL.map(NodeKind::name).join(", ");
        match self.cfg.unknown_kind {
            UnknownKindPolicy::Coerce => {
                self.diagnostics.emit(
                    Diagnostic::warning(format!("{err} on node `{id}`, treating it as process"))
                        .with_code(ErrorCode::W301)
                        .with_label(span, "coerced to process")
                        .with_help(format!("known kinds are {known}")),
                );
                Some(NodeKind::Process)
            }
            UnknownKindPolicy::Reject => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("{err} on node `{id}`"))
                        .with_code(ErrorCode::E102)
                        .with_label(span, ErrorCode::E102.description())
                        .with_help(format!("known kinds are {known}")),
                );
                None
            }
        }
    }

    /// Resolves a node label; returns `None` when a missing label is rejected.
    fn node_label(&mut self, id: Id, label: Option<String>, span: Span) -> Option<String> {
        if let Some(label) = label.filter(|text| !text.trim().is_empty()) {
            return Some(label);
        }

        match self.cfg.missing_label {
            MissingLabelPolicy::Reject => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("node `{id}` has no label"))
                        .with_code(ErrorCode::E202)
                        .with_label(span, ErrorCode::E202.description())
                        .with_help("add a non-empty `label`"),
                );
                None
            }
            MissingLabelPolicy::Placeholder => {
                self.diagnostics.emit(
                    Diagnostic::warning(format!("node `{id}` has no label, using its id"))
                        .with_code(ErrorCode::W302)
                        .with_label(span, ErrorCode::W302.description()),
                );
                Some(id.to_string())
            }
        }
    }

    // ============================================================================
    // Edges
    // ============================================================================

    fn build_edges(&mut self, raw_edges: Vec<RawEdge>) -> Vec<Edge> {
        // Explicit ids are reserved up front so a synthesized id never takes
        // an id that appears later in the input.
        let mut explicit: HashMap<Id, usize> = HashMap::new();
        let mut duplicates = HashSet::new();
        for (index, raw) in raw_edges.iter().enumerate() {
            let Some(raw_id) = &raw.id else {
                continue;
            };
            let id = Id::new(&raw_id.to_string());
            if let Some(&first) = explicit.get(&id) {
                self.diagnostics.emit(
                    Diagnostic::error(format!("duplicate edge id `{id}`"))
                        .with_code(ErrorCode::E200)
                        .with_label(self.spans.edge(index), "duplicate edge")
                        .with_secondary_label(self.spans.edge(first), "first defined here")
                        .with_help("give every edge a unique id, or leave `id` out"),
                );
                duplicates.insert(index);
            } else {
                explicit.insert(id, index);
            }
        }

        let mut taken: HashSet<Id> = explicit.keys().copied().collect();
        let mut edges = Vec::with_capacity(raw_edges.len());

        for (index, raw) in raw_edges.into_iter().enumerate() {
            if duplicates.contains(&index) {
                continue;
            }
            let span = self.spans.edge(index);
            let source = Id::new(&raw.source.to_string());
            let target = Id::new(&raw.target.to_string());

            let id = match &raw.id {
                Some(raw_id) => Id::new(&raw_id.to_string()),
                None => synthesize_id(source, target, &mut taken),
            };

            let mut dangling = false;
            for endpoint in [source, target] {
                if self.declared.contains_key(&endpoint) || (dangling && source == target) {
                    continue;
                }
                dangling = true;
                self.diagnostics.emit(
                    Diagnostic::error(format!("edge `{id}` references unknown node `{endpoint}`"))
                        .with_code(ErrorCode::E201)
                        .with_label(span, ErrorCode::E201.description())
                        .with_help(format!(
                            "add a node with id `{endpoint}` or remove the edge"
                        )),
                );
            }
            if dangling {
                continue;
            }

            let mut edge = Edge::new(id, source, target);
            if let Some(label) = raw.label {
                edge = edge.with_label(label);
            }
            trace!(edge:% = edge; "Built edge");
            edges.push(edge);
        }

        edges
    }

    /// Warns about nodes without any incident edge in multi-node graphs.
    fn check_orphans(&mut self, nodes: &[Node], edges: &[Edge]) {
        if nodes.len() < 2 {
            return;
        }

        let connected: HashSet<Id> = edges
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .collect();

        for node in nodes.iter().filter(|node| !connected.contains(&node.id())) {
            let span = self
                .declared
                .get(&node.id())
                .map_or(self.spans.payload(), |&index| self.spans.node(index));
            self.diagnostics.emit(
                Diagnostic::warning(format!("node `{}` is not connected to any edge", node.id()))
                    .with_code(ErrorCode::W300)
                    .with_label(span, ErrorCode::W300.description())
                    .with_help("connect it with an edge or remove it"),
            );
        }
    }
}

/// Synthesizes `e<source>-<target>`, adding `-2`, `-3`, ... until the id is free.
fn synthesize_id(source: Id, target: Id, taken: &mut HashSet<Id>) -> Id {
    let base = Id::new(&format!("e{source}-{target}"));
    let mut id = base;
    let mut suffix = 2;
    while taken.contains(&id) {
        id = base.with_suffix(suffix);
        suffix += 1;
    }
    taken.insert(id);
    id
}

fn graph_error(err: GraphError, payload: Span) -> ParseError {
    let code = match err {
        GraphError::UnknownEndpoint { .. } => ErrorCode::E201,
        GraphError::DuplicateNode(_) | GraphError::DuplicateEdge(_) => ErrorCode::E200,
    };
    Diagnostic::error(err.to_string())
        .with_code(code)
        .with_label(payload, code.description())
        .into()
}
