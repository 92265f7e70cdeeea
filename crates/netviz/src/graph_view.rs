use crate::config::ViewerConfig;
use crate::error::{EdgeRejection, Result, ViewerError};
use crate::layout::{
    LayoutAlgorithm, LayoutDescriptor, LayoutInput, LayoutRegistry, LayoutStatic, LayoutStateStatic,
    default_bounds,
};
use crate::node_shapes::{NetworkNodeShape, NodeStyle};
use eframe::egui::{Pos2, Rect};
use egui_graphs::{DefaultEdgeShape, Graph, GraphView};
use petgraph::Directed;
use petgraph::Direction;
use petgraph::graph::DefaultIx;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::{BTreeSet, HashMap, HashSet};
use toxynet::{Color, Interaction, Network, NetworkError, Node, NodeId, Position};
use tracing::{debug, info, warn};

// ------------------------------------------------------------------
// Type aliases for graph types
// ------------------------------------------------------------------

pub type NetworkGraph =
    Graph<VisualNode, Interaction, Directed, DefaultIx, NetworkNodeShape, DefaultEdgeShape>;

pub type NetworkGraphView<'a> = GraphView<
    'a,
    VisualNode,
    Interaction,
    Directed,
    DefaultIx,
    NetworkNodeShape,
    DefaultEdgeShape,
    LayoutStateStatic,
    LayoutStatic,
>;

/// Renderer payload: the domain node plus the style derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub data: Node,
    pub style: NodeStyle,
}

/// Per-view rendering and layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub radius: f32,
    pub selected_border: f32,
    pub labels_always: bool,
    pub spacing: f32,
}

impl ViewSettings {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            radius: config.node_radius,
            selected_border: config.selected_border_width,
            labels_always: config.labels_always,
            spacing: config.layout_spacing,
        }
    }

    /// Label, fill and border bound to the node's data.
    pub fn style_for(&self, node: &Node) -> NodeStyle {
        NodeStyle {
            fill: node.color,
            border: node.border_color,
            shape: node.shape,
            highlight: None,
            radius: self.radius,
            selected_border: self.selected_border,
            show_label: self.labels_always,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelWidth {
    #[default]
    Full,
    Half,
}

/// Nodes removed from the view, with the position they had.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiddenNodes(Vec<Node>);

impl HiddenNodes {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.0.iter().any(|n| &n.id == id)
    }

    pub fn ids(&self) -> BTreeSet<NodeId> {
        self.0.iter().map(|n| n.id.clone()).collect()
    }

    /// Union by node id; on a clash the entry of `self` is kept.
    pub fn union(mut self, other: HiddenNodes) -> HiddenNodes {
        for node in other.0 {
            if !self.contains(&node.id) {
                self.0.push(node);
            }
        }
        self
    }
}

impl From<Vec<Node>> for HiddenNodes {
    fn from(nodes: Vec<Node>) -> Self {
        HiddenNodes(Vec::new()).union(HiddenNodes(nodes))
    }
}

/// Everything rendered in a view, in domain form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Elements {
    pub nodes: Vec<Node>,
    pub edges: Vec<Interaction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub nodes_added: usize,
    pub nodes_kept: usize,
    pub edges_added: usize,
    pub edges_duplicate: usize,
    pub edges_dangling: usize,
}

fn to_pos(position: Position) -> Pos2 {
    Pos2::new(position.x, position.y)
}

fn index_pairs(ids: &[NodeId], pairs: &[(NodeId, NodeId)]) -> Vec<(usize, usize)> {
    let slots: HashMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let mut seen = HashSet::new();
    pairs
        .iter()
        .filter_map(|(a, b)| Some((*slots.get(a)?, *slots.get(b)?)))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

// ------------------------------------------------------------------
// Visual graph adapter
// ------------------------------------------------------------------

/// One panel's rendered graph and the graph operations over it. Nodes are
/// addressed by their domain id; the renderer index never leaves the view.
pub struct NetworkView {
    graph: NetworkGraph,
    index: HashMap<NodeId, NodeIndex>,
    settings: ViewSettings,
    width: PanelWidth,
    fit_requested: bool,
}

impl NetworkView {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            graph: NetworkGraph::from(&StableGraph::<VisualNode, Interaction>::default()),
            index: HashMap::new(),
            settings,
            width: PanelWidth::Full,
            fit_requested: true,
        }
    }

    pub fn from_network(network: &Network, settings: ViewSettings) -> Self {
        let mut view = Self::new(settings);
        view.populate(network.nodes(), network.interactions());
        view
    }

    /// Drop every rendered element.
    pub fn clear(&mut self) {
        self.graph = NetworkGraph::from(&StableGraph::<VisualNode, Interaction>::default());
        self.index.clear();
    }

    /// Add nodes then edges. Duplicate ids and dangling edges are skipped.
    pub fn populate(&mut self, nodes: &[Node], edges: &[Interaction]) {
        for node in nodes {
            if self.index.contains_key(&node.id) {
                warn!(id = %node.id, "duplicate node skipped");
                continue;
            }
            self.insert_node(node.clone());
        }
        for edge in edges {
            if !self.insert_edge(edge.clone()) {
                warn!(edge = %edge.id(), "edge with unknown endpoint skipped");
            }
        }
        debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "view populated"
        );
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut NetworkGraph {
        &mut self.graph
    }

    pub fn settings(&self) -> ViewSettings {
        self.settings
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&VisualNode> {
        let idx = self.find_by_id(id)?;
        self.graph.node(idx).map(|n| n.payload())
    }

    /// Domain id of the renderer node at `idx`.
    pub fn id_at(&self, idx: NodeIndex) -> Option<NodeId> {
        self.graph.node(idx).map(|n| n.payload().data.id.clone())
    }

    pub fn hovered_id(&self) -> Option<NodeId> {
        self.graph.hovered_node().and_then(|idx| self.id_at(idx))
    }

    /// Rendered node ids in renderer order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.graph
            .nodes_iter()
            .map(|(_, n)| n.payload().data.id.clone())
            .collect()
    }

    /// Incident edge count, direction-agnostic.
    pub fn degree(&self, id: &NodeId) -> usize {
        self.find_by_id(id).map_or(0, |idx| self.degree_at(idx))
    }

    fn degree_at(&self, idx: NodeIndex) -> usize {
        let g = self.graph.g();
        g.edges_directed(idx, Direction::Incoming).count()
            + g.edges_directed(idx, Direction::Outgoing).count()
    }

    pub fn has_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        match (self.find_by_id(source), self.find_by_id(target)) {
            (Some(s), Some(t)) => self.graph.g().find_edge(s, t).is_some(),
            _ => false,
        }
    }

    fn insert_node(&mut self, node: Node) -> NodeIndex {
        let location = to_pos(node.position);
        let label = node.label().to_string();
        let style = self.settings.style_for(&node);
        let id = node.id.clone();
        let idx = self
            .graph
            .add_node_with_location(VisualNode { data: node, style }, location);
        if let Some(n) = self.graph.node_mut(idx) {
            n.set_label(label);
        }
        self.index.insert(id, idx);
        idx
    }

    fn insert_edge(&mut self, edge: Interaction) -> bool {
        let (Some(s), Some(t)) = (self.find_by_id(&edge.source), self.find_by_id(&edge.target))
        else {
            return false;
        };
        self.graph.add_edge_with_label(s, t, edge, String::new());
        true
    }

    /// Remove a node and return its data with the current position.
    fn remove_node(&mut self, idx: NodeIndex) -> Option<Node> {
        let node = self.graph.node(idx)?;
        let mut data = node.payload().data.clone();
        let location = node.location();
        data.position = Position::new(location.x, location.y);
        self.graph.remove_node(idx);
        self.index.remove(&data.id);
        Some(data)
    }

    // ------------------------------------------------------------------
    // Style
    // ------------------------------------------------------------------

    /// Bind label and colors to node data and clear any highlight.
    /// Re-applying gives the same result.
    pub fn init_style(&mut self) {
        let settings = self.settings;
        let indices: Vec<NodeIndex> = self.graph.nodes_iter().map(|(idx, _)| idx).collect();
        for idx in indices {
            if let Some(node) = self.graph.node_mut(idx) {
                let label = node.payload().data.label().to_string();
                let style = settings.style_for(&node.payload().data);
                node.payload_mut().style = style;
                node.set_label(label);
            }
        }
    }

    /// Reset every node to the style driven by its stored data.
    pub fn set_default_style(&mut self) {
        self.init_style();
    }

    /// Re-derive one node's style from its data, keeping its highlight.
    pub(crate) fn refresh_style(&mut self, idx: NodeIndex) {
        let settings = self.settings;
        if let Some(node) = self.graph.node_mut(idx) {
            let label = node.payload().data.label().to_string();
            let highlight = node.payload().style.highlight;
            let mut style = settings.style_for(&node.payload().data);
            style.highlight = highlight;
            node.payload_mut().style = style;
            node.set_label(label);
        }
    }

    pub(crate) fn node_data_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.graph.node_mut(idx).map(|n| &mut n.payload_mut().data)
    }

    // ------------------------------------------------------------------
    // Hidden nodes
    // ------------------------------------------------------------------

    /// Remove every node without incident edges. Edges are untouched.
    pub fn hide_unconnected(&mut self) -> HiddenNodes {
        let isolated: Vec<NodeIndex> = self
            .graph
            .nodes_iter()
            .map(|(idx, _)| idx)
            .filter(|idx| self.degree_at(*idx) == 0)
            .collect();
        let removed: Vec<Node> = isolated
            .into_iter()
            .filter_map(|idx| self.remove_node(idx))
            .collect();
        debug!(hidden = removed.len(), "unconnected nodes hidden");
        HiddenNodes(removed)
    }

    /// Put hidden nodes back. Ids already rendered are skipped.
    pub fn restore(&mut self, hidden: &HiddenNodes) -> usize {
        let mut restored = 0;
        for node in hidden.nodes() {
            if !self.contains(&node.id) {
                self.insert_node(node.clone());
                restored += 1;
            }
        }
        restored
    }

    /// `show`: restore `previously_hidden`, nothing stays hidden.
    /// Otherwise hide the unconnected nodes; the result also keeps what
    /// was already hidden.
    pub fn show_hidden_nodes(&mut self, show: bool, previously_hidden: HiddenNodes) -> HiddenNodes {
        if show {
            let restored = self.restore(&previously_hidden);
            debug!(restored, "hidden nodes shown");
            HiddenNodes::default()
        } else {
            previously_hidden.union(self.hide_unconnected())
        }
    }

    // ------------------------------------------------------------------
    // Domain extraction
    // ------------------------------------------------------------------

    pub fn domain_nodes(&self) -> Vec<Node> {
        self.graph
            .nodes_iter()
            .map(|(_, n)| {
                let mut data = n.payload().data.clone();
                let location = n.location();
                data.position = Position::new(location.x, location.y);
                data
            })
            .collect()
    }

    pub fn domain_interactions(&self) -> Vec<Interaction> {
        self.graph
            .edges_iter()
            .map(|(_, e)| e.payload().clone())
            .collect()
    }

    pub fn elements(&self) -> Elements {
        Elements {
            nodes: self.domain_nodes(),
            edges: self.domain_interactions(),
        }
    }

    /// Rendered nodes plus `hidden` ones, as a validated network.
    pub fn to_network(
        &self,
        title: &str,
        hidden: &HiddenNodes,
    ) -> std::result::Result<Network, NetworkError> {
        let mut nodes = self.domain_nodes();
        nodes.extend(
            hidden
                .nodes()
                .iter()
                .filter(|n| !self.contains(&n.id))
                .cloned(),
        );
        Network::new(title, self.domain_interactions(), nodes)
    }

    /// Edges whose both endpoints are in `ids`.
    fn edges_among(&self, ids: &[NodeId]) -> Vec<(NodeId, NodeId)> {
        let wanted: HashSet<&NodeId> = ids.iter().collect();
        self.graph
            .edges_iter()
            .map(|(_, e)| e.payload())
            .filter(|e| wanted.contains(&e.source) && wanted.contains(&e.target))
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Merge & intersection
    // ------------------------------------------------------------------

    /// Add `other` into this view. Existing nodes win over incoming ones
    /// with the same id; edges are deduplicated on their (source, target)
    /// pair. The layout name is checked before anything is added.
    pub fn merge_with(
        &mut self,
        other: Elements,
        layout: &LayoutDescriptor,
        layouts: &LayoutRegistry,
    ) -> Result<MergeReport> {
        layouts.validate(layout)?;
        let mut report = MergeReport::default();
        for node in other.nodes {
            if self.contains(&node.id) {
                report.nodes_kept += 1;
            } else {
                self.insert_node(node);
                report.nodes_added += 1;
            }
        }
        for edge in other.edges {
            if !(self.contains(&edge.source) && self.contains(&edge.target)) {
                warn!(edge = %edge.id(), "merged edge with unknown endpoint skipped");
                report.edges_dangling += 1;
            } else if self.has_edge(&edge.source, &edge.target) {
                report.edges_duplicate += 1;
            } else {
                self.insert_edge(edge);
                report.edges_added += 1;
            }
        }
        self.apply_layout(layout, layouts)?;
        info!(
            nodes_added = report.nodes_added,
            edges_added = report.edges_added,
            "networks merged"
        );
        Ok(report)
    }

    /// Ids rendered in both views, in this view's order.
    pub fn shared_ids(&self, other: &NetworkView) -> Vec<NodeId> {
        self.ids()
            .into_iter()
            .filter(|id| other.contains(id))
            .collect()
    }

    /// Highlight the shared nodes of both views, or reset both views to
    /// their data-driven style. Returns the number of shared nodes marked.
    pub fn toggle_highlight(
        &mut self,
        other: &mut NetworkView,
        enabled: bool,
        highlight: Color,
    ) -> usize {
        if !enabled {
            self.set_default_style();
            other.set_default_style();
            return 0;
        }
        let shared = self.shared_ids(other);
        for view in [&mut *self, &mut *other] {
            for id in &shared {
                if let Some(idx) = view.find_by_id(id)
                    && let Some(node) = view.graph.node_mut(idx)
                {
                    node.payload_mut().style.highlight = Some(highlight);
                }
            }
        }
        debug!(shared = shared.len(), "intersection highlighted");
        shared.len()
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn set_positions(&mut self, ids: &[NodeId], positions: &[Pos2]) {
        for (id, pos) in ids.iter().zip(positions) {
            if let Some(idx) = self.find_by_id(id)
                && let Some(node) = self.graph.node_mut(idx)
            {
                node.set_location(*pos);
            }
        }
    }

    fn run_layout(&mut self, ids: &[NodeId], algorithm: &dyn LayoutAlgorithm, bounds: Rect) {
        let edges = index_pairs(ids, &self.edges_among(ids));
        let positions = algorithm.positions(&LayoutInput {
            count: ids.len(),
            edges: &edges,
            bounds,
        });
        self.set_positions(ids, &positions);
    }

    /// Run a named layout over every rendered node. The none layout does
    /// nothing.
    pub fn apply_layout(
        &mut self,
        descriptor: &LayoutDescriptor,
        layouts: &LayoutRegistry,
    ) -> Result<()> {
        if descriptor.is_none() {
            return Ok(());
        }
        let algorithm = layouts.get(&descriptor.name)?;
        let ids = self.ids();
        let bounds = descriptor
            .bounding_box
            .unwrap_or_else(|| default_bounds(ids.len(), self.settings.spacing));
        self.run_layout(&ids, algorithm, bounds);
        self.fit();
        debug!(layout = %descriptor.name, nodes = ids.len(), "layout applied");
        Ok(())
    }

    /// Lay out the shared nodes of both views together with `intersect`,
    /// so each shared id lands on the same point in both, then each view's
    /// own nodes with `exclusive` in a box under the shared one.
    pub fn dual_layout(
        &mut self,
        other: &mut NetworkView,
        intersect: &str,
        exclusive: &str,
        layouts: &LayoutRegistry,
    ) -> Result<()> {
        let intersect = layouts.get(intersect)?;
        let exclusive = layouts.get(exclusive)?;
        let spacing = self.settings.spacing;

        let shared = self.shared_ids(other);
        let mut pairs = self.edges_among(&shared);
        pairs.extend(other.edges_among(&shared));
        let edges = index_pairs(&shared, &pairs);
        let mut top = 0.0;
        if !shared.is_empty() {
            let bounds = default_bounds(shared.len(), spacing);
            let positions = intersect.positions(&LayoutInput {
                count: shared.len(),
                edges: &edges,
                bounds,
            });
            self.set_positions(&shared, &positions);
            other.set_positions(&shared, &positions);
            top = bounds.max.y + spacing;
        }

        let shared: HashSet<NodeId> = shared.into_iter().collect();
        for view in [&mut *self, &mut *other] {
            let own: Vec<NodeId> = view
                .ids()
                .into_iter()
                .filter(|id| !shared.contains(id))
                .collect();
            if own.is_empty() {
                continue;
            }
            let size = default_bounds(own.len(), spacing).size();
            let bounds = Rect::from_min_size(Pos2::new(0.0, top), size);
            view.run_layout(&own, exclusive, bounds);
        }
        self.fit();
        other.fit();
        debug!(shared = shared.len(), "dual layout applied");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// `true` when the node exists and was not already selected.
    pub fn select(&mut self, id: &NodeId) -> bool {
        self.set_selected(id, true)
    }

    /// `true` when the node exists and was selected.
    pub fn unselect(&mut self, id: &NodeId) -> bool {
        self.set_selected(id, false)
    }

    fn set_selected(&mut self, id: &NodeId, selected: bool) -> bool {
        let Some(idx) = self.find_by_id(id) else {
            return false;
        };
        match self.graph.node_mut(idx) {
            Some(node) if node.selected() != selected => {
                node.set_selected(selected);
                true
            }
            _ => false,
        }
    }

    pub fn selected_ids(&self) -> BTreeSet<NodeId> {
        self.graph
            .nodes_iter()
            .filter(|(_, n)| n.selected())
            .map(|(_, n)| n.payload().data.id.clone())
            .collect()
    }

    /// Select every node whose primary label contains `text`. Returns the
    /// ids that were not selected before.
    pub fn search_by_label(&mut self, text: &str) -> Vec<NodeId> {
        let matches: Vec<NodeId> = self
            .graph
            .nodes_iter()
            .filter(|(_, n)| n.payload().data.label().contains(text))
            .map(|(_, n)| n.payload().data.id.clone())
            .collect();
        matches.into_iter().filter(|id| self.select(id)).collect()
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Add a directed edge between two rendered nodes, all or nothing.
    pub fn add_interaction(&mut self, source: &NodeId, target: &NodeId) -> Result<Interaction> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(ViewerError::EdgeRejected(EdgeRejection::UnknownNode(id.clone())));
            }
        }
        if source == target {
            return Err(ViewerError::EdgeRejected(EdgeRejection::SelfLoop(source.clone())));
        }
        if self.has_edge(source, target) {
            return Err(ViewerError::EdgeRejected(EdgeRejection::AlreadyLinked {
                from: source.clone(),
                to: target.clone(),
            }));
        }
        let edge = Interaction::new(source.clone(), target.clone());
        self.insert_edge(edge.clone());
        info!(edge = %edge.id(), "interaction added");
        Ok(edge)
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// Fit the whole graph on the next frame.
    pub fn fit(&mut self) {
        self.fit_requested = true;
    }

    pub fn take_fit_request(&mut self) -> bool {
        std::mem::take(&mut self.fit_requested)
    }

    pub fn resize(&mut self, width: PanelWidth) {
        self.width = width;
    }

    pub fn width(&self) -> PanelWidth {
        self.width
    }
}
