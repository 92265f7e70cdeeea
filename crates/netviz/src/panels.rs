use crate::error::{Result, ViewerError};
use crate::graph_view::{HiddenNodes, NetworkView, PanelWidth, ViewSettings};
use crate::layout::LayoutDescriptor;
use std::collections::BTreeSet;
use std::fmt;
use toxynet::{Network, NodeId};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Main,
    Side,
}

impl PanelId {
    pub fn other(self) -> PanelId {
        match self {
            PanelId::Main => PanelId::Side,
            PanelId::Side => PanelId::Main,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelId::Main => f.write_str("main"),
            PanelId::Side => f.write_str("side"),
        }
    }
}

/// Target of the panel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    #[default]
    Main,
    Side,
    Both,
}

impl PanelMode {
    /// The single panel addressed, `None` for both.
    pub fn panel(self) -> Option<PanelId> {
        match self {
            PanelMode::Main => Some(PanelId::Main),
            PanelMode::Side => Some(PanelId::Side),
            PanelMode::Both => None,
        }
    }
}

impl From<PanelId> for PanelMode {
    fn from(id: PanelId) -> Self {
        match id {
            PanelId::Main => PanelMode::Main,
            PanelId::Side => PanelMode::Side,
        }
    }
}

/// One display slot: the rendered view plus its domain snapshot.
pub struct Panel {
    pub id: PanelId,
    pub view: NetworkView,
    pub network: Network,
    pub layout: LayoutDescriptor,
    pub hidden: HiddenNodes,
    /// Selection seen at the last sync, diffed to detect selection events.
    pub last_selection: BTreeSet<NodeId>,
}

impl Panel {
    pub fn new(id: PanelId, settings: ViewSettings) -> Self {
        Self {
            id,
            view: NetworkView::new(settings),
            network: Network::default(),
            layout: LayoutDescriptor::none(),
            hidden: HiddenNodes::default(),
            last_selection: BTreeSet::new(),
        }
    }

    /// Replace everything shown: rebuild from `network`, hide the
    /// unconnected nodes, forget the layout and refit.
    pub fn change_network(&mut self, network: Network) {
        self.view.clear();
        self.view.populate(network.nodes(), network.interactions());
        self.view.init_style();
        self.hidden = self.view.hide_unconnected();
        self.layout = LayoutDescriptor::none();
        self.last_selection.clear();
        self.view.fit();
        info!(
            panel = %self.id,
            title = network.title(),
            nodes = network.node_count(),
            hidden = self.hidden.len(),
            "network displayed"
        );
        self.network = network;
    }

    /// Rebuild the domain snapshot from the view and the hidden nodes.
    pub fn refresh_snapshot(&mut self) -> Result<()> {
        let network = self.view.to_network(self.network.title(), &self.hidden)?;
        self.network = network;
        Ok(())
    }

    pub fn show_hidden(&mut self, show: bool) {
        let previous = std::mem::take(&mut self.hidden);
        self.hidden = self.view.show_hidden_nodes(show, previous);
        self.view.fit();
    }

    /// State of the "show hidden nodes" checkbox.
    pub fn hidden_shown(&self) -> bool {
        self.hidden.is_empty()
    }

    pub fn title(&self) -> &str {
        self.network.title()
    }
}

/// The two display slots; SIDE exists only between its first use and a
/// merge.
pub struct Panels {
    main: Option<Panel>,
    side: Option<Panel>,
}

impl Default for Panels {
    fn default() -> Self {
        Self::new()
    }
}

impl Panels {
    pub fn new() -> Self {
        Self {
            main: None,
            side: None,
        }
    }

    fn slot(&mut self, id: PanelId) -> &mut Option<Panel> {
        match id {
            PanelId::Main => &mut self.main,
            PanelId::Side => &mut self.side,
        }
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        match id {
            PanelId::Main => self.main.as_ref(),
            PanelId::Side => self.side.as_ref(),
        }
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.slot(id).as_mut()
    }

    pub fn require(&mut self, id: PanelId) -> Result<&mut Panel> {
        self.get_mut(id).ok_or(ViewerError::MissingPanel(id))
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.get(id).is_some()
    }

    /// Existing panel, or a fresh empty one.
    pub fn ensure(&mut self, id: PanelId, settings: ViewSettings) -> &mut Panel {
        self.slot(id).get_or_insert_with(|| {
            info!(panel = %id, "panel created");
            Panel::new(id, settings)
        })
    }

    /// Tear SIDE down.
    pub fn remove_side(&mut self) -> Option<Panel> {
        let side = self.side.take();
        if side.is_some() {
            info!("side panel removed");
        }
        side
    }

    pub fn both_mut(&mut self) -> Option<(&mut Panel, &mut Panel)> {
        match (&mut self.main, &mut self.side) {
            (Some(main), Some(side)) => Some((main, side)),
            _ => None,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Panel> {
        self.main.iter_mut().chain(self.side.iter_mut())
    }

    pub fn set_width(&mut self, width: PanelWidth) {
        for panel in self.iter_mut() {
            panel.view.resize(width);
            panel.view.fit();
        }
    }

    /// Select or unselect `id` in `panel` and mirror it to the other panel.
    /// Returns the number of nodes whose selection changed.
    pub fn set_selected(&mut self, panel: PanelId, id: &NodeId, selected: bool) -> usize {
        let Some(p) = self.get_mut(panel) else {
            return 0;
        };
        let changed = if selected {
            p.view.select(id)
        } else {
            p.view.unselect(id)
        };
        usize::from(changed) + self.sync_selection(panel)
    }

    /// Diff `panel`'s selection against the last sync and replay the
    /// difference on the other panel. The other panel's last-seen
    /// selection is updated too, so mirrored changes are not mirrored back.
    pub fn sync_selection(&mut self, panel: PanelId) -> usize {
        let Some(p) = self.get_mut(panel) else {
            return 0;
        };
        // Nodes that left the view were not unselected by the user.
        let view = &p.view;
        p.last_selection.retain(|id| view.contains(id));
        let current = p.view.selected_ids();
        if current == p.last_selection {
            return 0;
        }
        let added: Vec<NodeId> = current.difference(&p.last_selection).cloned().collect();
        let removed: Vec<NodeId> = p.last_selection.difference(&current).cloned().collect();
        p.last_selection = current;

        let Some(other) = self.get_mut(panel.other()) else {
            return 0;
        };
        let mut mirrored = 0;
        for id in &added {
            mirrored += usize::from(other.view.select(id));
        }
        for id in &removed {
            mirrored += usize::from(other.view.unselect(id));
        }
        other.last_selection = other.view.selected_ids();
        if mirrored > 0 {
            debug!(from = %panel, mirrored, "selection mirrored");
        }
        mirrored
    }
}
