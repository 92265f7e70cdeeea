use crate::color_scale::ColorScale;
use crate::edge_gesture::{EdgeGesture, GestureOutcome};
use crate::effects::Effect;
use crate::error::{Result, ViewerError};
use crate::graph_view::PanelWidth;
use crate::layout::LayoutDescriptor;
use crate::node_editor::NodeEdit;
use crate::panels::{PanelId, PanelMode};
use crate::store::{ColorScaleForm, Dialog, NoticeLevel, Store};
use std::path::PathBuf;
use toxynet::{Color, Network, NodeId};
use tracing::{debug, info, warn};

/// Actions that can be dispatched to modify the viewer state
#[derive(Debug, Clone)]
pub enum Action {
    // Panels
    /// Replace everything shown in a panel
    ChangeNetwork { panel: PanelId, network: Network },
    /// Create the SIDE panel if needed and split the window
    ShowNetworkOnRight,
    /// Fold SIDE into MAIN and remove SIDE
    MergeNetworks,
    /// Change the panel the controls apply to
    SelectPanel { mode: PanelMode },

    // Controls
    /// Run a layout on the selected panel(s)
    SelectLayout { name: String },
    /// Show or hide the unconnected nodes of the selected panel
    SetShowHidden { show: bool },
    /// Highlight the nodes present in both panels
    SetIntersection { enabled: bool },

    // Selection
    /// Select or unselect a node; mirrored to the other panel
    SelectNode {
        panel: PanelId,
        id: NodeId,
        selected: bool,
    },
    /// Pick up selection changes made in the renderer
    SyncSelection { panel: PanelId },

    // Edge creation
    /// Start an edge from `source`
    BeginEdge { panel: PanelId, source: NodeId },
    /// Click while an edge is pending; `target` is the node under the pointer
    ClickCanvas {
        panel: PanelId,
        target: Option<NodeId>,
    },
    CancelEdge,

    // Dialogs
    OpenNodeProperties { panel: PanelId, id: NodeId },
    /// Form edits that need no engine logic
    UpdateDialog { dialog: Dialog },
    /// Change the edited type and reset color and shape to its defaults
    SetNodeFormType { node_type: String },
    /// Choose the weight entry to edit
    SetNodeFormWeight { key: Option<String> },
    SubmitNodeProperties,
    OpenColorScale { panel: PanelId },
    SubmitColorScale,
    OpenSearch,
    SubmitSearch,
    CloseDialog,
    /// Drop the oldest notice
    DismissNotice,

    // File Operations
    /// Save MAIN's network to file
    SaveToFile { path: PathBuf },
    /// Load a network from file into a panel
    LoadFromFile { panel: PanelId, path: PathBuf },
}

/// Apply a single action to modify the store state. Failures never
/// escape: they are reported as notices and leave the store as it was.
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match apply(store, action) {
        Ok(effects) => effects,
        Err(e) => {
            store.report(e);
            vec![]
        }
    }
}

fn apply(store: &mut Store, action: Action) -> Result<Vec<Effect>> {
    match action {
        Action::ChangeNetwork { panel, network } => change_network(store, panel, network),
        Action::ShowNetworkOnRight => show_network_on_right(store),
        Action::MergeNetworks => merge_networks(store)?,
        Action::SelectPanel { mode } => select_panel(store, mode)?,
        Action::SelectLayout { name } => select_layout(store, name)?,
        Action::SetShowHidden { show } => set_show_hidden(store, show)?,
        Action::SetIntersection { enabled } => set_intersection(store, enabled)?,
        Action::SelectNode {
            panel,
            id,
            selected,
        } => {
            store.panels.set_selected(panel, &id, selected);
        }
        Action::SyncSelection { panel } => {
            store.panels.sync_selection(panel);
        }
        Action::BeginEdge { panel, source } => {
            debug!(panel = %panel, source = %source, "edge gesture started");
            store.gesture.begin(panel, source);
        }
        Action::ClickCanvas { panel, target } => click_canvas(store, panel, target)?,
        Action::CancelEdge => {
            if store.gesture.cancel() {
                debug!("edge gesture cancelled");
            }
        }
        Action::OpenNodeProperties { panel, id } => {
            // missing nodes open nothing
            if let Some(node) = store.panels.get(panel).and_then(|p| p.view.node(&id)) {
                let form = NodeEdit::for_node(&node.data);
                store.dialog = Dialog::NodeProperties { panel, form };
            }
        }
        Action::UpdateDialog { dialog } => store.dialog = dialog,
        Action::SetNodeFormType { node_type } => {
            if let Dialog::NodeProperties { form, .. } = &mut store.dialog {
                form.node_type = node_type;
                form.apply_type_defaults(&store.config);
            }
        }
        Action::SetNodeFormWeight { key } => {
            if let Dialog::NodeProperties { panel, form } = &mut store.dialog
                && let Some(node) = store.panels.get(*panel).and_then(|p| p.view.node(&form.id))
            {
                form.select_weight(&node.data, key);
            }
        }
        Action::SubmitNodeProperties => submit_node_properties(store)?,
        Action::OpenColorScale { panel } => {
            store.panels.require(panel)?;
            store.dialog = Dialog::ColorScale {
                panel,
                form: ColorScaleForm::default(),
            };
        }
        Action::SubmitColorScale => submit_color_scale(store)?,
        Action::OpenSearch => {
            store.dialog = Dialog::Search {
                text: String::new(),
            };
        }
        Action::SubmitSearch => submit_search(store)?,
        Action::CloseDialog => store.dialog = Dialog::None,
        Action::DismissNotice => {
            store.notices.pop_front();
        }
        Action::SaveToFile { path } => return Ok(vec![Effect::SaveToFile { path }]),
        Action::LoadFromFile { panel, path } => {
            return Ok(vec![Effect::LoadFromFile { panel, path }]);
        }
    }
    Ok(vec![])
}

// ------------------------------------------------------------------
// Panels
// ------------------------------------------------------------------

/// Display `network` in `panel`, creating SIDE on first use.
pub fn change_network(store: &mut Store, panel: PanelId, network: Network) {
    if panel == PanelId::Side && !store.panels.contains(PanelId::Side) {
        show_network_on_right(store);
    }
    let settings = store.settings();
    let p = store.panels.ensure(panel, settings);
    p.change_network(network);
    if let Err(e) = p.refresh_snapshot() {
        warn!(panel = %panel, error = %e, "snapshot not refreshed");
    }
    refresh_intersection(store);
    store.controls.mode = panel.into();
    store.sync_controls();
}

fn show_network_on_right(store: &mut Store) {
    let settings = store.settings();
    store.panels.ensure(PanelId::Side, settings);
    store.panels.set_width(PanelWidth::Half);
}

fn merge_networks(store: &mut Store) -> Result<()> {
    if !store.panels.contains(PanelId::Side) {
        return Err(ViewerError::MissingPanel(PanelId::Side));
    }
    let layout = LayoutDescriptor::named(store.controls.layout.clone());
    store.layouts.validate(&layout)?;
    let Some(side) = store.panels.remove_side() else {
        return Err(ViewerError::MissingPanel(PanelId::Side));
    };
    if let EdgeGesture::AwaitingTarget {
        panel: PanelId::Side,
        ..
    } = store.gesture
    {
        store.gesture.cancel();
    }

    let main = store.panels.require(PanelId::Main)?;
    let hidden = std::mem::take(&mut main.hidden).union(side.hidden);
    main.hidden = main.view.show_hidden_nodes(false, hidden);
    main.view.set_default_style();
    let report = main.view.merge_with(side.view.elements(), &layout, &store.layouts)?;
    main.layout = LayoutDescriptor::none();
    main.view.resize(PanelWidth::Full);
    main.view.fit();
    main.last_selection = main.view.selected_ids();
    main.refresh_snapshot()?;

    store.controls.intersection = false;
    store.controls.mode = PanelMode::Main;
    store.sync_controls();
    info!(
        nodes_added = report.nodes_added,
        edges_added = report.edges_added,
        "side panel merged into main"
    );
    Ok(())
}

fn select_panel(store: &mut Store, mode: PanelMode) -> Result<()> {
    if matches!(mode, PanelMode::Side | PanelMode::Both) && !store.panels.contains(PanelId::Side) {
        return Err(ViewerError::MissingPanel(PanelId::Side));
    }
    store.controls.mode = mode;
    store.sync_controls();
    Ok(())
}

// ------------------------------------------------------------------
// Controls
// ------------------------------------------------------------------

fn select_layout(store: &mut Store, name: String) -> Result<()> {
    let descriptor = LayoutDescriptor::named(name);
    if descriptor.is_none() {
        if let Some(id) = store.controls.mode.panel() {
            store.panels.require(id)?.layout = LayoutDescriptor::none();
        }
        store.controls.layout = descriptor.name;
        return Ok(());
    }
    match store.controls.mode.panel() {
        Some(id) => {
            let panel = store.panels.require(id)?;
            panel.view.apply_layout(&descriptor, &store.layouts)?;
            panel.refresh_snapshot()?;
            store.controls.layout = descriptor.name.clone();
            panel.layout = descriptor;
        }
        None => {
            let (main, side) = store
                .panels
                .both_mut()
                .ok_or(ViewerError::MissingPanel(PanelId::Side))?;
            main.view.dual_layout(
                &mut side.view,
                &descriptor.name,
                &store.config.fallback_layout,
                &store.layouts,
            )?;
            for panel in [main, side] {
                panel.layout = LayoutDescriptor::none();
                panel.refresh_snapshot()?;
            }
            store.sync_controls();
        }
    }
    Ok(())
}

fn set_show_hidden(store: &mut Store, show: bool) -> Result<()> {
    let Some(id) = store.controls.mode.panel() else {
        warn!("hidden nodes toggled with both panels selected");
        return Ok(());
    };
    let panel = store.panels.require(id)?;
    panel.show_hidden(show);
    panel.view.apply_layout(&panel.layout, &store.layouts)?;
    panel.refresh_snapshot()?;
    refresh_intersection(store);
    store.sync_controls();
    Ok(())
}

fn set_intersection(store: &mut Store, enabled: bool) -> Result<()> {
    if enabled && !store.panels.contains(PanelId::Side) {
        return Err(ViewerError::MissingPanel(PanelId::Side));
    }
    store.controls.intersection = enabled;
    let highlight = store.config.highlight_color;
    match store.panels.both_mut() {
        Some((main, side)) => {
            main.view.toggle_highlight(&mut side.view, enabled, highlight);
        }
        None => {
            for panel in store.panels.iter_mut() {
                panel.view.set_default_style();
            }
        }
    }
    Ok(())
}

/// Re-apply the intersection highlight after the rendered nodes changed.
fn refresh_intersection(store: &mut Store) {
    if !store.controls.intersection {
        return;
    }
    let highlight = store.config.highlight_color;
    if let Some((main, side)) = store.panels.both_mut() {
        main.view.toggle_highlight(&mut side.view, false, highlight);
        main.view.toggle_highlight(&mut side.view, true, highlight);
    }
}

// ------------------------------------------------------------------
// Edge creation
// ------------------------------------------------------------------

fn click_canvas(store: &mut Store, panel: PanelId, target: Option<NodeId>) -> Result<()> {
    match store.gesture.click(panel, target) {
        GestureOutcome::Ignored => Ok(()),
        GestureOutcome::Rejected(reason) => Err(ViewerError::EdgeRejected(reason)),
        GestureOutcome::Create {
            panel,
            source,
            target,
        } => {
            let p = store.panels.require(panel)?;
            p.view.add_interaction(&source, &target)?;
            p.refresh_snapshot()?;
            Ok(())
        }
    }
}

// ------------------------------------------------------------------
// Dialogs
// ------------------------------------------------------------------

fn submit_node_properties(store: &mut Store) -> Result<()> {
    let Dialog::NodeProperties { panel, form } = &store.dialog else {
        return Ok(());
    };
    let (panel, edit) = (*panel, form.parse()?);
    let p = store.panels.require(panel)?;
    if p.view.apply_edit(&edit) {
        p.refresh_snapshot()?;
    }
    store.dialog = Dialog::None;
    Ok(())
}

fn submit_color_scale(store: &mut Store) -> Result<()> {
    let Dialog::ColorScale { panel, form } = &store.dialog else {
        return Ok(());
    };
    let base = form
        .color
        .trim()
        .parse::<Color>()
        .map_err(|e| ViewerError::InvalidInput(e.to_string()))?;
    let scale = ColorScale {
        msg_rna_key: form.msg_rna_key.clone(),
        micro_rna_key: form.micro_rna_key.clone(),
        base,
    };
    let p = store.panels.require(*panel)?;
    if p.view.apply_color_scale(&scale) > 0 {
        p.refresh_snapshot()?;
    }
    store.dialog = Dialog::None;
    Ok(())
}

fn submit_search(store: &mut Store) -> Result<()> {
    let Dialog::Search { text } = &store.dialog else {
        return Ok(());
    };
    if text.is_empty() {
        return Err(ViewerError::InvalidInput(
            "Please enter a text to search".to_string(),
        ));
    }
    let text = text.clone();
    let targets = match store.controls.mode.panel() {
        Some(id) => vec![id],
        None => vec![PanelId::Main, PanelId::Side],
    };
    let mut found = 0;
    for id in targets {
        let Some(panel) = store.panels.get_mut(id) else {
            continue;
        };
        found += panel.view.search_by_label(&text).len();
        store.panels.sync_selection(id);
    }
    store.dialog = Dialog::None;
    if found == 0 {
        store.notify(NoticeLevel::Info, format!("No node label contains `{text}`"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::error::EdgeRejection;
    use crate::layout::NONE_LAYOUT;
    use eframe::egui;
    use std::collections::BTreeSet;
    use toxynet::{Interaction, Node, NodeType};

    fn network(title: &str, nodes: &[&str], edges: &[(&str, &str)]) -> Network {
        let nodes = nodes
            .iter()
            .map(|id| Node::new(*id, NodeType::MsgRna).with_label(format!("L-{id}")))
            .collect();
        let edges = edges.iter().map(|(s, t)| Interaction::new(*s, *t)).collect();
        Network::new(title, edges, nodes).unwrap()
    }

    fn run(store: &mut Store, action: Action) -> Vec<Effect> {
        update(store, action)
    }

    fn store_with_two_panels() -> Store {
        let mut store = Store::new(ViewerConfig::default());
        run(
            &mut store,
            Action::ChangeNetwork {
                panel: PanelId::Main,
                network: network("main", &["a", "b", "c", "m"], &[("a", "b"), ("b", "c")]),
            },
        );
        run(
            &mut store,
            Action::ChangeNetwork {
                panel: PanelId::Side,
                network: network("side", &["b", "c", "s", "lonely"], &[("c", "s"), ("b", "c")]),
            },
        );
        run(&mut store, Action::SelectPanel { mode: PanelMode::Main });
        store
    }

    fn ids(v: &[&str]) -> BTreeSet<NodeId> {
        v.iter().map(|s| NodeId::new(*s)).collect()
    }

    fn visible(store: &Store, panel: PanelId) -> BTreeSet<NodeId> {
        store.panels.get(panel).unwrap().view.ids().into_iter().collect()
    }

    #[test]
    fn test_change_network_into_side_splits_the_window() {
        let store = store_with_two_panels();
        let main = store.panels.get(PanelId::Main).unwrap();
        let side = store.panels.get(PanelId::Side).unwrap();
        assert_eq!(main.view.width(), PanelWidth::Half);
        assert_eq!(visible(&store, PanelId::Main), ids(&["a", "b", "c"]));
        assert_eq!(visible(&store, PanelId::Side), ids(&["b", "c", "s"]));
        assert_eq!(main.hidden.ids(), ids(&["m"]));
        assert_eq!(side.layout, LayoutDescriptor::none());
        // snapshot still knows the hidden node
        assert_eq!(store.current_network().unwrap().node_count(), 4);
        assert!(!store.controls.show_hidden);
    }

    #[test]
    fn test_selection_is_mirrored_across_panels() {
        let mut store = store_with_two_panels();
        run(
            &mut store,
            Action::SelectNode {
                panel: PanelId::Main,
                id: NodeId::new("b"),
                selected: true,
            },
        );
        assert_eq!(
            store.panels.get(PanelId::Side).unwrap().view.selected_ids(),
            ids(&["b"])
        );
        run(
            &mut store,
            Action::SelectNode {
                panel: PanelId::Main,
                id: NodeId::new("a"),
                selected: true,
            },
        );
        assert_eq!(
            store.panels.get(PanelId::Side).unwrap().view.selected_ids(),
            ids(&["b"])
        );
        run(&mut store, Action::SyncSelection { panel: PanelId::Side });
        assert_eq!(
            store.panels.get(PanelId::Main).unwrap().view.selected_ids(),
            ids(&["a", "b"])
        );
    }

    #[test]
    fn test_merge_folds_side_into_main() {
        let mut store = store_with_two_panels();
        run(&mut store, Action::SetIntersection { enabled: true });
        assert!(store.controls.intersection);
        run(&mut store, Action::MergeNetworks);

        assert!(!store.panels.contains(PanelId::Side));
        assert!(!store.controls.intersection);
        assert_eq!(visible(&store, PanelId::Main), ids(&["a", "b", "c", "s"]));
        let main = store.panels.get(PanelId::Main).unwrap();
        assert_eq!(main.view.edge_count(), 3);
        assert_eq!(main.hidden.ids(), ids(&["m", "lonely"]));
        assert_eq!(main.view.width(), PanelWidth::Full);
        assert!(main.layout.is_none());
        assert!(main
            .view
            .ids()
            .iter()
            .all(|id| main.view.node(id).unwrap().style.highlight.is_none()));
        assert_eq!(store.current_network().unwrap().node_count(), 6);

        run(&mut store, Action::MergeNetworks);
        assert_eq!(store.notices.len(), 1);
    }

    #[test]
    fn test_merge_with_unknown_layout_keeps_side() {
        let mut store = store_with_two_panels();
        store.controls.layout = "cose".to_string();
        run(&mut store, Action::MergeNetworks);
        assert!(store.panels.contains(PanelId::Side));
        assert_eq!(store.notices.len(), 1);
    }

    #[test]
    fn test_both_mode_runs_dual_layout_once() {
        let mut store = store_with_two_panels();
        run(&mut store, Action::SelectPanel { mode: PanelMode::Both });
        assert!(!store.controls.show_hidden_enabled);
        run(
            &mut store,
            Action::SelectLayout {
                name: "circle".to_string(),
            },
        );
        let main = store.panels.get(PanelId::Main).unwrap();
        let side = store.panels.get(PanelId::Side).unwrap();
        for id in ["b", "c"] {
            let id = NodeId::new(id);
            let p = main.view.domain_nodes().into_iter().find(|n| n.id == id).unwrap();
            let q = side.view.domain_nodes().into_iter().find(|n| n.id == id).unwrap();
            assert!((p.position.x - q.position.x).abs() < 1e-4);
            assert!((p.position.y - q.position.y).abs() < 1e-4);
        }
        assert!(main.layout.is_none() && side.layout.is_none());
        assert_eq!(store.controls.layout, NONE_LAYOUT);
    }

    #[test]
    fn test_single_panel_layout_is_stored_and_surfaced() {
        let mut store = store_with_two_panels();
        run(
            &mut store,
            Action::SelectLayout {
                name: "grid".to_string(),
            },
        );
        assert_eq!(store.panels.get(PanelId::Main).unwrap().layout.name, "grid");
        run(&mut store, Action::SelectPanel { mode: PanelMode::Side });
        assert_eq!(store.controls.layout, NONE_LAYOUT);
        run(&mut store, Action::SelectPanel { mode: PanelMode::Main });
        assert_eq!(store.controls.layout, "grid");

        run(
            &mut store,
            Action::SelectLayout {
                name: "spring".to_string(),
            },
        );
        assert_eq!(store.notices.len(), 1);
        assert_eq!(store.panels.get(PanelId::Main).unwrap().layout.name, "grid");
    }

    #[test]
    fn test_loading_a_network_selects_its_panel() {
        let mut store = Store::new(ViewerConfig::default());
        run(
            &mut store,
            Action::ChangeNetwork {
                panel: PanelId::Side,
                network: network("side", &["x", "y", "z"], &[("x", "y")]),
            },
        );
        assert_eq!(store.controls.mode, PanelMode::Side);
        assert!(store.controls.show_hidden_enabled);
        assert!(!store.controls.show_hidden);

        run(
            &mut store,
            Action::ChangeNetwork {
                panel: PanelId::Main,
                network: network("main", &["a", "b"], &[("a", "b")]),
            },
        );
        assert_eq!(store.controls.mode, PanelMode::Main);
        assert!(store.controls.show_hidden);
    }

    #[test]
    fn test_null_layout_stops_relayout_on_show_hidden() {
        let mut store = Store::new(ViewerConfig::default());
        run(
            &mut store,
            Action::ChangeNetwork {
                panel: PanelId::Main,
                network: network("main", &["a", "b", "lonely"], &[("a", "b")]),
            },
        );
        for name in ["grid", NONE_LAYOUT] {
            run(
                &mut store,
                Action::SelectLayout {
                    name: name.to_string(),
                },
            );
        }
        assert!(store.panels.get(PanelId::Main).unwrap().layout.is_none());

        let a = NodeId::new("a");
        let main = store.panels.get_mut(PanelId::Main).unwrap();
        let idx = main.view.find_by_id(&a).unwrap();
        main.view
            .graph_mut()
            .node_mut(idx)
            .unwrap()
            .set_location(egui::Pos2::new(999.0, 999.0));

        run(&mut store, Action::SetShowHidden { show: true });
        assert_eq!(store.controls.layout, NONE_LAYOUT);
        let main = store.panels.get(PanelId::Main).unwrap();
        let idx = main.view.find_by_id(&a).unwrap();
        let pos = main.view.graph().node(idx).unwrap().location();
        assert_eq!(pos, egui::Pos2::new(999.0, 999.0));
    }

    #[test]
    fn test_show_hidden_toggles_selected_panel() {
        let mut store = store_with_two_panels();
        run(&mut store, Action::SetShowHidden { show: true });
        assert!(store.controls.show_hidden);
        assert_eq!(visible(&store, PanelId::Main), ids(&["a", "b", "c", "m"]));
        assert_eq!(visible(&store, PanelId::Side), ids(&["b", "c", "s"]));
        run(&mut store, Action::SetShowHidden { show: false });
        assert_eq!(visible(&store, PanelId::Main), ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_side_selection_requires_side_panel() {
        let mut store = Store::new(ViewerConfig::default());
        run(&mut store, Action::SelectPanel { mode: PanelMode::Both });
        assert_eq!(store.controls.mode, PanelMode::Main);
        assert_eq!(store.notices.len(), 1);
        run(&mut store, Action::DismissNotice);
        assert!(store.notices.is_empty());
    }

    #[test]
    fn test_edge_gesture_adds_one_edge_or_reports() {
        let mut store = store_with_two_panels();
        let edges = |s: &Store| s.panels.get(PanelId::Main).unwrap().view.edge_count();
        let before = edges(&store);

        run(
            &mut store,
            Action::BeginEdge {
                panel: PanelId::Main,
                source: NodeId::new("a"),
            },
        );
        run(
            &mut store,
            Action::ClickCanvas {
                panel: PanelId::Main,
                target: Some(NodeId::new("c")),
            },
        );
        assert_eq!(edges(&store), before + 1);
        assert!(store.notices.is_empty());
        assert!(!store.gesture.is_active());

        run(
            &mut store,
            Action::BeginEdge {
                panel: PanelId::Main,
                source: NodeId::new("a"),
            },
        );
        run(
            &mut store,
            Action::ClickCanvas {
                panel: PanelId::Main,
                target: Some(NodeId::new("a")),
            },
        );
        assert_eq!(edges(&store), before + 1);
        assert_eq!(store.notices.len(), 1);
        assert!(store.notices[0].message.starts_with("Edge not added"));
        assert!(!store.gesture.is_active());
    }

    #[test]
    fn test_edge_to_already_linked_node_is_rejected() {
        let mut store = store_with_two_panels();
        run(
            &mut store,
            Action::BeginEdge {
                panel: PanelId::Main,
                source: NodeId::new("a"),
            },
        );
        run(
            &mut store,
            Action::ClickCanvas {
                panel: PanelId::Main,
                target: Some(NodeId::new("b")),
            },
        );
        let expected = ViewerError::EdgeRejected(EdgeRejection::AlreadyLinked {
            from: NodeId::new("a"),
            to: NodeId::new("b"),
        })
        .to_string();
        assert_eq!(store.notices[0].message, expected);
    }

    #[test]
    fn test_node_properties_round_trip() {
        let mut store = store_with_two_panels();
        run(
            &mut store,
            Action::OpenNodeProperties {
                panel: PanelId::Main,
                id: NodeId::new("a"),
            },
        );
        run(
            &mut store,
            Action::SetNodeFormType {
                node_type: "miRNA".to_string(),
            },
        );
        let Dialog::NodeProperties { panel, mut form } = store.dialog.clone() else {
            panic!("properties dialog not open");
        };
        assert_eq!(form.shape, "pentagon");
        form.label = "Edited".to_string();
        run(
            &mut store,
            Action::UpdateDialog {
                dialog: Dialog::NodeProperties { panel, form },
            },
        );
        run(&mut store, Action::SubmitNodeProperties);
        assert_eq!(store.dialog, Dialog::None);
        let a = store
            .current_network()
            .unwrap()
            .node(&NodeId::new("a"))
            .unwrap();
        assert_eq!(a.label(), "Edited");
        assert_eq!(a.node_type, NodeType::MicroRna);
    }

    #[test]
    fn test_invalid_node_form_keeps_dialog_open() {
        let mut store = store_with_two_panels();
        run(
            &mut store,
            Action::OpenNodeProperties {
                panel: PanelId::Main,
                id: NodeId::new("a"),
            },
        );
        if let Dialog::NodeProperties { form, .. } = &mut store.dialog {
            form.color = "nope".to_string();
        }
        run(&mut store, Action::SubmitNodeProperties);
        assert!(matches!(store.dialog, Dialog::NodeProperties { .. }));
        assert_eq!(store.notices.len(), 1);
        assert_eq!(
            store.current_network().unwrap().node(&NodeId::new("a")).unwrap().label(),
            "L-a"
        );
    }

    #[test]
    fn test_search_selects_and_mirrors() {
        let mut store = store_with_two_panels();
        run(&mut store, Action::OpenSearch);
        run(&mut store, Action::SubmitSearch);
        assert_eq!(store.notices.len(), 1);

        run(
            &mut store,
            Action::UpdateDialog {
                dialog: Dialog::Search {
                    text: "L-c".to_string(),
                },
            },
        );
        run(&mut store, Action::SubmitSearch);
        assert_eq!(
            store.panels.get(PanelId::Main).unwrap().view.selected_ids(),
            ids(&["c"])
        );
        assert_eq!(
            store.panels.get(PanelId::Side).unwrap().view.selected_ids(),
            ids(&["c"])
        );
        assert_eq!(store.dialog, Dialog::None);
    }

    #[test]
    fn test_color_scale_dialog_colors_panel() {
        let mut store = Store::new(ViewerConfig::default());
        let nodes = vec![
            Node::new("x", NodeType::MsgRna).with_weight("c1", 1.0),
            Node::new("y", NodeType::MsgRna).with_weight("c1", 3.0),
        ];
        let net = Network::new("t", vec![Interaction::new("x", "y")], nodes).unwrap();
        run(
            &mut store,
            Action::ChangeNetwork {
                panel: PanelId::Main,
                network: net,
            },
        );
        run(&mut store, Action::OpenColorScale { panel: PanelId::Main });
        run(
            &mut store,
            Action::UpdateDialog {
                dialog: Dialog::ColorScale {
                    panel: PanelId::Main,
                    form: ColorScaleForm {
                        msg_rna_key: Some("c1".to_string()),
                        micro_rna_key: None,
                        color: "#0000ff".to_string(),
                    },
                },
            },
        );
        run(&mut store, Action::SubmitColorScale);
        let y = store
            .current_network()
            .unwrap()
            .node(&NodeId::new("y"))
            .unwrap();
        assert_eq!(y.color, Color::rgb(0, 0, 255));
        assert_eq!(y.border_color, Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn test_file_actions_become_effects() {
        let mut store = Store::new(ViewerConfig::default());
        let effects = run(
            &mut store,
            Action::LoadFromFile {
                panel: PanelId::Side,
                path: PathBuf::from("net.json"),
            },
        );
        assert_eq!(
            effects,
            vec![Effect::LoadFromFile {
                panel: PanelId::Side,
                path: PathBuf::from("net.json"),
            }]
        );
    }
}
