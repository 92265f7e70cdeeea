use crate::actions::Action;
use crate::graph_view::NetworkGraphView;
use crate::layout::NONE_LAYOUT;
use crate::panels::{Panel, PanelId, PanelMode};
use crate::state::State;
use crate::store::{ColorScaleForm, Dialog, NoticeLevel, Store};
use eframe::egui;
use egui_graphs::{SettingsInteraction, SettingsNavigation, SettingsStyle};
use toxynet::{NodeId, NodeShape, NodeType};

const GRAPH_MARGIN: f32 = 8.0;

/// Right-click menu anchored where it was opened.
struct ContextMenu {
    panel: PanelId,
    node: Option<NodeId>,
    pos: egui::Pos2,
    just_opened: bool,
}

pub struct NetvizApp {
    state: State,
    menu: Option<ContextMenu>,
}

impl NetvizApp {
    pub fn new(state: State) -> Self {
        Self { state, menu: None }
    }
}

impl eframe::App for NetvizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();
        let store = &mut self.state.store;

        egui::TopBottomPanel::top("controls")
            .exact_height(store.ui_height())
            .show(ctx, |ui| control_bar(ui, store, &mut actions));

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(GRAPH_MARGIN))
            .show(ctx, |ui| {
                let gesture_active = store.gesture.is_active();
                let menu = &mut self.menu;
                if store.panels.contains(PanelId::Side) {
                    ui.columns(2, |cols| {
                        for (col, id) in cols.iter_mut().zip([PanelId::Main, PanelId::Side]) {
                            if let Some(panel) = store.panels.get_mut(id) {
                                draw_panel(col, panel, gesture_active, menu, &mut actions);
                            }
                        }
                    });
                } else if let Some(panel) = store.panels.get_mut(PanelId::Main) {
                    draw_panel(ui, panel, gesture_active, menu, &mut actions);
                }
            });

        if let Some(menu) = &mut self.menu
            && !context_menu(ctx, menu, &mut actions)
        {
            self.menu = None;
        }
        dialogs(ctx, store, &mut actions);
        notices(ctx, store, &mut actions);

        if store.gesture.is_active() {
            ctx.set_cursor_icon(store.gesture.cursor());
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                actions.push(Action::CancelEdge);
            }
        }

        for action in actions {
            self.state.dispatch(action);
        }
        self.state.flush_actions();
        self.state.flush_effects();
    }
}

// ------------------------------------------------------------------
// Control bar
// ------------------------------------------------------------------

fn mode_label(mode: PanelMode) -> &'static str {
    match mode {
        PanelMode::Main => "Main",
        PanelMode::Side => "Side",
        PanelMode::Both => "Both",
    }
}

fn pick_json() -> rfd::FileDialog {
    rfd::FileDialog::new().add_filter("JSON", &["json"])
}

fn control_bar(ui: &mut egui::Ui, store: &Store, actions: &mut Vec<Action>) {
    let controls = &store.controls;
    let has_side = store.panels.contains(PanelId::Side);
    ui.horizontal(|ui| {
        if ui.button("Open").clicked()
            && let Some(path) = pick_json().pick_file()
        {
            actions.push(Action::LoadFromFile {
                panel: PanelId::Main,
                path,
            });
        }
        if ui.button("Open on right").clicked()
            && let Some(path) = pick_json().pick_file()
        {
            actions.push(Action::LoadFromFile {
                panel: PanelId::Side,
                path,
            });
        }
        if ui.button("Save").clicked()
            && let Some(path) = pick_json().save_file()
        {
            actions.push(Action::SaveToFile { path });
        }
        if has_side && ui.button("Merge networks").clicked() {
            actions.push(Action::MergeNetworks);
        }
    });
    ui.separator();
    ui.horizontal(|ui| {
        egui::ComboBox::from_label("Panel")
            .selected_text(mode_label(controls.mode))
            .show_ui(ui, |ui| {
                let modes: &[PanelMode] = if has_side {
                    &[PanelMode::Main, PanelMode::Side, PanelMode::Both]
                } else {
                    &[PanelMode::Main]
                };
                for mode in modes {
                    if ui
                        .selectable_label(controls.mode == *mode, mode_label(*mode))
                        .clicked()
                    {
                        actions.push(Action::SelectPanel { mode: *mode });
                    }
                }
            });

        egui::ComboBox::from_label("Layout")
            .selected_text(controls.layout.as_str())
            .show_ui(ui, |ui| {
                let names = std::iter::once(NONE_LAYOUT).chain(store.layouts.names());
                for name in names {
                    if ui.selectable_label(controls.layout == name, name).clicked() {
                        actions.push(Action::SelectLayout {
                            name: name.to_string(),
                        });
                    }
                }
            });

        let mut show = controls.show_hidden;
        if ui
            .add_enabled(
                controls.show_hidden_enabled,
                egui::Checkbox::new(&mut show, "Show hidden nodes"),
            )
            .changed()
        {
            actions.push(Action::SetShowHidden { show });
        }

        if has_side {
            let mut enabled = controls.intersection;
            if ui.checkbox(&mut enabled, "Highlight intersection").changed() {
                actions.push(Action::SetIntersection { enabled });
            }
        }
    });
}

// ------------------------------------------------------------------
// Graph panels
// ------------------------------------------------------------------

fn draw_panel(
    ui: &mut egui::Ui,
    panel: &mut Panel,
    gesture_active: bool,
    menu: &mut Option<ContextMenu>,
    actions: &mut Vec<Action>,
) {
    let id = panel.id;
    ui.heading(panel.title().to_string());
    if gesture_active {
        ui.label("Click the target node (Esc cancels)");
    }
    ui.separator();

    let fit = panel.view.take_fit_request();
    let interactions = SettingsInteraction::new()
        .with_dragging_enabled(true)
        .with_node_clicking_enabled(true)
        .with_node_selection_enabled(true)
        .with_node_selection_multi_enabled(true);
    let navigations = SettingsNavigation::new()
        .with_fit_to_screen_enabled(fit)
        .with_zoom_and_pan_enabled(!fit);
    let styles = SettingsStyle::new();
    let mut response = ui.add(
        &mut NetworkGraphView::new(panel.view.graph_mut())
            .with_interactions(&interactions)
            .with_navigations(&navigations)
            .with_styles(&styles)
            .with_id(Some(format!("netviz-{id}"))),
    );

    let hovered = panel.view.hovered_id();
    if let Some(node) = hovered.as_ref().and_then(|h| panel.view.node(h)) {
        let data = node.data.clone();
        response = response.on_hover_ui_at_pointer(|ui| {
            ui.label(format!("Probe: {}", data.id));
            ui.label(format!("Type: {}", data.node_type));
            ui.label(format!("Symbol: {}", data.label()));
        });
    }

    if gesture_active && response.clicked() {
        actions.push(Action::ClickCanvas {
            panel: id,
            target: hovered.clone(),
        });
    }
    if response.secondary_clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        *menu = Some(ContextMenu {
            panel: id,
            node: hovered,
            pos,
            just_opened: true,
        });
    }
    if panel.view.selected_ids() != panel.last_selection {
        actions.push(Action::SyncSelection { panel: id });
    }
}

/// `false` once the menu should close.
fn context_menu(ctx: &egui::Context, menu: &mut ContextMenu, actions: &mut Vec<Action>) -> bool {
    let mut open = true;
    let area = egui::Area::new(egui::Id::new("netviz_context_menu"))
        .fixed_pos(menu.pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| match &menu.node {
                Some(node) => {
                    ui.label(node.to_string());
                    ui.separator();
                    if ui.button("Add edge").clicked() {
                        actions.push(Action::BeginEdge {
                            panel: menu.panel,
                            source: node.clone(),
                        });
                        open = false;
                    }
                    if ui.button("Properties").clicked() {
                        actions.push(Action::OpenNodeProperties {
                            panel: menu.panel,
                            id: node.clone(),
                        });
                        open = false;
                    }
                }
                None => {
                    if ui.button("Scale coloring").clicked() {
                        actions.push(Action::OpenColorScale { panel: menu.panel });
                        open = false;
                    }
                    if ui.button("Search node").clicked() {
                        actions.push(Action::OpenSearch);
                        open = false;
                    }
                }
            });
        });

    if !menu.just_opened
        && ctx.input(|i| i.pointer.primary_clicked())
        && let Some(pos) = ctx.input(|i| i.pointer.interact_pos())
        && !area.response.rect.contains(pos)
    {
        open = false;
    }
    menu.just_opened = false;
    open
}

// ------------------------------------------------------------------
// Dialogs
// ------------------------------------------------------------------

fn key_combo(
    ui: &mut egui::Ui,
    label: &str,
    keys: &[String],
    selected: &mut Option<String>,
) -> bool {
    let mut changed = false;
    egui::ComboBox::from_label(label)
        .selected_text(selected.as_deref().unwrap_or("none"))
        .show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), "none").clicked() {
                changed |= selected.take().is_some();
            }
            for key in keys {
                if ui
                    .selectable_label(selected.as_ref() == Some(key), key.as_str())
                    .clicked()
                    && selected.as_ref() != Some(key)
                {
                    *selected = Some(key.clone());
                    changed = true;
                }
            }
        });
    changed
}

fn dialogs(ctx: &egui::Context, store: &Store, actions: &mut Vec<Action>) {
    match store.dialog.clone() {
        Dialog::None => {}
        Dialog::NodeProperties { panel, mut form } => {
            let weight_keys: Vec<String> = store
                .panels
                .get(panel)
                .and_then(|p| p.view.node(&form.id))
                .map(|n| n.data.weights.keys().cloned().collect())
                .unwrap_or_default();
            let before = form.clone();
            let mut new_type = None;
            let mut new_weight = None;
            egui::Window::new("Node properties")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!("Id: {}", form.id));
                    ui.horizontal(|ui| {
                        ui.label("Label");
                        ui.text_edit_singleline(&mut form.label);
                    });
                    egui::ComboBox::from_label("Type")
                        .selected_text(form.node_type.as_str())
                        .show_ui(ui, |ui| {
                            for t in store.config.node_types() {
                                let name = t.as_str().to_string();
                                if ui.selectable_label(form.node_type == name, name.as_str()).clicked() {
                                    new_type = Some(name);
                                }
                            }
                        });
                    let mut key = form.weight_key.clone();
                    if key_combo(ui, "Weight", &weight_keys, &mut key) {
                        new_weight = Some(key);
                    }
                    ui.add_enabled_ui(form.weight_key.is_some(), |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Value");
                            ui.text_edit_singleline(&mut form.weight_value);
                        });
                    });
                    ui.horizontal(|ui| {
                        ui.label("Color");
                        ui.text_edit_singleline(&mut form.color);
                    });
                    egui::ComboBox::from_label("Shape")
                        .selected_text(form.shape.as_str())
                        .show_ui(ui, |ui| {
                            for shape in NodeShape::ALL {
                                ui.selectable_value(
                                    &mut form.shape,
                                    shape.to_string(),
                                    shape.as_str(),
                                );
                            }
                        });
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            actions.push(Action::SubmitNodeProperties);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(Action::CloseDialog);
                        }
                    });
                });
            if form != before {
                actions.insert(0, Action::UpdateDialog {
                    dialog: Dialog::NodeProperties { panel, form },
                });
            }
            if let Some(node_type) = new_type {
                actions.push(Action::SetNodeFormType { node_type });
            }
            if let Some(key) = new_weight {
                actions.push(Action::SetNodeFormWeight { key });
            }
        }
        Dialog::ColorScale { panel, mut form } => {
            let keys_of = |t: NodeType| -> Vec<String> {
                store
                    .panels
                    .get(panel)
                    .map(|p| p.network.weight_keys(&t).into_iter().collect())
                    .unwrap_or_default()
            };
            let (msg_keys, mir_keys) = (keys_of(NodeType::MsgRna), keys_of(NodeType::MicroRna));
            let before: ColorScaleForm = form.clone();
            egui::Window::new("Scale coloring")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    key_combo(ui, "mRNA weight", &msg_keys, &mut form.msg_rna_key);
                    key_combo(ui, "miRNA weight", &mir_keys, &mut form.micro_rna_key);
                    ui.horizontal(|ui| {
                        ui.label("Color");
                        ui.text_edit_singleline(&mut form.color);
                    });
                    ui.horizontal(|ui| {
                        if ui.button("Apply").clicked() {
                            actions.push(Action::SubmitColorScale);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(Action::CloseDialog);
                        }
                    });
                });
            if form != before {
                actions.insert(0, Action::UpdateDialog {
                    dialog: Dialog::ColorScale { panel, form },
                });
            }
        }
        Dialog::Search { mut text } => {
            let before = text.clone();
            egui::Window::new("Search node")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    let edit = ui.text_edit_singleline(&mut text);
                    let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    ui.horizontal(|ui| {
                        if ui.button("Search").clicked() || entered {
                            actions.push(Action::SubmitSearch);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(Action::CloseDialog);
                        }
                    });
                });
            if text != before {
                actions.insert(0, Action::UpdateDialog {
                    dialog: Dialog::Search { text },
                });
            }
        }
    }
}

fn notices(ctx: &egui::Context, store: &Store, actions: &mut Vec<Action>) {
    let Some(notice) = store.notices.front() else {
        return;
    };
    let title = match notice.level {
        NoticeLevel::Info => "Info",
        NoticeLevel::Error => "Error",
    };
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(&notice.message);
            if ui.button("OK").clicked() {
                actions.push(Action::DismissNotice);
            }
        });
}
