use crate::config::ViewerConfig;
use crate::edge_gesture::EdgeGesture;
use crate::graph_view::ViewSettings;
use crate::layout::{LayoutRegistry, NONE_LAYOUT};
use crate::node_editor::NodeEdit;
use crate::panels::{PanelId, PanelMode, Panels};
use std::collections::VecDeque;
use std::fmt;
use toxynet::Network;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message shown in a blocking dialog until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Values shown by the control bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub mode: PanelMode,
    pub layout: String,
    pub show_hidden: bool,
    pub show_hidden_enabled: bool,
    pub intersection: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            mode: PanelMode::Main,
            layout: NONE_LAYOUT.to_string(),
            show_hidden: true,
            show_hidden_enabled: true,
            intersection: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorScaleForm {
    pub msg_rna_key: Option<String>,
    pub micro_rna_key: Option<String>,
    pub color: String,
}

impl Default for ColorScaleForm {
    fn default() -> Self {
        Self {
            msg_rna_key: None,
            micro_rna_key: None,
            color: "#ff0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dialog {
    #[default]
    None,
    NodeProperties {
        panel: PanelId,
        form: NodeEdit,
    },
    ColorScale {
        panel: PanelId,
        form: ColorScaleForm,
    },
    Search {
        text: String,
    },
}

pub struct Store {
    pub config: ViewerConfig,
    pub layouts: LayoutRegistry,
    pub panels: Panels,
    pub controls: Controls,
    pub gesture: EdgeGesture,
    pub dialog: Dialog,
    pub notices: VecDeque<Notice>,
}

impl Store {
    /// Store with an empty MAIN panel.
    pub fn new(config: ViewerConfig) -> Self {
        let layouts = LayoutRegistry::with_defaults(config.random_seed);
        let mut panels = Panels::new();
        panels.ensure(PanelId::Main, ViewSettings::from_config(&config));
        Self {
            config,
            layouts,
            panels,
            controls: Controls::default(),
            gesture: EdgeGesture::Idle,
            dialog: Dialog::None,
            notices: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> ViewSettings {
        ViewSettings::from_config(&self.config)
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => info!(%message, "notice"),
            NoticeLevel::Error => warn!(%message, "notice"),
        }
        self.notices.push_back(Notice { level, message });
    }

    pub fn report(&mut self, error: impl fmt::Display) {
        self.notify(NoticeLevel::Error, error.to_string());
    }

    /// MAIN's domain network, as handed back to the hosting application.
    pub fn current_network(&self) -> Option<&Network> {
        self.panels.get(PanelId::Main).map(|p| &p.network)
    }

    pub fn ui_height(&self) -> f32 {
        self.config.ui_height
    }

    /// Show the layout and hidden-node state of the selected panel; in
    /// BOTH mode the layout reads none and the checkbox is disabled.
    pub fn sync_controls(&mut self) {
        match self.controls.mode.panel().and_then(|id| self.panels.get(id)) {
            Some(panel) => {
                self.controls.layout = panel.layout.name.clone();
                self.controls.show_hidden = panel.hidden_shown();
                self.controls.show_hidden_enabled = true;
            }
            None => {
                self.controls.layout = NONE_LAYOUT.to_string();
                self.controls.show_hidden_enabled = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_main_only() {
        let store = Store::new(ViewerConfig::default());
        assert!(store.panels.contains(PanelId::Main));
        assert!(!store.panels.contains(PanelId::Side));
        assert_eq!(store.current_network().map(|n| n.node_count()), Some(0));
        assert_eq!(store.ui_height(), 92.0);
    }

    #[test]
    fn test_both_mode_disables_hidden_toggle() {
        let mut store = Store::new(ViewerConfig::default());
        store.controls.mode = PanelMode::Both;
        store.controls.layout = "grid".to_string();
        store.sync_controls();
        assert_eq!(store.controls.layout, NONE_LAYOUT);
        assert!(!store.controls.show_hidden_enabled);
    }
}
