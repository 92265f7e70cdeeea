use crate::actions;
use crate::error::ViewerError;
use crate::panels::PanelId;
use crate::serialization;
use crate::store::Store;
use std::path::PathBuf;

/// Deferred effects that must run outside the main reducer (file IO)
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write MAIN's network, hidden nodes included
    SaveToFile { path: PathBuf },
    /// Read a network and display it in `panel`
    LoadFromFile { panel: PanelId, path: PathBuf },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    match effect {
        Effect::SaveToFile { path } => {
            let result = match store.current_network() {
                Some(network) => serialization::save_to_file(network, &path),
                None => Err(ViewerError::MissingPanel(PanelId::Main)),
            };
            if let Err(e) = result {
                store.report(e);
            }
        }
        Effect::LoadFromFile { panel, path } => {
            match serialization::load_from_file(&path, &store.config) {
                Ok(network) => actions::change_network(store, panel, network),
                Err(e) => store.report(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::store::NoticeLevel;

    #[test]
    fn test_failed_load_reports_and_keeps_state() {
        let mut store = Store::new(ViewerConfig::default());
        run(
            &mut store,
            Effect::LoadFromFile {
                panel: PanelId::Side,
                path: PathBuf::from("/nonexistent/side.json"),
            },
        );
        assert!(!store.panels.contains(PanelId::Side));
        assert_eq!(store.notices.len(), 1);
        assert_eq!(store.notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_load_into_side_then_save_main() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("netviz-effects-in-{}.json", std::process::id()));
        let output = dir.join(format!("netviz-effects-out-{}.json", std::process::id()));
        std::fs::write(
            &input,
            r#"{"title": "t", "nodes": [
                {"id": "a", "type": "mRNA", "weight": {}},
                {"id": "b", "type": "miRNA", "weight": {}}
            ], "interactions": [{"source": "b", "target": "a"}]}"#,
        )
        .unwrap();

        let mut store = Store::new(ViewerConfig::default());
        run(
            &mut store,
            Effect::LoadFromFile {
                panel: PanelId::Side,
                path: input.clone(),
            },
        );
        assert_eq!(store.panels.get(PanelId::Side).unwrap().view.node_count(), 2);

        run(
            &mut store,
            Effect::LoadFromFile {
                panel: PanelId::Main,
                path: input.clone(),
            },
        );
        run(&mut store, Effect::SaveToFile { path: output.clone() });
        let saved = serialization::load_from_file(&output, &store.config).unwrap();
        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&output);
        assert_eq!(saved.node_count(), 2);
        assert_eq!(saved.interaction_count(), 1);
        assert!(store.notices.is_empty());
    }
}
