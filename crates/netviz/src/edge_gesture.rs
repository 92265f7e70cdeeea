use crate::error::EdgeRejection;
use crate::panels::PanelId;
use eframe::egui::CursorIcon;
use toxynet::NodeId;

/// Two-click edge creation: pick a source from its context menu, then
/// click the target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EdgeGesture {
    #[default]
    Idle,
    AwaitingTarget { panel: PanelId, source: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Click while idle.
    Ignored,
    Create {
        panel: PanelId,
        source: NodeId,
        target: NodeId,
    },
    Rejected(EdgeRejection),
}

impl EdgeGesture {
    pub fn begin(&mut self, panel: PanelId, source: NodeId) {
        *self = EdgeGesture::AwaitingTarget { panel, source };
    }

    /// Resolve the pending gesture with a click on `target` (`None` for
    /// empty canvas) in `panel`. Always returns to idle.
    pub fn click(&mut self, panel: PanelId, target: Option<NodeId>) -> GestureOutcome {
        let EdgeGesture::AwaitingTarget {
            panel: source_panel,
            source,
        } = std::mem::take(self)
        else {
            return GestureOutcome::Ignored;
        };
        match target {
            None => GestureOutcome::Rejected(EdgeRejection::NoTarget),
            Some(_) if panel != source_panel => GestureOutcome::Rejected(EdgeRejection::OtherPanel),
            Some(target) if target == source => {
                GestureOutcome::Rejected(EdgeRejection::SelfLoop(source))
            }
            Some(target) => GestureOutcome::Create {
                panel,
                source,
                target,
            },
        }
    }

    /// `true` if a gesture was pending.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(self) != EdgeGesture::Idle
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EdgeGesture::AwaitingTarget { .. })
    }

    pub fn cursor(&self) -> CursorIcon {
        match self {
            EdgeGesture::Idle => CursorIcon::Default,
            EdgeGesture::AwaitingTarget { .. } => CursorIcon::Crosshair,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting(source: &str) -> EdgeGesture {
        let mut gesture = EdgeGesture::default();
        gesture.begin(PanelId::Main, NodeId::new(source));
        gesture
    }

    #[test]
    fn test_click_on_other_node_creates_edge() {
        let mut gesture = awaiting("a");
        assert_eq!(gesture.cursor(), CursorIcon::Crosshair);
        let outcome = gesture.click(PanelId::Main, Some(NodeId::new("b")));
        assert_eq!(
            outcome,
            GestureOutcome::Create {
                panel: PanelId::Main,
                source: NodeId::new("a"),
                target: NodeId::new("b"),
            }
        );
        assert_eq!(gesture, EdgeGesture::Idle);
        assert_eq!(gesture.cursor(), CursorIcon::Default);
    }

    #[test]
    fn test_failed_clicks_reset_to_idle() {
        let cases = [
            (PanelId::Main, Some("a"), EdgeRejection::SelfLoop(NodeId::new("a"))),
            (PanelId::Main, None, EdgeRejection::NoTarget),
            (PanelId::Side, Some("b"), EdgeRejection::OtherPanel),
        ];
        for (panel, target, rejection) in cases {
            let mut gesture = awaiting("a");
            let outcome = gesture.click(panel, target.map(NodeId::new));
            assert_eq!(outcome, GestureOutcome::Rejected(rejection));
            assert!(!gesture.is_active());
        }
    }

    #[test]
    fn test_idle_click_and_cancel() {
        let mut gesture = EdgeGesture::Idle;
        assert_eq!(
            gesture.click(PanelId::Main, Some(NodeId::new("a"))),
            GestureOutcome::Ignored
        );
        assert!(!gesture.cancel());
        let mut gesture = awaiting("a");
        assert!(gesture.cancel());
        assert_eq!(gesture, EdgeGesture::Idle);
    }
}
