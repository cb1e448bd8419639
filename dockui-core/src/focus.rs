//! Focus tracking: which registered panel receives keys.

use std::collections::BTreeMap;

use crate::error::UiError;
use crate::panel::{Panel, PanelId};

/// `previous` is written immediately before `current` changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusState {
    pub current: Option<PanelId>,
    pub previous: Option<PanelId>,
}

/// Registry of panels plus the focus state over them.
#[derive(Debug, Default)]
pub struct PanelManager {
    panels: BTreeMap<PanelId, Panel>,
    order: Vec<PanelId>,
    focus: FocusState,
}

impl PanelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a panel. The first persistent panel registered receives focus.
    pub fn register(&mut self, panel: Panel) -> Result<(), UiError> {
        let id = panel.id().clone();
        if self.panels.contains_key(&id) {
            log::error!("panel registered twice: {}", id);
            return Err(UiError::DuplicateIdentifier { id });
        }
        if self.focus.current.is_none() && !panel.kind().is_overlay() {
            log::debug!("initial focus: {}", id);
            self.focus.current = Some(id.clone());
        }
        self.order.push(id.clone());
        self.panels.insert(id, panel);
        Ok(())
    }

    /// Move focus to `id`. Unknown ids leave the state untouched.
    pub fn set_current(&mut self, id: &PanelId) -> Result<(), UiError> {
        if !self.panels.contains_key(id) {
            log::error!("focus requested for unknown panel: {}", id);
            return Err(UiError::UnknownPanel { id: id.clone() });
        }
        log::debug!(
            "focus {} -> {}",
            self.focus.current.as_ref().map(PanelId::as_str).unwrap_or("none"),
            id
        );
        self.focus.previous = self.focus.current.take();
        self.focus.current = Some(id.clone());
        Ok(())
    }

    pub fn current(&self) -> Option<&PanelId> {
        self.focus.current.as_ref()
    }

    pub fn previous(&self) -> Option<&PanelId> {
        self.focus.previous.as_ref()
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn get(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn get_mut(&mut self, id: &PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id)
    }

    pub fn panel(&self, id: &PanelId) -> Result<&Panel, UiError> {
        self.panels
            .get(id)
            .ok_or_else(|| UiError::UnknownPanel { id: id.clone() })
    }

    pub fn panel_mut(&mut self, id: &PanelId) -> Result<&mut Panel, UiError> {
        self.panels
            .get_mut(id)
            .ok_or_else(|| UiError::UnknownPanel { id: id.clone() })
    }

    /// Panels in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.order.iter().filter_map(|id| self.panels.get(id))
    }

    /// Non-overlay panels in registration order.
    pub fn persistent_ids(&self) -> Vec<PanelId> {
        self.iter()
            .filter(|p| !p.kind().is_overlay())
            .map(|p| p.id().clone())
            .collect()
    }

    /// Focus the next (or previous) persistent panel, wrapping around.
    pub fn cycle(&mut self, forward: bool) -> Result<(), UiError> {
        let ids = self.persistent_ids();
        if ids.is_empty() {
            return Err(UiError::NoFocus);
        }
        let at = self
            .current()
            .and_then(|current| ids.iter().position(|id| id == current));
        let next = match (at, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.set_current(&ids[next])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DetailPanel;
    use crate::list::ListPanel;
    use crate::panel::{CONFIRM, DETAIL, IMAGE_LIST, OverlayHost, VOLUME_LIST};
    use crate::position::Position;
    use crate::resource::ResourceKind;

    fn position() -> Position {
        Position::new(0, 0, 10, 10).unwrap()
    }

    fn manager() -> PanelManager {
        let mut m = PanelManager::new();
        m.register(Panel::Confirm(OverlayHost::new(CONFIRM, position())))
            .unwrap();
        m.register(Panel::List(ListPanel::new(ResourceKind::Image, position())))
            .unwrap();
        m.register(Panel::List(ListPanel::new(ResourceKind::Volume, position())))
            .unwrap();
        m.register(Panel::Detail(DetailPanel::new(position())))
            .unwrap();
        m
    }

    #[test]
    fn test_initial_focus_skips_overlays() {
        let m = manager();
        assert_eq!(m.current(), Some(&PanelId::from(IMAGE_LIST)));
        assert_eq!(m.previous(), None);
    }

    #[test]
    fn test_focus_sequence() {
        let mut m = manager();
        m.set_current(&PanelId::from(VOLUME_LIST)).unwrap();
        m.set_current(&PanelId::from(DETAIL)).unwrap();
        assert_eq!(m.current(), Some(&PanelId::from(DETAIL)));
        assert_eq!(m.previous(), Some(&PanelId::from(VOLUME_LIST)));
    }

    #[test]
    fn test_unknown_panel_leaves_state_unchanged() {
        let mut m = manager();
        m.set_current(&PanelId::from(DETAIL)).unwrap();
        let before = m.focus().clone();
        let err = m.set_current(&PanelId::from("bogus")).unwrap_err();
        assert_eq!(
            err,
            UiError::UnknownPanel {
                id: PanelId::from("bogus")
            }
        );
        assert_eq!(m.focus(), &before);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut m = manager();
        let err = m
            .register(Panel::Detail(DetailPanel::new(position())))
            .unwrap_err();
        assert_eq!(
            err,
            UiError::DuplicateIdentifier {
                id: PanelId::from(DETAIL)
            }
        );
        assert_eq!(m.iter().count(), 4);
    }

    #[test]
    fn test_cycle_wraps_over_persistent_panels() {
        let mut m = manager();
        m.cycle(true).unwrap();
        assert_eq!(m.current(), Some(&PanelId::from(VOLUME_LIST)));
        m.cycle(true).unwrap();
        m.cycle(true).unwrap();
        assert_eq!(m.current(), Some(&PanelId::from(IMAGE_LIST)));
        m.cycle(false).unwrap();
        assert_eq!(m.current(), Some(&PanelId::from(DETAIL)));
    }
}
