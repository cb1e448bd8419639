//! All mutable UI state in one place: panels with their focus, the overlay
//! slot, the transient notice and the quit flag.

use crate::client::ContainerClient;
use crate::detail::DetailPanel;
use crate::error::UiError;
use crate::focus::PanelManager;
use crate::form::InputForm;
use crate::layout;
use crate::list::ListPanel;
use crate::modal::{ConfirmModal, ModalStack};
use crate::panel::{CONFIRM, DETAIL, INPUT, OverlayHost, Panel, PanelId};
use crate::resource::ResourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short message drawn over a panel until the next key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub panel: PanelId,
    pub text: String,
    pub level: NoticeLevel,
}

#[derive(Debug)]
pub struct UiContext {
    pub panels: PanelManager,
    pub modal: ModalStack,
    notice: Option<Notice>,
    screen: (i32, i32),
    quit: bool,
}

impl UiContext {
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        Self {
            panels: PanelManager::new(),
            modal: ModalStack::new(screen_width, screen_height),
            notice: None,
            screen: (screen_width, screen_height),
            quit: false,
        }
    }

    /// The four resource lists, the detail pane and both overlay hosts,
    /// laid out for the given screen. The image list starts focused.
    pub fn with_standard_panels(screen_width: i32, screen_height: i32) -> Result<Self, UiError> {
        let mut ctx = Self::new(screen_width, screen_height);
        let placed = layout::compute(screen_width, screen_height);
        for (kind, position) in placed.lists {
            ctx.panels.register(Panel::List(ListPanel::new(kind, position)))?;
        }
        ctx.panels
            .register(Panel::Detail(DetailPanel::new(placed.detail)))?;
        ctx.panels
            .register(Panel::Input(OverlayHost::new(INPUT, placed.detail)))?;
        ctx.panels
            .register(Panel::Confirm(OverlayHost::new(CONFIRM, placed.detail)))?;
        Ok(ctx)
    }

    pub fn screen(&self) -> (i32, i32) {
        self.screen
    }

    /// Fill every panel. Client failures leave a notice on the failing
    /// panel instead of aborting startup.
    pub async fn initialize(&mut self, client: &dyn ContainerClient) {
        let ids: Vec<PanelId> = self.panels.iter().map(|p| p.id().clone()).collect();
        for id in ids {
            let Some(panel) = self.panels.get_mut(&id) else {
                continue;
            };
            if let Err(e) = panel.initialize(client).await {
                log::warn!("{}: initial load failed: {}", id, e);
                self.notice = Some(Notice {
                    panel: id,
                    text: e.to_string(),
                    level: NoticeLevel::Error,
                });
            }
        }
    }

    /// Re-layout after a terminal resize.
    pub fn resize(&mut self, screen_width: i32, screen_height: i32) {
        self.screen = (screen_width, screen_height);
        let placed = layout::compute(screen_width, screen_height);
        for (kind, position) in placed.lists {
            if let Some(panel) = self.panels.get_mut(&PanelId::list(kind)) {
                panel.set_position(position);
            }
        }
        if let Some(panel) = self.panels.get_mut(&PanelId::from(DETAIL)) {
            panel.set_position(placed.detail);
        }
        self.modal.resize(&mut self.panels, screen_width, screen_height);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Informational notice on the focused panel.
    pub fn notify(&mut self, text: impl Into<String>) {
        self.set_notice(text.into(), NoticeLevel::Info);
    }

    /// Surface an error on the focused panel and log it.
    pub fn report(&mut self, error: &UiError) {
        if error.is_recoverable() {
            log::warn!("{}", error);
        } else {
            log::error!("{}", error);
        }
        self.set_notice(error.to_string(), NoticeLevel::Error);
    }

    fn set_notice(&mut self, text: String, level: NoticeLevel) {
        let panel = self
            .panels
            .current()
            .cloned()
            .unwrap_or_else(|| PanelId::from(DETAIL));
        self.notice = Some(Notice { panel, text, level });
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn open_confirm(&mut self, modal: ConfirmModal) -> Result<(), UiError> {
        self.modal.open_confirm(&mut self.panels, modal)
    }

    pub fn open_input(&mut self, form: InputForm) -> Result<(), UiError> {
        self.modal.open_input(&mut self.panels, form)
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailPanel> {
        self.panels
            .get_mut(&PanelId::from(DETAIL))
            .and_then(Panel::as_detail_mut)
    }

    /// Refresh the list panel of each kind. Every kind is attempted; the
    /// first failure is returned.
    pub async fn refresh_kinds(
        &mut self,
        client: &dyn ContainerClient,
        kinds: &[ResourceKind],
    ) -> Result<(), UiError> {
        let mut first_err = None;
        for kind in kinds {
            let Some(panel) = self.panels.get_mut(&PanelId::list(*kind)) else {
                continue;
            };
            if let Err(e) = panel.refresh(client).await {
                log::warn!("refresh {} failed: {}", kind.label(), e);
                if first_err.is_none() {
                    first_err = Some(UiError::from(e));
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub async fn refresh_all(&mut self, client: &dyn ContainerClient) -> Result<(), UiError> {
        self.refresh_kinds(client, &ResourceKind::ALL).await?;
        if let Some(detail) = self.detail_mut() {
            detail.redraw();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::memory::MemoryClient;
    use crate::panel::{IMAGE_LIST, STANDARD_IDS, VOLUME_LIST};
    use crate::position::Position;

    #[test]
    fn test_standard_panels_registered() {
        let ctx = UiContext::with_standard_panels(120, 40).unwrap();
        let ids: Vec<&str> = ctx.panels.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, STANDARD_IDS);
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(IMAGE_LIST)));
    }

    #[tokio::test]
    async fn test_initialize_reports_failures_per_panel() {
        let client = MemoryClient::seeded();
        let mut ctx = UiContext::with_standard_panels(120, 40).unwrap();
        client.fail_next(ClientError::Connection {
            message: "refused".into(),
        });
        ctx.initialize(&client).await;

        let notice = ctx.notice().unwrap();
        assert_eq!(notice.panel, PanelId::from(IMAGE_LIST));
        assert_eq!(notice.level, NoticeLevel::Error);
        let volumes = ctx.panels.get(&PanelId::from(VOLUME_LIST)).unwrap();
        assert_eq!(volumes.view().lines().len(), 2);
    }

    #[test]
    fn test_resize_moves_panels() {
        let mut ctx = UiContext::with_standard_panels(120, 40).unwrap();
        ctx.resize(80, 20);
        assert_eq!(ctx.screen(), (80, 20));
        assert_eq!(
            ctx.panels.get(&PanelId::from(DETAIL)).unwrap().position(),
            Position::new(40, 0, 80, 20).unwrap()
        );
    }

    #[test]
    fn test_report_targets_focused_panel() {
        let mut ctx = UiContext::with_standard_panels(120, 40).unwrap();
        ctx.panels.set_current(&PanelId::from(VOLUME_LIST)).unwrap();
        ctx.report(&UiError::MissingField {
            field: "Name".into(),
        });
        assert_eq!(
            ctx.notice(),
            Some(&Notice {
                panel: PanelId::from(VOLUME_LIST),
                text: "please input Name".into(),
                level: NoticeLevel::Error,
            })
        );
        ctx.clear_notice();
        assert_eq!(ctx.notice(), None);
    }
}
