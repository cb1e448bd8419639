//! Key routing: overlay first, then the focused panel, then global bindings.

use std::sync::Arc;

use crate::client::{ClientCommand, ContainerClient};
use crate::context::UiContext;
use crate::error::UiError;
use crate::form::{FormValues, InputForm};
use crate::key::KeyEvent;
use crate::keymap::{Action, Keymap, Scope};
use crate::list::ListRow;
use crate::modal::{ConfirmModal, OverlayOutcome};
use crate::panel::PanelId;
use crate::resource::ResourceKind;

/// Which layer handled a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Overlay,
    Panel(Action),
    Global(Action),
    Ignored,
}

pub struct Dispatcher {
    keymap: Keymap,
    client: Arc<dyn ContainerClient>,
}

impl Dispatcher {
    pub fn new(keymap: Keymap, client: Arc<dyn ContainerClient>) -> Self {
        Self { keymap, client }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn client(&self) -> &dyn ContainerClient {
        self.client.as_ref()
    }

    /// Event-loop entry point: clears the previous notice and routes `key`
    /// to whatever holds focus.
    pub async fn handle_key(&self, ctx: &mut UiContext, key: KeyEvent) -> Dispatch {
        ctx.clear_notice();
        let Some(panel) = ctx.panels.current().cloned() else {
            log::debug!("{} dropped: nothing focused", key);
            return Dispatch::Ignored;
        };
        self.dispatch(ctx, &panel, key).await
    }

    /// Route `key` as if `panel` held focus. Handler errors end up as a
    /// notice on the focused panel and never propagate.
    pub async fn dispatch(&self, ctx: &mut UiContext, panel: &PanelId, key: KeyEvent) -> Dispatch {
        if ctx.modal.is_active() {
            match ctx.modal.handle_key(&mut ctx.panels, &key) {
                OverlayOutcome::Consumed | OverlayOutcome::Dismissed => {}
                OverlayOutcome::Run { command, origin } => {
                    log::debug!("{} confirmed from {}", command.label(), origin);
                    if let Err(e) = self.commit(ctx, command).await {
                        ctx.report(&e);
                    }
                }
                OverlayOutcome::Invalid { error, .. } => ctx.report(&error),
            }
            return Dispatch::Overlay;
        }

        let Some((scope, action)) = self.keymap.lookup(panel, &key) else {
            log::trace!("{}: {} unbound", panel, key);
            return Dispatch::Ignored;
        };
        log::debug!("{}: {} -> {}", panel, key, action);
        if let Err(e) = self.perform(ctx, panel, action).await {
            ctx.report(&e);
        }
        match scope {
            Scope::Panel => Dispatch::Panel(action),
            Scope::Global => Dispatch::Global(action),
        }
    }

    async fn perform(&self, ctx: &mut UiContext, panel: &PanelId, action: Action) -> Result<(), UiError> {
        match action {
            Action::Quit => {
                ctx.request_quit();
                Ok(())
            }
            Action::NextPanel => ctx.panels.cycle(true),
            Action::PrevPanel => ctx.panels.cycle(false),
            Action::RefreshAll => ctx.refresh_all(self.client()).await,
            Action::Help => {
                let help = self.keymap.help_lines(panel).join("\n");
                if let Some(detail) = ctx.detail_mut() {
                    detail.show_text("Keys", help);
                }
                Ok(())
            }
            Action::CursorUp | Action::CursorDown | Action::PageUp | Action::PageDown => {
                let target = ctx.panels.panel_mut(panel)?;
                let page = (target.position().height() - 2).max(1) as usize;
                let view = target.view_mut();
                match action {
                    Action::CursorUp => view.cursor_up(1),
                    Action::CursorDown => view.cursor_down(1),
                    Action::PageUp => view.cursor_up(page),
                    _ => view.cursor_down(page),
                }
                Ok(())
            }
            Action::Inspect => {
                let Some((kind, row)) = selection(ctx, panel, None) else {
                    return Ok(());
                };
                let value = self.client.inspect(kind, &row.id).await?;
                if let Some(detail) = ctx.detail_mut() {
                    detail.show(&format!("{} {}", kind.label(), row.name), &value);
                }
                Ok(())
            }
            Action::Remove => {
                let Some((kind, row)) = selection(ctx, panel, None) else {
                    return Ok(());
                };
                ctx.open_confirm(ConfirmModal::new(
                    format!("Do you want delete this {}? (y/n)", kind.label()),
                    ClientCommand::Remove { kind, id: row.id },
                ))
            }
            Action::PushImage => {
                let Some((_, row)) = selection(ctx, panel, Some(ResourceKind::Image)) else {
                    return Ok(());
                };
                ctx.open_confirm(ConfirmModal::new(
                    format!("Do you want push {}? (y/n)", row.name),
                    ClientCommand::PushImage { name: row.name },
                ))
            }
            Action::StartContainer | Action::StopContainer => {
                let Some((_, row)) = selection(ctx, panel, Some(ResourceKind::Container)) else {
                    return Ok(());
                };
                let command = if action == Action::StartContainer {
                    ClientCommand::StartContainer { id: row.id }
                } else {
                    ClientCommand::StopContainer { id: row.id }
                };
                self.commit(ctx, command).await
            }
            Action::OpenForm(form) => {
                let aux = match form.source() {
                    Some(source) => match selection(ctx, panel, Some(source)) {
                        Some((_, row)) => form.aux_for(&row),
                        None => return Ok(()),
                    },
                    None => FormValues::new(),
                };
                ctx.open_input(InputForm::new(form, aux))
            }
        }
    }

    /// Run a mutating command, then refresh the lists it changed.
    pub async fn commit(&self, ctx: &mut UiContext, command: ClientCommand) -> Result<(), UiError> {
        let label = command.label();
        let affects = command.affects();
        command.execute(self.client()).await?;
        log::info!("{} done", label);
        if affects.is_empty() {
            // nothing on screen changes, so say so
            ctx.notify(format!("{} done", label));
            return Ok(());
        }
        ctx.refresh_kinds(self.client(), affects).await
    }
}

/// Row under the cursor of `panel`, if it is a list (of `kind`, when given).
fn selection(
    ctx: &UiContext,
    panel: &PanelId,
    kind: Option<ResourceKind>,
) -> Option<(ResourceKind, ListRow)> {
    let list = ctx.panels.get(panel)?.as_list()?;
    if kind.is_some_and(|k| k != list.kind()) {
        return None;
    }
    Some((list.kind(), list.current_selection()?.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormKind;
    use crate::key::Key;
    use crate::memory::MemoryClient;
    use crate::modal::ModalState;
    use crate::panel::{CONTAINER_LIST, DETAIL, IMAGE_LIST, INPUT, NETWORK_LIST};

    async fn setup() -> (Arc<MemoryClient>, Dispatcher, UiContext) {
        let client = Arc::new(MemoryClient::seeded());
        let dispatcher = Dispatcher::new(Keymap::with_defaults(), client.clone());
        let mut ctx = UiContext::with_standard_panels(120, 40).unwrap();
        ctx.initialize(dispatcher.client()).await;
        (client, dispatcher, ctx)
    }

    async fn press(d: &Dispatcher, ctx: &mut UiContext, keys: &[KeyEvent]) {
        for key in keys {
            d.handle_key(ctx, *key).await;
        }
    }

    #[tokio::test]
    async fn test_inspect_fills_detail() {
        let (client, d, mut ctx) = setup().await;
        let result = d.handle_key(&mut ctx, KeyEvent::plain(Key::Enter)).await;
        assert_eq!(result, Dispatch::Panel(Action::Inspect));

        let detail = ctx.panels.get(&PanelId::from(DETAIL)).unwrap();
        assert_eq!(detail.view().title(), "image nginx:latest");
        assert!(detail.view().text().contains("\"repo_tags\""));
        assert!(client.mutations().is_empty());
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(IMAGE_LIST)));
    }

    #[tokio::test]
    async fn test_global_keys() {
        let (_, d, mut ctx) = setup().await;
        assert_eq!(
            d.handle_key(&mut ctx, KeyEvent::plain(Key::Tab)).await,
            Dispatch::Global(Action::NextPanel)
        );
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(CONTAINER_LIST)));
        assert_eq!(ctx.panels.previous(), Some(&PanelId::from(IMAGE_LIST)));

        d.handle_key(&mut ctx, KeyEvent::char('q')).await;
        assert!(ctx.should_quit());
    }

    #[tokio::test]
    async fn test_unbound_key_changes_nothing() {
        let (client, d, mut ctx) = setup().await;
        let calls = client.calls();
        let result = d.handle_key(&mut ctx, KeyEvent::char('z')).await;
        assert_eq!(result, Dispatch::Ignored);
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(IMAGE_LIST)));
        assert_eq!(ctx.modal.state(), &ModalState::Idle);
        assert_eq!(ctx.notice(), None);
        assert_eq!(client.calls(), calls);
    }

    #[tokio::test]
    async fn test_start_container_refreshes_list() {
        let (client, d, mut ctx) = setup().await;
        ctx.panels.set_current(&PanelId::from(CONTAINER_LIST)).unwrap();
        press(&d, &mut ctx, &[KeyEvent::char('j'), KeyEvent::char('u')]).await;

        let db = "8b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c";
        assert_eq!(client.mutations(), vec![format!("start container {}", db)]);
        let list = ctx.panels.get(&PanelId::from(CONTAINER_LIST)).unwrap();
        assert!(list.view().lines()[2].contains("Up Less than a second"));
    }

    #[tokio::test]
    async fn test_form_from_list_carries_selection() {
        let (client, d, mut ctx) = setup().await;
        ctx.panels.set_current(&PanelId::from(CONTAINER_LIST)).unwrap();
        d.handle_key(&mut ctx, KeyEvent::char('r')).await;
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(INPUT)));
        assert_eq!(ctx.modal.form().unwrap().kind(), FormKind::RenameContainer);

        for c in "frontend".chars() {
            d.handle_key(&mut ctx, KeyEvent::char(c)).await;
        }
        d.handle_key(&mut ctx, KeyEvent::plain(Key::Enter)).await;

        assert_eq!(ctx.panels.current(), Some(&PanelId::from(CONTAINER_LIST)));
        let web = "3f4e8a1c2b7d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f";
        assert_eq!(
            client.mutations(),
            vec![format!("rename container {} frontend", web)]
        );
        let list = ctx.panels.get(&PanelId::from(CONTAINER_LIST)).unwrap();
        assert!(list.view().lines()[1].contains("frontend"));
    }

    #[tokio::test]
    async fn test_form_needing_selection_is_noop_without_one() {
        let (_, d, mut ctx) = setup().await;
        ctx.panels
            .get_mut(&PanelId::from(IMAGE_LIST))
            .unwrap()
            .view_mut()
            .set_cursor(0);
        d.handle_key(&mut ctx, KeyEvent::char('c')).await;
        assert!(!ctx.modal.is_active());
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(IMAGE_LIST)));
    }

    #[tokio::test]
    async fn test_missing_field_reported_on_origin() {
        let (client, d, mut ctx) = setup().await;
        ctx.panels.set_current(&PanelId::from(NETWORK_LIST)).unwrap();
        press(
            &d,
            &mut ctx,
            &[KeyEvent::char('c'), KeyEvent::plain(Key::Enter)],
        )
        .await;

        assert!(!ctx.modal.is_active());
        let notice = ctx.notice().unwrap();
        assert_eq!(notice.panel, PanelId::from(NETWORK_LIST));
        assert_eq!(notice.text, "please input Name");
        assert!(client.mutations().is_empty());

        d.handle_key(&mut ctx, KeyEvent::char('j')).await;
        assert_eq!(ctx.notice(), None);
    }

    #[tokio::test]
    async fn test_push_reports_completion() {
        let (client, d, mut ctx) = setup().await;
        d.handle_key(&mut ctx, KeyEvent::char('P')).await;
        assert_eq!(
            ctx.modal.confirm().unwrap().prompt,
            "Do you want push nginx:latest? (y/n)"
        );
        d.handle_key(&mut ctx, KeyEvent::char('y')).await;

        assert_eq!(client.mutations(), vec!["push image nginx:latest"]);
        let notice = ctx.notice().unwrap();
        assert_eq!(notice.text, "push image done");
        assert_eq!(notice.panel, PanelId::from(IMAGE_LIST));
    }

    #[tokio::test]
    async fn test_reject_command_is_committed() {
        let (client, d, mut ctx) = setup().await;
        let web = "3f4e8a1c2b7d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f";
        ctx.panels.set_current(&PanelId::from(CONTAINER_LIST)).unwrap();
        ctx.open_confirm(
            ConfirmModal::new(
                "Remove web? (y/n)",
                ClientCommand::Remove {
                    kind: ResourceKind::Container,
                    id: web.into(),
                },
            )
            .on_reject(ClientCommand::StopContainer { id: web.into() }),
        )
        .unwrap();

        let result = d.handle_key(&mut ctx, KeyEvent::char('n')).await;
        assert_eq!(result, Dispatch::Overlay);
        assert_eq!(client.mutations(), vec![format!("stop container {}", web)]);
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(CONTAINER_LIST)));
        assert_eq!(ctx.notice(), None);
    }

    #[tokio::test]
    async fn test_help_lists_keys_in_detail() {
        let (_, d, mut ctx) = setup().await;
        d.handle_key(&mut ctx, KeyEvent::char('?')).await;
        let detail = ctx.panels.get(&PanelId::from(DETAIL)).unwrap();
        assert_eq!(detail.view().title(), "Keys");
        assert_eq!(detail.view().lines()[0], "image list:");
    }

    #[tokio::test]
    async fn test_failed_refresh_is_reported() {
        let (client, d, mut ctx) = setup().await;
        client.fail_next(crate::error::ClientError::Connection {
            message: "gone".into(),
        });
        d.handle_key(&mut ctx, KeyEvent::ctrl('r')).await;
        let notice = ctx.notice().unwrap();
        assert!(notice.text.contains("gone"));
        assert_eq!(notice.panel, PanelId::from(IMAGE_LIST));
    }
}
