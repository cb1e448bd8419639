//! The overlay slot: at most one confirmation or input form on top of the
//! persistent panels, holding all key input until it closes.

use crate::client::ClientCommand;
use crate::error::UiError;
use crate::focus::PanelManager;
use crate::form::InputForm;
use crate::key::{Key, KeyEvent};
use crate::keymap::KeybindingTable;
use crate::panel::{CONFIRM, INPUT, PanelId};
use crate::position::Position;

/// Yes/no question guarding a command.
///
/// `on_reject` runs on "n"/Esc, after focus is restored; without one a
/// rejection only closes the dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmModal {
    pub prompt: String,
    pub on_accept: ClientCommand,
    pub on_reject: Option<ClientCommand>,
}

impl ConfirmModal {
    pub fn new(prompt: impl Into<String>, on_accept: ClientCommand) -> Self {
        Self {
            prompt: prompt.into(),
            on_accept,
            on_reject: None,
        }
    }

    pub fn on_reject(mut self, command: ClientCommand) -> Self {
        self.on_reject = Some(command);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    Confirm(ConfirmModal),
    Input(InputForm),
}

/// An open overlay together with the panel focus returns to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Captured<T> {
    pub restore: PanelId,
    pub overlay: T,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Idle,
    ConfirmActive(Captured<ConfirmModal>),
    InputActive(Captured<InputForm>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    Accept,
    Reject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    NextField,
    PrevField,
    Backspace,
    ClearField,
    Submit,
    Cancel,
}

/// What a key did to the open overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayOutcome {
    /// Still open; the key was used or swallowed
    Consumed,
    /// Closed without running anything
    Dismissed,
    /// Closed; the caller runs `command` and reports on `origin`
    Run {
        command: ClientCommand,
        origin: PanelId,
    },
    /// Closed; the form could not produce a command
    Invalid { error: UiError, origin: PanelId },
}

#[derive(Debug)]
pub struct ModalStack {
    state: ModalState,
    confirm_keys: KeybindingTable<ConfirmAction>,
    form_keys: KeybindingTable<FormAction>,
    screen: (i32, i32),
}

impl ModalStack {
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        let confirm_keys = [
            (KeyEvent::char('y'), ConfirmAction::Accept),
            (KeyEvent::char('n'), ConfirmAction::Reject),
            (KeyEvent::plain(Key::Esc), ConfirmAction::Reject),
        ]
        .into_iter()
        .collect();
        let form_keys = [
            (KeyEvent::plain(Key::Tab), FormAction::NextField),
            (KeyEvent::plain(Key::Down), FormAction::NextField),
            (KeyEvent::plain(Key::BackTab), FormAction::PrevField),
            (KeyEvent::plain(Key::Up), FormAction::PrevField),
            (KeyEvent::plain(Key::Backspace), FormAction::Backspace),
            (KeyEvent::ctrl('u'), FormAction::ClearField),
            (KeyEvent::plain(Key::Enter), FormAction::Submit),
            (KeyEvent::plain(Key::Esc), FormAction::Cancel),
        ]
        .into_iter()
        .collect();
        Self {
            state: ModalState::Idle,
            confirm_keys,
            form_keys,
            screen: (screen_width, screen_height),
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ModalState::Idle)
    }

    /// Panel focus will return to once the overlay closes.
    pub fn restore_target(&self) -> Option<&PanelId> {
        match &self.state {
            ModalState::Idle => None,
            ModalState::ConfirmActive(c) => Some(&c.restore),
            ModalState::InputActive(c) => Some(&c.restore),
        }
    }

    pub fn form(&self) -> Option<&InputForm> {
        match &self.state {
            ModalState::InputActive(c) => Some(&c.overlay),
            _ => None,
        }
    }

    pub fn confirm(&self) -> Option<&ConfirmModal> {
        match &self.state {
            ModalState::ConfirmActive(c) => Some(&c.overlay),
            _ => None,
        }
    }

    pub fn open_confirm(
        &mut self,
        panels: &mut PanelManager,
        modal: ConfirmModal,
    ) -> Result<(), UiError> {
        let restore = self.capture(panels, CONFIRM)?;
        log::debug!("confirm opened over {}: {}", restore, modal.prompt);
        self.state = ModalState::ConfirmActive(Captured {
            restore,
            overlay: modal,
        });
        self.sync(panels);
        Ok(())
    }

    pub fn open_input(&mut self, panels: &mut PanelManager, form: InputForm) -> Result<(), UiError> {
        let restore = self.capture(panels, INPUT)?;
        log::debug!("form opened over {}: {}", restore, form.title());
        self.state = ModalState::InputActive(Captured {
            restore,
            overlay: form,
        });
        self.sync(panels);
        Ok(())
    }

    /// Check the slot is free, record the focused panel and hand focus to
    /// the overlay host. Nothing changes on error.
    fn capture(&self, panels: &mut PanelManager, host: &str) -> Result<PanelId, UiError> {
        if self.is_active() {
            log::error!("overlay requested while another is open");
            return Err(UiError::OverlayBusy);
        }
        let restore = panels.current().cloned().ok_or(UiError::NoFocus)?;
        panels.set_current(&PanelId::from(host))?;
        Ok(restore)
    }

    /// Close the overlay, restore focus and free the slot.
    pub fn close(&mut self, panels: &mut PanelManager) -> Option<Overlay> {
        let (restore, host, overlay) = match std::mem::take(&mut self.state) {
            ModalState::Idle => return None,
            ModalState::ConfirmActive(c) => (c.restore, CONFIRM, Overlay::Confirm(c.overlay)),
            ModalState::InputActive(c) => (c.restore, INPUT, Overlay::Input(c.overlay)),
        };
        if let Some(panel) = panels.get_mut(&PanelId::from(host)) {
            panel.view_mut().clear();
        }
        if let Err(e) = panels.set_current(&restore) {
            log::error!("cannot restore focus after overlay: {}", e);
        }
        log::debug!("overlay closed, focus back on {}", restore);
        Some(overlay)
    }

    /// Feed one key to the open overlay. Idle stacks report `Consumed`
    /// without doing anything; callers check `is_active` first.
    pub fn handle_key(&mut self, panels: &mut PanelManager, key: &KeyEvent) -> OverlayOutcome {
        match self.state {
            ModalState::Idle => OverlayOutcome::Consumed,
            ModalState::ConfirmActive(_) => self.confirm_key(panels, key),
            ModalState::InputActive(_) => self.form_key(panels, key),
        }
    }

    fn confirm_key(&mut self, panels: &mut PanelManager, key: &KeyEvent) -> OverlayOutcome {
        match self.confirm_keys.get(key).copied() {
            Some(ConfirmAction::Accept) => match self.close(panels) {
                Some(Overlay::Confirm(modal)) => OverlayOutcome::Run {
                    command: modal.on_accept,
                    origin: origin(panels, CONFIRM),
                },
                _ => OverlayOutcome::Dismissed,
            },
            Some(ConfirmAction::Reject) => match self.close(panels) {
                Some(Overlay::Confirm(ConfirmModal {
                    on_reject: Some(command),
                    ..
                })) => OverlayOutcome::Run {
                    command,
                    origin: origin(panels, CONFIRM),
                },
                _ => OverlayOutcome::Dismissed,
            },
            None => OverlayOutcome::Consumed,
        }
    }

    fn form_key(&mut self, panels: &mut PanelManager, key: &KeyEvent) -> OverlayOutcome {
        let action = self.form_keys.get(key).copied();
        match action {
            Some(FormAction::Cancel) => {
                self.close(panels);
                return OverlayOutcome::Dismissed;
            }
            Some(FormAction::Submit) => {
                let Some(built) = self.form().map(InputForm::submit) else {
                    return OverlayOutcome::Dismissed;
                };
                self.close(panels);
                let origin = origin(panels, INPUT);
                return match built {
                    Ok(command) => OverlayOutcome::Run { command, origin },
                    Err(error) => OverlayOutcome::Invalid { error, origin },
                };
            }
            _ => {}
        }

        let ModalState::InputActive(captured) = &mut self.state else {
            return OverlayOutcome::Consumed;
        };
        let form = &mut captured.overlay;
        match action {
            Some(FormAction::NextField) => form.next_field(),
            Some(FormAction::PrevField) => form.prev_field(),
            Some(FormAction::Backspace) => form.backspace(),
            Some(FormAction::ClearField) => form.clear_field(),
            Some(FormAction::Submit | FormAction::Cancel) => {}
            None => match key.printable() {
                Some(c) => form.insert(c),
                None => return OverlayOutcome::Consumed,
            },
        }
        self.sync(panels);
        OverlayOutcome::Consumed
    }

    pub fn resize(&mut self, panels: &mut PanelManager, screen_width: i32, screen_height: i32) {
        self.screen = (screen_width, screen_height);
        self.sync(panels);
    }

    /// Where the open overlay is drawn for the current screen size.
    pub fn overlay_position(&self) -> Option<Position> {
        let (w, h) = self.screen;
        let placed = match &self.state {
            ModalState::Idle => return None,
            ModalState::ConfirmActive(_) => Position::dialog(w, h, 1),
            ModalState::InputActive(c) if c.overlay.kind().is_large() => {
                Position::large_dialog(w, h)
            }
            ModalState::InputActive(c) => Position::dialog(w, h, c.overlay.fields().len()),
        };
        Some(placed.unwrap_or_else(|_| Position::clamped(0, 0, w, h)))
    }

    /// Mirror the open overlay into its host panel's view.
    fn sync(&self, panels: &mut PanelManager) {
        let Some(position) = self.overlay_position() else {
            return;
        };
        let (host, title, lines, cursor) = match &self.state {
            ModalState::Idle => return,
            ModalState::ConfirmActive(c) => (
                CONFIRM,
                "Confirm",
                vec![c.overlay.prompt.clone()],
                0,
            ),
            ModalState::InputActive(c) => (
                INPUT,
                c.overlay.title(),
                c.overlay.lines(),
                c.overlay.focused(),
            ),
        };
        let Some(panel) = panels.get_mut(&PanelId::from(host)) else {
            log::error!("overlay host not registered: {}", host);
            return;
        };
        panel.set_position(position);
        let view = panel.view_mut();
        view.set_title(title);
        view.clear();
        for line in lines {
            view.write_line(line);
        }
        view.set_cursor(cursor);
    }
}

/// Focused panel after a close, which is the restored one.
fn origin(panels: &PanelManager, host: &str) -> PanelId {
    panels.current().cloned().unwrap_or_else(|| PanelId::from(host))
}
