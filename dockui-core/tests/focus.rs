use dockui_core::UiContext;
use dockui_core::UiError;
use dockui_core::client::ClientCommand;
use dockui_core::form::{FormKind, FormValues, InputForm};
use dockui_core::modal::{ConfirmModal, ModalState};
use dockui_core::panel::{CONFIRM, PanelId, STANDARD_IDS};
use dockui_core::resource::ResourceKind;

fn ctx() -> UiContext {
    UiContext::with_standard_panels(120, 40).unwrap()
}

fn confirm() -> ConfirmModal {
    ConfirmModal::new(
        "Do you want delete this volume? (y/n)",
        ClientCommand::Remove {
            kind: ResourceKind::Volume,
            id: "pgdata".into(),
        },
    )
}

#[test]
fn test_focus_tracks_last_two_successful_sets() {
    let mut ctx = ctx();
    let mut expected_current = ctx.panels.current().cloned();
    let mut expected_previous = None;

    // deterministic walk that mixes registered and unknown ids
    let mut seed: u32 = 7;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let pick = (seed >> 16) as usize % (STANDARD_IDS.len() + 2);
        let id = match STANDARD_IDS.get(pick) {
            Some(id) => PanelId::from(*id),
            None => PanelId::new(format!("ghost {}", pick)),
        };

        match ctx.panels.set_current(&id) {
            Ok(()) => {
                expected_previous = expected_current.take();
                expected_current = Some(id);
            }
            Err(e) => assert_eq!(e, UiError::UnknownPanel { id }),
        }
        assert_eq!(ctx.panels.current(), expected_current.as_ref());
        assert_eq!(ctx.panels.previous(), expected_previous.as_ref());
    }
}

#[test]
fn test_unknown_panel_keeps_focus_state() {
    let mut ctx = ctx();
    ctx.panels.set_current(&PanelId::from("network list")).unwrap();
    let before = ctx.panels.focus().clone();

    let err = ctx.panels.set_current(&PanelId::from("logs")).unwrap_err();
    assert!(matches!(err, UiError::UnknownPanel { .. }));
    assert_eq!(ctx.panels.focus(), &before);
}

#[test]
fn test_busy_slot_rejects_any_second_overlay() {
    let mut ctx = ctx();
    ctx.open_input(InputForm::new(FormKind::PullImage, FormValues::new()))
        .unwrap();
    let state = ctx.modal.state().clone();
    let focus = ctx.panels.focus().clone();

    assert_eq!(ctx.open_confirm(confirm()), Err(UiError::OverlayBusy));
    assert_eq!(
        ctx.open_input(InputForm::new(FormKind::LoadImage, FormValues::new())),
        Err(UiError::OverlayBusy)
    );
    assert_eq!(ctx.modal.state(), &state);
    assert_eq!(ctx.panels.focus(), &focus);
}

#[test]
fn test_close_restores_pre_overlay_focus() {
    for start in ["image list", "volume list", "detail"] {
        let mut ctx = ctx();
        ctx.panels.set_current(&PanelId::from(start)).unwrap();

        ctx.open_confirm(confirm()).unwrap();
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(CONFIRM)));
        assert_eq!(ctx.panels.previous(), Some(&PanelId::from(start)));

        ctx.modal.close(&mut ctx.panels);
        assert_eq!(ctx.panels.current(), Some(&PanelId::from(start)));
        assert_eq!(ctx.modal.state(), &ModalState::Idle);
    }
}

#[test]
fn test_close_when_idle_is_harmless() {
    let mut ctx = ctx();
    let focus = ctx.panels.focus().clone();
    assert_eq!(ctx.modal.close(&mut ctx.panels), None);
    assert_eq!(ctx.panels.focus(), &focus);
}
