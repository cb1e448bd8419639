//! Key bindings: generic per-scope tables and the dashboard's action set.

use std::collections::BTreeMap;
use std::fmt;

use crate::form::FormKind;
use crate::key::{Key, KeyEvent};
use crate::panel::{
    CONTAINER_LIST, DETAIL, IMAGE_LIST, NETWORK_LIST, PanelId, VOLUME_LIST,
};

/// Reverse lookup from key to whatever the scope binds it to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeybindingTable<A> {
    entries: BTreeMap<KeyEvent, A>,
}

impl<A> Default for KeybindingTable<A> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<A> KeybindingTable<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, returning what it was bound to before.
    pub fn bind(&mut self, key: KeyEvent, action: A) -> Option<A> {
        self.entries.insert(key, action)
    }

    pub fn get(&self, key: &KeyEvent) -> Option<&A> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyEvent, &A)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> FromIterator<(KeyEvent, A)> for KeybindingTable<A> {
    fn from_iter<I: IntoIterator<Item = (KeyEvent, A)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Everything a persistent panel or the global scope can bind a key to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NextPanel,
    PrevPanel,
    RefreshAll,
    Help,
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    Inspect,
    Remove,
    PushImage,
    StartContainer,
    StopContainer,
    OpenForm(FormKind),
}

const SIMPLE_ACTIONS: [Action; 14] = [
    Action::Quit,
    Action::NextPanel,
    Action::PrevPanel,
    Action::RefreshAll,
    Action::Help,
    Action::CursorUp,
    Action::CursorDown,
    Action::PageUp,
    Action::PageDown,
    Action::Inspect,
    Action::Remove,
    Action::PushImage,
    Action::StartContainer,
    Action::StopContainer,
];

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::NextPanel => "next_panel",
            Action::PrevPanel => "prev_panel",
            Action::RefreshAll => "refresh_all",
            Action::Help => "help",
            Action::CursorUp => "cursor_up",
            Action::CursorDown => "cursor_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Inspect => "inspect",
            Action::Remove => "remove",
            Action::PushImage => "push_image",
            Action::StartContainer => "start_container",
            Action::StopContainer => "stop_container",
            Action::OpenForm(form) => form.name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SIMPLE_ACTIONS
            .into_iter()
            .find(|a| a.name() == name)
            .or_else(|| FormKind::from_name(name).map(Action::OpenForm))
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::NextPanel => "next panel",
            Action::PrevPanel => "previous panel",
            Action::RefreshAll => "refresh all lists",
            Action::Help => "show key help",
            Action::CursorUp => "up",
            Action::CursorDown => "down",
            Action::PageUp => "page up",
            Action::PageDown => "page down",
            Action::Inspect => "inspect",
            Action::Remove => "remove",
            Action::PushImage => "push image",
            Action::StartContainer => "start container",
            Action::StopContainer => "stop container",
            Action::OpenForm(form) => form.title(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which table a lookup was answered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Panel,
    Global,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingScope {
    Global,
    Panel(PanelId),
}

/// One user-configured binding, already parsed and validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub scope: BindingScope,
    pub key: KeyEvent,
    pub action: Action,
}

/// Global bindings plus per-panel overrides.
#[derive(Clone, Debug, Default)]
pub struct Keymap {
    global: KeybindingTable<Action>,
    panels: BTreeMap<PanelId, KeybindingTable<Action>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dashboard's stock bindings.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();

        map.bind_global(KeyEvent::char('q'), Action::Quit);
        map.bind_global(KeyEvent::ctrl('c'), Action::Quit);
        map.bind_global(KeyEvent::plain(Key::Tab), Action::NextPanel);
        map.bind_global(KeyEvent::plain(Key::BackTab), Action::PrevPanel);
        map.bind_global(KeyEvent::ctrl('r'), Action::RefreshAll);
        map.bind_global(KeyEvent::char('?'), Action::Help);

        let movement = [
            (KeyEvent::char('j'), Action::CursorDown),
            (KeyEvent::plain(Key::Down), Action::CursorDown),
            (KeyEvent::char('k'), Action::CursorUp),
            (KeyEvent::plain(Key::Up), Action::CursorUp),
            (KeyEvent::plain(Key::PageDown), Action::PageDown),
            (KeyEvent::plain(Key::PageUp), Action::PageUp),
        ];
        let list_common = [
            (KeyEvent::plain(Key::Enter), Action::Inspect),
            (KeyEvent::char('o'), Action::Inspect),
            (KeyEvent::char('d'), Action::Remove),
        ];

        for id in [IMAGE_LIST, CONTAINER_LIST, VOLUME_LIST, NETWORK_LIST] {
            let id = PanelId::from(id);
            for (key, action) in movement.iter().chain(list_common.iter()) {
                map.bind(&id, *key, *action);
            }
        }
        for (key, action) in movement {
            map.bind(&PanelId::from(DETAIL), key, action);
        }

        let images = PanelId::from(IMAGE_LIST);
        map.bind(&images, KeyEvent::char('c'), Action::OpenForm(FormKind::CreateContainer));
        map.bind(&images, KeyEvent::char('p'), Action::OpenForm(FormKind::PullImage));
        map.bind(&images, KeyEvent::char('P'), Action::PushImage);
        map.bind(&images, KeyEvent::char('e'), Action::OpenForm(FormKind::ExportImage));
        map.bind(&images, KeyEvent::char('i'), Action::OpenForm(FormKind::ImportImage));
        map.bind(&images, KeyEvent::ctrl('l'), Action::OpenForm(FormKind::LoadImage));

        let containers = PanelId::from(CONTAINER_LIST);
        map.bind(&containers, KeyEvent::char('u'), Action::StartContainer);
        map.bind(&containers, KeyEvent::char('s'), Action::StopContainer);
        map.bind(&containers, KeyEvent::char('e'), Action::OpenForm(FormKind::ExportContainer));
        map.bind(&containers, KeyEvent::char('c'), Action::OpenForm(FormKind::CommitContainer));
        map.bind(&containers, KeyEvent::char('r'), Action::OpenForm(FormKind::RenameContainer));

        map.bind(
            &PanelId::from(VOLUME_LIST),
            KeyEvent::char('c'),
            Action::OpenForm(FormKind::CreateVolume),
        );
        map.bind(
            &PanelId::from(NETWORK_LIST),
            KeyEvent::char('c'),
            Action::OpenForm(FormKind::CreateNetwork),
        );

        map
    }

    pub fn bind(&mut self, panel: &PanelId, key: KeyEvent, action: Action) -> Option<Action> {
        self.panels
            .entry(panel.clone())
            .or_default()
            .bind(key, action)
    }

    pub fn bind_global(&mut self, key: KeyEvent, action: Action) -> Option<Action> {
        self.global.bind(key, action)
    }

    /// Panel binding first, then global.
    pub fn lookup(&self, panel: &PanelId, key: &KeyEvent) -> Option<(Scope, Action)> {
        if let Some(action) = self.panels.get(panel).and_then(|t| t.get(key)) {
            return Some((Scope::Panel, *action));
        }
        self.global.get(key).map(|action| (Scope::Global, *action))
    }

    /// Layer configured bindings over the current ones.
    pub fn apply(&mut self, bindings: &[Binding]) {
        for binding in bindings {
            let replaced = match &binding.scope {
                BindingScope::Global => self.bind_global(binding.key, binding.action),
                BindingScope::Panel(id) => self.bind(id, binding.key, binding.action),
            };
            if let Some(old) = replaced {
                log::debug!("{} rebound: {} -> {}", binding.key, old, binding.action);
            }
        }
    }

    /// Key help for `panel`: its own bindings, then the global ones.
    pub fn help_lines(&self, panel: &PanelId) -> Vec<String> {
        let mut lines = vec![format!("{}:", panel)];
        if let Some(table) = self.panels.get(panel) {
            lines.extend(describe(table));
        }
        lines.push(String::new());
        lines.push("global:".to_string());
        lines.extend(describe(&self.global));
        lines
    }
}

fn describe(table: &KeybindingTable<Action>) -> Vec<String> {
    table
        .iter()
        .map(|(key, action)| format!("  {:<10} {}", key.to_string(), action.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip() {
        for action in SIMPLE_ACTIONS {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(
            Action::from_name("load_image"),
            Some(Action::OpenForm(FormKind::LoadImage))
        );
        assert_eq!(Action::from_name("explode"), None);
    }

    #[test]
    fn test_panel_binding_shadows_global() {
        let mut map = Keymap::with_defaults();
        let images = PanelId::from(IMAGE_LIST);
        map.bind(&images, KeyEvent::char('q'), Action::Inspect);

        assert_eq!(
            map.lookup(&images, &KeyEvent::char('q')),
            Some((Scope::Panel, Action::Inspect))
        );
        assert_eq!(
            map.lookup(&PanelId::from(DETAIL), &KeyEvent::char('q')),
            Some((Scope::Global, Action::Quit))
        );
    }

    #[test]
    fn test_defaults_per_panel() {
        let map = Keymap::with_defaults();
        assert_eq!(
            map.lookup(&PanelId::from(IMAGE_LIST), &KeyEvent::ctrl('l')),
            Some((Scope::Panel, Action::OpenForm(FormKind::LoadImage)))
        );
        assert_eq!(
            map.lookup(&PanelId::from(CONTAINER_LIST), &KeyEvent::char('c')),
            Some((Scope::Panel, Action::OpenForm(FormKind::CommitContainer)))
        );
        assert_eq!(map.lookup(&PanelId::from(DETAIL), &KeyEvent::char('d')), None);
        assert_eq!(map.lookup(&PanelId::from(IMAGE_LIST), &KeyEvent::char('z')), None);
    }

    #[test]
    fn test_apply_overrides() {
        let mut map = Keymap::with_defaults();
        map.apply(&[
            Binding {
                scope: BindingScope::Global,
                key: KeyEvent::char('x'),
                action: Action::Quit,
            },
            Binding {
                scope: BindingScope::Panel(PanelId::from(VOLUME_LIST)),
                key: KeyEvent::char('d'),
                action: Action::Inspect,
            },
        ]);
        assert_eq!(
            map.lookup(&PanelId::from(DETAIL), &KeyEvent::char('x')),
            Some((Scope::Global, Action::Quit))
        );
        assert_eq!(
            map.lookup(&PanelId::from(VOLUME_LIST), &KeyEvent::char('d')),
            Some((Scope::Panel, Action::Inspect))
        );
    }

    #[test]
    fn test_help_lists_panel_then_global() {
        let map = Keymap::with_defaults();
        let lines = map.help_lines(&PanelId::from(VOLUME_LIST));
        assert_eq!(lines[0], "volume list:");
        assert!(lines.iter().any(|l| l.contains("Create volume")));
        let global_at = lines.iter().position(|l| l == "global:").unwrap();
        assert!(lines[global_at..].iter().any(|l| l.contains("ctrl+r")));
    }
}
