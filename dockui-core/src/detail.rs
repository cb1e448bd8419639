use crate::format;
use crate::panel::{DETAIL, PanelId};
use crate::position::Position;
use crate::view::View;

const DEFAULT_TITLE: &str = "Detail";

/// Read-only pane showing the last inspected object.
#[derive(Clone, Debug)]
pub struct DetailPanel {
    id: PanelId,
    view: View,
    body: Option<String>,
}

impl DetailPanel {
    pub fn new(position: Position) -> Self {
        Self {
            id: PanelId::from(DETAIL),
            view: View::new(DEFAULT_TITLE, position),
            body: None,
        }
    }

    pub fn id(&self) -> &PanelId {
        &self.id
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Text of the last shown object, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Replace the contents with `object` and scroll back to the top.
    pub fn show(&mut self, title: &str, object: &serde_json::Value) {
        self.show_text(title, format::render(object));
    }

    pub fn show_text(&mut self, title: &str, text: impl Into<String>) {
        self.view.set_title(title);
        self.body = Some(text.into());
        self.view.set_cursor(0);
        self.view.set_origin(0);
        self.redraw();
    }

    /// Write the last shown object again without moving the cursor.
    pub fn redraw(&mut self) {
        self.view.clear();
        if let Some(body) = &self.body {
            self.view.write(body);
        }
    }

    pub fn reset(&mut self) {
        self.body = None;
        self.view.set_title(DEFAULT_TITLE);
        self.view.clear();
        self.view.set_cursor(0);
        self.view.set_origin(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn panel() -> DetailPanel {
        DetailPanel::new(Position::new(40, 0, 80, 20).unwrap())
    }

    #[test]
    fn test_show_replaces_and_rewinds() {
        let mut detail = panel();
        detail.show("image a", &json!({"Id": "a", "Size": 1, "Tags": ["x", "y"]}));
        detail.view_mut().cursor_down(3);
        detail.view_mut().set_origin(2);

        detail.show("image b", &json!({"Id": "b"}));
        assert_eq!(detail.view().title(), "image b");
        assert_eq!(detail.view().cursor(), 0);
        assert_eq!(detail.view().origin(), 0);
        assert_eq!(detail.view().text(), "{\n  \"Id\": \"b\"\n}");
    }

    #[test]
    fn test_redraw_keeps_last_object() {
        let mut detail = panel();
        detail.show_text("help", "q quit\n? help");
        detail.redraw();
        detail.redraw();
        assert_eq!(detail.view().lines(), ["q quit", "? help"]);
    }

    #[test]
    fn test_reset_empties_view() {
        let mut detail = panel();
        detail.show_text("help", "x");
        detail.reset();
        assert!(detail.view().is_empty());
        assert_eq!(detail.body(), None);
        assert_eq!(detail.view().title(), DEFAULT_TITLE);
    }
}
