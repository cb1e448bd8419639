use crate::position::Position;

/// Text buffer behind a panel.
///
/// This is the core's side of the terminal toolkit: panels write lines
/// here, move the cursor and read the line under it, and the terminal layer
/// draws whatever the buffer holds at the panel's position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    title: String,
    position: Position,
    lines: Vec<String>,
    cursor: usize,
    origin: usize,
}

impl View {
    pub fn new(title: impl Into<String>, position: Position) -> Self {
        Self {
            title: title.into(),
            position,
            lines: Vec::new(),
            cursor: 0,
            origin: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Drop all text. The cursor is kept and clamped on the next read.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn write_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append text, one buffer line per input line.
    pub fn write(&mut self, text: &str) {
        self.lines.extend(text.lines().map(str::to_string));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whole buffer as one string, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Cursor row, clamped into the buffer.
    pub fn cursor(&self) -> usize {
        self.cursor.min(self.lines.len().saturating_sub(1))
    }

    pub fn set_cursor(&mut self, row: usize) {
        self.cursor = row.min(self.lines.len().saturating_sub(1));
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn set_origin(&mut self, row: usize) {
        self.origin = row;
    }

    /// Line under the cursor; `None` when the buffer is empty.
    pub fn line_at_cursor(&self) -> Option<&str> {
        self.lines.get(self.cursor()).map(String::as_str)
    }

    pub fn cursor_down(&mut self, rows: usize) {
        self.set_cursor(self.cursor().saturating_add(rows));
    }

    pub fn cursor_up(&mut self, rows: usize) {
        self.cursor = self.cursor().saturating_sub(rows);
        if self.cursor < self.origin {
            self.origin = self.cursor;
        }
    }

    /// First buffer row to draw so the cursor stays inside `height` rows.
    pub fn scroll_offset(&self, height: usize) -> usize {
        let cursor = self.cursor();
        if height == 0 || cursor < self.origin {
            return cursor;
        }
        self.origin.max((cursor + 1).saturating_sub(height))
    }
}
