use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use dockui_core::UiContext;
use dockui_core::context::Notice;
use dockui_core::panel::{Panel, PanelKind};
use dockui_core::position::Position;

use super::theme::styles;

/// Draw one frame: persistent panels, then the open overlay, then the
/// status bar on the last row.
pub fn draw(f: &mut Frame, ctx: &UiContext) {
    let area = f.area();
    let body = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let current = ctx.panels.current();

    for panel in ctx.panels.iter() {
        if panel.kind().is_overlay() {
            continue;
        }
        let focused = current == Some(panel.id());
        let notice = ctx.notice().filter(|n| &n.panel == panel.id());
        draw_panel(f, panel, to_rect(panel.position(), body), focused, notice);
    }

    if let (Some(host), Some(position)) = (
        current.and_then(|id| ctx.panels.get(id)),
        ctx.modal.overlay_position(),
    ) {
        if host.kind().is_overlay() {
            let rect = to_rect(position, body);
            f.render_widget(Clear, rect);
            let notice = ctx.notice().filter(|n| &n.panel == host.id());
            draw_panel(f, host, rect, true, notice);
        }
    }

    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    draw_status(f, ctx, status);
}

fn draw_panel(f: &mut Frame, panel: &Panel, rect: Rect, focused: bool, notice: Option<&Notice>) {
    let view = panel.view();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(focused))
        .title(Span::styled(
            format!(" {} ", view.title()),
            styles::title(focused),
        ));
    if let Some(notice) = notice {
        block = block.title_bottom(Span::styled(
            format!(" {} ", notice.text),
            styles::notice(notice.level),
        ));
    }

    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let height = inner.height as usize;
    let offset = view.scroll_offset(height);
    let cursor = view.cursor();
    let highlight = match panel.kind() {
        PanelKind::List(_) => focused,
        PanelKind::Input => true,
        PanelKind::Detail | PanelKind::Confirm => false,
    };

    let lines: Vec<Line> = view
        .lines()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(row, text)| {
            let style = if highlight && row == cursor {
                styles::selection()
            } else if row == 0 && matches!(panel.kind(), PanelKind::List(_)) {
                styles::text_muted()
            } else {
                styles::text()
            };
            Line::from(Span::styled(text.clone(), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status(f: &mut Frame, ctx: &UiContext, rect: Rect) {
    let focused = ctx
        .panels
        .current()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();
    let line = Line::from(vec![
        Span::styled(format!(" {} ", focused), styles::title(true)),
        Span::raw("  "),
        Span::styled("?", styles::key_hint()),
        Span::styled(" keys  ", styles::text_muted()),
        Span::styled("Tab", styles::key_hint()),
        Span::styled(" next panel  ", styles::text_muted()),
        Span::styled("ctrl+r", styles::key_hint()),
        Span::styled(" refresh  ", styles::text_muted()),
        Span::styled("q", styles::key_hint()),
        Span::styled(" quit", styles::text_muted()),
    ]);
    f.render_widget(Paragraph::new(line), rect);
}

/// Clip a panel position into the drawable area.
fn to_rect(position: Position, area: Rect) -> Rect {
    let clip = |v: i32, max: u16| v.clamp(0, max as i32) as u16;
    let left = clip(position.left, area.width);
    let top = clip(position.top, area.height);
    let right = clip(position.right, area.width);
    let bottom = clip(position.bottom, area.height);
    Rect {
        x: area.x + left,
        y: area.y + top,
        width: right.saturating_sub(left),
        height: bottom.saturating_sub(top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rect_inside() {
        let area = Rect::new(0, 0, 120, 39);
        let rect = to_rect(Position::new(40, 13, 80, 19).unwrap(), area);
        assert_eq!(rect, Rect::new(40, 13, 40, 6));
    }

    #[test]
    fn test_to_rect_clips_to_area() {
        let area = Rect::new(0, 0, 80, 23);
        let rect = to_rect(Position::clamped(60, 10, 200, 100), area);
        assert_eq!(rect, Rect::new(60, 10, 20, 13));
    }

    #[test]
    fn test_to_rect_outside_is_empty() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = to_rect(Position::clamped(30, 12, 40, 20), area);
        assert_eq!(rect.width, 0);
        assert_eq!(rect.height, 0);
    }
}
