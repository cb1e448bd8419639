use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use dockui_core::{Dispatcher, Key, KeyEvent, Modifier, UiContext};

use crate::ui;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard until a quit action. The terminal is restored even when
/// the loop fails.
pub async fn run(dispatcher: Dispatcher) -> io::Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &dispatcher).await;
    restore_terminal(terminal)?;
    result
}

async fn event_loop(terminal: &mut Term, dispatcher: &Dispatcher) -> io::Result<()> {
    let size = terminal.size()?;
    // last row is the status bar
    let mut ctx = UiContext::with_standard_panels(
        size.width as i32,
        size.height.saturating_sub(1) as i32,
    )
    .map_err(|e| io::Error::other(e.to_string()))?;
    ctx.initialize(dispatcher.client()).await;
    log::info!(
        "dashboard started at {}x{} using {} client",
        size.width,
        size.height,
        dispatcher.client().name()
    );

    loop {
        terminal.draw(|f| ui::draw(f, &ctx))?;

        if ctx.should_quit() {
            log::info!("quit requested");
            return Ok(());
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        match event::read()? {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(key) = convert_key(key.code, key.modifiers) {
                    let outcome = dispatcher.handle_key(&mut ctx, key).await;
                    log::trace!("{} -> {:?}", key, outcome);
                }
            }
            CEvent::Resize(width, height) => {
                ctx.resize(width as i32, height.saturating_sub(1) as i32);
            }
            _ => {}
        }
    }
}

/// Terminal key to dashboard key. Shift is folded into the character (or
/// into `BackTab`); keys the dashboard has no name for are dropped.
fn convert_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyEvent> {
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    let modifier = if modifiers.contains(KeyModifiers::CONTROL) {
        Modifier::Ctrl
    } else if modifiers.contains(KeyModifiers::ALT) {
        Modifier::Alt
    } else {
        Modifier::None
    };
    Some(KeyEvent::new(key, modifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_plain_and_shifted() {
        assert_eq!(
            convert_key(KeyCode::Char('d'), KeyModifiers::NONE),
            Some(KeyEvent::char('d'))
        );
        assert_eq!(
            convert_key(KeyCode::Char('P'), KeyModifiers::SHIFT),
            Some(KeyEvent::char('P'))
        );
        assert_eq!(
            convert_key(KeyCode::Tab, KeyModifiers::SHIFT),
            Some(KeyEvent::plain(Key::BackTab))
        );
        assert_eq!(
            convert_key(KeyCode::BackTab, KeyModifiers::SHIFT),
            Some(KeyEvent::plain(Key::BackTab))
        );
    }

    #[test]
    fn test_convert_modifiers() {
        assert_eq!(
            convert_key(KeyCode::Char('l'), KeyModifiers::CONTROL),
            Some(KeyEvent::ctrl('l'))
        );
        assert_eq!(
            convert_key(KeyCode::Char('x'), KeyModifiers::ALT),
            Some(KeyEvent::new(Key::Char('x'), Modifier::Alt))
        );
    }

    #[test]
    fn test_convert_unknown_key() {
        assert_eq!(convert_key(KeyCode::Insert, KeyModifiers::NONE), None);
        assert_eq!(convert_key(KeyCode::CapsLock, KeyModifiers::NONE), None);
    }
}
