use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::Result;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(AppEvent::Key(key));
                }
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    Select,
    Back,
    Retry,
    Refresh,
    OpenInBrowser,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Char('n') | KeyCode::PageDown => Action::NextPage,
            KeyCode::Char('p') | KeyCode::PageUp => Action::PrevPage,
            KeyCode::Enter => Action::Select,
            KeyCode::Esc | KeyCode::Backspace => Action::Back,
            KeyCode::Char('r') => Action::Retry,
            KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('o') => Action::OpenInBrowser,
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from(key(KeyCode::Enter)), Action::Select);
        assert_eq!(Action::from(key(KeyCode::Esc)), Action::Back);
        assert_eq!(Action::from(key(KeyCode::Backspace)), Action::Back);
        assert_eq!(Action::from(key(KeyCode::Char('r'))), Action::Retry);
        assert_eq!(Action::from(key(KeyCode::Char('R'))), Action::Refresh);
        assert_eq!(Action::from(key(KeyCode::Char('o'))), Action::OpenInBrowser);
        assert_eq!(Action::from(key(KeyCode::Char('x'))), Action::None);
        assert_eq!(
            Action::from(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }
}
