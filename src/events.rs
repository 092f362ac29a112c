use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    Quit,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Tab,
    Escape,
    InputChar(char),
    Backspace,
    Delete,
    Submit,
    ToggleHelp,
    OpenSave,
    OpenLoad,
    Reset,
    ScrollUp,
    ScrollDown,
    MouseLeftClick(u16, u16),
}

fn map_key_event(key_event: KeyEvent) -> AppEvent {
    if key_event.kind != KeyEventKind::Press {
        return AppEvent::Tick;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => AppEvent::Quit,
            KeyCode::Char('s') => AppEvent::OpenSave,
            KeyCode::Char('o') => AppEvent::OpenLoad,
            KeyCode::Char('r') => AppEvent::Reset,
            _ => AppEvent::Tick,
        };
    }

    match key_event.code {
        KeyCode::Tab => AppEvent::Tab,
        KeyCode::Esc => AppEvent::Escape,
        KeyCode::F(1) => AppEvent::ToggleHelp,
        KeyCode::PageUp => AppEvent::ScrollUp,
        KeyCode::PageDown => AppEvent::ScrollDown,
        KeyCode::Up => AppEvent::Up,
        KeyCode::Down => AppEvent::Down,
        KeyCode::Left => AppEvent::Left,
        KeyCode::Right => AppEvent::Right,
        KeyCode::Home => AppEvent::Home,
        KeyCode::End => AppEvent::End,
        KeyCode::Backspace => AppEvent::Backspace,
        KeyCode::Delete => AppEvent::Delete,
        KeyCode::Enter => AppEvent::Submit,
        KeyCode::Char(c) => AppEvent::InputChar(c),
        _ => AppEvent::Tick,
    }
}

fn map_mouse_event(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
    match kind {
        MouseEventKind::ScrollUp => AppEvent::ScrollUp,
        MouseEventKind::ScrollDown => AppEvent::ScrollDown,
        MouseEventKind::Down(MouseButton::Left) => AppEvent::MouseLeftClick(column, row),
        _ => AppEvent::Tick,
    }
}

pub fn next_event(timeout: Duration) -> io::Result<AppEvent> {
    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key_event) => return Ok(map_key_event(key_event)),
            Event::Mouse(mouse_event) => {
                return Ok(map_mouse_event(
                    mouse_event.kind,
                    mouse_event.column,
                    mouse_event.row,
                ));
            }
            _ => {}
        }
    }

    Ok(AppEvent::Tick)
}
