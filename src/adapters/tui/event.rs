use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,

    // Cursor movement
    Left,
    Right,
    Up,
    Down,

    // Input handling; letters are interpreted by the current mode
    Character(char),
    Backspace,
    Enter,
    Escape,

    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next_event(&mut self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    Ok(Self::map_key(key_event))
                }
                _ => Ok(AppEvent::Tick),
            }
        } else {
            Ok(AppEvent::Tick)
        }
    }

    pub fn map_key(key_event: KeyEvent) -> AppEvent {
        match key_event {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => AppEvent::Quit,

            KeyEvent {
                code: KeyCode::Left,
                ..
            } => AppEvent::Left,

            KeyEvent {
                code: KeyCode::Right,
                ..
            } => AppEvent::Right,

            KeyEvent {
                code: KeyCode::Up, ..
            } => AppEvent::Up,

            KeyEvent {
                code: KeyCode::Down,
                ..
            } => AppEvent::Down,

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => AppEvent::Enter,

            KeyEvent {
                code: KeyCode::Esc, ..
            } => AppEvent::Escape,

            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => AppEvent::Backspace,

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
                ..
            } => AppEvent::Character(c),

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => AppEvent::Character(c.to_uppercase().next().unwrap_or(c)),

            _ => AppEvent::Tick,
        }
    }
}
