use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::InputEvent;

/// What a terminal event means to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermEvent {
    Input(InputEvent),

    /// The terminal was resized to `cols` x `rows`
    Resize { cols: u16, rows: u16 },

    /// Exit the application
    Exit,
}

/// Converts a crossterm event into a terminal event.
///
/// Space and `n` select the next pattern, Enter confirms, `q` and Ctrl-C exit. Key releases and
/// repeats are dropped, so holding a key down counts as a single press.
pub fn convert_event(event: CrossTermEvent) -> Option<TermEvent> {
    match event {
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release | KeyEventKind::Repeat,
            ..
        }) => None,

        CrossTermEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(TermEvent::Exit),
            KeyEvent {
                code: KeyCode::Char(' ' | 'n'),
                ..
            } => Some(TermEvent::Input(InputEvent::Next)),
            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => Some(TermEvent::Input(InputEvent::Confirm)),
            _ => None,
        },

        CrossTermEvent::Resize(cols, rows) => Some(TermEvent::Resize { cols, rows }),

        _ => None,
    }
}
