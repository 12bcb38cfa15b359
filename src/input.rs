//! Terminal events to game signals.

use crate::config::Surface;
use crate::session::Signal;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What the main loop should do with one terminal event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Signal(Signal),
    /// New terminal size in cells.
    Resize(u16, u16),
    Quit,
}

/// Pixel surface for a terminal of `cols` x `rows` cells: each cell is two
/// stacked pixels.
pub fn surface_for(cols: u16, rows: u16) -> Surface {
    Surface::new(cols as f64, rows as f64 * 2.0)
}

/// Center of the cell at (`column`, `row`) in surface pixels.
pub fn cell_to_pixel(column: u16, row: u16) -> (f64, f64) {
    (column as f64 + 0.5, row as f64 * 2.0 + 1.0)
}

/// Reduce any number of contact points to one pointer signal at the first.
pub fn pointer_signal(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Signal> {
    points
        .into_iter()
        .next()
        .map(|(x, y)| Signal::Pointer { x, y })
}

pub fn translate(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(c, r) => Some(Command::Resize(*c, *r)),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('k') => {
            Some(Command::Signal(Signal::Jump))
        }
        KeyCode::Char('r') | KeyCode::Enter => Some(Command::Signal(Signal::Restart)),
        _ => None,
    }
}

fn translate_mouse(mouse: &MouseEvent) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            pointer_signal([cell_to_pixel(mouse.column, mouse.row)]).map(Command::Signal)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_jump_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('k')] {
            assert_eq!(translate(&key(code)), Some(Command::Signal(Signal::Jump)));
        }
    }

    #[test]
    fn test_restart_keys() {
        for code in [KeyCode::Char('r'), KeyCode::Enter] {
            assert_eq!(
                translate(&key(code)),
                Some(Command::Signal(Signal::Restart))
            );
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(translate(&key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(translate(&key(KeyCode::Esc)), Some(Command::Quit));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&ctrl_c), Some(Command::Quit));
        assert_eq!(translate(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(&Event::Key(release)), None);
    }

    #[test]
    fn test_left_click_maps_to_cell_center() {
        let cmd = translate(&click(MouseEventKind::Down(MouseButton::Left), 10, 4));
        assert_eq!(
            cmd,
            Some(Command::Signal(Signal::Pointer { x: 10.5, y: 9.0 }))
        );
    }

    #[test]
    fn test_other_mouse_events_ignored() {
        assert_eq!(
            translate(&click(MouseEventKind::Down(MouseButton::Right), 1, 1)),
            None
        );
        assert_eq!(translate(&click(MouseEventKind::Moved, 1, 1)), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            translate(&Event::Resize(100, 30)),
            Some(Command::Resize(100, 30))
        );
        assert_eq!(surface_for(100, 30), Surface::new(100.0, 60.0));
    }

    #[test]
    fn test_pointer_uses_first_point() {
        assert_eq!(
            pointer_signal([(3.0, 4.0), (50.0, 60.0)]),
            Some(Signal::Pointer { x: 3.0, y: 4.0 })
        );
        assert_eq!(pointer_signal(std::iter::empty()), None);
    }
}
