//! Keyboard to logical action mapping
//!
//! Keys arrive as `KeyboardEvent.key`-style names ("q", "ArrowLeft", " ").
//! Movement is held state; jump and dash fire once per key press.

use crate::sim::TickInput;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Q,
    A,
    D,
    Z,
    X,
    Space,
    Left,
    Right,
    Up,
    Escape,
}

impl Key {
    /// Parse a key name; letters are case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "q" | "Q" => Key::Q,
            "a" | "A" => Key::A,
            "d" | "D" => Key::D,
            "z" | "Z" => Key::Z,
            "x" | "X" => Key::X,
            " " | "Space" => Key::Space,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "ArrowUp" => Key::Up,
            "Escape" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }

    pub fn action(self) -> Action {
        match self {
            Key::Q | Key::A | Key::Left => Action::MoveLeft,
            Key::D | Key::Right => Action::MoveRight,
            Key::Space | Key::Up => Action::Jump,
            Key::Z | Key::X => Action::Dash,
            Key::Escape => Action::Quit,
        }
    }
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Dash,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Window closed
    Close,
}

/// Input gathered between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    jump: bool,
    dash: bool,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => match key.action() {
                Action::MoveLeft => self.left = true,
                Action::MoveRight => self.right = true,
                Action::Jump => self.jump = true,
                Action::Dash => self.dash = true,
                Action::Quit => self.quit = true,
            },
            InputEvent::KeyUp(key) => match key.action() {
                Action::MoveLeft => self.left = false,
                Action::MoveRight => self.right = false,
                _ => {}
            },
            InputEvent::Close => self.quit = true,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Input for the next tick. Clears the one-shot presses.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
            dash: self.dash,
        };
        self.jump = false;
        self.dash = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("q"), Some(Key::Q));
        assert_eq!(Key::from_name("A"), Some(Key::A));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_name("F5"), None);
    }

    #[test]
    fn test_held_and_one_shot() {
        let mut input = InputState::new();
        input.handle(InputEvent::KeyDown(Key::A));
        input.handle(InputEvent::KeyDown(Key::Space));
        input.handle(InputEvent::KeyDown(Key::X));

        let first = input.take_tick_input();
        assert!(first.left && first.jump && first.dash);
        assert!(!first.right);

        let second = input.take_tick_input();
        assert!(second.left);
        assert!(!second.jump && !second.dash);

        input.handle(InputEvent::KeyUp(Key::A));
        input.handle(InputEvent::KeyDown(Key::Right));
        let third = input.take_tick_input();
        assert!(!third.left && third.right);
    }

    #[test]
    fn test_quit_sources() {
        let mut input = InputState::new();
        assert!(!input.quit_requested());
        input.handle(InputEvent::KeyDown(Key::Escape));
        assert!(input.quit_requested());

        let mut input = InputState::new();
        input.handle(InputEvent::Close);
        assert!(input.quit_requested());
    }
}
