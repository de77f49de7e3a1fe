use std::collections::BTreeSet;

use glam::Vec2;

/// Keys the demos poll. Platform layers map their key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    A,
    Q,
    W,
    E,
    Left,
    Right,
    Up,
    Down,
    F1,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What is held down right now, plus the pointer position.
///
/// Demos query this once per frame; there is no event queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    keys_down: BTreeSet<Key>,
    buttons_down: BTreeSet<MouseButton>,
    /// Pointer in window pixels, origin top-left, y down.
    pointer: Option<Vec2>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn keys_down(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys_down.iter().copied()
    }

    /// Builder used by scripted input (CLI runs, tests).
    pub fn with_key(mut self, key: Key) -> Self {
        self.keys_down.insert(key);
        self
    }

    /// Builder: hold `button` with the pointer at `pointer`.
    pub fn with_button_at(mut self, button: MouseButton, pointer: Vec2) -> Self {
        self.buttons_down.insert(button);
        self.pointer = Some(pointer);
        self
    }
}

/// Accumulates platform input events into the current snapshot.
#[derive(Debug, Default)]
pub struct InputState {
    current: InputSnapshot,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.current.keys_down.insert(key);
        } else {
            self.current.keys_down.remove(&key);
        }
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.current.buttons_down.insert(button);
        } else {
            self.current.buttons_down.remove(&button);
        }
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.current.pointer = Some(position);
    }

    pub fn pointer_left(&mut self) {
        self.current.pointer = None;
    }

    /// On focus loss, drop everything held so keys don't stick.
    pub fn focus_lost(&mut self) {
        tracing::debug!(
            keys = self.current.keys_down.len(),
            buttons = self.current.buttons_down.len(),
            "focus lost, releasing held input"
        );
        self.current.keys_down.clear();
        self.current.buttons_down.clear();
    }

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_key() {
        let mut state = InputState::new();
        state.key(Key::A, true);
        assert!(state.snapshot().key_down(Key::A));
        state.key(Key::A, false);
        assert!(!state.snapshot().key_down(Key::A));
    }

    #[test]
    fn held_key_survives_repeated_press() {
        let mut state = InputState::new();
        state.key(Key::Left, true);
        state.key(Key::Left, true);
        state.key(Key::Left, false);
        assert!(!state.snapshot().key_down(Key::Left));
    }

    #[test]
    fn button_and_pointer() {
        let mut state = InputState::new();
        assert!(state.snapshot().pointer().is_none());
        state.pointer_moved(Vec2::new(10.0, 20.0));
        state.button(MouseButton::Left, true);
        let snap = state.snapshot();
        assert!(snap.button_down(MouseButton::Left));
        assert!(!snap.button_down(MouseButton::Right));
        assert_eq!(snap.pointer(), Some(Vec2::new(10.0, 20.0)));
        state.pointer_left();
        assert!(state.snapshot().pointer().is_none());
    }

    #[test]
    fn focus_loss_clears_held_inputs() {
        let mut state = InputState::new();
        state.key(Key::Up, true);
        state.button(MouseButton::Left, true);
        state.pointer_moved(Vec2::ONE);
        state.focus_lost();
        let snap = state.snapshot();
        assert!(!snap.key_down(Key::Up));
        assert!(!snap.button_down(MouseButton::Left));
        assert_eq!(snap.pointer(), Some(Vec2::ONE));
    }

    #[test]
    fn builder_snapshot() {
        let snap = InputSnapshot::new()
            .with_key(Key::Q)
            .with_button_at(MouseButton::Left, Vec2::new(1.0, 2.0));
        assert!(snap.key_down(Key::Q));
        assert!(snap.button_down(MouseButton::Left));
        assert_eq!(snap.keys_down().collect::<Vec<_>>(), vec![Key::Q]);
    }
}
