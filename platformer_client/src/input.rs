//! Input handling.
//!
//! The host environment reports raw key presses and releases at any time;
//! the tick samples a [`HeldKeys`] snapshot exactly once. Raw keys are
//! mapped to logical keys through [`KeyBindings`].

use std::collections::HashMap;

use platformer_shared::input::HeldKeys;

/// Raw key names bound to each logical key.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub jump_primary: String,
    pub jump_secondary: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "a".to_string(),
            right: "d".to_string(),
            jump_primary: " ".to_string(),
            jump_secondary: "w".to_string(),
        }
    }
}

/// Normalizes a typed key name; `space` stands for the space bar.
pub fn parse_key(name: &str) -> String {
    match name {
        "space" | "Space" => " ".to_string(),
        other => other.to_string(),
    }
}

/// Currently held raw keys.
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashMap<String, bool>,
    last: Option<String>,
    bindings: KeyBindings,
}

impl KeyboardState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_string(), true);
        self.last = Some(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.insert(key.to_string(), false);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    /// Most recently pressed key, if any.
    pub fn last_pressed(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Logical keys held right now.
    pub fn snapshot(&self) -> HeldKeys {
        let mut keys = HeldKeys::empty();
        keys.set(HeldKeys::LEFT, self.is_held(&self.bindings.left));
        keys.set(HeldKeys::RIGHT, self.is_held(&self.bindings.right));
        keys.set(HeldKeys::JUMP_PRIMARY, self.is_held(&self.bindings.jump_primary));
        keys.set(HeldKeys::JUMP_SECONDARY, self.is_held(&self.bindings.jump_secondary));
        keys
    }
}
