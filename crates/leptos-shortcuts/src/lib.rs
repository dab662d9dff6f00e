//! Leptos Keyboard Shortcuts
//!
//! Global key-chord dispatcher using a single window `keydown` listener.
//! The active shortcut list lives in a shared registry, so a component can
//! swap it on every render without re-binding the listener.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Key name that always passes the text-input suppression
pub const ESCAPE: &str = "Escape";

/// Zero-argument action run when a shortcut fires
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// A key plus exact modifier state mapped to an action
#[derive(Clone)]
pub struct Shortcut {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub description: String,
    action: Action,
}

impl Shortcut {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        action: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            shift: false,
            alt: false,
            description: description.into(),
            action: Arc::new(action),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Modifiers must match exactly; the key compares case-insensitively
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.ctrl == press.ctrl
            && self.shift == press.shift
            && self.alt == press.alt
            && self.key.to_lowercase() == press.key.to_lowercase()
    }

    /// Display form, e.g. `Ctrl+D` or `Shift+?`
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        let key = match self.key.as_str() {
            ESCAPE => "Esc".to_string(),
            k if k.chars().count() == 1 => k.to_uppercase(),
            k => k.to_string(),
        };
        parts.push(key);
        parts.join("+")
    }
}

impl fmt::Debug for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcut")
            .field("key", &self.key)
            .field("ctrl", &self.ctrl)
            .field("shift", &self.shift)
            .field("alt", &self.alt)
            .field("description", &self.description)
            .finish()
    }
}

/// A single keydown, reduced to what matching needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    /// Control or Meta
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Focus was inside an input, textarea, select or contenteditable element
    pub in_text_input: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.in_text_input = true;
        self
    }

    pub fn from_event(ev: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: ev.key(),
            ctrl: ev.ctrl_key() || ev.meta_key(),
            shift: ev.shift_key(),
            alt: ev.alt_key(),
            in_text_input: ev.target().is_some_and(|target| is_text_input(&target)),
        }
    }
}

fn is_text_input(target: &web_sys::EventTarget) -> bool {
    let Some(element) = target.dyn_ref::<web_sys::HtmlElement>() else {
        return false;
    };
    matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT") || element.is_content_editable()
}

/// First shortcut in list order matching `press`, honouring text-input suppression
pub fn find_match<'a>(shortcuts: &'a [Shortcut], press: &KeyPress) -> Option<&'a Shortcut> {
    if press.in_text_input && press.key != ESCAPE {
        return None;
    }
    shortcuts.iter().find(|shortcut| shortcut.matches(press))
}

/// Shared, replaceable shortcut list read at event time
#[derive(Clone, Default)]
pub struct ShortcutRegistry {
    shortcuts: Arc<RwLock<Vec<Shortcut>>>,
}

impl ShortcutRegistry {
    pub fn new(shortcuts: Vec<Shortcut>) -> Self {
        Self {
            shortcuts: Arc::new(RwLock::new(shortcuts)),
        }
    }

    /// Swap in the latest shortcut set
    pub fn replace(&self, shortcuts: Vec<Shortcut>) {
        *self.shortcuts.write().unwrap_or_else(PoisonError::into_inner) = shortcuts;
    }

    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.shortcuts.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Run the first matching action. Returns whether one fired.
    pub fn dispatch(&self, press: &KeyPress) -> bool {
        // Clone the action out so it can replace the set while running
        let action = {
            let shortcuts = self.shortcuts.read().unwrap_or_else(PoisonError::into_inner);
            find_match(&shortcuts, press).map(|shortcut| {
                log::debug!("[SHORTCUT] {} -> {}", shortcut.label(), shortcut.description);
                Arc::clone(&shortcut.action)
            })
        };
        match action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

/// Bind `registry` to window keydown events for the current owner's lifetime.
///
/// The listener is removed when the owning component is cleaned up.
pub fn use_keyboard_shortcuts(registry: ShortcutRegistry, enabled: bool) {
    if !enabled {
        return;
    }
    let handle = window_event_listener(leptos::ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let press = KeyPress::from_event(&ev);
        if registry.dispatch(&press) {
            ev.prevent_default();
        }
    });
    on_cleanup(move || handle.remove());
}
