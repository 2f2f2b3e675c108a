//! Clipboard collaborators used by copy/cut/paste.

use std::cell::RefCell;
use std::rc::Rc;

/// Host clipboard. Failures are swallowed: a clipboard that cannot be read
/// behaves as empty.
pub trait Clipboard {
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// In-process clipboard. Clones share contents, so a host (or test) can keep
/// a handle to the same clipboard it gave the editor.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents()
    }

    fn set_text(&mut self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_string());
    }
}

/// The operating system clipboard
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard.get_text().ok(),
            Err(e) => {
                tracing::warn!("Failed to open clipboard: {}", e);
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text) {
                    tracing::warn!("Failed to write clipboard: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to open clipboard: {}", e),
        }
    }
}
