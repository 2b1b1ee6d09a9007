//! System clipboard behind the core [`Clipboard`] trait.

use planrev_core::actions::{Clipboard, ClipboardError};

/// `arboard` clipboard, opened on first use.
///
/// Opening lazily keeps a headless session (no display server) usable until the
/// operator actually copies something.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError(format!("clipboard unavailable: {e}")))?;
            self.inner = Some(clipboard);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError(e.to_string()))?;
        }
        Ok(())
    }
}
