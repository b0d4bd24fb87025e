//! System clipboard access.

use tracing::warn;

/// Put `text` on the clipboard. Returns false when no clipboard is available
/// (headless sessions, missing display server).
pub fn copy(text: &str) -> bool {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "clipboard unavailable");
            false
        }
    }
}
