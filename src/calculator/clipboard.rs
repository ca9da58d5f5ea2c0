//! Clipboard functionality for copying calculator results.

use arboard::Clipboard;

/// Copy a result to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| anyhow::anyhow!("Failed to access clipboard: {}", e))?;

    clipboard
        .set_text(text.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to copy to clipboard: {}", e))?;

    tracing::debug!(text, "copied result to clipboard");
    Ok(())
}
