//! Page-wide display mode (hidden system cursor, smooth scrolling)
//!
//! Acquired on mount and released on drop, so every exit path restores the
//! page.

/// Document-level style properties the display mode touches
pub trait PageStyle {
    fn set_body_cursor(&mut self, value: &str);
    /// Empty string clears the property
    fn set_scroll_behavior(&mut self, value: &str);
}

/// RAII handle for the page display mode
pub struct DisplayModeGuard<S: PageStyle> {
    style: S,
    hide_cursor: bool,
}

impl<S: PageStyle> DisplayModeGuard<S> {
    /// Enter the display mode. The system cursor is hidden only when the
    /// custom cursor replaces it.
    pub fn acquire(mut style: S, hide_cursor: bool) -> Self {
        if hide_cursor {
            style.set_body_cursor("none");
        }
        style.set_scroll_behavior("smooth");
        log::debug!("display mode acquired (hide_cursor={})", hide_cursor);
        Self { style, hide_cursor }
    }
}

impl<S: PageStyle> Drop for DisplayModeGuard<S> {
    fn drop(&mut self) {
        if self.hide_cursor {
            self.style.set_body_cursor("auto");
        }
        self.style.set_scroll_behavior("");
        log::debug!("display mode released");
    }
}
