//! Theme preference state, provided via context alongside the session.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

/// Light/dark preference for the whole application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub dark_mode: bool,
}
