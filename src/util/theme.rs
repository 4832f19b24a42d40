//! Theme persistence and application.
//!
//! Reads the preference from `localStorage`, falling back to the system
//! color scheme, and applies the `.theme-dark` class to `<html>`. Requires a
//! browser environment; native builds get the light default.

#[cfg(feature = "csr")]
const STORAGE_KEY: &str = "learnhub.theme.dark";

/// Read the stored dark-mode preference, or the system preference when
/// nothing is stored.
#[must_use]
pub fn read_preference() -> bool {
    #[cfg(feature = "csr")]
    {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return false,
        };

        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(value)) = storage.get_item(STORAGE_KEY) {
                return value == "true";
            }
        }

        window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .map_or(false, |mq| mq.matches())
    }
    #[cfg(not(feature = "csr"))]
    {
        false
    }
}

/// Apply or remove the `.theme-dark` class on `<html>`.
pub fn apply(dark: bool) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let classes = el.class_list();
            if dark {
                let _ = classes.add_1("theme-dark");
            } else {
                let _ = classes.remove_1("theme-dark");
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = dark;
    }
}

/// Flip the preference, persist it, and apply it. Returns the new value.
pub fn toggle(current: bool) -> bool {
    let next = !current;
    apply(next);
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let _ = storage.set_item(STORAGE_KEY, if next { "true" } else { "false" });
            }
        }
    }
    next
}
