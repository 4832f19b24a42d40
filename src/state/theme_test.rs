use super::*;

#[test]
fn theme_defaults_to_light() {
    let state = ThemeState::default();
    assert!(!state.dark_mode);
}
