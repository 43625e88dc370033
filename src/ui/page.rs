use crate::config::Theme;

const TEMPLATE: &str = include_str!("../../assets/index.html");

pub fn render(theme: Theme, show_toolbar: bool) -> String {
    TEMPLATE
        .replace("{{THEME}}", theme.as_str())
        .replace("{{TOOLBAR_DISPLAY}}", if show_toolbar { "flex" } else { "none" })
}
