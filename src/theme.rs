//! Light/dark theme state, its colour palette, and the toggle endpoint.
//!
//! The selected theme is persisted in the `theme` cookie. Every request builds
//! a [ThemeContext] from the cookie and hands it to the renderers that need
//! colours, rather than having them read the cookie themselves.

use std::collections::BTreeMap;

use axum::response::{IntoResponse, Response};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::{
    chart::{Metric, theme_patch},
    endpoints,
};

/// The name of the cookie that stores the selected theme.
pub(crate) const THEME_COOKIE: &str = "theme";

/// The event name sent in the `HX-Trigger` header when the theme changes.
pub(crate) const THEME_CHANGED_EVENT: &str = "themeChanged";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored cookie value. Anything other than "dark" is the light theme.
    pub(crate) fn from_cookie_value(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub(crate) fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub(crate) fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub(crate) fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT_PALETTE,
            Theme::Dark => &DARK_PALETTE,
        }
    }
}

/// The colour tokens for a theme.
///
/// The same values are emitted as CSS custom properties on the page root and
/// used in chart options, so charts follow the active theme.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    pub primary: &'static str,
    pub accent: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub danger: &'static str,
    pub info: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub background: &'static str,
    pub tooltip_background: &'static str,
    pub tooltip_text: &'static str,
}

pub(crate) const LIGHT_PALETTE: Palette = Palette {
    primary: "#4f46e5",
    accent: "#0ea5e9",
    success: "#16a34a",
    warning: "#f59e0b",
    danger: "#dc2626",
    info: "#6366f1",
    text_primary: "#111827",
    text_secondary: "#6b7280",
    border: "#e5e7eb",
    background: "#ffffff",
    tooltip_background: "#ffffff",
    tooltip_text: "#111827",
};

pub(crate) const DARK_PALETTE: Palette = Palette {
    primary: "#818cf8",
    accent: "#38bdf8",
    success: "#4ade80",
    warning: "#fbbf24",
    danger: "#f87171",
    info: "#a5b4fc",
    text_primary: "#f9fafb",
    text_secondary: "#9ca3af",
    border: "#374151",
    background: "#111827",
    tooltip_background: "#1f2937",
    tooltip_text: "#f9fafb",
};

impl Palette {
    /// The palette as CSS custom property name/value pairs.
    pub(crate) fn css_variables(&self) -> [(&'static str, &'static str); 10] {
        [
            ("--primary-color", self.primary),
            ("--accent-color", self.accent),
            ("--success-color", self.success),
            ("--warning-color", self.warning),
            ("--danger-color", self.danger),
            ("--info-color", self.info),
            ("--text-primary", self.text_primary),
            ("--text-secondary", self.text_secondary),
            ("--border-color", self.border),
            ("--background-color", self.background),
        ]
    }

    /// A `:root` CSS rule declaring [Palette::css_variables].
    pub(crate) fn css_rule(&self) -> String {
        let declarations = self
            .css_variables()
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");

        format!(":root {{ {declarations} }}")
    }
}

/// The theme for the current request.
///
/// Renderers read the theme with [ThemeContext::get]. Code that reacts to a
/// theme change within a request holds a receiver from
/// [ThemeContext::subscribe]. Changes reach the browser through the
/// [THEME_CHANGED_EVENT] event instead.
#[derive(Debug)]
pub(crate) struct ThemeContext {
    sender: watch::Sender<Theme>,
}

impl ThemeContext {
    pub(crate) fn new(theme: Theme) -> Self {
        let (sender, _) = watch::channel(theme);

        Self { sender }
    }

    pub(crate) fn from_cookies(jar: &CookieJar) -> Self {
        let stored = jar.get(THEME_COOKIE).map(|cookie| cookie.value());

        Self::new(Theme::from_cookie_value(stored))
    }

    pub(crate) fn get(&self) -> Theme {
        *self.sender.borrow()
    }

    /// Set the theme and notify subscribers, returning the previous theme.
    pub(crate) fn set(&self, theme: Theme) -> Theme {
        self.sender.send_replace(theme)
    }

    /// A receiver that sees every later [ThemeContext::set].
    #[allow(dead_code)]
    pub(crate) fn subscribe(&self) -> watch::Receiver<Theme> {
        self.sender.subscribe()
    }
}

fn theme_cookie(theme: Theme) -> Cookie<'static> {
    Cookie::build((THEME_COOKIE, theme.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build()
}

/// The payload of the [THEME_CHANGED_EVENT] event.
///
/// The page script swaps the CSS custom properties and merges each chart's
/// patch into the mounted chart.
#[derive(Debug, Serialize)]
struct ThemeChangedEvent {
    theme: &'static str,
    palette: BTreeMap<&'static str, &'static str>,
    patches: BTreeMap<&'static str, Value>,
}

impl ThemeChangedEvent {
    fn new(theme: Theme) -> Self {
        let palette = theme.palette();

        Self {
            theme: theme.as_str(),
            palette: palette.css_variables().into_iter().collect(),
            patches: Metric::ALL
                .into_iter()
                .map(|metric| (metric.chart_id(), theme_patch(metric, theme)))
                .collect(),
        }
    }
}

/// Flip between the light and dark theme.
///
/// Responds with the new toggle button, stores the theme in the cookie, and
/// triggers [THEME_CHANGED_EVENT] so charts on the page are patched in place.
pub(crate) async fn toggle_theme(jar: CookieJar) -> Response {
    let context = ThemeContext::from_cookies(&jar);
    let previous = context.set(context.get().toggled());
    let theme = context.get();
    tracing::debug!(
        "Switched from the {} theme to the {} theme",
        previous.as_str(),
        theme.as_str()
    );

    let trigger = json!({ THEME_CHANGED_EVENT: ThemeChangedEvent::new(theme) }).to_string();

    (
        jar.add(theme_cookie(theme)),
        [("hx-trigger", trigger)],
        theme_toggle_button(theme),
    )
        .into_response()
}

/// The button that toggles the theme, showing a sun in dark mode and a moon
/// in light mode.
pub(crate) fn theme_toggle_button(theme: Theme) -> Markup {
    let (icon, label) = if theme.is_dark() {
        ("sun", "Switch to light mode")
    } else {
        ("moon", "Switch to dark mode")
    };

    html!(
        button
            id="theme-toggle"
            type="button"
            title=(label)
            aria-label=(label)
            hx-post=(endpoints::TOGGLE_THEME)
            hx-swap="outerHTML"
            class="p-2 rounded-full text-gray-700 dark:text-gray-200
                hover:bg-gray-100 dark:hover:bg-gray-800 transition-transform
                duration-500 active:rotate-180"
        {
            span data-icon=(icon) aria-hidden="true"
            {
                @if theme.is_dark() { "☀" } @else { "☾" }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{CookieJar, cookie::Cookie};
    use serde_json::Value;

    use crate::test_utils::{get_header, parse_html_fragment};

    use super::{DARK_PALETTE, LIGHT_PALETTE, Theme, ThemeContext, toggle_theme};

    #[test]
    fn unknown_cookie_values_fall_back_to_light() {
        assert_eq!(Theme::from_cookie_value(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_cookie_value(Some("light")), Theme::Light);
        assert_eq!(Theme::from_cookie_value(Some("purple")), Theme::Light);
        assert_eq!(Theme::from_cookie_value(None), Theme::Light);
    }

    #[test]
    fn context_reads_theme_from_cookie() {
        let jar = CookieJar::new().add(Cookie::new("theme", "dark"));

        let context = ThemeContext::from_cookies(&jar);

        assert_eq!(context.get(), Theme::Dark);
        assert_eq!(context.get().palette(), &DARK_PALETTE);
    }

    #[test]
    fn set_notifies_subscribers_and_returns_previous_theme() {
        let context = ThemeContext::new(Theme::Light);
        let mut receiver = context.subscribe();
        assert!(!receiver.has_changed().unwrap());

        let previous = context.set(Theme::Dark);

        assert_eq!(previous, Theme::Light);
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), Theme::Dark);
        assert_eq!(context.get().palette(), &DARK_PALETTE);
    }

    #[test]
    fn css_rule_declares_every_variable() {
        let rule = LIGHT_PALETTE.css_rule();

        assert!(rule.starts_with(":root {"));
        for (name, value) in LIGHT_PALETTE.css_variables() {
            assert!(
                rule.contains(&format!("{name}: {value};")),
                "missing {name} in {rule}"
            );
        }
    }

    #[tokio::test]
    async fn toggle_switches_light_to_dark() {
        let jar = CookieJar::new().add(Cookie::new("theme", "light"));

        let response = toggle_theme(jar).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = get_header(&response, SET_COOKIE.as_str());
        assert!(cookie.starts_with("theme=dark"), "got cookie {cookie}");

        let trigger: Value = serde_json::from_str(&get_header(&response, "hx-trigger")).unwrap();
        let event = &trigger["themeChanged"];
        assert_eq!(event["theme"], "dark");
        assert_eq!(event["palette"]["--border-color"], DARK_PALETTE.border);
        assert_eq!(
            event["patches"]["invoice-chart"]["grid"]["borderColor"],
            DARK_PALETTE.border
        );
        assert_eq!(
            event["patches"]["revenue-chart"]["series"][0]["itemStyle"]["color"],
            DARK_PALETTE.background
        );

        let html = parse_html_fragment(response).await;
        let icon = html
            .select(&scraper::Selector::parse("#theme-toggle span[data-icon]").unwrap())
            .next()
            .expect("toggle button should have an icon");
        assert_eq!(icon.value().attr("data-icon"), Some("sun"));
    }

    #[tokio::test]
    async fn toggle_without_cookie_starts_from_light() {
        let response = toggle_theme(CookieJar::new()).await;

        let cookie = get_header(&response, SET_COOKIE.as_str());
        assert!(cookie.starts_with("theme=dark"), "got cookie {cookie}");
    }

    #[tokio::test]
    async fn toggle_switches_dark_to_light() {
        let jar = CookieJar::new().add(Cookie::new("theme", "dark"));

        let response = toggle_theme(jar).await;

        let cookie = get_header(&response, SET_COOKIE.as_str());
        assert!(cookie.starts_with("theme=light"), "got cookie {cookie}");
        let html = parse_html_fragment(response).await;
        let icon = html
            .select(&scraper::Selector::parse("#theme-toggle span[data-icon]").unwrap())
            .next()
            .unwrap();
        assert_eq!(icon.value().attr("data-icon"), Some("moon"));
    }
}
