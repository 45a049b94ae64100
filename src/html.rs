//! The page layout, shared styles and formatting helpers for the HTML views.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::{endpoints, theme::Theme};

pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

pub const BUTTON_PRIMARY_STYLE: &str = "lift w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col px-6 py-8 \
    mx-auto lg:py-0 max-w-xl w-full text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_RADIO_INPUT_STYLE: &str = "peer sr-only";
pub const FORM_RADIO_LABEL_STYLE: &str = "lift block rounded border border-gray-300 \
    dark:border-gray-600 bg-white dark:bg-gray-700 px-3 py-2 text-sm font-medium \
    text-gray-700 dark:text-white cursor-pointer transition \
    hover:border-gray-400 hover:bg-gray-50 hover:text-gray-900 \
    hover:dark:border-gray-500 hover:dark:bg-gray-600 \
    peer-checked:border-blue-600 peer-checked:bg-blue-50 peer-checked:text-blue-700 \
    peer-checked:shadow-sm peer-checked:dark:border-blue-500 \
    peer-checked:dark:bg-blue-600/20 peer-checked:dark:text-blue-200";

pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

pub const CARD_STYLE: &str = "lift rounded-lg border border-gray-200 bg-white p-4 \
    shadow-sm dark:border-gray-700 dark:bg-gray-800";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// Hover lift and press feedback for interactive elements.
const INTERACTION_STYLES: &str = r#"
    .lift {
        transition: transform 150ms ease, box-shadow 150ms ease;
    }

    .lift:hover {
        transform: translateY(-2px);
        box-shadow: 0 4px 12px rgb(0 0 0 / 0.08);
    }

    .lift:active {
        transform: translateY(0) scale(0.98);
    }

    th[data-sort].asc a::after { content: " ▲"; }
    th[data-sort].desc a::after { content: " ▼"; }

    #indicator.htmx-indicator {
        display: none;
    }

    #indicator.htmx-request .htmx-indicator {
        display: inline;
    }

    .chart-card {
        border-color: var(--border-color);
        background-color: var(--background-color);
    }

    .echarts-tooltip {
        z-index: 30 !important;
    }
"#;

/// Applies a `themeChanged` event to the page root.
const THEME_SCRIPT: &str = r#"
    document.addEventListener('DOMContentLoaded', function() {
        document.body.addEventListener('themeChanged', (event) => {
            const root = document.documentElement;
            root.classList.toggle('dark', event.detail.theme === 'dark');
            for (const [name, value] of Object.entries(event.detail.palette)) {
                root.style.setProperty(name, value);
            }
        });
    });
"#;

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    /// CSS rules for the page.
    Style(PreEscaped<String>),
}

/// The script element that loads ECharts.
pub fn echarts_script() -> HeadElement {
    HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())
}

pub fn base(title: &str, theme: Theme, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class=[theme.is_dark().then_some("dark")]
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Invoices" }
                link href=(format!("{}/main.css", endpoints::STATIC)) rel="stylesheet";

                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.js" {}

                style { (PreEscaped(theme.palette().css_rule())) }
                style { (PreEscaped(INTERACTION_STYLES)) }
                script { (PreEscaped(THEME_SCRIPT)) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href=(endpoints::ROOT)
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, Theme::default(), &[], &content)
}

/// Format `number` as an amount of money with two decimal places and
/// thousands separators, prefixed with the currency `symbol`, e.g. "€1,200.50".
pub fn format_currency(number: f64, symbol: &str) -> String {
    let prefix = if number < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    if number == 0.0 {
        // numfmt renders zero as "0"
        return format!("{prefix}0.00");
    }

    let formatted = match Formatter::currency(&prefix) {
        Ok(formatter) => formatter
            .precision(Precision::Decimals(2))
            .fmt_string(number.abs()),
        Err(error) => {
            tracing::warn!("Could not format currency with symbol {symbol:?}: {error:?}");
            return format!("{prefix}{:.2}", number.abs());
        }
    };

    pad_decimals(formatted)
}

/// numfmt drops trailing zeros, so "12.30" comes out as "12.3" and "12.00" as "12.0".
fn pad_decimals(mut formatted: String) -> String {
    match formatted.rfind('.') {
        Some(index) => {
            for _ in formatted.len() - index - 1..2 {
                formatted.push('0');
            }
        }
        None => formatted.push_str(".00"),
    }

    formatted
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}
