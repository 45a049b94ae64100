//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{
    endpoints,
    theme::{Theme, theme_toggle_button},
};

/// The URL of the invoice table.
pub const INVOICES_LINK: &str = "/documents?doc_type=invoice";
/// The URL of the estimate table.
pub const ESTIMATES_LINK: &str = "/documents?doc_type=estimate";

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    theme: Theme,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_link`, then that link will be
    /// marked as active and displayed differently in the HTML.
    /// The theme toggle shows the icon for `theme`.
    pub fn new(active_link: &str, theme: Theme) -> NavBar<'_> {
        let links = [
            (endpoints::NEW_DOCUMENT_VIEW, "New Document"),
            (INVOICES_LINK, "Invoices"),
            (ESTIMATES_LINK, "Estimates"),
            (endpoints::DASHBOARD_VIEW, "Dashboard"),
        ]
        .into_iter()
        .map(|(url, title)| Link {
            url,
            title,
            is_current: active_link == url,
        })
        .collect();

        NavBar { links, theme }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Invoices"
                        }
                    }

                    div class="flex items-center gap-6"
                    {
                        ul
                            class="font-medium flex flex-row space-x-4 lg:space-x-8
                            rtl:space-x-reverse"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }

                        (theme_toggle_button(self.theme))
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use std::collections::HashMap;

    use crate::{
        endpoints,
        navigation::{ESTIMATES_LINK, INVOICES_LINK, NavBar},
        test_utils::must_select,
        theme::Theme,
    };

    #[test]
    fn set_active_endpoint() {
        let mut cases = HashMap::new();
        cases.insert(endpoints::NEW_DOCUMENT_VIEW, true);
        cases.insert(INVOICES_LINK, true);
        cases.insert(ESTIMATES_LINK, true);
        cases.insert(endpoints::DASHBOARD_VIEW, true);

        cases.insert(endpoints::ROOT, false);
        cases.insert(endpoints::DOCUMENTS_VIEW, false);
        cases.insert(endpoints::INTERNAL_ERROR_VIEW, false);
        cases.insert(endpoints::TOGGLE_THEME, false);

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint, Theme::Light);

            assert_link_active(nav_bar, endpoint, should_be_active);
        }
    }

    #[test]
    fn includes_theme_toggle_for_current_theme() {
        let markup = NavBar::new(endpoints::DASHBOARD_VIEW, Theme::Dark).into_html();

        let html = scraper::Html::parse_fragment(&markup.into_string());

        let icon = must_select(&html, "nav #theme-toggle span[data-icon]");
        assert_eq!(icon.value().attr("data-icon"), Some("sun"));
    }

    #[track_caller]
    fn assert_link_active(nav_bar: NavBar<'_>, endpoint: &str, should_be_active: bool) {
        let get_active_string = |is_active: bool| -> &str {
            if is_active {
                "active (true)"
            } else {
                "inactive (false)"
            }
        };

        for link in nav_bar.links {
            if link.url == endpoint {
                assert_eq!(
                    link.is_current,
                    should_be_active,
                    "Link for current page should be {} but got {}",
                    get_active_string(should_be_active),
                    get_active_string(link.is_current),
                )
            } else {
                assert!(
                    !link.is_current,
                    "Link for inactive page should {} but got {}",
                    get_active_string(false),
                    get_active_string(link.is_current)
                )
            }
        }
    }
}
