#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod upstream;

pub(crate) use html::{
    assert_valid_html, must_select, parse_html_document, parse_html_fragment, select_texts,
};
pub(crate) use http::{assert_hx_redirect, assert_status_ok, get_header};
pub(crate) use upstream::{spawn_upstream, unreachable_upstream};
