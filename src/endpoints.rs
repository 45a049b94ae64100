//! The URIs served by the presentation server.
//!
//! For endpoints that take a parameter, e.g., '/panels/{kind}', use [format_endpoint].

/// The root route which redirects to the document form.
pub const ROOT: &str = "/";
/// The page for creating a new invoice or estimate.
pub const NEW_DOCUMENT_VIEW: &str = "/new";
/// The page with the statistics charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing invoices or estimates as a sortable table.
pub const DOCUMENTS_VIEW: &str = "/documents";
/// The partial for a client or service details panel.
pub const DETAIL_PANEL: &str = "/panels/{kind}";
/// The route that flips between the light and dark theme.
pub const TOGGLE_THEME: &str = "/theme/toggle";
/// The route for deleting an invoice.
pub const DELETE_INVOICE: &str = "/delete_invoice/{number}";
/// The route for deleting an estimate.
pub const DELETE_ESTIMATE: &str = "/delete_estimate/{number}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
/// The upstream route for a client's details.
pub const UPSTREAM_CLIENT: &str = "/get_client/{id}";
/// The upstream route for a service's details.
pub const UPSTREAM_SERVICE: &str = "/get_service/{id}";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/panels/{kind}', '{kind}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

/// Replace the parameter in `endpoint_path` with `segment`, percent-encoded.
///
/// Returns `None` if `segment` is empty, contains a '/' or is a dot segment,
/// since it would not address a single resource.
pub fn format_endpoint_segment(endpoint_path: &str, segment: &str) -> Option<String> {
    if segment.is_empty() || segment.contains('/') || segment == "." || segment == ".." {
        return None;
    }

    Some(format_endpoint(endpoint_path, &urlencoding::encode(segment)))
}
