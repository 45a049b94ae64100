//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_htmx::HxRedirect;
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    document_form::get_new_document_page,
    documents_page::{delete_estimate, delete_invoice, get_documents_page},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    selection::get_detail_panel,
    theme::toggle_theme,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::NEW_DOCUMENT_VIEW, get(get_new_document_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DOCUMENTS_VIEW, get(get_documents_page))
        .route(endpoints::DETAIL_PANEL, get(get_detail_panel))
        .route(endpoints::TOGGLE_THEME, post(toggle_theme))
        .route(endpoints::DELETE_INVOICE, get(delete_invoice))
        .route(endpoints::DELETE_ESTIMATE, get(delete_estimate))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the document form.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::NEW_DOCUMENT_VIEW)
}

/// Get a response that will redirect the client to the internal server error 500 page.
///
/// **Note**: This redirect is intended to be served as a response to a request initiated by HTMX.
/// Route handlers serving full pages should use `axum::response::Redirect` instead.
pub(crate) fn get_internal_server_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::{StatusCode, header::SET_COOKIE},
        routing::get,
    };
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        AppState, endpoints,
        test_utils::{spawn_upstream, unreachable_upstream},
    };

    use super::build_router;

    fn test_server(state: AppState) -> TestServer {
        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn offline_server() -> TestServer {
        test_server(AppState::with_upstream(unreachable_upstream(), "Etc/UTC"))
    }

    #[tokio::test]
    async fn root_redirects_to_document_form() {
        let server = offline_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::NEW_DOCUMENT_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = offline_server();

        let response = server.get("/does/not/exist").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn pages_render_when_upstream_is_down() {
        let server = offline_server();

        for page in [
            endpoints::NEW_DOCUMENT_VIEW,
            endpoints::DASHBOARD_VIEW,
            endpoints::DOCUMENTS_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn error_page_is_a_500() {
        let server = offline_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn theme_toggle_sets_cookie() {
        let server = offline_server();

        let response = server.post(endpoints::TOGGLE_THEME).await;

        response.assert_status_ok();
        let cookie = response.header(SET_COOKIE);
        assert!(cookie.to_str().unwrap().starts_with("theme=dark"));
        assert!(response.text().contains(r#"data-icon="sun""#));
    }

    #[tokio::test]
    async fn dark_theme_cookie_renders_dark_pages() {
        let server = offline_server();

        let response = server
            .get(endpoints::NEW_DOCUMENT_VIEW)
            .add_header("cookie", "theme=dark")
            .await;

        assert!(response.text().contains(r#"<html lang="en" class="dark">"#));
    }

    #[tokio::test]
    async fn detail_panel_route_renders_partial() {
        let upstream = spawn_upstream(Router::new().route(
            "/get_service/{id}",
            get(|| async {
                Json(json!({
                    "description": "Web Design",
                    "unit_price": 45.0,
                    "unit_type": "hour",
                }))
            }),
        ))
        .await;
        let server = test_server(AppState::with_upstream(upstream.client, "Etc/UTC"));

        let response = server
            .get("/panels/service")
            .add_query_param("id", "7")
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Web Design"));
    }
}
