//! Invoice Dashboard is the presentation layer for a small invoice and
//! estimate management application.
//!
//! The server renders HTML pages for the document form, the document tables
//! and the statistics dashboard. All invoice data lives in an upstream
//! service which is queried over HTTP; when the upstream is unavailable the
//! pages degrade to sample data or hidden panels instead of failing.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod chart;
mod dashboard;
mod document_form;
mod documents_page;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod selection;
mod table;
mod theme;
mod timezone;
mod upstream;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use upstream::UpstreamClient;

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The upstream service could not be reached or answered with an error
    /// status.
    ///
    /// Callers should pass in the URL that was requested and the original
    /// error as a string.
    #[error("request to {0} failed: {1}")]
    UpstreamRequest(String, String),

    /// The upstream service answered, but the body was not the JSON we expected.
    #[error("could not decode the response from {0}: {1}")]
    InvalidResponse(String, String),

    /// A statistics record was decoded but its series do not line up with
    /// its categories.
    #[error("invalid {metric} statistics: {reason}")]
    InvalidStats {
        /// The metric whose record was rejected, e.g. "invoice".
        metric: &'static str,
        /// Why the record was rejected.
        reason: String,
    },

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|url| url.to_string())
            .unwrap_or_else(|| "<unknown url>".to_owned());

        if error.is_decode() {
            Error::InvalidResponse(url, error.to_string())
        } else if error.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            Error::NotFound
        } else {
            Error::UpstreamRequest(url, error.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
