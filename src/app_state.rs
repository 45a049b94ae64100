//! Implements a struct that holds the state of the presentation server.

use std::{sync::Arc, time::Duration};

use crate::{Error, UpstreamClient, get_local_offset, selection::DetailSequencer};

/// The state of the presentation server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the upstream invoice service.
    pub upstream: UpstreamClient,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,

    /// Tickets for in-flight detail panel requests.
    pub sequencer: Arc<DetailSequencer>,
}

impl AppState {
    /// Create a new [AppState] for the upstream service at `upstream_url`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Madrid".
    /// Upstream requests that take longer than `upstream_timeout` fail.
    ///
    /// # Errors
    /// Returns an error if the timezone is not known or the HTTP client cannot be built.
    pub fn new(
        upstream_url: &str,
        local_timezone: &str,
        upstream_timeout: Duration,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self::with_upstream(
            UpstreamClient::new(upstream_url, upstream_timeout)?,
            local_timezone,
        ))
    }

    pub(crate) fn with_upstream(upstream: UpstreamClient, local_timezone: &str) -> Self {
        Self {
            upstream,
            local_timezone: local_timezone.to_owned(),
            sequencer: Arc::new(DetailSequencer::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::Error;

    use super::AppState;

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new("http://localhost:5000", "Not/A_Zone", Duration::from_secs(1));

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezoneError("Not/A_Zone".to_owned()))
        );
    }

    #[test]
    fn creates_state_for_valid_settings() {
        let state =
            AppState::new("http://localhost:5000/", "Europe/Madrid", Duration::from_secs(1))
                .unwrap();

        assert_eq!(state.upstream.base_url(), "http://localhost:5000");
        assert_eq!(state.local_timezone, "Europe/Madrid");
    }
}
