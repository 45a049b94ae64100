//! An in-process stand-in for the upstream invoice service.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Router, extract::Request, middleware::Next};
use tokio::net::TcpListener;

use crate::UpstreamClient;

pub(crate) struct MockUpstream {
    /// A client pointed at the mock service.
    pub client: UpstreamClient,
    requests: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// The number of requests the mock service has received so far.
    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Serve `router` on an ephemeral local port and return a client for it.
pub(crate) async fn spawn_upstream(router: Router) -> MockUpstream {
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = requests.clone();

    let router = router.layer(axum::middleware::from_fn(
        move |request: Request, next: Next| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                next.run(request).await
            }
        },
    ));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind mock upstream");
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockUpstream {
        client: UpstreamClient::new(&format!("http://{address}"), Duration::from_secs(2)).unwrap(),
        requests,
    }
}

/// A client for an address where nothing is listening.
pub(crate) fn unreachable_upstream() -> UpstreamClient {
    UpstreamClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap()
}
