//! Test helpers: an in-process upstream provider.

use actix_web::dev::Service;
use actix_web::{App, HttpServer, web};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Actix server on an ephemeral local port standing in for a third-party API.
///
/// Must be started from inside an actix system (`#[actix_rt::test]`).
pub struct MockProvider {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn start<F>(configure: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
    {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let server = HttpServer::new(move || {
            let counter = counter.clone();
            App::new()
                .wrap_fn(move |req, srv| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    srv.call(req)
                })
                .configure(configure.clone())
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind mock provider");

        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());

        Self { addr, hits }
    }

    /// Base URL without trailing slash.
    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base(), path)
    }

    /// Number of requests the provider has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
