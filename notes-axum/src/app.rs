use axum::{
    extract::Request,
    http::HeaderName,
    Router,
};
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A fully-routed application plus the standard HTTP layers.
#[derive(Clone)]
pub struct AxumApp {
    pub router: Router<()>,
}

impl AxumApp {
    /// Wrap `router` with request-id generation/propagation and request tracing.
    pub fn new(router: Router<()>) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        let router = router
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                let request_id = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

        Self { router }
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
