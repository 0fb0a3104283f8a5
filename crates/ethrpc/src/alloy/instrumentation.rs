//! Transport layer that traces each JSON-RPC request and how long the node
//! took to answer it. Batches are logged as a single request listing all of
//! their methods.
use {
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
};

pub(crate) struct InstrumentationLayer;

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedProvider { inner }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InstrumentedProvider<S> {
    inner: S,
}

impl<S> Service<RequestPacket> for InstrumentedProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let methods = methods(&req);
        tracing::trace!(?methods, "executing request");

        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            match &res {
                Ok(_) => tracing::trace!(?methods, elapsed = ?start.elapsed(), "request completed"),
                Err(err) => tracing::debug!(?methods, ?err, "request failed"),
            }
            res
        })
    }
}

fn methods(req: &RequestPacket) -> Vec<String> {
    match req {
        RequestPacket::Single(request) => vec![request.method().to_owned()],
        RequestPacket::Batch(requests) => requests
            .iter()
            .map(|request| request.method().to_owned())
            .collect(),
    }
}
