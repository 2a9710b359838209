//! Ordered interceptor stacks applied to axum routers

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Request, State},
    middleware::{Next, from_fn_with_state},
    response::Response,
    routing::MethodRouter,
};

/// One step of the request pipeline.
///
/// An interceptor may act before calling `next`, after it, or both, and may
/// answer on its own without calling `next` at all.
#[async_trait]
pub trait Interceptor: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn intercept(&self, req: Request, next: Next) -> Response;
}

/// An ordered list of interceptors. The first one added sees the request first
/// and the response last.
#[derive(Clone, Default)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: impl Interceptor) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Wrap every request reaching `router`, including unmatched ones.
    pub fn wrap<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.interceptors.iter().rev().fold(router, |router, i| {
            router.layer(from_fn_with_state(i.clone(), run_interceptor))
        })
    }

    /// Wrap only the methods registered on `methods`. A request with another
    /// method gets axum's 405 and `Allow` header without entering the stack.
    pub fn wrap_methods<S>(&self, methods: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.interceptors.iter().rev().fold(methods, |methods, i| {
            methods.route_layer(from_fn_with_state(i.clone(), run_interceptor))
        })
    }
}

async fn run_interceptor(
    State(interceptor): State<Arc<dyn Interceptor>>,
    req: Request,
    next: Next,
) -> Response {
    interceptor.intercept(req, next).await
}
