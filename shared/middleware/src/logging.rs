//! Request logging middleware.
//!
//! Emits one structured log line per completed request: request id, method,
//! path, response status and latency. Bodies and headers are never logged,
//! so credentials and bearer tokens cannot leak into log output.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    time::Instant,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Paths skipped entirely (health probes and the like).
    pub exclude_paths: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            exclude_paths: vec!["/health".to_string(), "/favicon.ico".to_string()],
        }
    }
}

#[derive(Clone, Default)]
pub struct RequestLogging {
    config: Rc<LoggingConfig>,
}

impl RequestLogging {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggingMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingMiddleware {
            service: Rc::new(service),
            config: Rc::clone(&self.config),
        }))
    }
}

pub struct RequestLoggingMiddleware<S> {
    service: Rc<S>,
    config: Rc<LoggingConfig>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = Rc::clone(&self.config);

        Box::pin(async move {
            if config.exclude_paths.iter().any(|p| req.path() == p) {
                return service.call(req).await;
            }

            let request_id = Uuid::new_v4();
            let method = req.method().to_string();
            let path = req.path().to_string();
            let started = Instant::now();

            let res = service.call(req).await?;

            let status = res.status();
            let elapsed_ms = started.elapsed().as_millis() as u64;
            if status.is_server_error() {
                tracing::error!(
                    target: "http",
                    %request_id, %method, %path,
                    status = status.as_u16(),
                    elapsed_ms,
                    "request failed"
                );
            } else {
                tracing::info!(
                    target: "http",
                    %request_id, %method, %path,
                    status = status.as_u16(),
                    elapsed_ms,
                    "request completed"
                );
            }

            Ok(res)
        })
    }
}
