use std::sync::Arc;
use tonic::{metadata::MetadataValue, service::Interceptor, Request, Status};
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";
pub const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";

/// Correlation id of the current call, stored as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Assigns `x-correlation-id` when absent and, if configured, requires a
/// matching `x-internal-api-key` on every call
#[derive(Clone, Default)]
pub struct RequestInterceptor {
    internal_api_key: Option<Arc<str>>,
}

impl RequestInterceptor {
    pub fn new(internal_api_key: Option<String>) -> Self {
        Self {
            internal_api_key: internal_api_key.map(Arc::from),
        }
    }
}

impl Interceptor for RequestInterceptor {
    fn call(&mut self, mut req: Request<()>) -> Result<Request<()>, Status> {
        if let Some(existing) = req.metadata().get(CORRELATION_HEADER) {
            if let Ok(val) = existing.to_str() {
                let stored = CorrelationId(val.to_string());
                req.extensions_mut().insert(stored);
            }
        } else {
            let correlation_id = Uuid::new_v4().to_string();
            let value = MetadataValue::try_from(correlation_id.as_str())
                .map_err(|_| Status::internal("failed to set correlation id"))?;
            req.metadata_mut().insert(CORRELATION_HEADER, value);
            req.extensions_mut().insert(CorrelationId(correlation_id));
        }

        if let Some(expected_key) = self.internal_api_key.as_deref() {
            let provided = req
                .metadata()
                .get(INTERNAL_API_KEY_HEADER)
                .and_then(|val| val.to_str().ok())
                .unwrap_or_default();
            if provided != expected_key {
                return Err(Status::unauthenticated("invalid internal api key"));
            }
        }

        Ok(req)
    }
}
