/// gRPC layer for sso-service
///
/// Exports:
/// - AuthGrpcService: `sso.auth.v1.Auth` implementation
/// - RequestInterceptor: correlation id + internal API key check
/// - sso: Generated protobuf types from auth.proto
pub mod interceptor;
pub mod server;

pub use interceptor::{CorrelationId, RequestInterceptor};
pub use server::sso;
pub use server::AuthGrpcService;
