/// gRPC server implementation for sso-service
///
/// Implements all RPCs from auth.proto:
/// - Register, Login
/// - IsAdmin
/// - CheckAndRefreshTokens
///
/// Handlers validate request shape, call the orchestrator and convert
/// `IdentityError` into a `Status`. Each call runs inside a span carrying
/// the RPC name and the interceptor's correlation id.
use super::interceptor::CorrelationId;
use crate::error::IdentityError;
use crate::metrics;
use crate::services::AuthService;
use crate::validators;
use tonic::{Request, Response, Status};
use tracing::{info_span, Instrument, Span};

// Import generated protobuf types
pub mod sso {
    pub mod auth {
        pub mod v1 {
            tonic::include_proto!("sso.auth.v1");
        }
    }
}

use sso::auth::v1::auth_server::Auth;
use sso::auth::v1::*;

#[derive(Clone)]
pub struct AuthGrpcService {
    auth: AuthService,
}

type RpcResult<T> = std::result::Result<Response<T>, Status>;

impl AuthGrpcService {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    async fn handle_register(&self, req: RegisterRequest) -> RpcResult<RegisterResponse> {
        metrics::inc_register_request();

        validators::require_email(&req.email)?;
        validators::require("password", &req.password)?;

        let user_id = self.auth.register(&req.email, &req.password).await?;

        Ok(Response::new(RegisterResponse {
            user_id: user_id.to_string(),
        }))
    }

    async fn handle_login(&self, req: LoginRequest) -> RpcResult<LoginResponse> {
        metrics::inc_login_request();

        let validated = validators::require_email(&req.email)
            .and_then(|_| validators::require("password", &req.password))
            .and_then(|_| validators::require("app_id", &req.app_id));
        if let Err(err) = validated {
            metrics::inc_login_failure();
            return Err(err.into());
        }

        let pair = self
            .auth
            .login(&req.email, &req.password, &req.app_id)
            .await
            .map_err(|err| {
                metrics::inc_login_failure();
                Status::from(err)
            })?;

        Ok(Response::new(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }))
    }

    async fn handle_is_admin(&self, req: IsAdminRequest) -> RpcResult<IsAdminResponse> {
        let user_id = validators::parse_user_id(&req.user_id)?;

        let is_admin = self.auth.is_admin(user_id).await?;

        Ok(Response::new(IsAdminResponse { is_admin }))
    }

    async fn handle_check_tokens(&self, req: TokenCheckRequest) -> RpcResult<TokenCheckResponse> {
        metrics::inc_token_check();

        validators::require("access_token", &req.access_token)?;
        validators::require("refresh_token", &req.refresh_token)?;

        let check = match self
            .auth
            .check_and_refresh_tokens(&req.access_token, &req.refresh_token)
            .await
        {
            Ok(check) => check,
            Err(IdentityError::AccessDenied) => {
                metrics::inc_token_denial();
                return Err(IdentityError::AccessDenied.into());
            }
            Err(err) => return Err(err.into()),
        };

        let rotated = check.is_rotated();
        if rotated {
            metrics::inc_token_rotation();
        }
        let pair = check.into_pair();

        Ok(Response::new(TokenCheckResponse {
            is_valid: true,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            rotated,
        }))
    }
}

/// Correlation id set by the interceptor, or "-" when the call bypassed it
pub(crate) fn correlation_id<T>(request: &Request<T>) -> &str {
    request
        .extensions()
        .get::<CorrelationId>()
        .map(CorrelationId::as_str)
        .unwrap_or("-")
}

fn rpc_span<T>(rpc: &'static str, request: &Request<T>) -> Span {
    info_span!("grpc_request", rpc, correlation_id = %correlation_id(request))
}

#[tonic::async_trait]
impl Auth for AuthGrpcService {
    async fn register(&self, request: Request<RegisterRequest>) -> RpcResult<RegisterResponse> {
        let span = rpc_span("Register", &request);
        self.handle_register(request.into_inner())
            .instrument(span)
            .await
    }

    async fn login(&self, request: Request<LoginRequest>) -> RpcResult<LoginResponse> {
        let span = rpc_span("Login", &request);
        self.handle_login(request.into_inner())
            .instrument(span)
            .await
    }

    async fn is_admin(&self, request: Request<IsAdminRequest>) -> RpcResult<IsAdminResponse> {
        let span = rpc_span("IsAdmin", &request);
        self.handle_is_admin(request.into_inner())
            .instrument(span)
            .await
    }

    async fn check_and_refresh_tokens(
        &self,
        request: Request<TokenCheckRequest>,
    ) -> RpcResult<TokenCheckResponse> {
        let span = rpc_span("CheckAndRefreshTokens", &request);
        self.handle_check_tokens(request.into_inner())
            .instrument(span)
            .await
    }
}
