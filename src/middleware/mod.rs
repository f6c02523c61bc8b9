pub mod auth;
pub mod response;
pub mod route_gate;

pub use auth::{session_auth_middleware, SessionUser};
pub use response::{ApiResponse, ApiResult};
pub use route_gate::{cookie_value, route_gate_middleware};
