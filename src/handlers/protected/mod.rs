// handlers/protected/mod.rs - Protected handlers (validated session required)
//
// Route Prefix: /api/users, /api/assets, /api/summary
// Middleware: route gate + session_auth_middleware, which injects SessionUser.
// Asset and summary handlers only ever touch the session user's rows.

pub mod assets;
pub mod summary;
pub mod users;

pub use assets::{create_asset, delete_asset, get_asset, list_assets, update_asset};
pub use summary::portfolio_summary;
pub use users::{create_user, current_user, delete_user, get_user, list_users, update_user};
