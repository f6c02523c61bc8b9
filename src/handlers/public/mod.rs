// handlers/public/mod.rs - Public handlers (no session required)
//
// Route Prefix: /api (root info, health)
// Middleware: route gate only

pub mod system;

pub use system::{api_root, health};
