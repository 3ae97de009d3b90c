//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod products;
pub mod router;
pub mod state;
pub mod types;
pub mod users;

pub use middleware::{RequireIdentity, RequireUser};
pub use router::{create_product_router, create_user_router};
pub use state::{ProductAppState, UserAppState};
