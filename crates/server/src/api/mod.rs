pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod songs;

pub use routes::create_router;
