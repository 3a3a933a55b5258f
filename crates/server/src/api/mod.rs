pub mod catalog;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod search;

pub use routes::create_router;
