// HTTP layer: routing, query validation and the scrape-or-snapshot
// dispatch for the five statistics domains.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
