//! Live scrape path: transport, landing-page discovery, row
//! classification and the fan-out coordinator.

pub mod classify;
pub mod discovery;
pub mod pipeline;
pub mod transport;

pub use pipeline::run;
pub use transport::{HttpTransport, Transport};
