//! Portal access: the one owner of the HTTP session.
//!
//! All requests for a run go through a single cookie-carrying client; the
//! server-issued CSRF token and CAPTCHA are single-use and tied to that
//! session, which is why nothing here is shared across concurrent workers.

mod client;
mod error;
mod traits;
mod types;

pub use client::PortalClient;
pub use error::PortalError;
pub use traits::PortalGateway;
pub use types::*;
