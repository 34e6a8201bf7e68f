//! Resource modules
//!
//! CRUD-style wrappers over the dispatcher, one per dashboard resource.
//! None of these perform network I/O themselves; everything funnels through
//! [`crate::session::DashboardClient::send_request`].

pub mod clients;
pub mod payments;
pub mod payouts;
pub mod products;

pub use clients::{Clients, NewClient};
pub use payments::Payments;
pub use payouts::Payouts;
pub use products::Products;
