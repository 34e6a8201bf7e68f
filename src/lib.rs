//! Unofficial Pagalo Dashboard Client
//!
//! The Pagalo payment dashboard exposes no formal API; this crate drives the
//! same server-rendered pages and undocumented JSON endpoints a browser
//! session would. It maintains an authenticated cookie-based session,
//! scrapes the anti-forgery token from the login page, and funnels every
//! typed call through one generic dispatcher.
//!
//! # Architecture
//!
//! - [`session`] holds the core protocol handling: cookie persistence,
//!   token scraping, login, the request dispatcher, and the anti-fraud
//!   fingerprint collector.
//! - [`modules`] are thin CRUD-style wrappers per dashboard resource
//!   (clients, payments, payouts, products).
//! - [`types`] carries the request/response shapes and the Luhn-validated
//!   [`Card`] value object.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pagalo_dashboard_client::{Card, Credentials, DashboardClient, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = Credentials::new("merchant@example.gt", "secret");
//! let client = DashboardClient::login(credentials, Settings::default()).await?;
//!
//! let card = Card::new("4242424242424242", "ANA LUZ", "04/28", "123")?;
//! let receipt = client
//!     .payments()
//!     .process_payment(981, &card, "Monthly invoice", 125.50, "USD")
//!     .await?;
//! println!("receipt: {:?}", receipt);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod modules;
pub mod session;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use modules::NewClient;
pub use session::DashboardClient;
pub use types::{Card, Credentials, Payload, RequestSpec};
