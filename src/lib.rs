//! jQuery, Sizzle and native CSS selector dialects for any browser driver
//! that can execute a script and hand back its result.
//!
//! ```ignore
//! use browser_dialects::{by, ChromeDriver, Config, DialectSession};
//!
//! let config = Config::default();
//! let driver = ChromeDriver::launch(&config.browser)?;
//! driver.navigate("https://example.com")?;
//! let session = DialectSession::new(driver, config)?;
//!
//! let items = session.find_elements(&by::jquery("ul > li")?.into()).await?;
//! let title = session.jquery(by::jquery("h1")?).text().await?;
//! session.jquery(by::jquery("p")?.first()).add_class("lead").await?;
//! ```

pub mod browser;
pub mod coercion;
pub mod core;
pub mod dom;
pub mod errors;
pub mod library;
pub mod selectors;
pub mod testing;
pub mod types;
pub mod utils;

pub use browser::{ChromeDriver, DialectSession, JQueryHelper};
pub use coercion::{CoercionChain, PropertyValue, ScriptResult, TargetKind, TypedResult};
pub use crate::core::{Config, ScriptDriver};
pub use dom::WebElement;
pub use errors::{DialectError, Result};
pub use library::{BootstrapOutcome, Library, LibrarySource};
pub use selectors::{by, Dialect, Selector};
pub use types::*;
