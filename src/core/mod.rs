pub mod config;
pub mod driver;

pub use config::{BootstrapConfig, BrowserConfig, Config, LibraryConfig, Viewport};
pub use driver::ScriptDriver;
