pub mod chrome;
pub mod jquery;
pub mod session;

pub use chrome::ChromeDriver;
pub use jquery::JQueryHelper;
pub use session::DialectSession;
