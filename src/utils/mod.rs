pub mod javascript;
#[cfg(test)]
pub(crate) mod script_host;

pub use javascript::{quote, render_number, JavaScriptRunner, ScriptNumber};
