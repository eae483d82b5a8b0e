use crate::errors::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The single operation this crate needs from a browser automation driver.
///
/// `script` is a function body: inputs are read from `arguments[i]` and the
/// value is produced with `return`. DOM elements travel in both directions as
/// W3C element references (see [`crate::types::ElementRef`]).
#[async_trait]
pub trait ScriptDriver: Send + Sync {
    /// Execute a script with arguments and return its untyped result
    async fn execute_script(&self, script: &str, args: &[Value]) -> Result<Value>;
}

#[async_trait]
impl<D: ScriptDriver + ?Sized> ScriptDriver for std::sync::Arc<D> {
    async fn execute_script(&self, script: &str, args: &[Value]) -> Result<Value> {
        (**self).execute_script(script, args).await
    }
}
