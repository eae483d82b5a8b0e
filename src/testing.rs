//! In-memory driver for exercising sessions without a browser.

use crate::browser::DialectSession;
use crate::core::{Config, ScriptDriver};
use crate::errors::Result;
use crate::types::ElementRef;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

type Responder = Box<dyn Fn(&str, &[Value]) -> Result<Value> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedScript {
    pub script: String,
    pub args: Vec<Value>,
}

/// Records every script it is asked to run and answers through a closure.
pub struct ScriptedDriver {
    responder: Responder,
    log: Mutex<Vec<ExecutedScript>>,
}

impl ScriptedDriver {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Answers every script with `value`.
    pub fn returning(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Reports every capability check as passing and hands the rest to `responder`.
    pub fn with_capabilities<F>(responder: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(move |script, args| {
            if script.starts_with("return typeof ") {
                Ok(Value::Bool(true))
            } else {
                responder(script, args)
            }
        })
    }

    fn entries(&self) -> MutexGuard<'_, Vec<ExecutedScript>> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn executed(&self) -> Vec<ExecutedScript> {
        self.entries().clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.script.clone()).collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.script.contains(needle))
            .count()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[async_trait]
impl ScriptDriver for ScriptedDriver {
    async fn execute_script(&self, script: &str, args: &[Value]) -> Result<Value> {
        self.entries().push(ExecutedScript {
            script: script.to_string(),
            args: args.to_vec(),
        });
        (self.responder)(script, args)
    }
}

pub struct TestHelper;

impl TestHelper {
    /// Session over a shared scripted driver, so tests can inspect the log.
    pub fn session(driver: ScriptedDriver) -> (Arc<ScriptedDriver>, DialectSession<ScriptedDriver>) {
        Self::session_with_config(driver, Config::default())
    }

    pub fn session_with_config(
        driver: ScriptedDriver,
        config: Config,
    ) -> (Arc<ScriptedDriver>, DialectSession<ScriptedDriver>) {
        let driver = Arc::new(driver);
        let session = DialectSession::from_arc(driver.clone(), config)
            .unwrap_or_else(|e| panic!("invalid test config: {}", e));
        (driver, session)
    }

    /// Raw script value for a list of elements.
    pub fn elements(ids: &[&str]) -> Value {
        Value::Array(ids.iter().map(|id| ElementRef::new(*id).to_value()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_driver_records_calls() {
        let driver = ScriptedDriver::returning(json!(1));
        let value = driver.execute_script("return 1;", &[json!("a")]).await.unwrap();
        assert_eq!(value, json!(1));
        assert_eq!(
            driver.executed(),
            vec![ExecutedScript {
                script: "return 1;".to_string(),
                args: vec![json!("a")],
            }]
        );
        driver.clear();
        assert!(driver.scripts().is_empty());
    }

    #[tokio::test]
    async fn test_capability_checks_pass() {
        let driver = ScriptedDriver::with_capabilities(|_, _| Ok(Value::Null));
        let check = driver
            .execute_script("return typeof window.jQuery === 'function';", &[])
            .await
            .unwrap();
        assert_eq!(check, json!(true));
        assert_eq!(driver.execute_script("return 2;", &[]).await.unwrap(), Value::Null);
    }
}
