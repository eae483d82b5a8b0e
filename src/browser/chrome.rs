use crate::core::{BrowserConfig, ScriptDriver};
use crate::errors::{DialectError, Result};
use crate::types::ELEMENT_KEY;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Deserialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use tracing::debug;

/// Runs the body with `arguments`, keeping DOM elements in a page-side
/// registry so they can cross the JSON boundary as element references.
///
/// Reference ids are `<page token>:<slot>`. The token is minted per page, so
/// references from before a navigation, and references to nodes that have
/// left the document, fail with a stale element error instead of resolving.
/// Slots of disconnected nodes are cleared on every call.
const SCRIPT_ENVELOPE_START: &str = r#"
(function() {
    var KEY = '__ELEMENT_KEY__';
    var store = window.__browserDialectsElements;
    if (!store) {
        store = window.__browserDialectsElements = {
            page: Date.now().toString(36) + Math.random().toString(36).slice(2),
            elements: []
        };
    }
    for (var slot = 0; slot < store.elements.length; slot++) {
        if (store.elements[slot] && !store.elements[slot].isConnected) {
            store.elements[slot] = null;
        }
    }
    var revive = function(value) {
        if (Array.isArray(value)) {
            return value.map(revive);
        }
        if (value && typeof value === 'object' && typeof value[KEY] === 'string') {
            var id = value[KEY];
            var split = id.lastIndexOf(':');
            var element = null;
            if (split > 0 && id.slice(0, split) === store.page) {
                element = store.elements[parseInt(id.slice(split + 1), 10)];
            }
            if (!element || !element.isConnected) {
                throw new Error('stale element reference: ' + id);
            }
            return element;
        }
        return value;
    };
    var isListLike = function(value) {
        return Array.isArray(value) ||
            value instanceof NodeList ||
            value instanceof HTMLCollection ||
            (typeof window.jQuery === 'function' && value instanceof window.jQuery);
    };
    var wrap = function(value) {
        if (value === undefined) {
            return null;
        }
        if (value instanceof Element) {
            var index = store.elements.indexOf(value);
            if (index < 0) {
                store.elements.push(value);
                index = store.elements.length - 1;
            }
            var reference = {};
            reference[KEY] = store.page + ':' + index;
            return reference;
        }
        if (isListLike(value)) {
            return Array.prototype.map.call(value, wrap);
        }
        if (value && typeof value === 'object') {
            var copy = {};
            for (var key in value) {
                if (Object.prototype.hasOwnProperty.call(value, key)) {
                    copy[key] = wrap(value[key]);
                }
            }
            return copy;
        }
        return value;
    };
    try {
"#;

const SCRIPT_ENVELOPE_END: &str = r#"
        return JSON.stringify({ ok: wrap(result) });
    } catch (e) {
        return JSON.stringify({ error: String((e && e.message) || e) });
    }
})()
"#;

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: Option<Value>,
    error: Option<String>,
}

pub(crate) fn wrap_script(script: &str, args: &[Value]) -> Result<String> {
    let args = serde_json::to_string(args)?;
    Ok(format!(
        "{}        var args = revive({});\n        var result = (function() {{ {} }}).apply(window, args);{}",
        SCRIPT_ENVELOPE_START.replace("__ELEMENT_KEY__", ELEMENT_KEY),
        args,
        script,
        SCRIPT_ENVELOPE_END
    ))
}

pub(crate) fn unwrap_result(json: &str) -> Result<Value> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if let Some(error) = envelope.error {
        return Err(DialectError::JavaScriptFailed(error));
    }
    Ok(envelope.ok.unwrap_or(Value::Null))
}

/// Chrome driven through the DevTools protocol, one tab per driver.
pub struct ChromeDriver {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );

        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        if config.disable_images {
            args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        }

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| DialectError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| DialectError::LaunchFailed(e.to_string()))?;

        let tab = browser.new_tab().map_err(DialectError::from_any_error)?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| DialectError::NavigationFailed(e.to_string()))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| DialectError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }
}

#[async_trait]
impl ScriptDriver for ChromeDriver {
    async fn execute_script(&self, script: &str, args: &[Value]) -> Result<Value> {
        let expression = wrap_script(script, args)?;
        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(|e| DialectError::JavaScriptFailed(e.to_string()))?;

        match result.value {
            Some(Value::String(json)) => unwrap_result(&json),
            other => {
                debug!(value = ?other, "script envelope returned no JSON text");
                Err(DialectError::JavaScriptFailed(
                    "script did not produce a result envelope".to_string(),
                ))
            }
        }
    }
}
