use crate::core::ScriptDriver;
use crate::errors::{DialectError, Result};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

const INJECT_SCRIPT_TAG: &str = r#"
    var script = document.createElement('script');
    script.type = 'text/javascript';
    script.src = arguments[0];
    (document.head || document.documentElement).appendChild(script);
    return true;
"#;

/// Renders `value` as a single-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Quotes an optional argument; `None` and empty strings render as nothing.
pub(crate) fn quote_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => quote(v),
        _ => String::new(),
    }
}

/// Argument list for the two-argument "until" forms. A trailing empty argument
/// is dropped; a lone filter keeps its position behind `undefined`.
pub(crate) fn quote_pair(first: Option<&str>, second: Option<&str>) -> String {
    let first = first.filter(|v| !v.is_empty());
    let second = second.filter(|v| !v.is_empty());
    match (first, second) {
        (None, None) => String::new(),
        (Some(a), None) => quote(a),
        (Some(a), Some(b)) => format!("{}, {}", quote(a), quote(b)),
        (None, Some(b)) => format!("undefined, {}", quote(b)),
    }
}

/// Numeric primitives accepted by the numeric setters.
pub trait ScriptNumber: Copy {
    /// Decimal literal for this value; fails for NaN and infinities.
    fn to_literal(self) -> Result<String>;
}

macro_rules! integer_number {
    ($($t:ty),*) => {
        $(impl ScriptNumber for $t {
            fn to_literal(self) -> Result<String> {
                Ok(self.to_string())
            }
        })*
    };
}

integer_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn float_literal(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(DialectError::invalid_argument(format!(
            "numeric argument must be finite, got {}",
            value
        )));
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(format!("{}", value))
}

impl ScriptNumber for f64 {
    fn to_literal(self) -> Result<String> {
        float_literal(self)
    }
}

impl ScriptNumber for f32 {
    // Through the shortest decimal form, so 0.1f32 stays 0.1
    fn to_literal(self) -> Result<String> {
        float_literal(self.to_string().parse().unwrap_or(self as f64))
    }
}

/// Single decimal representation shared by every numeric argument:
/// `50`, `50.0` and `50u8` all render as `50`.
pub fn render_number<N: ScriptNumber>(value: N) -> Result<String> {
    value.to_literal()
}

pub struct JavaScriptRunner;

impl JavaScriptRunner {
    pub async fn execute<D: ScriptDriver + ?Sized>(
        driver: &D,
        script: &str,
        args: &[Value],
    ) -> Result<Value> {
        if script.trim().is_empty() {
            return Err(DialectError::invalid_argument("script must not be empty"));
        }
        debug!(script = script, args = args.len(), "executing script");
        driver.execute_script(script, args).await
    }

    /// Evaluates a boolean check script.
    pub async fn check<D: ScriptDriver + ?Sized>(driver: &D, condition: &str) -> Result<bool> {
        let result = Self::execute(driver, condition, &[]).await?;
        Ok(result.as_bool() == Some(true))
    }

    /// Polls `condition` until it returns `true` or `timeout` elapses.
    /// The condition is always evaluated at least once.
    pub async fn wait_for_condition<D: ScriptDriver + ?Sized>(
        driver: &D,
        condition: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<bool> {
        let start_time = Instant::now();

        loop {
            if Self::check(driver, condition).await? {
                return Ok(true);
            }
            if start_time.elapsed() >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Appends a `<script src=uri>` tag to the page.
    pub async fn inject_script_tag<D: ScriptDriver + ?Sized>(driver: &D, uri: &str) -> Result<()> {
        Self::execute(driver, INJECT_SCRIPT_TAG, &[Value::String(uri.to_string())]).await?;
        Ok(())
    }
}
