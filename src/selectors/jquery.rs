use super::Dialect;
use crate::errors::{DialectError, Result};
use crate::library::{check_function_script, Library, Requirement};
use crate::utils::javascript::{quote_optional, quote_pair};
use crate::utils::quote;
use std::sync::Arc;

pub(crate) const DEFAULT_FUNCTION: &str = "jQuery";

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A jQuery query plus the traversal calls chained onto it.
///
/// Chain methods never run anything: each returns a new selector whose
/// expression is this one's with one more `.method(args)` appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JQuerySelector {
    query: String,
    function: String,
    context: Option<Arc<JQuerySelector>>,
    chain: String,
}

impl JQuerySelector {
    pub(crate) fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            function: DEFAULT_FUNCTION.to_string(),
            context: None,
            chain: String::new(),
        }
    }

    /// Uses another global for jQuery, e.g. `$` or a `noConflict` alias.
    ///
    /// The name must be a plain JavaScript identifier.
    pub fn with_function(&self, function: &str) -> Result<Self> {
        if !is_identifier(function) {
            return Err(DialectError::invalid_argument(format!(
                "'{}' is not a JavaScript identifier",
                function
            )));
        }
        Ok(Self {
            function: function.to_string(),
            ..self.clone()
        })
    }

    pub fn with_context(&self, context: JQuerySelector) -> Self {
        Self {
            context: Some(Arc::new(context)),
            ..self.clone()
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn context(&self) -> Option<&JQuerySelector> {
        self.context.as_deref()
    }

    /// Everything after the initial `jQuery(...)` call.
    pub fn chain(&self) -> &str {
        &self.chain
    }

    fn call(&self, method: &str, args: &str) -> Self {
        let mut next = self.clone();
        next.chain.push_str(&format!(".{}({})", method, args));
        next
    }

    pub fn add(&self, selector: &str) -> Self {
        self.call("add", &quote(selector))
    }

    pub fn add_back(&self, selector: Option<&str>) -> Self {
        self.call("addBack", &quote_optional(selector))
    }

    pub fn children(&self, selector: Option<&str>) -> Self {
        self.call("children", &quote_optional(selector))
    }

    pub fn closest(&self, selector: &str) -> Self {
        self.call("closest", &quote(selector))
    }

    pub fn contents(&self) -> Self {
        self.call("contents", "")
    }

    pub fn end(&self) -> Self {
        self.call("end", "")
    }

    pub fn eq(&self, index: i64) -> Self {
        self.call("eq", &index.to_string())
    }

    pub fn even(&self) -> Self {
        self.call("even", "")
    }

    pub fn filter(&self, selector: &str) -> Self {
        self.call("filter", &quote(selector))
    }

    pub fn find(&self, selector: &str) -> Self {
        self.call("find", &quote(selector))
    }

    pub fn first(&self) -> Self {
        self.call("first", "")
    }

    pub fn has(&self, selector: &str) -> Self {
        self.call("has", &quote(selector))
    }

    pub fn last(&self) -> Self {
        self.call("last", "")
    }

    pub fn next(&self, selector: Option<&str>) -> Self {
        self.call("next", &quote_optional(selector))
    }

    pub fn next_all(&self, selector: Option<&str>) -> Self {
        self.call("nextAll", &quote_optional(selector))
    }

    pub fn next_until(&self, selector: Option<&str>, filter: Option<&str>) -> Self {
        self.call("nextUntil", &quote_pair(selector, filter))
    }

    pub fn not(&self, selector: &str) -> Self {
        self.call("not", &quote(selector))
    }

    pub fn odd(&self) -> Self {
        self.call("odd", "")
    }

    pub fn offset_parent(&self) -> Self {
        self.call("offsetParent", "")
    }

    pub fn parent(&self, selector: Option<&str>) -> Self {
        self.call("parent", &quote_optional(selector))
    }

    pub fn parents(&self, selector: Option<&str>) -> Self {
        self.call("parents", &quote_optional(selector))
    }

    pub fn parents_until(&self, selector: Option<&str>, filter: Option<&str>) -> Self {
        self.call("parentsUntil", &quote_pair(selector, filter))
    }

    pub fn prev(&self, selector: Option<&str>) -> Self {
        self.call("prev", &quote_optional(selector))
    }

    pub fn prev_all(&self, selector: Option<&str>) -> Self {
        self.call("prevAll", &quote_optional(selector))
    }

    pub fn prev_until(&self, selector: Option<&str>, filter: Option<&str>) -> Self {
        self.call("prevUntil", &quote_pair(selector, filter))
    }

    pub fn siblings(&self, selector: Option<&str>) -> Self {
        self.call("siblings", &quote_optional(selector))
    }

    pub fn slice(&self, start: i64, end: Option<i64>) -> Self {
        let args = match end {
            Some(end) => format!("{}, {}", start, end),
            None => start.to_string(),
        };
        self.call("slice", &args)
    }
}

impl Dialect for JQuerySelector {
    fn query(&self) -> &str {
        &self.query
    }

    fn expression(&self) -> String {
        let context = self
            .context
            .as_ref()
            .map(|c| format!(", {}[0]", c.expression()))
            .unwrap_or_default();
        format!(
            "{}({}{}){}",
            self.function,
            quote(&self.query),
            context,
            self.chain
        )
    }

    fn lookup_script(&self) -> String {
        format!("return {}.get();", self.expression())
    }

    fn requirement(&self) -> Requirement {
        Requirement {
            name: self.function.clone(),
            check_script: check_function_script(&self.function),
            library: Some(Library::JQuery),
        }
    }

    fn scoped_to(&self, path: &str) -> Self {
        let context = match &self.context {
            Some(existing) => existing.scoped_to(path),
            None => Self {
                function: self.function.clone(),
                ..JQuerySelector::new(path)
            },
        };
        self.with_context(context)
    }
}
