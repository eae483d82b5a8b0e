use super::path::to_native_css;
use super::Dialect;
use crate::library::Requirement;
use crate::utils::quote;
use std::sync::Arc;

const NATIVE_CHECK: &str = "return typeof document.querySelectorAll === 'function';";
const DOCUMENT_ROOT: &str = "document";

fn native_requirement() -> Requirement {
    Requirement {
        name: "querySelectorAll".to_string(),
        check_script: NATIVE_CHECK.to_string(),
        library: None,
    }
}

/// `root.querySelectorAll(query)`, or the same call on the first match of
/// `context` with an empty result when the context matches nothing.
fn native_expression(root: &str, query_literal: &str, context: Option<String>) -> String {
    match context {
        None => format!("{}.querySelectorAll({})", root, query_literal),
        Some(context) => format!(
            "(function() {{ var scope = {}; return scope.length === 0 ? [] : scope[0].querySelectorAll({}); }})()",
            context, query_literal
        ),
    }
}

fn native_lookup(expression: &str) -> String {
    format!("return Array.prototype.slice.call({});", expression)
}

/// Native CSS selector evaluated against the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSelector {
    query: String,
    context: Option<Arc<CssSelector>>,
}

impl CssSelector {
    pub(crate) fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
        }
    }

    pub fn context(&self) -> Option<&CssSelector> {
        self.context.as_deref()
    }

    pub fn with_context(&self, context: CssSelector) -> Self {
        Self {
            query: self.query.clone(),
            context: Some(Arc::new(context)),
        }
    }
}

impl Dialect for CssSelector {
    fn query(&self) -> &str {
        &self.query
    }

    fn expression(&self) -> String {
        native_expression(
            DOCUMENT_ROOT,
            &quote(&self.query),
            self.context.as_ref().map(|c| c.expression()),
        )
    }

    fn lookup_script(&self) -> String {
        native_lookup(&self.expression())
    }

    fn requirement(&self) -> Requirement {
        native_requirement()
    }

    fn scoped_to(&self, path: &str) -> Self {
        let context = match &self.context {
            Some(existing) => existing.scoped_to(path),
            None => CssSelector::new(to_native_css(path)),
        };
        self.with_context(context)
    }
}

/// Lookup by element id. Scoped lookups use a native CSS path as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSelector {
    id: String,
    context: Option<Arc<CssSelector>>,
}

impl IdSelector {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: None,
        }
    }

    pub fn context(&self) -> Option<&CssSelector> {
        self.context.as_deref()
    }
}

impl Dialect for IdSelector {
    fn query(&self) -> &str {
        &self.id
    }

    fn expression(&self) -> String {
        let literal = format!("'#' + CSS.escape({})", quote(&self.id));
        native_expression(
            DOCUMENT_ROOT,
            &literal,
            self.context.as_ref().map(|c| c.expression()),
        )
    }

    fn lookup_script(&self) -> String {
        native_lookup(&self.expression())
    }

    fn requirement(&self) -> Requirement {
        native_requirement()
    }

    fn scoped_to(&self, path: &str) -> Self {
        let context = match &self.context {
            Some(existing) => existing.scoped_to(path),
            None => CssSelector::new(to_native_css(path)),
        };
        Self {
            id: self.id.clone(),
            context: Some(Arc::new(context)),
        }
    }
}

/// `querySelectorAll` against a caller-chosen root expression (`document` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySelector {
    query: String,
    root: String,
    context: Option<Arc<QuerySelector>>,
}

impl QuerySelector {
    pub(crate) fn new(query: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            root: root.into(),
            context: None,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn context(&self) -> Option<&QuerySelector> {
        self.context.as_deref()
    }
}

impl Dialect for QuerySelector {
    fn query(&self) -> &str {
        &self.query
    }

    fn expression(&self) -> String {
        native_expression(
            &self.root,
            &quote(&self.query),
            self.context.as_ref().map(|c| c.expression()),
        )
    }

    fn lookup_script(&self) -> String {
        native_lookup(&self.expression())
    }

    fn requirement(&self) -> Requirement {
        native_requirement()
    }

    fn scoped_to(&self, path: &str) -> Self {
        let context = match &self.context {
            Some(existing) => existing.scoped_to(path),
            None => QuerySelector::new(to_native_css(path), self.root.clone()),
        };
        Self {
            query: self.query.clone(),
            root: self.root.clone(),
            context: Some(Arc::new(context)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_expression() {
        let selector = CssSelector::new("div.item");
        assert_eq!(selector.expression(), "document.querySelectorAll('div.item')");
        assert_eq!(
            selector.lookup_script(),
            "return Array.prototype.slice.call(document.querySelectorAll('div.item'));"
        );
        assert!(selector.requirement().library.is_none());
    }

    #[test]
    fn test_css_scoped_is_guarded() {
        let scoped = CssSelector::new("span").scoped_to("body > div:eq(1)");
        assert_eq!(
            scoped.expression(),
            "(function() { var scope = document.querySelectorAll('body > div:nth-of-type(2)'); \
             return scope.length === 0 ? [] : scope[0].querySelectorAll('span'); })()"
        );
        assert_eq!(scoped.context().unwrap().query(), "body > div:nth-of-type(2)");
    }

    #[test]
    fn test_scoped_under_escaped_id() {
        let scoped = CssSelector::new("span").scoped_to(r"body > div#\31 a\.b > p:eq(0)");
        assert_eq!(
            scoped.context().unwrap().query(),
            r"body > div#\31 a\.b > p:nth-of-type(1)"
        );
        assert!(scoped
            .expression()
            .contains(r"document.querySelectorAll('body > div#\\31 a\\.b > p:nth-of-type(1)')"));
    }

    #[test]
    fn test_scoping_reaches_outermost_context() {
        let inner = CssSelector::new("li").with_context(CssSelector::new("ul"));
        let scoped = inner.scoped_to("body > div#main");
        let ul = scoped.context().unwrap();
        assert_eq!(ul.query(), "ul");
        assert_eq!(ul.context().unwrap().query(), "body > div#main");
    }

    #[test]
    fn test_id_expression_escapes() {
        let selector = IdSelector::new("my.id");
        assert_eq!(
            selector.expression(),
            "document.querySelectorAll('#' + CSS.escape('my.id'))"
        );
        let scoped = selector.scoped_to("body > form");
        assert_eq!(scoped.context().unwrap().query(), "body > form");
        assert!(scoped.expression().contains("scope[0].querySelectorAll('#' + CSS.escape('my.id'))"));
    }

    #[test]
    fn test_query_selector_root() {
        let selector = QuerySelector::new("p", "document.body");
        assert_eq!(selector.expression(), "document.body.querySelectorAll('p')");
        let scoped = selector.scoped_to("body > div");
        assert_eq!(scoped.context().unwrap().root(), "document.body");
    }
}
