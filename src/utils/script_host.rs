//! In-process JavaScript for running page scripts in unit tests.

use boa_engine::{Context, Source};
use serde_json::Value;

/// A minimal element tree: `document`, `html` and `body`, plus `element`,
/// `append` and `detach` for building and changing the rest of the page.
pub(crate) const DOM_FIXTURE: &str = r#"
    var document = { nodeType: 9 };
    function element(tag, id) {
        return { nodeType: 1, tagName: tag.toUpperCase(), id: id || '', parentNode: null, children: [] };
    }
    function append(parent, child) {
        child.parentNode = parent;
        parent.children.push(child);
        return child;
    }
    function detach(child) {
        var siblings = child.parentNode.children;
        siblings.splice(siblings.indexOf(child), 1);
        child.parentNode = null;
    }
    var html = element('html');
    html.parentNode = document;
    html.contains = function(node) {
        for (; node; node = node.parentNode) {
            if (node === html) {
                return true;
            }
        }
        return false;
    };
    document.documentElement = html;
    var body = append(html, element('body'));
"#;

pub(crate) struct ScriptHost {
    context: Context,
}

impl ScriptHost {
    pub(crate) fn new(prelude: &str) -> Self {
        let mut host = Self {
            context: Context::default(),
        };
        host.eval(prelude);
        host
    }

    /// Evaluates `source` and returns its completion value as text.
    pub(crate) fn eval(&mut self, source: &str) -> String {
        let value = self
            .context
            .eval(Source::from_bytes(source.as_bytes()))
            .unwrap_or_else(|e| panic!("script failed: {}", e));
        value
            .to_string(&mut self.context)
            .unwrap_or_else(|e| panic!("result is not printable: {}", e))
            .to_std_string_escaped()
    }

    /// Runs a function body with `arguments` set to `args` (a JavaScript
    /// argument list) and returns its result as JSON.
    pub(crate) fn call(&mut self, body: &str, args: &str) -> Value {
        let text = self.eval(&format!(
            "JSON.stringify((function() {{ {} }}).apply(null, [{}]))",
            body, args
        ));
        serde_json::from_str(&text).unwrap_or_else(|e| panic!("{:?} is not JSON: {}", text, e))
    }
}
