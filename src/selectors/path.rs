//! DOM path of a located element, used to scope child queries to it.

use regex::Regex;
use std::sync::OnceLock;

/// Walks `parentNode` from `arguments[0]` up to (not including) `<html>`.
///
/// Each step renders as `tag#id` when the node has an id, `tag:eq(k)` when the
/// parent holds other children with the same tag (`k` counts the same-tag
/// siblings before it), and plain `tag` otherwise. Steps join with ` > `.
/// Ids are escaped as CSS identifiers, so the path is a valid selector for
/// jQuery, Sizzle and (after [`to_native_css`]) `querySelectorAll`.
///
/// Returns `null` when the node is missing or no longer attached to the
/// document, and `""` only for `<html>` itself.
pub const DOM_PATH_SCRIPT: &str = r#"
    var node = arguments[0];
    var root = document.documentElement;
    if (!node || node.nodeType !== 1 || !root || !root.contains(node)) {
        return null;
    }
    var escapeId = function(value) {
        var out = '';
        for (var i = 0; i < value.length; i++) {
            var code = value.charCodeAt(i);
            var ch = value.charAt(i);
            var digit = code >= 0x30 && code <= 0x39;
            if (code === 0) {
                out += '\uFFFD';
            } else if ((code >= 0x1 && code <= 0x1f) || code === 0x7f ||
                    (i === 0 && digit) ||
                    (i === 1 && digit && value.charCodeAt(0) === 0x2d)) {
                out += '\\' + code.toString(16) + ' ';
            } else if (i === 0 && code === 0x2d && value.length === 1) {
                out += '\\' + ch;
            } else if (code >= 0x80 || code === 0x2d || code === 0x5f || digit ||
                    (code >= 0x41 && code <= 0x5a) || (code >= 0x61 && code <= 0x7a)) {
                out += ch;
            } else {
                out += '\\' + ch;
            }
        }
        return out;
    };
    var path = [];
    while (node !== root) {
        var tag = node.tagName.toLowerCase();
        var segment = tag;
        if (node.id) {
            segment = tag + '#' + escapeId(node.id);
        } else {
            var siblings = node.parentNode.children;
            var sameTag = 0;
            var before = 0;
            for (var i = 0; i < siblings.length; i++) {
                if (siblings[i].tagName === node.tagName) {
                    if (siblings[i] === node) {
                        before = sameTag;
                    }
                    sameTag++;
                }
            }
            if (sameTag > 1) {
                segment = tag + ':eq(' + before + ')';
            }
        }
        path.unshift(segment);
        node = node.parentNode;
    }
    return path.join(' > ');
"#;

fn eq_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":eq\((\d+)\)").expect("static pattern compiles"))
}

/// Rewrites jQuery positional steps (`:eq(k)`) into native CSS (`:nth-of-type(k+1)`).
pub fn to_native_css(path: &str) -> String {
    eq_pattern()
        .replace_all(path, |caps: &regex::Captures| {
            let index: u64 = caps[1].parse().unwrap_or(0);
            format!(":nth-of-type({})", index + 1)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::script_host::{ScriptHost, DOM_FIXTURE};
    use serde_json::{json, Value};

    fn path_of(page: &str, target: &str) -> Value {
        let mut host = ScriptHost::new(DOM_FIXTURE);
        host.eval(page);
        host.call(DOM_PATH_SCRIPT, target)
    }

    const SIBLINGS: &str = r#"
        var first = append(body, element('div'));
        var para = append(body, element('p'));
        var second = append(body, element('div'));
        var span = append(second, element('span'));
        var named = append(second, element('span', 'id1'));
        var leaf = append(named, element('em'));
    "#;

    #[test]
    fn test_positions_count_same_tag_siblings() {
        assert_eq!(path_of(SIBLINGS, "first"), json!("body > div:eq(0)"));
        assert_eq!(path_of(SIBLINGS, "second"), json!("body > div:eq(1)"));
        assert_eq!(path_of(SIBLINGS, "para"), json!("body > p"));
    }

    #[test]
    fn test_id_takes_precedence_over_position() {
        assert_eq!(path_of(SIBLINGS, "named"), json!("body > div:eq(1) > span#id1"));
        assert_eq!(path_of(SIBLINGS, "leaf"), json!("body > div:eq(1) > span#id1 > em"));
        assert_eq!(path_of(SIBLINGS, "span"), json!("body > div:eq(1) > span:eq(0)"));
    }

    #[test]
    fn test_html_is_excluded() {
        assert_eq!(path_of("", "html"), json!(""));
        assert_eq!(path_of("", "body"), json!("body"));
    }

    #[test]
    fn test_detached_nodes_have_no_path() {
        let page = r#"
            var gone = append(body, element('div'));
            var inside = append(gone, element('span'));
            detach(gone);
        "#;
        assert_eq!(path_of(page, "gone"), Value::Null);
        assert_eq!(path_of(page, "inside"), Value::Null);
        assert_eq!(path_of(page, "undefined"), Value::Null);
        assert_eq!(path_of(page, "{}"), Value::Null);
    }

    #[test]
    fn test_ids_are_escaped() {
        let page = r#"
            var digit = append(body, element('div', '1a.b'));
            var spaced = append(body, element('div', 'a b:c'));
            var dash = append(body, element('div', '-'));
        "#;
        assert_eq!(path_of(page, "digit"), json!(r"body > div#\31 a\.b"));
        assert_eq!(path_of(page, "spaced"), json!(r"body > div#a\ b\:c"));
        assert_eq!(path_of(page, "dash"), json!(r"body > div#\-"));
    }

    #[test]
    fn test_native_css_translation() {
        assert_eq!(
            to_native_css("body > div:eq(0) > ul > li:eq(3)"),
            "body > div:nth-of-type(1) > ul > li:nth-of-type(4)"
        );
        assert_eq!(to_native_css("body > div#id1"), "body > div#id1");
    }

    #[test]
    fn test_native_css_leaves_escaped_ids_alone() {
        assert_eq!(
            to_native_css(r"body > div#x\:eq\(1\) > p:eq(1)"),
            r"body > div#x\:eq\(1\) > p:nth-of-type(2)"
        );
    }
}
