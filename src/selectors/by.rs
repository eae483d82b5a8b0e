//! One constructor per dialect. Empty queries are rejected here, before any
//! script can be rendered or run.

use super::{CssSelector, IdSelector, JQuerySelector, QuerySelector, SizzleSelector};
use crate::errors::{require_non_empty, Result};

pub fn css(selector: &str) -> Result<CssSelector> {
    require_non_empty(selector, "css selector")?;
    Ok(CssSelector::new(selector))
}

pub fn id(id: &str) -> Result<IdSelector> {
    require_non_empty(id, "element id")?;
    Ok(IdSelector::new(id))
}

pub fn jquery(selector: &str) -> Result<JQuerySelector> {
    require_non_empty(selector, "jQuery selector")?;
    Ok(JQuerySelector::new(selector))
}

pub fn sizzle(selector: &str) -> Result<SizzleSelector> {
    require_non_empty(selector, "Sizzle selector")?;
    Ok(SizzleSelector::new(selector))
}

pub fn query_selector(selector: &str) -> Result<QuerySelector> {
    query_selector_within(selector, "document")
}

/// `root` is a script expression evaluating to a document or element.
pub fn query_selector_within(selector: &str, root: &str) -> Result<QuerySelector> {
    require_non_empty(selector, "query selector")?;
    require_non_empty(root, "query root")?;
    Ok(QuerySelector::new(selector, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DialectError;
    use crate::selectors::Dialect;

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(css(""), Err(DialectError::InvalidArgument(_))));
        assert!(matches!(jquery("   "), Err(DialectError::InvalidArgument(_))));
        assert!(sizzle("").is_err());
        assert!(id("").is_err());
        assert!(query_selector("").is_err());
        assert!(query_selector_within("p", "").is_err());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(jquery("div").unwrap().expression(), "jQuery('div')");
        assert_eq!(sizzle("div").unwrap().expression(), "Sizzle('div')");
        assert_eq!(
            query_selector("div").unwrap().expression(),
            "document.querySelectorAll('div')"
        );
        assert_eq!(
            query_selector_within("div", "document.body").unwrap().expression(),
            "document.body.querySelectorAll('div')"
        );
    }
}
