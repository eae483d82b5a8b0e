use super::Dialect;
use crate::library::{Library, Requirement};
use crate::utils::quote;
use std::sync::Arc;

/// Sizzle query, `Sizzle('query')` or `Sizzle('query', context[0])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizzleSelector {
    query: String,
    context: Option<Arc<SizzleSelector>>,
}

impl SizzleSelector {
    pub(crate) fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
        }
    }

    pub fn with_context(&self, context: SizzleSelector) -> Self {
        Self {
            query: self.query.clone(),
            context: Some(Arc::new(context)),
        }
    }

    pub fn context(&self) -> Option<&SizzleSelector> {
        self.context.as_deref()
    }
}

impl Dialect for SizzleSelector {
    fn query(&self) -> &str {
        &self.query
    }

    fn expression(&self) -> String {
        match &self.context {
            Some(context) => format!("Sizzle({}, {}[0])", quote(&self.query), context.expression()),
            None => format!("Sizzle({})", quote(&self.query)),
        }
    }

    fn lookup_script(&self) -> String {
        format!("return {};", self.expression())
    }

    fn requirement(&self) -> Requirement {
        Requirement {
            name: Library::Sizzle.name().to_string(),
            check_script: Library::Sizzle.check_script(),
            library: Some(Library::Sizzle),
        }
    }

    fn scoped_to(&self, path: &str) -> Self {
        let context = match &self.context {
            Some(existing) => existing.scoped_to(path),
            None => SizzleSelector::new(path),
        };
        self.with_context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression() {
        let selector = SizzleSelector::new("div > p");
        assert_eq!(selector.expression(), "Sizzle('div > p')");
        assert_eq!(selector.lookup_script(), "return Sizzle('div > p');");
        assert_eq!(selector.requirement().library, Some(Library::Sizzle));
    }

    #[test]
    fn test_scoped_expression() {
        let scoped = SizzleSelector::new("span").scoped_to("body > div:eq(0)");
        assert_eq!(scoped.expression(), "Sizzle('span', Sizzle('body > div:eq(0)')[0])");
    }
}
