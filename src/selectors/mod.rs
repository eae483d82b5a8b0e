//! Query dialects and the scripts they render to.
//!
//! Every dialect renders an *expression* (the matched collection), a *lookup
//! script* (a function body returning the matches as an array) and a
//! *requirement* (the capability check, plus the library to inject when it
//! fails). Selectors are immutable values; every derived selector is a new one.

pub mod by;
pub mod css;
pub mod jquery;
pub mod path;
pub mod sizzle;

use crate::library::Requirement;
use std::fmt;

pub use css::{CssSelector, IdSelector, QuerySelector};
pub use jquery::JQuerySelector;
pub use path::DOM_PATH_SCRIPT;
pub use sizzle::SizzleSelector;

/// Contract shared by every dialect.
pub trait Dialect: Clone {
    /// Raw query text as given by the caller.
    fn query(&self) -> &str;

    /// Expression evaluating to the matched collection.
    fn expression(&self) -> String;

    /// Function body returning the matches as a plain array.
    fn lookup_script(&self) -> String;

    fn requirement(&self) -> Requirement;

    /// Same query, restricted to descendants of the element at `path`.
    fn scoped_to(&self, path: &str) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Css(CssSelector),
    Id(IdSelector),
    JQuery(JQuerySelector),
    Sizzle(SizzleSelector),
    Query(QuerySelector),
}

impl Selector {
    pub fn dialect_name(&self) -> &'static str {
        match self {
            Selector::Css(_) => "css",
            Selector::Id(_) => "id",
            Selector::JQuery(_) => "jquery",
            Selector::Sizzle(_) => "sizzle",
            Selector::Query(_) => "query",
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Selector::Css(s) => s.query(),
            Selector::Id(s) => s.query(),
            Selector::JQuery(s) => s.query(),
            Selector::Sizzle(s) => s.query(),
            Selector::Query(s) => s.query(),
        }
    }

    pub fn expression(&self) -> String {
        match self {
            Selector::Css(s) => s.expression(),
            Selector::Id(s) => s.expression(),
            Selector::JQuery(s) => s.expression(),
            Selector::Sizzle(s) => s.expression(),
            Selector::Query(s) => s.expression(),
        }
    }

    pub fn lookup_script(&self) -> String {
        match self {
            Selector::Css(s) => s.lookup_script(),
            Selector::Id(s) => s.lookup_script(),
            Selector::JQuery(s) => s.lookup_script(),
            Selector::Sizzle(s) => s.lookup_script(),
            Selector::Query(s) => s.lookup_script(),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Selector::Css(s) => s.requirement(),
            Selector::Id(s) => s.requirement(),
            Selector::JQuery(s) => s.requirement(),
            Selector::Sizzle(s) => s.requirement(),
            Selector::Query(s) => s.requirement(),
        }
    }

    pub fn scoped_to(&self, path: &str) -> Selector {
        match self {
            Selector::Css(s) => Selector::Css(s.scoped_to(path)),
            Selector::Id(s) => Selector::Id(s.scoped_to(path)),
            Selector::JQuery(s) => Selector::JQuery(s.scoped_to(path)),
            Selector::Sizzle(s) => Selector::Sizzle(s.scoped_to(path)),
            Selector::Query(s) => Selector::Query(s.scoped_to(path)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

impl From<CssSelector> for Selector {
    fn from(selector: CssSelector) -> Self {
        Selector::Css(selector)
    }
}

impl From<IdSelector> for Selector {
    fn from(selector: IdSelector) -> Self {
        Selector::Id(selector)
    }
}

impl From<JQuerySelector> for Selector {
    fn from(selector: JQuerySelector) -> Self {
        Selector::JQuery(selector)
    }
}

impl From<SizzleSelector> for Selector {
    fn from(selector: SizzleSelector) -> Self {
        Selector::Sizzle(selector)
    }
}

impl From<QuerySelector> for Selector {
    fn from(selector: QuerySelector) -> Self {
        Selector::Query(selector)
    }
}
