use crate::selectors::Selector;
use crate::types::ElementRef;
use serde_json::Value;

/// An element located through a selector.
///
/// Besides the driver handle it remembers the selector and its position in
/// the match list, so a fresh handle can be looked up when the old one goes
/// stale.
#[derive(Debug, Clone, PartialEq)]
pub struct WebElement {
    reference: ElementRef,
    selector: Selector,
    index: usize,
}

impl WebElement {
    pub fn new(reference: ElementRef, selector: Selector, index: usize) -> Self {
        Self {
            reference,
            selector,
            index,
        }
    }

    pub fn reference(&self) -> &ElementRef {
        &self.reference
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// 0-based position among the selector's matches.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Script argument form of the handle.
    pub fn to_value(&self) -> Value {
        self.reference.to_value()
    }

    /// Function body returning `[element]` at this position, or `[]` once it is gone.
    pub fn lookup_script(&self) -> String {
        format!(
            "var matches = (function() {{ {} }})(); return matches.length > {} ? [matches[{}]] : [];",
            self.selector.lookup_script(),
            self.index,
            self.index
        )
    }
}
