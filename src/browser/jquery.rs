use crate::browser::session::DialectSession;
use crate::coercion::{validate_property_kind, PropertyValue, ScriptResult, TargetKind, TypedResult};
use crate::core::ScriptDriver;
use crate::dom::WebElement;
use crate::errors::{require_non_empty, Result};
use crate::selectors::{Dialect, JQuerySelector, Selector};
use crate::types::{FormField, Position};
use crate::utils::{quote, render_number, ScriptNumber};
use serde_json::{Map, Value};

/// Reads and writes through jQuery accessors on a selector chain.
///
/// Every call bootstraps jQuery if needed, runs exactly one accessor script
/// and, for reads, coerces the result. Writers return the helper so calls can
/// be sequenced: a write has finished in the page before the next call starts.
pub struct JQueryHelper<'a, D: ScriptDriver> {
    session: &'a DialectSession<D>,
    selector: JQuerySelector,
}

impl<'a, D: ScriptDriver> std::fmt::Debug for JQueryHelper<'a, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JQueryHelper")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl<'a, D: ScriptDriver> JQueryHelper<'a, D> {
    pub(crate) fn new(session: &'a DialectSession<D>, selector: JQuerySelector) -> Self {
        Self { session, selector }
    }

    pub fn selector(&self) -> &JQuerySelector {
        &self.selector
    }

    /// Helper over a chain derived from this one, e.g. `helper.chain(|s| s.children(None))`.
    pub fn chain(&self, derive: impl FnOnce(&JQuerySelector) -> JQuerySelector) -> Self {
        Self::new(self.session, derive(&self.selector))
    }

    async fn ensure(&self) -> Result<()> {
        let selector = Selector::JQuery(self.selector.clone());
        self.session.ensure(&selector).await?;
        Ok(())
    }

    async fn read_raw(&self, accessor: &str) -> Result<Value> {
        self.ensure().await?;
        let script = format!("return {}.{};", self.selector.expression(), accessor);
        self.session.execute_raw(&script, &[]).await
    }

    async fn read<T: ScriptResult>(&self, accessor: &str) -> Result<Option<T>> {
        let raw = self.read_raw(accessor).await?;
        self.session.coercion().parse(&raw)
    }

    async fn read_as(&self, accessor: &str, kind: TargetKind) -> Result<TypedResult> {
        let raw = self.read_raw(accessor).await?;
        self.session.coercion().coerce(&raw, kind)
    }

    async fn write(&self, mutator: &str) -> Result<&Self> {
        self.ensure().await?;
        let script = format!("{}.{};", self.selector.expression(), mutator);
        self.session.execute_raw(&script, &[]).await?;
        Ok(self)
    }

    async fn set_number<N: ScriptNumber>(&self, method: &str, value: N) -> Result<&Self> {
        let value = render_number(value)?;
        self.write(&format!("{}({})", method, value)).await
    }

    // Reads

    pub async fn elements(&self) -> Result<Vec<WebElement>> {
        self.session
            .find_elements(&Selector::JQuery(self.selector.clone()))
            .await
    }

    pub async fn element(&self) -> Result<WebElement> {
        self.session
            .find_element(&Selector::JQuery(self.selector.clone()))
            .await
    }

    pub async fn text(&self) -> Result<Option<String>> {
        self.read("text()").await
    }

    pub async fn html(&self) -> Result<Option<String>> {
        self.read("html()").await
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        require_non_empty(name, "attribute name")?;
        self.read(&format!("attr({})", quote(name))).await
    }

    pub async fn property<T: PropertyValue>(&self, name: &str) -> Result<Option<T>> {
        require_non_empty(name, "property name")?;
        self.read(&format!("prop({})", quote(name))).await
    }

    /// Property read with the result type chosen at runtime.
    pub async fn property_as(&self, name: &str, kind: TargetKind) -> Result<TypedResult> {
        validate_property_kind(kind)?;
        require_non_empty(name, "property name")?;
        self.read_as(&format!("prop({})", quote(name)), kind).await
    }

    pub async fn data<T: PropertyValue>(&self, key: &str) -> Result<Option<T>> {
        require_non_empty(key, "data key")?;
        self.read(&format!("data({})", quote(key))).await
    }

    pub async fn data_as(&self, key: &str, kind: TargetKind) -> Result<TypedResult> {
        validate_property_kind(kind)?;
        require_non_empty(key, "data key")?;
        self.read_as(&format!("data({})", quote(key)), kind).await
    }

    pub async fn val(&self) -> Result<Option<String>> {
        self.read("val()").await
    }

    pub async fn css(&self, property: &str) -> Result<Option<String>> {
        require_non_empty(property, "css property")?;
        self.read(&format!("css({})", quote(property))).await
    }

    pub async fn width(&self) -> Result<Option<i64>> {
        self.read("width()").await
    }

    pub async fn height(&self) -> Result<Option<i64>> {
        self.read("height()").await
    }

    pub async fn inner_width(&self) -> Result<Option<i64>> {
        self.read("innerWidth()").await
    }

    pub async fn inner_height(&self) -> Result<Option<i64>> {
        self.read("innerHeight()").await
    }

    pub async fn outer_width(&self, include_margin: bool) -> Result<Option<i64>> {
        self.read(&format!("outerWidth({})", include_margin)).await
    }

    pub async fn outer_height(&self, include_margin: bool) -> Result<Option<i64>> {
        self.read(&format!("outerHeight({})", include_margin)).await
    }

    pub async fn scroll_left(&self) -> Result<Option<i64>> {
        self.read("scrollLeft()").await
    }

    pub async fn scroll_top(&self) -> Result<Option<i64>> {
        self.read("scrollTop()").await
    }

    /// Position relative to the offset parent; `None` unless both `top` and `left` came back.
    pub async fn position(&self) -> Result<Option<Position>> {
        let map: Option<Map<String, Value>> = self.read("position()").await?;
        Ok(map.as_ref().and_then(Position::from_map))
    }

    /// Position relative to the document; `None` unless both `top` and `left` came back.
    pub async fn offset(&self) -> Result<Option<Position>> {
        let map: Option<Map<String, Value>> = self.read("offset()").await?;
        Ok(map.as_ref().and_then(Position::from_map))
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.read::<usize>("length").await?.unwrap_or(0))
    }

    /// URL-encoded form data of the matched forms/controls.
    pub async fn serialized(&self) -> Result<Option<String>> {
        self.read("serialize()").await
    }

    pub async fn serialized_array(&self) -> Result<Vec<FormField>> {
        let raw = self.read_raw("serializeArray()").await?;
        if raw.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn has_class(&self, class: &str) -> Result<bool> {
        require_non_empty(class, "class name")?;
        Ok(self
            .read(&format!("hasClass({})", quote(class)))
            .await?
            .unwrap_or(false))
    }

    pub async fn is(&self, selector: &str) -> Result<bool> {
        require_non_empty(selector, "selector")?;
        Ok(self
            .read(&format!("is({})", quote(selector)))
            .await?
            .unwrap_or(false))
    }

    // Writes

    pub async fn set_text(&self, text: &str) -> Result<&Self> {
        self.write(&format!("text({})", quote(text))).await
    }

    pub async fn set_html(&self, html: &str) -> Result<&Self> {
        self.write(&format!("html({})", quote(html))).await
    }

    pub async fn set_attribute(&self, name: &str, value: &str) -> Result<&Self> {
        require_non_empty(name, "attribute name")?;
        self.write(&format!("attr({}, {})", quote(name), quote(value)))
            .await
    }

    pub async fn remove_attribute(&self, name: &str) -> Result<&Self> {
        require_non_empty(name, "attribute name")?;
        self.write(&format!("removeAttr({})", quote(name))).await
    }

    pub async fn set_property<T: PropertyValue>(&self, name: &str, value: &T) -> Result<&Self> {
        require_non_empty(name, "property name")?;
        self.write(&format!("prop({}, {})", quote(name), value.to_script_literal()))
            .await
    }

    pub async fn remove_property(&self, name: &str) -> Result<&Self> {
        require_non_empty(name, "property name")?;
        self.write(&format!("removeProp({})", quote(name))).await
    }

    pub async fn set_data<T: PropertyValue>(&self, key: &str, value: &T) -> Result<&Self> {
        require_non_empty(key, "data key")?;
        self.write(&format!("data({}, {})", quote(key), value.to_script_literal()))
            .await
    }

    pub async fn remove_data(&self, key: &str) -> Result<&Self> {
        require_non_empty(key, "data key")?;
        self.write(&format!("removeData({})", quote(key))).await
    }

    pub async fn add_class(&self, class: &str) -> Result<&Self> {
        require_non_empty(class, "class name")?;
        self.write(&format!("addClass({})", quote(class))).await
    }

    pub async fn remove_class(&self, class: &str) -> Result<&Self> {
        require_non_empty(class, "class name")?;
        self.write(&format!("removeClass({})", quote(class))).await
    }

    /// `state` forces the class on or off; `None` flips it.
    pub async fn toggle_class(&self, class: &str, state: Option<bool>) -> Result<&Self> {
        require_non_empty(class, "class name")?;
        let call = match state {
            Some(state) => format!("toggleClass({}, {})", quote(class), state),
            None => format!("toggleClass({})", quote(class)),
        };
        self.write(&call).await
    }

    pub async fn set_val(&self, value: &str) -> Result<&Self> {
        self.write(&format!("val({})", quote(value))).await
    }

    pub async fn set_css(&self, property: &str, value: &str) -> Result<&Self> {
        require_non_empty(property, "css property")?;
        self.write(&format!("css({}, {})", quote(property), quote(value)))
            .await
    }

    pub async fn set_width<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("width", value).await
    }

    pub async fn set_height<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("height", value).await
    }

    pub async fn set_inner_width<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("innerWidth", value).await
    }

    pub async fn set_inner_height<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("innerHeight", value).await
    }

    pub async fn set_outer_width<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("outerWidth", value).await
    }

    pub async fn set_outer_height<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("outerHeight", value).await
    }

    pub async fn set_scroll_left<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("scrollLeft", value).await
    }

    pub async fn set_scroll_top<N: ScriptNumber>(&self, value: N) -> Result<&Self> {
        self.set_number("scrollTop", value).await
    }
}
