use crate::browser::jquery::JQueryHelper;
use crate::coercion::{CoercionChain, ScriptResult};
use crate::core::{Config, ScriptDriver};
use crate::dom::WebElement;
use crate::errors::{DialectError, Result};
use crate::library::{bootstrap, BootstrapOutcome, Library, LibrarySource, Requirement};
use crate::selectors::{by, JQuerySelector, Selector, DOM_PATH_SCRIPT};
use crate::types::ElementRef;
use crate::utils::JavaScriptRunner;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Entry point for dialect queries against one driver.
///
/// The session owns no browser state of its own: every call is a script
/// round trip through the driver, and selectors stay plain values.
pub struct DialectSession<D: ScriptDriver> {
    driver: Arc<D>,
    config: Config,
    coercion: CoercionChain,
}

impl<D: ScriptDriver> DialectSession<D> {
    pub fn new(driver: D, config: Config) -> Result<Self> {
        Self::from_arc(Arc::new(driver), config)
    }

    pub fn from_arc(driver: Arc<D>, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            config,
            coercion: CoercionChain::standard(),
        })
    }

    pub fn with_coercion(mut self, coercion: CoercionChain) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coercion(&self) -> &CoercionChain {
        &self.coercion
    }

    /// Runs a script and returns its untyped result.
    pub async fn execute_raw(&self, script: &str, args: &[Value]) -> Result<Value> {
        JavaScriptRunner::execute(self.driver.as_ref(), script, args).await
    }

    /// Runs a script and coerces its result to `T`.
    pub async fn execute<T: ScriptResult>(&self, script: &str, args: &[Value]) -> Result<Option<T>> {
        let raw = self.execute_raw(script, args).await?;
        self.coercion.parse(&raw)
    }

    /// Makes sure `library` is on the page, injecting it when missing.
    ///
    /// `source` and `timeout` default to the configured values. Loading an
    /// already present library, of any version, does nothing.
    pub async fn load(
        &self,
        library: Library,
        source: Option<&LibrarySource>,
        timeout: Option<Duration>,
    ) -> Result<BootstrapOutcome> {
        let source = source.unwrap_or_else(|| self.configured_source(library));
        let uri = source.resolve(library)?;
        let requirement = Requirement {
            name: library.name().to_string(),
            check_script: library.check_script(),
            library: Some(library),
        };
        bootstrap(
            self.driver.as_ref(),
            &requirement,
            Some(&uri),
            timeout.unwrap_or_else(|| self.config.bootstrap.timeout()),
            self.config.bootstrap.poll_interval(),
        )
        .await
    }

    /// Runs the selector's capability check, bootstrapping its library if needed.
    pub async fn ensure(&self, selector: &Selector) -> Result<BootstrapOutcome> {
        let requirement = selector.requirement();
        let uri = match requirement.library {
            Some(library) => Some(self.configured_source(library).resolve(library)?),
            None => None,
        };
        bootstrap(
            self.driver.as_ref(),
            &requirement,
            uri.as_deref(),
            self.config.bootstrap.timeout(),
            self.config.bootstrap.poll_interval(),
        )
        .await
    }

    fn configured_source(&self, library: Library) -> &LibrarySource {
        match library {
            Library::JQuery => &self.config.libraries.jquery,
            Library::Sizzle => &self.config.libraries.sizzle,
        }
    }

    /// All matches; an empty list when nothing matches.
    pub async fn find_elements(&self, selector: &Selector) -> Result<Vec<WebElement>> {
        self.ensure(selector).await?;
        let references: Vec<ElementRef> = self
            .execute(&selector.lookup_script(), &[])
            .await?
            .unwrap_or_default();
        debug!(selector = %selector, matches = references.len(), "lookup finished");

        Ok(references
            .into_iter()
            .enumerate()
            .map(|(index, reference)| WebElement::new(reference, selector.clone(), index))
            .collect())
    }

    /// First match; fails with [`DialectError::ElementNotFound`] when nothing matches.
    pub async fn find_element(&self, selector: &Selector) -> Result<WebElement> {
        self.find_elements(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!(selector = %selector, "no element matched");
                DialectError::ElementNotFound(selector.expression())
            })
    }

    /// Absolute path of `element`, recomputed on every call.
    ///
    /// Fails with [`DialectError::ElementNotFound`] once the element has left
    /// the document. `""` means `element` is `<html>`.
    pub async fn dom_path(&self, element: &WebElement) -> Result<String> {
        let path: Option<String> = self.execute(DOM_PATH_SCRIPT, &[element.to_value()]).await?;
        path.ok_or_else(|| {
            DialectError::ElementNotFound(format!(
                "no DOM path for element {}",
                element.reference().id()
            ))
        })
    }

    /// `child` restricted to descendants of `parent`.
    ///
    /// An empty path means `parent` is the root element, so `child` is
    /// returned unscoped.
    pub async fn scoped(&self, parent: &WebElement, child: &Selector) -> Result<Selector> {
        let path = self.dom_path(parent).await?;
        if path.is_empty() {
            return Ok(child.clone());
        }
        debug!(path = %path, "scoping query to element path");
        Ok(child.scoped_to(&path))
    }

    pub async fn find_elements_within(
        &self,
        parent: &WebElement,
        child: &Selector,
    ) -> Result<Vec<WebElement>> {
        let scoped = self.scoped(parent, child).await?;
        self.find_elements(&scoped).await
    }

    pub async fn find_element_within(&self, parent: &WebElement, child: &Selector) -> Result<WebElement> {
        let scoped = self.scoped(parent, child).await?;
        self.find_element(&scoped).await
    }

    /// Looks the element up again by selector and position.
    pub async fn refresh(&self, element: &WebElement) -> Result<WebElement> {
        self.ensure(element.selector()).await?;
        let reference: Option<ElementRef> = self.execute(&element.lookup_script(), &[]).await?;
        let reference = reference.ok_or_else(|| {
            DialectError::ElementNotFound(format!(
                "{} has no match at index {}",
                element.selector(),
                element.index()
            ))
        })?;
        Ok(WebElement::new(
            reference,
            element.selector().clone(),
            element.index(),
        ))
    }

    /// Read/write helper over a jQuery chain.
    pub fn jquery(&self, selector: JQuerySelector) -> JQueryHelper<'_, D> {
        JQueryHelper::new(self, selector)
    }

    /// Shorthand for `jquery(by::jquery(query)?)`.
    pub fn jquery_query(&self, query: &str) -> Result<JQueryHelper<'_, D>> {
        Ok(self.jquery(by::jquery(query)?))
    }
}
