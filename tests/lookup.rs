use browser_dialects::selectors::DOM_PATH_SCRIPT;
use browser_dialects::testing::{ScriptedDriver, TestHelper};
use browser_dialects::{by, DialectError, ElementRef, Selector};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

fn jquery(query: &str) -> Selector {
    by::jquery(query).unwrap().into()
}

#[tokio::test]
async fn test_find_elements_on_no_match_is_empty() {
    let (_driver, session) =
        TestHelper::session(ScriptedDriver::with_capabilities(|_, _| Ok(json!([]))));

    for selector in [
        jquery("div.none"),
        by::sizzle("div.none").unwrap().into(),
        by::css("div.none").unwrap().into(),
        by::id("none").unwrap().into(),
        by::query_selector("div.none").unwrap().into(),
    ] {
        let found = assert_ok!(session.find_elements(&selector).await);
        assert!(found.is_empty());
    }
}

#[tokio::test]
async fn test_find_element_on_no_match_fails() {
    let (_driver, session) =
        TestHelper::session(ScriptedDriver::with_capabilities(|_, _| Ok(json!([]))));

    let err = assert_err!(session.find_element(&jquery("div.none")).await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_null_lookup_result_is_no_match() {
    let (_driver, session) =
        TestHelper::session(ScriptedDriver::with_capabilities(|_, _| Ok(Value::Null)));

    assert!(assert_ok!(session.find_elements(&jquery("li")).await).is_empty());
    assert!(matches!(
        session.find_element(&jquery("li")).await,
        Err(DialectError::ElementNotFound(_))
    ));
}

#[tokio::test]
async fn test_find_element_returns_first_match() {
    let (driver, session) = TestHelper::session(ScriptedDriver::with_capabilities(|_, _| {
        Ok(TestHelper::elements(&["a", "b", "c"]))
    }));

    let selector = jquery("li");
    let element = assert_ok!(session.find_element(&selector).await);
    assert_eq!(element.reference(), &ElementRef::new("a"));
    assert_eq!(element.index(), 0);
    assert_eq!(element.selector(), &selector);

    let all = assert_ok!(session.find_elements(&selector).await);
    let indexes: Vec<usize> = all.iter().map(|e| e.index()).collect();
    assert_eq!(indexes, vec![0, 1, 2]);

    // capability check, then the lookup itself
    let scripts = driver.scripts();
    assert_eq!(scripts[0], "return typeof window.jQuery === 'function';");
    assert_eq!(scripts[1], "return jQuery('li').get();");
}

#[tokio::test]
async fn test_non_element_lookup_result_is_mismatch() {
    let (_driver, session) =
        TestHelper::session(ScriptedDriver::with_capabilities(|_, _| Ok(json!("oops"))));

    let err = assert_err!(session.find_elements(&jquery("li")).await);
    assert!(matches!(err, DialectError::CoercionMismatch { .. }));
}

fn nested_page() -> ScriptedDriver {
    ScriptedDriver::with_capabilities(|script, _| {
        if script == DOM_PATH_SCRIPT {
            return Ok(json!("body > div#id1"));
        }
        match script {
            "return jQuery('div').get();" => Ok(TestHelper::elements(&["root"])),
            "return jQuery('span', jQuery('body > div#id1')[0]).get();" => {
                Ok(TestHelper::elements(&["s1", "s2"]))
            }
            _ => Ok(json!([])),
        }
    })
}

#[tokio::test]
async fn test_scoped_jquery_query() {
    let (driver, session) = TestHelper::session(nested_page());

    let root = assert_ok!(session.find_element(&jquery("div")).await);
    let scoped = assert_ok!(session.scoped(&root, &jquery("span")).await);
    assert_eq!(
        scoped.expression(),
        "jQuery('span', jQuery('body > div#id1')[0])"
    );

    let path_call = driver
        .executed()
        .into_iter()
        .find(|e| e.script == DOM_PATH_SCRIPT)
        .unwrap();
    assert_eq!(path_call.args, vec![ElementRef::new("root").to_value()]);

    let children = assert_ok!(session.find_elements_within(&root, &jquery("span")).await);
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].reference(), &ElementRef::new("s2"));
    assert_eq!(children[1].selector(), &scoped);
}

#[tokio::test]
async fn test_scoped_path_is_recomputed_every_call() {
    let (driver, session) = TestHelper::session(nested_page());

    let root = assert_ok!(session.find_element(&jquery("div")).await);
    assert_ok!(session.find_elements_within(&root, &jquery("span")).await);
    assert_ok!(session.find_elements_within(&root, &jquery("span")).await);

    let path_calls = driver
        .scripts()
        .iter()
        .filter(|s| s.as_str() == DOM_PATH_SCRIPT)
        .count();
    assert_eq!(path_calls, 2);
}

#[tokio::test]
async fn test_scoped_find_element_without_match_fails() {
    let (_driver, session) = TestHelper::session(nested_page());

    let root = assert_ok!(session.find_element(&jquery("div")).await);
    let err = assert_err!(session.find_element_within(&root, &jquery("em")).await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_scoped_native_css_rewrites_positions() {
    let driver = ScriptedDriver::with_capabilities(|script, _| {
        if script == DOM_PATH_SCRIPT {
            return Ok(json!("body > ul:eq(1) > li:eq(0)"));
        }
        Ok(TestHelper::elements(&["x"]))
    });
    let (_driver, session) = TestHelper::session(driver);

    let root = assert_ok!(session.find_element(&by::css("li").unwrap().into()).await);
    let scoped = assert_ok!(session.scoped(&root, &by::css("a").unwrap().into()).await);
    assert_eq!(
        scoped.lookup_script(),
        "return Array.prototype.slice.call((function() { var scope = \
         document.querySelectorAll('body > ul:nth-of-type(2) > li:nth-of-type(1)'); \
         return scope.length === 0 ? [] : scope[0].querySelectorAll('a'); })());"
    );
}

#[tokio::test]
async fn test_root_element_path_leaves_query_unscoped() {
    let driver = ScriptedDriver::with_capabilities(|script, _| {
        if script == DOM_PATH_SCRIPT {
            return Ok(json!(""));
        }
        Ok(TestHelper::elements(&["html"]))
    });
    let (_driver, session) = TestHelper::session(driver);

    let root = assert_ok!(session.find_element(&by::css("html").unwrap().into()).await);
    let child: Selector = by::sizzle("p").unwrap().into();
    assert_eq!(assert_ok!(session.scoped(&root, &child).await), child);
}

#[tokio::test]
async fn test_refresh_uses_position() {
    let driver = ScriptedDriver::with_capabilities(|script, _| {
        if script.starts_with("var matches") {
            if script.contains("matches.length > 1 ") {
                return Ok(TestHelper::elements(&["fresh"]));
            }
            return Ok(json!([]));
        }
        Ok(TestHelper::elements(&["a", "b"]))
    });
    let (_driver, session) = TestHelper::session(driver);

    let elements = assert_ok!(session.find_elements(&jquery("li")).await);
    let refreshed = assert_ok!(session.refresh(&elements[1]).await);
    assert_eq!(refreshed.reference(), &ElementRef::new("fresh"));
    assert_eq!(refreshed.index(), 1);

    let err = assert_err!(session.refresh(&elements[0]).await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_typed_execute() {
    let (driver, session) = TestHelper::session(ScriptedDriver::returning(json!(12.75)));

    let value: Option<i64> = assert_ok!(session.execute("return 12.75;", &[]).await);
    assert_eq!(value, Some(12));

    let err = assert_err!(session.execute::<i64>("   ", &[]).await);
    assert!(matches!(err, DialectError::InvalidArgument(_)));
    assert_eq!(driver.scripts().len(), 1);
}
