//! Integration tests for the XPath allow-list filter

use std::time::{Duration, Instant};
use xml_common::xpath::{
    check_axes, check_functions, filter_xpath, is_axis, is_function, XPathAxis, XPathFilter,
    CORE_FUNCTIONS, NODE_TYPE_TESTS, XSLT_FUNCTIONS,
};

fn rejected_name(result: xml_common::Result<()>) -> String {
    let message = result.unwrap_err().to_string();
    let start = message.find('\'').unwrap() + 1;
    let end = message[start..].find('\'').unwrap() + start;
    message[start..end].to_string()
}

#[test]
fn test_reference_cases() {
    assert!(check_functions("count()", &["count"]).is_ok());
    assert_eq!(rejected_name(check_functions("count()", &[])), "count");
    assert!(check_functions("\"count()\"", &[]).is_ok());
    assert!(check_axes("self::x", &["self"]).is_ok());
    assert_eq!(rejected_name(check_axes("ancestor::x", &["self"])), "ancestor");
}

#[test]
fn test_element_named_like_a_function() {
    assert!(check_functions("/count/id", &[]).is_ok());
    assert!(check_functions("//position[@last]", &[]).is_ok());
    assert!(check_axes("//self/child", &[]).is_ok());
}

#[test]
fn test_whitespace_before_delimiter() {
    assert_eq!(rejected_name(check_functions("document\n('a.xml')", &[])), "document");
    assert_eq!(rejected_name(check_axes("namespace\t::*", &[])), "namespace");
}

#[test]
fn test_literals_hide_names() {
    let expr = r#"//a[@b = 'document("x")' and @c = "namespace::*"]"#;
    assert!(filter_xpath(expr, &[], &[]).is_ok());
    let expr = r#"//a[@b = 'x'][last()]"#;
    assert_eq!(rejected_name(check_functions(expr, &[])), "last");
}

#[test]
fn test_unknown_and_prefixed_names_pass() {
    assert!(check_functions("my-func(1) and ext:document('x')", &[]).is_ok());
    assert!(check_axes("ns:ancestor::x", &[]).is_ok());
    assert!(check_axes("custom::x", &[]).is_ok());
}

#[test]
fn test_xslt_functions_are_known() {
    for name in XSLT_FUNCTIONS {
        let expr = format!("{}(.)", name);
        assert_eq!(rejected_name(check_functions(&expr, &[])), name);
        assert!(check_functions(&expr, &[name]).is_ok());
    }
}

#[test]
fn test_inventory() {
    assert_eq!(XPathAxis::ALL.len(), 13);
    for axis in XPathAxis::ALL {
        assert!(is_axis(axis.name()));
    }
    for name in CORE_FUNCTIONS {
        assert!(is_function(name));
    }
    for name in NODE_TYPE_TESTS {
        assert!(!is_function(name));
    }
}

#[test]
fn test_filter_object() {
    let filter = XPathFilter::new(&["child", "attribute"], &["not", "string"]);
    assert!(filter.check("child::a[not(@b)]/attribute::c").is_ok());
    assert!(filter.check("parent::a").is_err());
    assert!(filter.check("string(.) = concat('a', 'b')").is_err());
}

#[test]
fn test_adversarial_input_is_linear() {
    let long = "count".repeat(10_000);
    let deep = "a::".repeat(10_000);
    let calls = "f(".repeat(10_000);
    let quotes = "'".repeat(10_001);

    let started = Instant::now();
    assert!(check_functions(&long, &[]).is_ok());
    assert!(check_axes(&deep, &[]).is_ok());
    assert!(check_functions(&calls, &[]).is_ok());
    assert!(filter_xpath(&quotes, &[], &[]).is_ok());
    let many = "count(1) ".repeat(10_000);
    assert!(check_functions(&many, &["count"]).is_ok());
    assert!(started.elapsed() < Duration::from_secs(1));
}
