use sessionjar::cookies::prefix::has_prefixed_cookies;
use sessionjar::cookies::sessiondiff::has_session_cookie_changed;
use sessionjar::cookies::setcookie::{parse_set_cookie_header, split_set_cookie_header};
use sessionjar::cookies::snapshot::{
    merge_set_cookie, render_cookie_header, CookieSnapshot, StoredCookie,
};
use sessionjar::storage::normalize_key;
use time::macros::datetime;
use time::OffsetDateTime;

const NOW: OffsetDateTime = datetime!(2025-01-01 00:00:00 UTC);

#[test]
fn test_split_without_expires_is_plain_comma_split() {
    let headers = [
        "a=1",
        "a=1, b=2",
        "a=1; Path=/; HttpOnly, b=2; Domain=example.com,c=3",
        " x=1 ,, y=2 ",
    ];

    for header in headers {
        let expected: Vec<String> = header
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        assert_eq!(split_set_cookie_header(header), expected, "header: {header}");
    }
}

#[test]
fn test_split_two_dated_cookies() {
    let header = "a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/, b=2; Expires=Thu, 22 Oct 2015 07:28:00 GMT; Path=/";
    let parts = split_set_cookie_header(header);

    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains("Expires=Wed, 21 Oct 2015 07:28:00 GMT"));
    assert!(parts[1].contains("Expires=Thu, 22 Oct 2015 07:28:00 GMT"));
}

#[test]
fn test_split_empty() {
    assert!(split_set_cookie_header("").is_empty());
}

#[test]
fn test_parse_multiple_cookies() {
    let cookies = parse_set_cookie_header(
        "better-auth.session_token=abc; Path=/, better-auth.session_data=xyz; Path=/",
    );
    assert_eq!(cookies["better-auth.session_token"].value, "abc");
    assert_eq!(cookies["better-auth.session_data"].value, "xyz");
}

#[test]
fn test_parse_keeps_raw_expires_text() {
    let cookies = parse_set_cookie_header("session=abc123; Expires=Wed, 21 Oct 2015 07:28:00 GMT");
    assert_eq!(
        cookies["session"].expires.as_deref(),
        Some("Wed, 21 Oct 2015 07:28:00 GMT")
    );
}

#[test]
fn test_max_age_expiry() {
    let snapshot = CookieSnapshot::from_set_cookie("session=abc123; Max-Age=3600", NOW);
    assert_eq!(
        snapshot.get("session"),
        Some(&StoredCookie::new(
            "abc123",
            Some(datetime!(2025-01-01 01:00:00 UTC))
        ))
    );
}

#[test]
fn test_merge_stores_iso_expiry() {
    let text = merge_set_cookie("session=abc123; Expires=Wed, 01 Jan 2025 12:00:00 GMT", None, NOW);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        json["session"],
        serde_json::json!({"value": "abc123", "expires": "2025-01-01T12:00:00.000Z"})
    );
}

#[test]
fn test_merge_keeps_previous_and_overrides() {
    let previous = r#"{"existingCookie":{"value":"existing","expires":null},"session":{"value":"old","expires":null}}"#;
    let text = merge_set_cookie("session=new, newCookie=newValue", Some(previous), NOW);
    let snapshot = CookieSnapshot::from_json(&text).unwrap();

    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.get("existingCookie").unwrap().value, "existing");
    assert_eq!(snapshot.get("newCookie").unwrap().value, "newValue");
    assert_eq!(snapshot.get("session").unwrap().value, "new");
}

#[test]
fn test_merge_ignores_invalid_previous() {
    let text = merge_set_cookie("session=abc123", Some("invalid json"), NOW);
    assert_eq!(text, r#"{"session":{"value":"abc123","expires":null}}"#);
}

#[test]
fn test_render_filters_expired() {
    let stored = r#"{
        "expired": {"value": "old", "expires": "2024-12-31T23:59:59.000Z"},
        "valid": {"value": "new", "expires": "2025-01-02T00:00:00.000Z"},
        "forever": {"value": "x", "expires": null}
    }"#;
    assert_eq!(render_cookie_header(stored, NOW), "forever=x; valid=new");

    // Session cookies survive any clock.
    let far_future = datetime!(9000-01-01 00:00:00 UTC);
    assert_eq!(render_cookie_header(stored, far_future), "forever=x");
}

#[test]
fn test_render_empty_results() {
    assert_eq!(render_cookie_header("{}", NOW), "");
    assert_eq!(render_cookie_header("invalid json", NOW), "");
}

#[test]
fn test_merge_render_roundtrip() {
    let header = "a=1; Max-Age=60, b=2; Expires=Wed, 21 Oct 2015 07:28:00 GMT, c=3=4; Path=/, d=; Max-Age=0";
    let rendered = render_cookie_header(&merge_set_cookie(header, None, NOW), NOW);

    assert!(rendered.contains("a=1"));
    assert!(!rendered.contains("b=2"));
    assert!(rendered.contains("c=3=4"));
    // Max-Age=0 expires exactly now, which still counts as valid.
    assert!(rendered.contains("d="));
}

#[test]
fn test_merge_render_roundtrip_at_sub_millisecond_clock() {
    let now = datetime!(2025-01-01 00:00:00.000700001 UTC);
    let header = "a=1; Max-Age=0, b=2; Max-Age=0.0001, c=3";
    let rendered = render_cookie_header(&merge_set_cookie(header, None, now), now);
    assert_eq!(rendered, "a=1; b=2; c=3");
}

#[test]
fn test_session_change_detection() {
    let prev = r#"{"better-auth.session_token":{"value":"abc","expires":"2025-01-01T00:00:00.000Z"}}"#;
    let refreshed = r#"{"better-auth.session_token":{"value":"abc","expires":"2025-01-08T00:00:00.000Z"}}"#;
    assert!(has_session_cookie_changed(None, refreshed));
    assert!(!has_session_cookie_changed(Some(prev), refreshed));

    let prev = r#"{"better-auth.session_data":{"value":"old","expires":null},"theme":{"value":"dark","expires":null}}"#;
    let next = r#"{"better-auth.session_data":{"value":"new","expires":null},"theme":{"value":"light","expires":null}}"#;
    assert!(has_session_cookie_changed(Some(prev), next));

    let next = r#"{"better-auth.session_data":{"value":"old","expires":null},"theme":{"value":"light","expires":null}}"#;
    assert!(!has_session_cookie_changed(Some(prev), next));
}

#[test]
fn test_prefix_detection() {
    assert!(has_prefixed_cookies(
        "__Secure-better-auth.session_token=x",
        "better-auth"
    ));
    assert!(has_prefixed_cookies("session_token=x", ""));
    assert!(!has_prefixed_cookies("session_token=x", Vec::<String>::new()));
    assert!(has_prefixed_cookies(
        "__Secure-my-app.session_token=abc; Path=/",
        ["better-auth", "my-app"]
    ));
}

#[test]
fn test_key_normalization() {
    assert_eq!(normalize_key("a:b:c"), "a_b_c");
    for key in ["", ":", "a::b", "already_safe"] {
        assert_eq!(normalize_key(&normalize_key(key)), normalize_key(key));
    }
}
