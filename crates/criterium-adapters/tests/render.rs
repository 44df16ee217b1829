//! Cross-backend properties of rendered statements.

use criterium_adapters::query::{RenderRequest, sql2, xpath};
use criterium_core::criterion::restrictions::*;
use criterium_core::criterion::{Criterion, MatchMode};
use proptest::prelude::*;

/// Reads a quoted literal from the start of `text`, returning the
/// unescaped value and the remainder.
fn read_literal(text: &str) -> Option<(String, &str)> {
    let mut chars = text.strip_prefix('\'')?.char_indices().peekable();
    let mut value = String::new();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if chars.peek().map(|&(_, n)| n) == Some('\'') {
                chars.next();
                value.push('\'');
            } else {
                return Some((value, &text[i + 2..]));
            }
        } else {
            value.push(c);
        }
    }
    None
}

fn leaf() -> impl Strategy<Value = Criterion> {
    prop_oneof![
        ("[a-z]{1,4}", ".*").prop_map(|(p, v)| eq(p.as_str(), v).unwrap()),
        ("[a-z]{1,4}", any::<i64>()).prop_map(|(p, v)| gt(p.as_str(), v).unwrap()),
        ("[a-z]{1,4}", ".*").prop_map(|(p, v)| like(p.as_str(), v, MatchMode::Anywhere).unwrap()),
        "[a-z]{1,4}".prop_map(|p| is_null(p.as_str()).unwrap()),
        ".*".prop_map(|v| contains(".", v).unwrap()),
    ]
}

fn tree() -> impl Strategy<Value = Criterion> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(not),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|v| and(v)),
            prop::collection::vec(inner, 0..4).prop_map(|v| or(v)),
        ]
    })
}

proptest! {
    #[test]
    fn prop_rendering_is_deterministic(c in tree()) {
        let request = RenderRequest::new(&c);
        prop_assert_eq!(xpath::render(&request).unwrap(), xpath::render(&request).unwrap());
        prop_assert_eq!(sql2::render(&request).unwrap(), sql2::render(&request).unwrap());
    }

    #[test]
    fn prop_quotes_cannot_escape_string_literals(value in ".*") {
        let c = eq("@title", value.as_str()).unwrap();
        let request = RenderRequest::new(&c);

        let xp = xpath::render(&request).unwrap();
        let rest = xp.strip_prefix("//*[@title = ").unwrap();
        let (read, tail) = read_literal(rest).unwrap();
        prop_assert_eq!(&read, &value);
        prop_assert_eq!(tail, "]");

        let sql = sql2::render(&request).unwrap();
        let rest = sql.strip_prefix("SELECT a.* FROM [nt:base] AS a WHERE a.[title] = ").unwrap();
        let (read, tail) = read_literal(rest).unwrap();
        prop_assert_eq!(&read, &value);
        prop_assert_eq!(tail, "");
    }

    #[test]
    fn prop_like_patterns_agree(value in ".*", mode in prop_oneof![
        Just(MatchMode::Exact),
        Just(MatchMode::Start),
        Just(MatchMode::End),
        Just(MatchMode::Anywhere),
    ]) {
        let c = like("@a", value.as_str(), mode).unwrap();
        let request = RenderRequest::new(&c);

        let xp = xpath::render(&request).unwrap();
        let (from_xpath, _) = read_literal(xp.strip_prefix("//*[jcr:like(@a, ").unwrap()).unwrap();
        let sql = sql2::render(&request).unwrap();
        let (from_sql, _) = read_literal(
            sql.strip_prefix("SELECT a.* FROM [nt:base] AS a WHERE a.[a] LIKE ").unwrap(),
        )
        .unwrap();

        prop_assert_eq!(&from_xpath, &from_sql);
        prop_assert_eq!(from_xpath, mode.resolve(&value).to_string());
    }
}

#[test]
fn starts_with_pattern_is_the_same_in_both_grammars() {
    let c = like("@a", "a", MatchMode::Start).unwrap();
    let request = RenderRequest::new(&c);
    assert_eq!(xpath::render(&request).unwrap(), "//*[jcr:like(@a, 'a%')]");
    assert_eq!(
        sql2::render(&request).unwrap(),
        "SELECT a.* FROM [nt:base] AS a WHERE a.[a] LIKE 'a%'"
    );
}
