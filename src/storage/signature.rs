//! Canonical series identity.
//!
//! A signature is `name{k1="v1",k2="v2"}` with keys in ascending order and
//! values escaped the way the exposition format escapes them. Two label sets
//! holding the same pairs always produce the same signature, and any
//! difference in a key or a value produces a different one.

use std::collections::BTreeMap;
use std::fmt::Write;

/// Label set of a series. Keys are kept sorted by the map itself.
pub type Labels = BTreeMap<String, String>;

/// Builds the signature for a metric name and its labels.
pub fn signature(name: &str, labels: &Labels) -> String {
    let mut out = String::with_capacity(name.len() + 2 + labels.len() * 16);
    out.push_str(name);
    out.push('{');
    for (i, (key, value)) in labels.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push_str("=\"");
        escape_label_value(&mut out, value);
        out.push('"');
    }
    out.push('}');
    out
}

/// Appends `value` with `\`, `"` and newlines escaped.
pub fn escape_label_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}

/// Human-readable label text: `k1=v1,k2=v2`, sorted by key, unescaped.
pub fn label_text(labels: &Labels) -> String {
    let mut out = String::new();
    for (i, (key, value)) in labels.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}={}", key, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_signature_canonical_form() {
        let l = labels(&[("method", "GET"), ("code", "200")]);
        assert_eq!(
            signature("http_requests_total", &l),
            r#"http_requests_total{code="200",method="GET"}"#
        );
    }

    #[test]
    fn test_signature_without_labels() {
        assert_eq!(signature("up", &Labels::new()), "up{}");
    }

    #[test]
    fn test_signature_ignores_insertion_order() {
        let mut a = Labels::new();
        a.insert("z".into(), "1".into());
        a.insert("a".into(), "2".into());
        a.insert("m".into(), "3".into());

        let mut b = Labels::new();
        b.insert("m".into(), "3".into());
        b.insert("a".into(), "2".into());
        b.insert("z".into(), "1".into());

        assert_eq!(signature("x", &a), signature("x", &b));
    }

    #[test]
    fn test_signature_differs_on_key_or_value() {
        let base = signature("x", &labels(&[("env", "prod")]));
        assert_ne!(base, signature("x", &labels(&[("env", "dev")])));
        assert_ne!(base, signature("x", &labels(&[("region", "prod")])));
        assert_ne!(base, signature("y", &labels(&[("env", "prod")])));
        assert_ne!(
            base,
            signature("x", &labels(&[("env", "prod"), ("zone", "a")]))
        );
    }

    #[test]
    fn test_signature_escaping_is_unambiguous() {
        // Without escaping both would serialize to a{k="a",b="c"}.
        let tricky = signature("a", &labels(&[("k", r#"a",b="c"#)]));
        let honest = signature("a", &labels(&[("b", "c"), ("k", "a")]));
        assert_ne!(tricky, honest);
        assert_eq!(tricky, r#"a{k="a\",b=\"c"}"#);

        let backslash = signature("a", &labels(&[("k", "\\")]));
        let newline = signature("a", &labels(&[("k", "\n")]));
        let literal = signature("a", &labels(&[("k", "\\n")]));
        assert_ne!(backslash, newline);
        assert_ne!(newline, literal);
    }

    #[test]
    fn test_label_text_sorted() {
        let l = labels(&[("method", "GET"), ("code", "200")]);
        assert_eq!(label_text(&l), "code=200,method=GET");
        assert_eq!(label_text(&Labels::new()), "");
    }
}
