//! Splicing resolved symbols back into the original report text.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::Regex;

use crate::resolve::ResolvedFrame;

/// Rewrites the report, substituting resolved symbol text for each frame's
/// original address and description.
///
/// All replacement keys are combined into a single alternation of literals
/// and substituted in one left-to-right pass over the original text, so a
/// replacement can never re-match inside another's output. Keys are ordered
/// longest first so that no key shadows a longer sibling starting at the
/// same position. After substitution, a small set of legacy entity escapes
/// is decoded.
///
/// With nothing resolved, the original text is returned unchanged,
/// byte for byte.
pub fn rewrite_report(text: &str, resolved: &[ResolvedFrame]) -> String {
    if resolved.is_empty() {
        tracing::info!("no symbolic information found, emitting report unchanged");
        return text.to_string();
    }

    let mut replacements: HashMap<&str, String> = HashMap::new();
    for entry in resolved {
        replacements.insert(
            entry.frame.replacement_key.as_str(),
            format!("{} {}", entry.frame.address, entry.symbol),
        );
    }

    let mut keys: Vec<&str> = replacements.keys().copied().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let pattern = keys
        .iter()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    // the pattern is built from escaped literals and cannot fail to compile
    let matcher = Regex::new(&pattern).expect("literal alternation");

    let rewritten = matcher.replace_all(text, |captures: &regex::Captures<'_>| {
        replacements[&captures[0]].clone()
    });

    decode_entities(&rewritten).into_owned()
}

/// Entity escapes emitted by legacy report producers.
const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Decodes the fixed set of entity escapes; anything else is left untouched.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(position) = rest.find('&') {
        decoded.push_str(&rest[..position]);
        rest = &rest[position..];

        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, character)) => {
                decoded.push(*character);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);
    Cow::Owned(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    use crashsym_report::Frame;

    fn resolved(key: &str, address: &str, symbol: &str) -> ResolvedFrame {
        ResolvedFrame {
            frame: Frame {
                replacement_key: key.to_string(),
                address: address.to_string(),
                bundle_id: "com.example.App".to_string(),
            },
            symbol: symbol.to_string(),
        }
    }

    #[test]
    fn test_noop_on_empty_set() {
        let text = "Thread 0 Crashed:\n0  app  0x1000 0x1000 + 0\n";
        assert_eq!(rewrite_report(text, &[]), text);
    }

    #[test]
    fn test_single_replacement() {
        let text = "\
Thread 0 Crashed:
0   com.example.App \t0x0000000100001000 0x100000000 + 4096
1   libsystem.dylib \t0x00007fff20000000 start + 1
";
        let frames = [resolved(
            "0x0000000100001000 0x100000000 + 4096",
            "0x0000000100001000",
            "-[AppDelegate applicationDidFinishLaunching:] (AppDelegate.m:42)",
        )];

        let expected = "\
Thread 0 Crashed:
0   com.example.App \t0x0000000100001000 -[AppDelegate applicationDidFinishLaunching:] (AppDelegate.m:42)
1   libsystem.dylib \t0x00007fff20000000 start + 1
";
        assert_eq!(rewrite_report(text, &frames), expected);
    }

    #[test]
    fn test_overlapping_keys_no_cascade() {
        // the second key is a substring of the first key's replacement output;
        // substitution must not re-match inside already-substituted text
        let text = "a 0x10 one 0x20\nb 0x20 two\n";
        let frames = [
            resolved("0x10 one 0x20", "0x10", "first 0x20 two"),
            resolved("0x20 two", "0x20", "second"),
        ];

        assert_eq!(
            rewrite_report(text, &frames),
            "a 0x10 first 0x20 two\nb 0x20 second\n"
        );
    }

    #[test]
    fn test_entity_decoding() {
        let text = "0x1000 one";
        let frames = [resolved(
            "0x1000 one",
            "0x1000",
            "operator&lt;&lt;(std::ostream&amp;) &quot;x&quot; &apos;y&apos; &gt; &unknown;",
        )];

        assert_eq!(
            rewrite_report(text, &frames),
            "0x1000 operator<<(std::ostream&) \"x\" 'y' > &unknown;"
        );
    }

    #[test]
    fn test_decode_entities_untouched_without_ampersand() {
        assert!(matches!(decode_entities("plain text"), Cow::Borrowed(_)));
    }
}
