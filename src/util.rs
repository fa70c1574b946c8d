//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Extract the substring between the first `{` and the last `}` (inclusive).
/// Model output often wraps its JSON in prose or code fences; we only care
/// about the object span. Returns None if either delimiter is missing.
pub fn extract_json_span(raw: &str) -> Option<&str> {
  let start = raw.find('{')?;
  let end = raw.rfind('}')?;
  if end < start {
    return None;
  }
  Some(&raw[start..=end])
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads. `max` is a byte
/// budget; the cut backs up to a char boundary so multibyte text never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_occurrences() {
    let out = fill_template("{a} and {a} and {b}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and x and y");
  }

  #[test]
  fn fill_template_leaves_unknown_keys() {
    assert_eq!(fill_template("{missing}", &[]), "{missing}");
  }

  #[test]
  fn json_span_strips_surrounding_prose() {
    let raw = "Sure, here you go:\n```json\n{\"a\": 1}\n```\nHope that helps.";
    assert_eq!(extract_json_span(raw), Some("{\"a\": 1}"));
  }

  #[test]
  fn trunc_short_input_passes_through() {
    assert_eq!(trunc_for_log("short", 60), "short");
  }

  #[test]
  fn trunc_backs_up_to_char_boundary() {
    // 'é' is two bytes and straddles the byte-60 cut.
    let s = format!("{}é and a long tail of question text", "a".repeat(59));
    let out = trunc_for_log(&s, 60);
    assert!(out.starts_with(&"a".repeat(59)));
    assert!(!out.contains('é'));
    assert!(out.contains("bytes total"));
  }

  #[test]
  fn json_span_missing_delimiters_return_none() {
    assert_eq!(extract_json_span("no json here"), None);
    assert_eq!(extract_json_span("only open {"), None);
    assert_eq!(extract_json_span("} reversed {"), None);
  }
}
