//! Small utility helpers used across modules.

/// Substitute `{name}` placeholders in a hint template. Unknown placeholders stay as written.
pub fn fill_template(tpl: &str, vars: &[(&str, &str)]) -> String {
  vars.iter().fold(tpl.to_string(), |text, (name, value)| {
    text.replace(&format!("{{{name}}}"), value)
  })
}

/// Cut a string for a log field at a char boundary, noting the full size.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// True for a line that would render as empty.
pub fn is_blank(line: &str) -> bool {
  line.trim().is_empty()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_placeholder() {
    let out = fill_template("Line {n} of {n} in {key}", &[("n", "3"), ("key", "k1")]);
    assert_eq!(out, "Line 3 of 3 in k1");
  }

  #[test]
  fn fill_template_leaves_unknown_placeholders() {
    assert_eq!(fill_template("{a} {b}", &[("a", "x")]), "x {b}");
  }

  #[test]
  fn trunc_for_log_respects_char_boundaries() {
    let s = "äää";
    let out = trunc_for_log(s, 3);
    assert!(out.starts_with('ä'));
    assert!(out.ends_with("(6 bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
