//! Accept/reject rule for a learner's line selection.

/// Accepts iff every vulnerable line is selected and nothing outside the
/// vulnerable and neutral lines is. Neutral lines are optional.
///
/// With no vulnerable lines at all the snippet is informational only and no
/// selection is ever accepted.
pub fn verdict(vuln_lines: &[u32], neutral_lines: &[u32], selected_lines: Option<&[u32]>) -> bool {
  let Some(selected) = selected_lines else {
    return false;
  };
  if vuln_lines.is_empty() || selected.len() < vuln_lines.len() {
    return false;
  }
  if !vuln_lines.iter().all(|v| selected.contains(v)) {
    return false;
  }
  selected
    .iter()
    .all(|s| vuln_lines.contains(s) || neutral_lines.contains(s))
}
