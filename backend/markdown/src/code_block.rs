//! Fenced code blocks for verbatim text such as OCR output.

/// Wrap `code` in a fenced block that renders it verbatim.
///
/// The fence is one backtick longer than the longest backtick run inside the
/// code, so OCR output containing backticks cannot close it early.
pub fn fenced(code: &str) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}\n{code}\n{fence}")
}
