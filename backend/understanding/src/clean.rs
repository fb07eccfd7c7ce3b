//! Strips editor chrome (menu bars, panel tabs) that leaks into code screenshots.

/// Substrings that mark a line as editor chrome rather than code.
pub const CHROME_MARKERS: &[&str] = &[
    "File",
    "Edit",
    "Selection",
    "View",
    "Go",
    "Run",
    "Terminal",
    "Help",
    "Network URL",
    "Activate Windows",
    "Share",
    "PROBLEMS",
    "OUTPUT",
    "DEBUG",
    "TERMINAL",
    "PORTS",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    pub text: String,
    pub kept_lines: usize,
}

/// Drop blank lines and chrome lines; keep everything else verbatim and in order.
///
/// The match is a case-sensitive substring test, so a code line that happens
/// to contain e.g. `Run` is dropped too.
pub fn clean_code_output(raw: &str) -> CleanedText {
    let kept: Vec<&str> = raw
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !CHROME_MARKERS.iter().any(|marker| line.contains(marker)))
        .collect();

    CleanedText {
        kept_lines: kept.len(),
        text: kept.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_code_lines_in_order() {
        let raw = "fn main() {\n    let x = 1;\n\n    println!(\"{x}\");\n}";
        let cleaned = clean_code_output(raw);
        assert_eq!(cleaned.text, "fn main() {\n    let x = 1;\n    println!(\"{x}\");\n}");
        assert_eq!(cleaned.kept_lines, 4);
    }

    #[test]
    fn drops_menu_and_panel_lines() {
        let raw = "File Edit Selection View Go Run Terminal Help\nx = 1\nPROBLEMS  OUTPUT  DEBUG CONSOLE  TERMINAL  PORTS\nActivate Windows\n";
        assert_eq!(clean_code_output(raw).text, "x = 1");
    }

    #[test]
    fn preserves_inner_spacing() {
        let raw = "a   =   1\t# aligned";
        assert_eq!(clean_code_output(raw).text, raw);
    }

    #[test]
    fn match_is_case_sensitive() {
        assert_eq!(clean_code_output("file = open(path)").text, "file = open(path)");
        assert_eq!(clean_code_output("f = File(path)").text, "");
    }

    #[test]
    fn all_chrome_yields_empty() {
        let cleaned = clean_code_output("Share\n   \nNetwork URL: http://10.0.0.2:8501");
        assert!(cleaned.text.is_empty());
        assert_eq!(cleaned.kept_lines, 0);
    }
}
