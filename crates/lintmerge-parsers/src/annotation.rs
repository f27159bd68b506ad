//! CI workflow-command annotations:
//!
//! ```text
//! ::error title=lint/style/noVar,file=src/a.js,line=3,endLine=3,col=1,endColumn=4::Use let or const
//! ```

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub severity: String,
    pub title: String,
    pub file: String,
    pub line: u32,
    pub end_line: u32,
    pub col: u32,
    pub end_column: u32,
    pub message: String,
}

fn annotation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^::(?P<severity>[a-z]+) title=(?P<title>[^,]*),file=(?P<file>[^,]*),line=(?P<line>\d+),endLine=(?P<end_line>\d+),col=(?P<col>\d+),endColumn=(?P<end_col>\d+)::(?P<message>.*)$",
        )
        .expect("valid annotation regex")
    })
}

/// Parses one line of the stream. Lines that do not follow the grammar yield `None`.
pub fn parse_annotation_line(line: &str) -> Option<Annotation> {
    let caps = annotation_re().captures(line.trim_end_matches(['\r', '\n']))?;
    let num = |name: &str| caps[name].parse::<u32>().ok();
    Some(Annotation {
        severity: caps["severity"].to_string(),
        title: unescape_property(&caps["title"]),
        file: unescape_property(&caps["file"]),
        line: num("line")?,
        end_line: num("end_line")?,
        col: num("col")?,
        end_column: num("end_col")?,
        message: unescape_data(&caps["message"]),
    })
}

/// Reverses the escaping applied to message text: `%0D`, `%0A`, then `%25`.
pub fn unescape_data(s: &str) -> String {
    s.replace("%0D", "\r")
        .replace("%0A", "\n")
        .replace("%25", "%")
}

/// Reverses the escaping applied to property values, which additionally
/// covers the grammar's own separators `:` and `,`.
pub fn unescape_property(s: &str) -> String {
    s.replace("%0D", "\r")
        .replace("%0A", "\n")
        .replace("%3A", ":")
        .replace("%2C", ",")
        .replace("%25", "%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_annotation() {
        let a = parse_annotation_line(
            "::warning title=lint/suspicious/noDoubleEquals,file=src/a.ts,line=4,endLine=4,col=9,endColumn=11::Use === instead of ==",
        )
        .unwrap();
        assert_eq!(a.severity, "warning");
        assert_eq!(a.title, "lint/suspicious/noDoubleEquals");
        assert_eq!(a.file, "src/a.ts");
        assert_eq!((a.line, a.end_line, a.col, a.end_column), (4, 4, 9, 11));
        assert_eq!(a.message, "Use === instead of ==");
    }

    #[test]
    fn unescapes_properties_and_message() {
        let a = parse_annotation_line(
            "::error title=a%3Ab%2Cc,file=dir%2Cx/100%25.js,line=1,endLine=2,col=1,endColumn=1::first%0Asecond 50%25 %3A kept",
        )
        .unwrap();
        assert_eq!(a.title, "a:b,c");
        assert_eq!(a.file, "dir,x/100%.js");
        assert_eq!(a.message, "first\nsecond 50% %3A kept");
    }

    #[test]
    fn percent_is_unescaped_last() {
        assert_eq!(unescape_data("%250A"), "%0A");
        assert_eq!(unescape_property("%253A"), "%3A");
    }

    #[test]
    fn rejects_other_lines() {
        assert_eq!(parse_annotation_line("Checked 12 files in 3ms. No fixes applied."), None);
        assert_eq!(
            parse_annotation_line("::error file=a.js,line=1,endLine=1,col=1,endColumn=1::m"),
            None
        );
        assert_eq!(
            parse_annotation_line("::error title=t,file=a.js,line=x,endLine=1,col=1,endColumn=1::m"),
            None
        );
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let a = parse_annotation_line(
            "::notice title=t,file=a.js,line=1,endLine=1,col=1,endColumn=2::done\r\n",
        )
        .unwrap();
        assert_eq!(a.message, "done");
    }
}
