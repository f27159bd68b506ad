use lintmerge_types::Issue;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Pretty JSON array of `issues`, indented with tabs.
pub fn render_report_json(issues: &[Issue]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    issues.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
