//! Builder for CI annotation lines as Biome's `github` reporter prints them.
//!
//! ```rust
//! use lintmerge_testkit::AnnotationBuilder;
//!
//! let line = AnnotationBuilder::new("error", "lint/style/noVar", "src/a,b.js")
//!     .span(3, 3, 1, 4)
//!     .message("Use let or const")
//!     .build();
//! assert_eq!(
//!     line,
//!     "::error title=lint/style/noVar,file=src/a%2Cb.js,line=3,endLine=3,col=1,endColumn=4::Use let or const"
//! );
//! ```

#[derive(Debug, Clone)]
pub struct AnnotationBuilder {
    severity: String,
    title: String,
    file: String,
    line: u32,
    end_line: u32,
    col: u32,
    end_column: u32,
    message: String,
}

impl AnnotationBuilder {
    pub fn new(severity: &str, title: &str, file: &str) -> Self {
        Self {
            severity: severity.to_string(),
            title: title.to_string(),
            file: file.to_string(),
            line: 1,
            end_line: 1,
            col: 1,
            end_column: 1,
            message: String::new(),
        }
    }

    pub fn span(mut self, line: u32, end_line: u32, col: u32, end_column: u32) -> Self {
        self.line = line;
        self.end_line = end_line;
        self.col = col;
        self.end_column = end_column;
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn build(&self) -> String {
        format!(
            "::{} title={},file={},line={},endLine={},col={},endColumn={}::{}",
            self.severity,
            escape_property(&self.title),
            escape_property(&self.file),
            self.line,
            self.end_line,
            self.col,
            self.end_column,
            escape_data(&self.message),
        )
    }
}

/// `%` first, so the escapes added afterwards are not themselves escaped.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
