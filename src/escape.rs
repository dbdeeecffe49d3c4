//! Single-quoted literal escaping for generated PowerShell text
//!
//! Inside a PowerShell single-quoted string the only escape is doubling the quote
//! character, so `it's` is written `'it''s'`. Nothing else is special there: no `$`
//! expansion, no backtick escapes, and newlines are literal.
//!
//! Operator data can only reach a [`PsScript`] as a [`PsLiteral`], and the only way to
//! build a `PsLiteral` is through [`escape_single_quotes`]. Code fragments are crate-private
//! or explicitly marked as trusted.

use std::fmt;

/// Double every `'` in `input`. All other characters pass through untouched.
pub fn escape_single_quotes(input: &str) -> String {
    input.replace('\'', "''")
}

/// An operator value escaped for embedding between single quotes.
///
/// `Display` renders the value wrapped in quotes, ready to splice into code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PsLiteral {
    escaped: String,
}

impl PsLiteral {
    pub fn new(raw: &str) -> Self {
        Self {
            escaped: escape_single_quotes(raw),
        }
    }

    /// `None` maps to the empty literal `''`.
    pub fn from_option(raw: Option<&str>) -> Self {
        Self::new(raw.unwrap_or_default())
    }

    /// The escaped body, without surrounding quotes
    pub fn escaped(&self) -> &str {
        &self.escaped
    }

    pub fn is_empty(&self) -> bool {
        self.escaped.is_empty()
    }
}

impl fmt::Display for PsLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.escaped)
    }
}

/// PowerShell source assembled from code fragments and escaped literals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PsScript {
    text: String,
}

impl PsScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap text that contains no operator data, e.g. a fixed probe snippet.
    pub fn trusted(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub(crate) fn code(&mut self, fragment: impl AsRef<str>) -> &mut Self {
        self.text.push_str(fragment.as_ref());
        self
    }

    pub fn literal(&mut self, literal: &PsLiteral) -> &mut Self {
        self.text.push('\'');
        self.text.push_str(literal.escaped());
        self.text.push('\'');
        self
    }

    pub(crate) fn line(&mut self, fragment: impl AsRef<str>) -> &mut Self {
        self.code(fragment);
        self.text.push('\n');
        self
    }

    /// `<prefix>'<literal>'<suffix>` followed by a newline
    pub(crate) fn line_with(
        &mut self,
        prefix: impl AsRef<str>,
        literal: &PsLiteral,
        suffix: &str,
    ) -> &mut Self {
        self.code(prefix).literal(literal).line(suffix)
    }

    pub fn append(&mut self, other: &PsScript) -> &mut Self {
        self.text.push_str(&other.text);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for PsScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
