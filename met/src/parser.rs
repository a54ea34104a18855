//! Parser for the bracketed MET text format
//!
//! ```text
//! [Current]
//! Name=...
//! [PreCrawford]
//! Size=25
//! 1=0.50000 0.69750 ...
//! [PostCrawford]
//! Size=25
//! Data=0.50000 0.50000 ...
//! ```
//!
//! Section names and keys are case-insensitive. Unknown sections and keys are
//! ignored. Pre-Crawford row labels are positional markers only: rows are
//! stored in the order they appear.
//!
//! Rows that fail to parse are skipped instead of failing the whole table.
//! Every skip is reported as a [`ParseWarning`] next to the table.

use std::fmt;

use log::{debug, warn};

use crate::error::{MetError, Result};
use crate::table::{Away, MatchEquityTable, TableInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Current,
    PreCrawford,
    PostCrawford,
    Unknown,
}

impl Section {
    fn from_header(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "current" => Section::Current,
            "precrawford" => Section::PreCrawford,
            "postcrawford" => Section::PostCrawford,
            _ => Section::Unknown,
        }
    }
}

/// Non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    /// A pre-Crawford row was not a list of finite numbers and was skipped
    MalformedRow { line: usize, label: String },
    /// The post-Crawford `Data` line was not a list of finite numbers
    MalformedData { line: usize },
    /// A value outside [0, 1] was kept as-is
    OutOfRange { line: usize, value: f64 },
    /// Pre- and post-Crawford sections declare different sizes
    SizeMismatch { pre_crawford: Away, post_crawford: Away },
    /// The data covers fewer away scores than declared; the table was shrunk
    Truncated { declared: Away, usable: Away },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MalformedRow { line, label } => {
                write!(f, "line {}: skipped malformed pre-Crawford row {:?}", line, label)
            }
            ParseWarning::MalformedData { line } => {
                write!(f, "line {}: skipped malformed post-Crawford data", line)
            }
            ParseWarning::OutOfRange { line, value } => {
                write!(f, "line {}: value {} outside [0, 1]", line, value)
            }
            ParseWarning::SizeMismatch { pre_crawford, post_crawford } => write!(
                f,
                "pre-Crawford size {} differs from post-Crawford size {}",
                pre_crawford, post_crawford
            ),
            ParseWarning::Truncated { declared, usable } => write!(
                f,
                "declared size {} but data only covers {}; table truncated",
                declared, usable
            ),
        }
    }
}

/// A parsed table together with the problems the parser recovered from
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub table: MatchEquityTable,
    pub warnings: Vec<ParseWarning>,
}

/// Accumulates section contents while scanning lines
#[derive(Default)]
struct Builder {
    info: TableInfo,
    seen_pre: bool,
    seen_post: bool,
    pre_size: Option<Away>,
    post_size: Option<Away>,
    rows: Vec<Vec<f64>>,
    post_data: Vec<f64>,
    warnings: Vec<ParseWarning>,
}

/// Parse MET source text into a table.
///
/// Fails with [`MetError::Format`] if the `[PreCrawford]` or `[PostCrawford]`
/// section is missing, a `Size` is not an integer, or no usable data remains.
pub fn parse(source: &str) -> Result<ParsedTable> {
    let mut builder = Builder::default();
    let mut section = Section::None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Section::from_header(header);
            match section {
                Section::PreCrawford => builder.seen_pre = true,
                Section::PostCrawford => builder.seen_post = true,
                Section::Unknown => debug!("line {}: ignoring section [{}]", line_no, header),
                _ => {}
            }
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            debug!("line {}: ignoring line without '='", line_no);
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match section {
            Section::Current => builder.metadata(&key, value),
            Section::PreCrawford => builder.pre_crawford(line_no, &key, value)?,
            Section::PostCrawford => builder.post_crawford(line_no, &key, value)?,
            Section::None | Section::Unknown => {}
        }
    }

    builder.finish()
}

impl Builder {
    fn metadata(&mut self, key: &str, value: &str) {
        let field = match key {
            "name" => &mut self.info.name,
            "version" => &mut self.info.version,
            "description" => &mut self.info.description,
            "copyright" => &mut self.info.copyright,
            _ => return,
        };
        *field = value.to_string();
    }

    fn pre_crawford(&mut self, line: usize, key: &str, value: &str) -> Result<()> {
        if key == "size" {
            self.pre_size = Some(parse_size(line, value)?);
            return Ok(());
        }
        match parse_values(value) {
            Some(row) => {
                self.check_range(line, &row);
                self.rows.push(row);
            }
            None => {
                warn!("line {}: skipping malformed pre-Crawford row {:?}", line, key);
                self.warnings.push(ParseWarning::MalformedRow { line, label: key.to_string() });
            }
        }
        Ok(())
    }

    fn post_crawford(&mut self, line: usize, key: &str, value: &str) -> Result<()> {
        match key {
            "size" => self.post_size = Some(parse_size(line, value)?),
            "data" => match parse_values(value) {
                Some(data) => {
                    self.check_range(line, &data);
                    self.post_data = data;
                }
                None => {
                    warn!("line {}: skipping malformed post-Crawford data", line);
                    self.warnings.push(ParseWarning::MalformedData { line });
                }
            },
            _ => {}
        }
        Ok(())
    }

    fn check_range(&mut self, line: usize, values: &[f64]) {
        for &value in values.iter().filter(|v| !(0.0..=1.0).contains(*v)) {
            warn!("line {}: value {} outside [0, 1]", line, value);
            self.warnings.push(ParseWarning::OutOfRange { line, value });
        }
    }

    fn finish(mut self) -> Result<ParsedTable> {
        if !self.seen_pre {
            return Err(MetError::format("missing [PreCrawford] section"));
        }
        if !self.seen_post {
            return Err(MetError::format("missing [PostCrawford] section"));
        }
        if self.rows.is_empty() {
            return Err(MetError::format("no usable pre-Crawford rows"));
        }

        if let (Some(pre), Some(post)) = (self.pre_size, self.post_size) {
            if pre != post {
                warn!("pre-Crawford size {} differs from post-Crawford size {}", pre, post);
                self.warnings.push(ParseWarning::SizeMismatch { pre_crawford: pre, post_crawford: post });
            }
        }

        let declared = self
            .pre_size
            .or(self.post_size)
            .unwrap_or(self.rows.len() as Away);
        let usable = self.usable_size(declared);
        if usable == 0 {
            return Err(MetError::format("table data does not cover a single score"));
        }
        if usable < declared {
            warn!("declared size {} but data only covers {}", declared, usable);
            self.warnings.push(ParseWarning::Truncated { declared, usable });
        }

        debug!(
            "parsed MET {:?}: size {}, {} rows, {} warnings",
            self.info.name,
            usable,
            self.rows.len(),
            self.warnings.len()
        );

        let table = MatchEquityTable::new(self.info, usable, self.rows, self.post_data)?;
        Ok(ParsedTable { table, warnings: self.warnings })
    }

    /// Largest away score `n <= declared` fully covered by both grids
    fn usable_size(&self, declared: Away) -> Away {
        let mut n = (declared as usize).min(self.rows.len()).min(self.post_data.len());
        while n > 0 && self.rows[..n].iter().any(|row| row.len() < n) {
            n -= 1;
        }
        n as Away
    }
}

fn parse_size(line: usize, value: &str) -> Result<Away> {
    value
        .parse::<Away>()
        .map_err(|_| MetError::format(format!("line {}: invalid size {:?}", line, value)))
}

/// Whitespace-separated finite floats; `None` if any token is not one
fn parse_values(value: &str) -> Option<Vec<f64>> {
    let values = value
        .split_whitespace()
        .map(|token| token.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()?;
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
