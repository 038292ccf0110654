//! Manifest model: the tabular dataset that drives substitution.
//!
//! A manifest is a delimited text file whose header names three reserved
//! columns (root container, leaf, kind) and one column per locale:
//!
//! ```text
//! rootName,leafName,kind,en,fr
//! Main,Headline,text,Hi,Salut
//! Main,Logo,asset,logo_en.png,logo_fr.png
//! ```
//!
//! Quoting follows standard CSV: fields may be wrapped in `"` to carry the
//! delimiter or line breaks, and `""` inside a quoted field is one quote.
//! The `csv` crate does the tokenizing; this module maps records to rows.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{error::ManifestError, value_objects::LeafKind};

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Role of a reserved header column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Root,
    Leaf,
    Kind,
}

impl ColumnRole {
    /// Classify a header cell. Matching is case-insensitive.
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_ascii_lowercase().as_str() {
            "rootname" | "comp_name" => Some(Self::Root),
            "leafname" | "layer_name" => Some(Self::Leaf),
            "kind" | "type" => Some(Self::Kind),
            _ => None,
        }
    }
}

/// Every header that is not a reserved column, in header order.
///
/// Empty header cells (a trailing delimiter, an unnamed spreadsheet
/// column) are not locales and are ignored. A locale named twice is
/// malformed.
pub fn detect_locales(headers: &[String]) -> Result<Vec<String>, ManifestError> {
    let mut locales: Vec<String> = Vec::new();
    for header in headers {
        let header = header.trim();
        if header.is_empty() || ColumnRole::from_header(header).is_some() {
            continue;
        }
        if locales.iter().any(|l| l == header) {
            return Err(ManifestError::MalformedRow {
                line: 0,
                reason: format!("locale column '{header}' appears twice"),
            });
        }
        locales.push(header.to_string());
    }

    if locales.is_empty() {
        return Err(ManifestError::NoLocaleColumns);
    }
    Ok(locales)
}

/// One substitution request: a leaf inside a root, with a value per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRow {
    pub root_name: String,
    pub leaf_name: String,
    pub kind: LeafKind,
    pub values: BTreeMap<String, String>,
    /// Physical line the row starts on (1-based).
    #[serde(skip)]
    pub line: u64,
}

impl ManifestRow {
    /// The value for `locale`; `None` when absent or empty.
    pub fn value(&self, locale: &str) -> Option<&str> {
        self.values
            .get(locale)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Parser options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestOptions {
    pub delimiter: u8,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    headers: Vec<String>,
    locales: Vec<String>,
    rows: Vec<ManifestRow>,
}

impl Manifest {
    /// Parse with the default (comma) delimiter.
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        Self::parse_with(raw, ManifestOptions::default())
    }

    pub fn parse_with(raw: &str, options: ManifestOptions) -> Result<Self, ManifestError> {
        let raw = raw.trim_start_matches('\u{feff}');

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(options.delimiter)
            .from_reader(raw.as_bytes());

        let mut records = reader
            .records()
            .map(|record| record.map_err(malformed_csv))
            .filter(|record| !matches!(record, Ok(r) if is_blank(r)));

        let header = match records.next() {
            Some(record) => record?,
            None => return Err(ManifestError::NoLocaleColumns),
        };
        let header_line = line_of(&header);
        let headers: Vec<String> = header.iter().map(str::to_owned).collect();
        let layout = Layout::from_headers(&headers, header_line)?;

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(layout.row(&record)?);
        }

        Ok(Self {
            locales: layout.locales.iter().map(|(_, l)| l.clone()).collect(),
            headers,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    /// Unique root names in order of first appearance.
    pub fn root_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.root_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Restrict the run to `wanted` locales, keeping header order.
    ///
    /// An empty filter keeps every locale.
    pub fn with_locales<S: AsRef<str>>(mut self, wanted: &[S]) -> Result<Self, ManifestError> {
        if wanted.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = wanted
            .iter()
            .map(AsRef::as_ref)
            .find(|w| !self.locales.iter().any(|l| l == w))
        {
            return Err(ManifestError::UnknownLocale {
                locale: unknown.to_string(),
            });
        }
        self.locales
            .retain(|l| wanted.iter().any(|w| w.as_ref() == l));
        Ok(self)
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Internal Helpers ─────────────────────────────────────────────────────────

/// Column positions resolved from the header.
struct Layout {
    width: usize,
    root: usize,
    leaf: usize,
    kind: Option<usize>,
    locales: Vec<(usize, String)>,
}

impl Layout {
    fn from_headers(headers: &[String], line: u64) -> Result<Self, ManifestError> {
        let mut root = None;
        let mut leaf = None;
        let mut kind = None;
        for (index, header) in headers.iter().enumerate() {
            match ColumnRole::from_header(header) {
                Some(ColumnRole::Root) => root = root.or(Some(index)),
                Some(ColumnRole::Leaf) => leaf = leaf.or(Some(index)),
                Some(ColumnRole::Kind) => kind = kind.or(Some(index)),
                None => {}
            }
        }

        let locales = detect_locales(headers)
            .map_err(|e| match e {
                ManifestError::MalformedRow { reason, .. } => {
                    ManifestError::MalformedRow { line, reason }
                }
                other => other,
            })?
            .into_iter()
            .filter_map(|locale| {
                headers
                    .iter()
                    .position(|h| h.trim() == locale)
                    .map(|index| (index, locale))
            })
            .collect();

        Ok(Self {
            width: headers.len(),
            root: root.ok_or(ManifestError::MissingColumn { column: "rootName" })?,
            leaf: leaf.ok_or(ManifestError::MissingColumn { column: "leafName" })?,
            kind,
            locales,
        })
    }

    fn row(&self, record: &csv::StringRecord) -> Result<ManifestRow, ManifestError> {
        let line = line_of(record);
        if record.len() > self.width {
            return Err(ManifestError::MalformedRow {
                line,
                reason: format!(
                    "{} fields but the header has {} columns",
                    record.len(),
                    self.width
                ),
            });
        }

        // Short rows are padded with empty strings.
        let field = |index: usize| record.get(index).unwrap_or("");

        let root_name = field(self.root);
        let leaf_name = field(self.leaf);
        if root_name.is_empty() || leaf_name.is_empty() {
            return Err(ManifestError::MalformedRow {
                line,
                reason: "root and leaf names must not be empty".into(),
            });
        }

        let kind = match self.kind {
            Some(index) => LeafKind::from_str(field(index)).map_err(|e| match e {
                ManifestError::MalformedRow { reason, .. } => {
                    ManifestError::MalformedRow { line, reason }
                }
                other => other,
            })?,
            None => LeafKind::Text,
        };

        let values = self
            .locales
            .iter()
            .map(|(index, locale)| (locale.clone(), field(*index).to_string()))
            .collect();

        Ok(ManifestRow {
            root_name: root_name.to_string(),
            leaf_name: leaf_name.to_string(),
            kind,
            values,
            line,
        })
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn malformed_csv(error: csv::Error) -> ManifestError {
    let line = error.position().map_or(0, csv::Position::line);
    ManifestError::MalformedRow {
        line,
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn detect_locales_skips_reserved_columns_in_order() {
        let h = headers(&["rootName", "en", "leafName", "fr", "kind", "de"]);
        assert_eq!(detect_locales(&h).unwrap(), vec!["en", "fr", "de"]);
    }

    #[test]
    fn detect_locales_accepts_legacy_names_case_insensitively() {
        let h = headers(&["COMP_NAME", "Layer_Name", "Type", "ja"]);
        assert_eq!(detect_locales(&h).unwrap(), vec!["ja"]);
    }

    #[test]
    fn detect_locales_without_locale_columns_fails() {
        let h = headers(&["rootName", "leafName", "kind"]);
        assert_eq!(detect_locales(&h), Err(ManifestError::NoLocaleColumns));
    }

    #[test]
    fn detect_locales_ignores_empty_header_cells() {
        let h = headers(&["rootName", "leafName", "", "en", " "]);
        assert_eq!(detect_locales(&h).unwrap(), vec!["en"]);
        assert_eq!(
            detect_locales(&headers(&["rootName", "leafName", ""])),
            Err(ManifestError::NoLocaleColumns)
        );
    }

    #[test]
    fn trailing_delimiter_does_not_add_a_locale() {
        let raw = "rootName,leafName,kind,en,\nMain,Headline,text,Hi,\n";
        let manifest = Manifest::parse(raw).unwrap();

        assert_eq!(manifest.locales(), ["en"]);
        assert_eq!(manifest.rows()[0].values.len(), 1);
        assert_eq!(manifest.rows()[0].value("en"), Some("Hi"));
    }

    #[test]
    fn duplicate_locale_header_reports_header_line() {
        let raw = "\nrootName,leafName,en,en\nMain,Title,a,b\n";
        assert!(matches!(
            Manifest::parse(raw),
            Err(ManifestError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn quoted_field_keeps_delimiter_newline_and_quotes() {
        let raw = "rootName,leafName,kind,en\n\
                   Main,Headline,text,\"Hello, world\nHe said \"\"hi\"\"\"\n";
        let manifest = Manifest::parse(raw).unwrap();

        assert_eq!(manifest.rows().len(), 1);
        assert_eq!(
            manifest.rows()[0].value("en"),
            Some("Hello, world\nHe said \"hi\"")
        );
    }

    #[test]
    fn escaped_quotes_unescape() {
        let raw = "rootName,leafName,en\nMain,Quote,\"He said \"\"hi\"\"\"\n";
        let manifest = Manifest::parse(raw).unwrap();
        assert_eq!(manifest.rows()[0].value("en"), Some("He said \"hi\""));
    }

    #[test]
    fn mixed_line_endings_and_blank_lines() {
        let raw = "\r\n\nrootName,leafName,kind,en\r\nMain,A,text,a\r\n\r\n   \nMain,B,text,b\rMain,C,,c\n";
        let manifest = Manifest::parse(raw).unwrap();

        let leaves: Vec<_> = manifest.rows().iter().map(|r| r.leaf_name.as_str()).collect();
        assert_eq!(leaves, vec!["A", "B", "C"]);
        assert_eq!(manifest.rows()[2].kind, LeafKind::Text);
    }

    #[test]
    fn fields_are_trimmed() {
        let raw = " rootName , leafName , en \n  Main ,  Title  ,  Hi  \n";
        let manifest = Manifest::parse(raw).unwrap();

        assert_eq!(manifest.locales(), ["en"]);
        let row = &manifest.rows()[0];
        assert_eq!(row.root_name, "Main");
        assert_eq!(row.leaf_name, "Title");
        assert_eq!(row.value("en"), Some("Hi"));
    }

    #[test]
    fn short_rows_are_padded() {
        let raw = "rootName,leafName,kind,en,fr\nMain,Title,text,Hi\n";
        let manifest = Manifest::parse(raw).unwrap();

        let row = &manifest.rows()[0];
        assert_eq!(row.values.get("fr").map(String::as_str), Some(""));
        assert_eq!(row.value("fr"), None);
    }

    #[test]
    fn long_rows_are_malformed() {
        let raw = "rootName,leafName,en\nMain,Title,Hi,extra\n";
        assert!(matches!(
            Manifest::parse(raw),
            Err(ManifestError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn unknown_kind_reports_line() {
        let raw = "rootName,leafName,kind,en\nMain,Title,text,Hi\nMain,Clip,video,x\n";
        match Manifest::parse(raw) {
            Err(ManifestError::MalformedRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("video"));
            }
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn missing_leaf_column_is_reported() {
        let raw = "rootName,kind,en\nMain,text,Hi\n";
        assert_eq!(
            Manifest::parse(raw),
            Err(ManifestError::MissingColumn { column: "leafName" })
        );
    }

    #[test]
    fn empty_input_has_no_locales() {
        assert_eq!(Manifest::parse("\n\n"), Err(ManifestError::NoLocaleColumns));
    }

    #[test]
    fn semicolon_delimiter() {
        let raw = "comp_name;layer_name;type;de\nMain;Title;text;Hallo, Welt\n";
        let manifest = Manifest::parse_with(raw, ManifestOptions { delimiter: b';' }).unwrap();
        assert_eq!(manifest.rows()[0].value("de"), Some("Hallo, Welt"));
    }

    #[test]
    fn root_names_are_unique_in_first_seen_order() {
        let raw = "rootName,leafName,en\nB,x,1\nA,y,2\nB,z,3\n";
        let manifest = Manifest::parse(raw).unwrap();
        assert_eq!(manifest.root_names(), vec!["B", "A"]);
    }

    #[test]
    fn locale_filter_keeps_header_order() {
        let raw = "rootName,leafName,en,fr,de\nMain,Title,a,b,c\n";
        let manifest = Manifest::parse(raw).unwrap().with_locales(&["de", "en"]).unwrap();
        assert_eq!(manifest.locales(), ["en", "de"]);
    }

    #[test]
    fn locale_filter_rejects_unknown_locale() {
        let raw = "rootName,leafName,en\nMain,Title,a\n";
        let err = Manifest::parse(raw).unwrap().with_locales(&["pt"]).unwrap_err();
        assert_eq!(
            err,
            ManifestError::UnknownLocale {
                locale: "pt".into()
            }
        );
    }
}
