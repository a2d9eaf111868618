//! Tokenizer for spreadsheet "publish to web" CSV exports.
//!
//! The scanner never rejects input. A stray or unterminated quote switches
//! it into quoted mode until the next closing quote or the end of the text.

use anyhow::Context as _;

/// One tokenized line: trimmed field values in file order.
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unquoted,
    Quoted,
}

#[derive(Debug, Default)]
struct RowBuilder {
    rows: Vec<RawRow>,
    row: RawRow,
    field: String,
}

impl RowBuilder {
    fn end_field(&mut self) {
        let field = std::mem::take(&mut self.field);
        self.row.push(field.trim().to_owned());
    }

    fn end_row(&mut self) {
        self.end_field();
        let row = std::mem::take(&mut self.row);
        if row.iter().any(|f| !f.is_empty()) {
            self.rows.push(row);
        }
    }

    fn finish(mut self) -> Vec<RawRow> {
        if !self.field.is_empty() || !self.row.is_empty() {
            self.end_row();
        }
        self.rows
    }
}

/// Splits `text` into rows of trimmed fields.
///
/// Rows whose fields are all empty are dropped. `\r\n` and `\n` end a row
/// outside quotes; any other `\r` outside quotes is ignored. Inside quotes
/// every character is literal except `""`, which yields a single `"`.
/// A leading byte-order mark is skipped.
pub fn parse_rows(text: &str) -> Vec<RawRow> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut builder = RowBuilder::default();
    let mut state = ScanState::Unquoted;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            ScanState::Quoted => match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    builder.field.push('"');
                }
                '"' => state = ScanState::Unquoted,
                _ => builder.field.push(ch),
            },
            ScanState::Unquoted => match ch {
                '"' => state = ScanState::Quoted,
                ',' => builder.end_field(),
                '\n' => builder.end_row(),
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    builder.end_row();
                }
                '\r' => {}
                _ => builder.field.push(ch),
            },
        }
    }

    if state == ScanState::Quoted {
        tracing::debug!("csv input ended inside a quoted field");
    }

    builder.finish()
}

/// Serializes rows back to CSV text, quoting only where needed.
///
/// Rows may have differing lengths.
pub fn write_rows<I, R, F>(rows: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).context("write csv row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flush csv writer: {}", err.error()))?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}
