//! Locating the schedule table inside a saved page and reading its rows.
//!
//! The scanner is deliberately forgiving: tag and attribute names are matched
//! case-insensitively, attribute values may be quoted or bare, unclosed `<td>`
//! and `<tr>` elements are closed by whatever structural tag comes next, and
//! the contents of `<script>` and `<style>` elements are never looked at.
//! Tables nested inside a cell contribute only their text to that cell.
use std::ops::Range;
use thiserror::Error;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Table {
        Table {
            rows: iter.into_iter().collect(),
        }
    }
}

/// The text of each `<td>` in a body row, in document order
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Row(Vec<String>);

impl Row {
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn cell(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Row {
        Row(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum TableError {
    #[error("no element with id {0:?} found in page")]
    ContainerNotFound(String),
    #[error("no table found inside element {0:?}")]
    TableNotFound(String),
}

/// Find the first `<table>` inside the element whose `id` is `container_id`
/// and return its body rows.
///
/// Rows inside `<thead>` or `<tfoot>` are left out, as are `<th>` cells.
pub(crate) fn find_table(html: &str, container_id: &str) -> Result<Table, TableError> {
    let mut tags = Tags::new(html);
    let Some(container) = tags
        .by_ref()
        .find(|t| !t.closing && t.attr("id").as_deref() == Some(container_id))
    else {
        return Err(TableError::ContainerNotFound(container_id.to_owned()));
    };
    if !container.self_closing() && !enter_table(&mut tags, &container.name) {
        return Err(TableError::TableNotFound(container_id.to_owned()));
    }
    let mut structure = Vec::new();
    let mut table_end = html.len();
    let mut depth = 0usize;
    for tag in tags {
        if tag.name == "table" {
            if !tag.closing {
                depth += 1;
            } else if depth == 0 {
                table_end = tag.span.start;
                break;
            } else {
                depth -= 1;
            }
        } else if depth == 0 && is_structural(&tag.name) {
            structure.push(tag);
        }
    }
    Ok(Table {
        rows: collect_rows(html, &structure, table_end),
    })
}

// Advance `tags` past the first `<table>` start tag before the end of the
// open `container` element.  Returns `false` if the container ends first.
fn enter_table(tags: &mut Tags<'_>, container: &str) -> bool {
    let mut depth = 1usize;
    for tag in tags {
        if tag.is_open("table") {
            return true;
        } else if tag.name == container {
            if !tag.closing {
                depth += 1;
            } else if depth == 1 {
                return false;
            } else {
                depth -= 1;
            }
        }
    }
    false
}

fn is_structural(name: &str) -> bool {
    matches!(name, "td" | "th" | "tr" | "thead" | "tbody" | "tfoot")
}

fn collect_rows(html: &str, structure: &[Tag<'_>], table_end: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row: Option<Vec<String>> = None;
    let mut cell_start: Option<usize> = None;
    let mut in_head_or_foot = false;
    for tag in structure {
        close_cell(html, &mut row, &mut cell_start, tag.span.start);
        match (tag.name.as_str(), tag.closing) {
            ("td", false) if row.is_some() => cell_start = Some(tag.span.end),
            ("td" | "th", _) => (),
            ("tr", false) => {
                rows.extend(row.take().map(Row));
                if !in_head_or_foot {
                    row = Some(Vec::new());
                }
            }
            ("thead" | "tfoot", closing) => {
                rows.extend(row.take().map(Row));
                in_head_or_foot = !closing;
            }
            _ => rows.extend(row.take().map(Row)),
        }
    }
    close_cell(html, &mut row, &mut cell_start, table_end);
    rows.extend(row.map(Row));
    rows
}

fn close_cell(
    html: &str,
    row: &mut Option<Vec<String>>,
    cell_start: &mut Option<usize>,
    end: usize,
) {
    if let Some(start) = cell_start.take() {
        if let Some(cells) = row.as_mut() {
            cells.push(cell_text(&html[start..end]));
        }
    }
}

/// Reduce a fragment of markup to the text a reader would see, with runs of
/// whitespace collapsed to single spaces
fn cell_text(fragment: &str) -> String {
    let decoded = decode_entities(&strip_tags(fragment));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;
    while let Some(i) = rest.find('<') {
        out.push_str(&rest[..i]);
        if !starts_tag(&rest[i + 1..]) {
            out.push('<');
            rest = &rest[i + 1..];
            continue;
        }
        match rest[i..].find('>') {
            Some(j) => rest = &rest[i + j + 1..],
            None => rest = "",
        }
    }
    out.push_str(rest);
    out
}

// Whether the text following a `<` opens a tag, closing tag, comment or
// declaration rather than being a literal less-than sign
fn starts_tag(after: &str) -> bool {
    after.starts_with('!')
        || after
            .strip_prefix('/')
            .unwrap_or(after)
            .starts_with(|c: char| c.is_ascii_alphabetic())
}

// Longest entity body we bother looking for a terminating ';' within
const MAX_ENTITY_LEN: usize = 10;

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let decoded = rest
            .get(1..)
            .and_then(|body| body.find(';').filter(|&j| j <= MAX_ENTITY_LEN))
            .and_then(|j| entity_char(&rest[1..=j]).map(|ch| (ch, j + 2)));
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Tag<'a> {
    /// Lowercased element name
    name: String,
    closing: bool,
    /// Everything between the element name and the closing `>`
    attrs: &'a str,
    /// Byte range of the whole tag, from `<` through `>`
    span: Range<usize>,
}

impl Tag<'_> {
    fn is_open(&self, name: &str) -> bool {
        !self.closing && self.name == name
    }

    fn self_closing(&self) -> bool {
        self.attrs.trim_end().ends_with('/')
    }

    fn attr(&self, wanted: &str) -> Option<String> {
        let mut rest = self.attrs;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
            if rest.is_empty() {
                return None;
            }
            let name_end = rest
                .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start();
            let value = match rest.strip_prefix('=') {
                Some(after_eq) => {
                    let after_eq = after_eq.trim_start();
                    let (value, remainder) = split_attr_value(after_eq);
                    rest = remainder;
                    value
                }
                None => "",
            };
            if name.eq_ignore_ascii_case(wanted) {
                return Some(decode_entities(value));
            }
        }
    }
}

// Returns the attribute value at the start of `s` and whatever follows it
fn split_attr_value(s: &str) -> (&str, &str) {
    match s.chars().next() {
        Some(q @ ('"' | '\'')) => {
            let body = &s[1..];
            match body.find(q) {
                Some(j) => (&body[..j], &body[j + 1..]),
                None => (body, ""),
            }
        }
        _ => {
            let j = s.find(char::is_whitespace).unwrap_or(s.len());
            s.split_at(j)
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Tags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Tags<'a> {
    fn new(html: &'a str) -> Self {
        Tags { html, pos: 0 }
    }

    fn skip_past(&mut self, from: usize, terminator: &str) {
        self.pos = match self.html[from..].find(terminator) {
            Some(j) => from + j + terminator.len(),
            None => self.html.len(),
        };
    }

    // Index of the `>` ending a tag whose body starts at `from`, ignoring
    // any `>` inside quoted attribute values
    fn tag_end(&self, from: usize) -> Option<usize> {
        let mut quote = None;
        for (i, ch) in self.html[from..].char_indices() {
            match (quote, ch) {
                (None, '"' | '\'') => quote = Some(ch),
                (Some(q), _) if q == ch => quote = None,
                (None, '>') => return Some(from + i),
                _ => (),
            }
        }
        None
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let start = self.pos + self.html.get(self.pos..)?.find('<')?;
            let after = &self.html[start + 1..];
            if after.starts_with("!--") {
                self.skip_past(start, "-->");
                continue;
            }
            if after.starts_with(['!', '?']) {
                self.skip_past(start, ">");
                continue;
            }
            if !starts_tag(after) {
                self.pos = start + 1;
                continue;
            }
            let closing = after.starts_with('/');
            let name_start = start + 1 + usize::from(closing);
            let name_len = self.html[name_start..]
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(self.html.len() - name_start);
            let name_end = name_start + name_len;
            let Some(gt) = self.tag_end(name_end) else {
                self.pos = self.html.len();
                return None;
            };
            let name = self.html[name_start..name_end].to_ascii_lowercase();
            self.pos = gt + 1;
            if !closing && (name == "script" || name == "style") {
                let terminator = format!("</{name}");
                self.pos += self.html[self.pos..]
                    .to_ascii_lowercase()
                    .find(&terminator)
                    .unwrap_or(self.html.len() - self.pos);
            }
            return Some(Tag {
                name,
                closing,
                attrs: &self.html[name_end..gt],
                span: start..(gt + 1),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_basic_table() {
        let html = r#"
            <html><body>
            <table><tr><td>decoy</td></tr></table>
            <div id="ctl00_mainContent_divContent">
              <table class="schedule">
                <thead><tr><th>No</th><th>Code</th><th>Subject</th></tr></thead>
                <tbody>
                  <tr><td>1</td><td>MAE101</td><td> Mathematics </td><td>15/3/2024</td></tr>
                  <tr>
                    <td>2</td>
                    <td>PRF192</td>
                  </tr>
                </tbody>
              </table>
            </div>
            </body></html>
        "#;
        let table = find_table(html, "ctl00_mainContent_divContent").unwrap();
        assert_eq!(
            table.rows(),
            [
                row(&["1", "MAE101", "Mathematics", "15/3/2024"]),
                row(&["2", "PRF192"]),
            ]
        );
    }

    #[test]
    fn test_missing_container() {
        let html = "<div id='other'><table><tr><td>x</td></tr></table></div>";
        assert_eq!(
            find_table(html, "content"),
            Err(TableError::ContainerNotFound(String::from("content")))
        );
    }

    #[test]
    fn test_missing_table() {
        let html = "<div id='content'><p>No exams scheduled</p></div>";
        assert_eq!(
            find_table(html, "content"),
            Err(TableError::TableNotFound(String::from("content")))
        );
    }

    #[test]
    fn test_table_after_container_ignored() {
        let html = concat!(
            "<div id='c'><div><p>No exams</p></div></div>",
            "<table><tbody><tr><td>1</td><td>X</td><td>Footer</td><td>1/1/2024</td>",
            "<td>R</td><td>09:00</td><td>EOS</td></tr></tbody></table>",
        );
        assert_eq!(
            find_table(html, "c"),
            Err(TableError::TableNotFound(String::from("c")))
        );
        let html = "<span id='c'/><table><tr><td>x</td></tr></table>";
        assert_eq!(
            find_table(html, "c"),
            Err(TableError::TableNotFound(String::from("c")))
        );
    }

    #[test]
    fn test_table_in_nested_container_element() {
        let html = concat!(
            "<div id='c'><div>intro</div><div>",
            "<table><tr><td>inside</td></tr></table></div></div>",
        );
        let table = find_table(html, "c").unwrap();
        assert_eq!(table.rows(), [row(&["inside"])]);
    }

    #[test]
    fn test_less_than_in_text() {
        let html = "<div id=c><table><tr><td>a<5</td><td>1 < 2 <= 3</td><td>x</3</td></tr></table>";
        let table = find_table(html, "c").unwrap();
        assert_eq!(table.rows(), [row(&["a<5", "1 < 2 <= 3", "x</3"])]);
    }

    #[test]
    fn test_sloppy_markup() {
        let html = concat!(
            "<DIV ID=content><!-- <table> --><script>var t = '<table>';</script>",
            "<TABLE><TR><TD>a &amp; b<TD><b>bold</b>&nbsp;text",
            "<TR><td>&#65;&#x42;</td><td>&bogus; &lt;tag&gt;</td></TABLE>",
            "<table><tr><td>later</td></tr></table>",
        );
        let table = find_table(html, "content").unwrap();
        assert_eq!(
            table.rows(),
            [row(&["a & b", "bold text"]), row(&["AB", "&bogus; <tag>"])]
        );
    }

    #[test]
    fn test_nested_table_text_stays_in_cell() {
        let html = concat!(
            r#"<div id="c"><table><tbody><tr><td>outer</td>"#,
            "<td><table><tr><td>inner</td> <td>more</td></tr></table></td>",
            "<td>last</td></tr></tbody></table></div>",
        );
        let table = find_table(html, "c").unwrap();
        assert_eq!(table.rows(), [row(&["outer", "inner more", "last"])]);
    }

    #[test]
    fn test_tfoot_rows_skipped() {
        let html = concat!(
            "<div id='c'><table><tbody><tr><td>1</td></tr></tbody>",
            "<tfoot><tr><td>total</td></tr></tfoot><tr><td>2</td></tr></table></div>",
        );
        let table = find_table(html, "c").unwrap();
        assert_eq!(table.rows(), [row(&["1"]), row(&["2"])]);
    }

    #[test]
    fn test_attr_forms() {
        let tag = Tags::new(r#"<td ID = 'a b' data-x=1 hidden class="x &amp; y"/>"#)
            .next()
            .unwrap();
        assert_eq!(tag.name, "td");
        assert_eq!(tag.attr("id").as_deref(), Some("a b"));
        assert_eq!(tag.attr("data-x").as_deref(), Some("1"));
        assert_eq!(tag.attr("hidden").as_deref(), Some(""));
        assert_eq!(tag.attr("class").as_deref(), Some("x & y"));
        assert_eq!(tag.attr("title"), None);
    }
}
