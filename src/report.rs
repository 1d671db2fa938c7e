//! Embedded EDA Report
//! Reads the pre-rendered HTML report and derives a plain-text preview.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read report {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTML report file kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedReport {
    pub path: PathBuf,
    pub html: String,
}

impl EmbeddedReport {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let html = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            html,
        })
    }

    /// Contents of the `<title>` element, if any.
    pub fn title(&self) -> Option<String> {
        let lower = self.html.to_ascii_lowercase();
        let open = lower.find("<title")?;
        let start = open + lower[open..].find('>')? + 1;
        let end = start + lower[start..].find("</title")?;
        let title = decode_entities(self.html[start..end].trim());
        (!title.is_empty()).then_some(title)
    }

    /// Visible text of the report: tags and comments dropped, scripts and
    /// styles removed, entities decoded, blank lines collapsed.
    ///
    /// A `<` that does not open a tag is kept as text.
    pub fn text_preview(&self) -> String {
        let mut text = String::with_capacity(self.html.len() / 2);
        let mut rest = self.html.as_str();

        while let Some(open) = rest.find('<') {
            text.push_str(&rest[..open]);
            rest = &rest[open..];

            if let Some(comment) = rest.strip_prefix("<!--") {
                rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
                continue;
            }
            if !opens_tag(&rest[1..]) {
                text.push('<');
                rest = &rest[1..];
                continue;
            }

            let Some(close) = rest.find('>') else {
                rest = "";
                break;
            };
            let tag = rest[1..close].to_ascii_lowercase();
            rest = &rest[close + 1..];

            if let Some(name) = ["script", "style"].iter().find(|n| tag.starts_with(*n)) {
                let end_tag = format!("</{}", name);
                rest = match rest.to_ascii_lowercase().find(&end_tag) {
                    Some(pos) => {
                        let after = &rest[pos..];
                        after.find('>').map_or("", |gt| &after[gt + 1..])
                    }
                    None => "",
                };
            } else if is_block_tag(&tag) {
                text.push('\n');
            }
        }
        text.push_str(rest);

        decode_entities(&text)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn opens_tag(after_lt: &str) -> bool {
    after_lt
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn is_block_tag(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    matches!(
        name,
        "br" | "p" | "div" | "tr" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "table" | "pre"
    )
}

// Longest entity body accepted between `&` and `;`
const MAX_ENTITY_LEN: usize = 10;

/// Decode named and numeric (`&#N;`, `&#xN;`) character references in one pass.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let body = &rest[amp + 1..];

        let decoded = body
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&body[..end]).map(|c| (c, end + 1)));

        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &body[len..];
            }
            None => {
                out.push('&');
                rest = body;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "nbsp" => Some(' '),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(|c: char| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(html: &str) -> EmbeddedReport {
        EmbeddedReport {
            path: PathBuf::from("eda_output.html"),
            html: html.to_string(),
        }
    }

    #[test]
    fn preview_strips_markup_scripts_and_styles() {
        let r = report(
            "<html><head><title>EDA &amp; Notes</title><style>h1 { color: red; }</style>\
             <script type=\"text/javascript\">var x = 1 < 2;</script></head>\
             <body><h1>Summary</h1><p>Sales &gt; 100</p><div>West<br/>East</div></body></html>",
        );

        assert_eq!(r.title().as_deref(), Some("EDA & Notes"));
        assert_eq!(r.text_preview(), "EDA & Notes\nSummary\nSales > 100\nWest\nEast");
    }

    #[test]
    fn preview_drops_comments_containing_gt() {
        let r = report("<p>Before</p><!-- draft: wait > 10 --><p>After</p>");
        assert_eq!(r.text_preview(), "Before\nAfter");
    }

    #[test]
    fn preview_keeps_bare_less_than() {
        let r = report("<p>wait < 10 min</p><p>done</p>");
        assert_eq!(r.text_preview(), "wait < 10 min\ndone");
    }

    #[test]
    fn numeric_entities_are_decoded() {
        let r = report("<p>2020&#8212;2023 &#x2014; &#39;ok&#39;</p><p>&amp;lt; &unknown; & more</p>");
        assert_eq!(r.text_preview(), "2020\u{2014}2023 \u{2014} 'ok'\n&lt; &unknown; & more");
    }

    #[test]
    fn missing_title_is_none() {
        assert_eq!(report("<p>hello</p>").title(), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EmbeddedReport::load(Path::new("/nonexistent/eda_output.html")).unwrap_err();
        assert!(err.to_string().contains("eda_output.html"));
    }

    #[test]
    fn load_keeps_html_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eda.html");
        std::fs::write(&path, "<p>raw</p>").unwrap();

        let r = EmbeddedReport::load(&path).unwrap();
        assert_eq!(r.html, "<p>raw</p>");
        assert_eq!(r.text_preview(), "raw");
    }
}
