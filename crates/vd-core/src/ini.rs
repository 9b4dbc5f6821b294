//! Reader and writer for the INI dialect used by vassal descriptors.
//!
//! Section names are case-sensitive, keys are lower-cased, `=` or `:` delimits
//! a key from its value and indented lines continue the previous value, also
//! across blank lines. Text after a section header's closing `]` is ignored.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::Settings;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<name>[^\]]+)\]").unwrap());

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<key>.*?)\s*[=:]\s*(?P<value>.*)$").unwrap());

const CONTINUATION_INDENT: &str = "    ";

#[derive(Debug, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct IniError {
    pub line: usize,
    pub message: String,
}

impl IniError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<(String, Settings)>,
}

impl IniDocument {
    pub fn section(&self, name: &str) -> Option<&Settings> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(n, _)| n.as_str())
    }

    /// Remove a section and hand back its settings, if it was present.
    pub fn take_section(&mut self, name: &str) -> Option<Settings> {
        let index = self.sections.iter().position(|(n, _)| n == name)?;
        Some(self.sections.remove(index).1)
    }
}

pub fn parse(content: &str) -> Result<IniDocument, IniError> {
    let mut document = IniDocument::default();
    let mut current: Option<usize> = None;
    let mut last_key: Option<String> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if raw.starts_with(char::is_whitespace) {
            if let (Some(section), Some(key)) = (current, last_key.as_deref()) {
                let settings = &mut document.sections[section].1;
                let joined = format!("{}\n{trimmed}", settings.get(key).unwrap_or_default());
                settings.insert(key, joined);
                continue;
            }
        }

        if let Some(caps) = SECTION_RE.captures(trimmed) {
            let name = caps["name"].trim().to_string();
            if document.section(&name).is_some() {
                return Err(IniError::new(
                    line_number,
                    format!("duplicate section [{name}]"),
                ));
            }
            document.sections.push((name, Settings::new()));
            current = Some(document.sections.len() - 1);
            last_key = None;
            continue;
        }

        let Some(section) = current else {
            return Err(IniError::new(
                line_number,
                "key/value line before any section header",
            ));
        };
        let Some(caps) = OPTION_RE.captures(trimmed) else {
            return Err(IniError::new(
                line_number,
                format!("expected key=value, found '{trimmed}'"),
            ));
        };

        let key = caps["key"].trim().to_lowercase();
        if key.is_empty() {
            return Err(IniError::new(line_number, "empty key"));
        }
        let (section_name, settings) = &mut document.sections[section];
        if settings.contains_key(&key) {
            return Err(IniError::new(
                line_number,
                format!("duplicate key '{key}' in section [{section_name}]"),
            ));
        }
        settings.insert(key.clone(), caps["value"].trim());
        last_key = Some(key);
    }

    Ok(document)
}

/// Render one section. Multi-line values are written as indented
/// continuation lines so that [`parse`] reads them back unchanged.
pub fn render_section(name: &str, settings: &Settings) -> String {
    let mut content = format!("[{name}]\n");
    for (key, value) in settings.iter() {
        content.push_str(key);
        content.push('=');
        content.push_str(&value.replace('\n', &format!("\n{CONTINUATION_INDENT}")));
        content.push('\n');
    }
    content
}
