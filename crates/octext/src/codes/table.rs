//! Configured control-code table: canonical names plus user overrides

use super::control::ControlCode;
use super::operand::{normalize_name, Operand};
use crate::common::{TextError, TextResult};
use std::collections::{BTreeMap, HashMap};

/// How a control code is displayed in tagged text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeDisplay {
    /// `<Name>` or `<Name:operand>`
    Tag(String),
    /// A single character standing in for the code
    Literal(char),
}

/// Bidirectional code/name lookup used by the codec.
///
/// Built once from configuration and handed to the codec; there is no
/// process-wide table.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    overrides: BTreeMap<ControlCode, CodeDisplay>,
    literals: HashMap<char, ControlCode>,
    custom_tags: HashMap<String, ControlCode>,
}

impl CodeTable {
    /// Table with canonical names only
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides<I, S>(overrides: I) -> TextResult<Self>
    where
        I: IntoIterator<Item = (ControlCode, S)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (code, display) in overrides {
            table.set_override(code, display.as_ref())?;
        }
        Ok(table)
    }

    /// Rebind how `code` is displayed. One character makes a literal
    /// substitution; anything longer renames the tag.
    pub fn set_override(&mut self, code: ControlCode, display: &str) -> TextResult<()> {
        let key = code.name();
        if !code.is_overridable() {
            return Err(TextError::invalid_override(key, "code cannot be overridden"));
        }

        let mut chars = display.chars();
        let parsed = match (chars.next(), chars.next()) {
            (None, _) => return Err(TextError::invalid_override(key, "display string is empty")),
            (Some(ch), None) => {
                if matches!(ch, '<' | '>' | '\r' | '\n') {
                    return Err(TextError::invalid_override(
                        key,
                        format!("'{}' is reserved by the tag syntax", ch.escape_default()),
                    ));
                }
                if let Some(other) = self.literals.get(&ch).filter(|other| **other != code) {
                    return Err(TextError::invalid_override(
                        key,
                        format!("'{ch}' is already bound to <{}>", other.name()),
                    ));
                }
                CodeDisplay::Literal(ch)
            }
            _ => {
                if display.trim().is_empty() {
                    return Err(TextError::invalid_override(key, "display string is blank"));
                }
                if display.contains(['<', '>', ':', '\n', '\r']) {
                    return Err(TextError::invalid_override(
                        key,
                        "tag names cannot contain '<', '>', ':' or line breaks",
                    ));
                }
                if let Some(other) = self.code_for(display).filter(|other| *other != code) {
                    return Err(TextError::invalid_override(
                        key,
                        format!("name '{display}' already refers to {other}"),
                    ));
                }
                CodeDisplay::Tag(display.trim().to_string())
            }
        };

        self.clear_override(code);
        match &parsed {
            CodeDisplay::Literal(ch) => {
                self.literals.insert(*ch, code);
            }
            CodeDisplay::Tag(name) => {
                self.custom_tags.insert(normalize_name(name), code);
            }
        }
        self.overrides.insert(code, parsed);
        Ok(())
    }

    pub fn clear_override(&mut self, code: ControlCode) {
        match self.overrides.remove(&code) {
            Some(CodeDisplay::Literal(ch)) => {
                self.literals.remove(&ch);
            }
            Some(CodeDisplay::Tag(name)) => {
                self.custom_tags.remove(&normalize_name(&name));
            }
            None => {}
        }
    }

    /// Resolve a tag name (canonical, alias, or configured) to its code
    pub fn code_for(&self, tag: &str) -> Option<ControlCode> {
        self.custom_tags
            .get(&normalize_name(tag))
            .copied()
            .or_else(|| ControlCode::from_name(tag))
    }

    /// Tag name used when rendering `code`
    pub fn tag_for(&self, code: ControlCode) -> &str {
        match self.overrides.get(&code) {
            Some(CodeDisplay::Tag(name)) => name.as_str(),
            _ => code.name(),
        }
    }

    pub fn display_for(&self, code: ControlCode) -> CodeDisplay {
        self.overrides
            .get(&code)
            .cloned()
            .unwrap_or_else(|| CodeDisplay::Tag(code.name().to_string()))
    }

    pub fn literal_for(&self, code: ControlCode) -> Option<char> {
        match self.overrides.get(&code) {
            Some(CodeDisplay::Literal(ch)) => Some(*ch),
            _ => None,
        }
    }

    pub fn code_for_literal(&self, ch: char) -> Option<ControlCode> {
        self.literals.get(&ch).copied()
    }

    pub fn operand_arity(&self, code: ControlCode) -> Operand {
        code.operand()
    }
}
