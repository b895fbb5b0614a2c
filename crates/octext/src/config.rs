//! TOML configuration
//!
//! ```toml
//! [overrides]
//! "A Button" = "@"
//! "0x1B" = "Choose Two"
//!
//! [layout]
//! bank_base = 0x008C6000
//! patch_description = "My translation"
//! ```

use crate::codes::{CodeTable, ControlCode};
use crate::common::{TextError, TextResult};
use crate::patch::RomLayout;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Code (tag name or hex byte) to display string
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub layout: RomLayout,
}

impl Config {
    pub fn load(path: &Path) -> TextResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| TextError::config(format!("{}: {e}", path.display())))?;
        let config: Self = toml::from_str(&source)
            .map_err(|e| TextError::config(format!("{}: {e}", path.display())))?;
        log::debug!(
            "loaded config {} ({} overrides)",
            path.display(),
            config.overrides.len()
        );
        Ok(config)
    }

    pub fn parse(source: &str) -> TextResult<Self> {
        toml::from_str(source).map_err(|e| TextError::config(e.to_string()))
    }

    /// Build the code table the codec runs with
    pub fn code_table(&self) -> TextResult<CodeTable> {
        let mut table = CodeTable::new();
        for (key, display) in &self.overrides {
            let code = resolve_code(key)
                .ok_or_else(|| TextError::invalid_override(key, "no control code with this name"))?;
            table.set_override(code, display)?;
        }
        Ok(table)
    }
}

/// Tag name, alias, or `0xNN` byte
fn resolve_code(key: &str) -> Option<ControlCode> {
    let key = key.trim();
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok().and_then(ControlCode::from_byte),
        None => ControlCode::from_name(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodeDisplay;
    use crate::patch::TABLE_BASE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.overrides.is_empty());
        assert_eq!(config.layout, RomLayout::default());
    }

    #[test]
    fn test_overrides_by_name_and_byte() {
        let config = Config::parse(
            "[overrides]\n\"A Button\" = \"@\"\n\"0x1B\" = \"Choose Two\"\n",
        )
        .unwrap();
        let table = config.code_table().unwrap();
        assert_eq!(table.literal_for(ControlCode::AButton), Some('@'));
        assert_eq!(
            table.display_for(ControlCode::TwoChoices),
            CodeDisplay::Tag("Choose Two".to_string())
        );
        assert_eq!(table.code_for("choose two"), Some(ControlCode::TwoChoices));
    }

    #[test]
    fn test_unknown_override_key() {
        let config = Config::parse("[overrides]\n\"Z Button\" = \"z\"\n").unwrap();
        let err = config.code_table().unwrap_err();
        assert!(matches!(err, TextError::InvalidOverride { ref key, .. } if key == "Z Button"));
    }

    #[test]
    fn test_operand_codes_cannot_be_overridden() {
        let config = Config::parse("[overrides]\nColor = \"#\"\n").unwrap();
        assert!(matches!(
            config.code_table().unwrap_err(),
            TextError::InvalidOverride { .. }
        ));
    }

    #[test]
    fn test_layout_section() {
        let config = Config::parse("[layout]\nsegment = 8\npatch_description = \"mine\"\n").unwrap();
        assert_eq!(config.layout.segment, 8);
        assert_eq!(config.layout.patch_description, "mine");
        assert_eq!(config.layout.table_base, TABLE_BASE);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(matches!(
            Config::parse("[colours]\nred = 1\n").unwrap_err(),
            TextError::Config { .. }
        ));
    }
}
