//! Tool descriptors and the tool palette.

use crate::color::InkColor;
use crate::config::PadConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tool validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("Pen thickness must be a positive number, got {0}")]
    InvalidThickness(f64),
    #[error("Pen color must be opaque, got {0}")]
    TranslucentColor(InkColor),
    #[error("Sticker glyph must not be empty")]
    EmptyGlyph,
}

/// The ambient tool used by the next pointer-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Tool {
    /// Freehand marker.
    Pen { thickness: f64, color: InkColor },
    /// Emoji sticker.
    Sticker { glyph: String },
}

impl Tool {
    /// Validated pen tool. Ink is always opaque.
    pub fn pen(thickness: f64, color: InkColor) -> Result<Self, ToolError> {
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(ToolError::InvalidThickness(thickness));
        }
        if !color.is_opaque() {
            return Err(ToolError::TranslucentColor(color));
        }
        Ok(Tool::Pen { thickness, color })
    }

    /// Validated sticker tool. Surrounding whitespace is trimmed.
    pub fn sticker(glyph: &str) -> Result<Self, ToolError> {
        let glyph = glyph.trim();
        if glyph.is_empty() {
            return Err(ToolError::EmptyGlyph);
        }
        Ok(Tool::Sticker {
            glyph: glyph.to_string(),
        })
    }

    /// Re-check a tool built without the constructors (e.g. deserialized).
    pub fn validate(&self) -> Result<(), ToolError> {
        match self {
            Tool::Pen { thickness, color } => Tool::pen(*thickness, *color).map(|_| ()),
            Tool::Sticker { glyph } => {
                if glyph.trim().is_empty() {
                    Err(ToolError::EmptyGlyph)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn is_pen(&self) -> bool {
        matches!(self, Tool::Pen { .. })
    }

    pub fn is_sticker(&self) -> bool {
        matches!(self, Tool::Sticker { .. })
    }
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Pen {
            thickness: 3.0,
            color: InkColor::BLACK,
        }
    }
}

/// A named tool in the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub label: String,
    pub tool: Tool,
}

/// The set of tools offered to the user.
#[derive(Debug, Clone, Default)]
pub struct ToolPalette {
    entries: Vec<PaletteEntry>,
}

impl ToolPalette {
    /// Create an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker presets followed by the default stickers.
    ///
    /// Presets and stickers that fail validation are skipped.
    pub fn from_config(config: &PadConfig) -> Self {
        let mut palette = Self::new();
        for marker in &config.markers {
            match Tool::pen(marker.thickness, marker.color) {
                Ok(tool) => palette.entries.push(PaletteEntry {
                    label: marker.name.clone(),
                    tool,
                }),
                Err(e) => log::warn!("Skipping marker preset '{}': {}", marker.name, e),
            }
        }
        for glyph in &config.stickers {
            if let Err(e) = palette.add_custom_sticker(glyph) {
                log::warn!("Skipping sticker {:?}: {}", glyph, e);
            }
        }
        palette
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Tool> {
        self.entries.get(index).map(|e| &e.tool)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First palette entry, or a thin black pen if the palette is empty.
    pub fn default_tool(&self) -> Tool {
        self.get(0).cloned().unwrap_or_default()
    }

    /// Sticker glyphs in palette order.
    pub fn stickers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match &e.tool {
            Tool::Sticker { glyph } => Some(glyph.as_str()),
            Tool::Pen { .. } => None,
        })
    }

    /// Add a user-supplied sticker.
    ///
    /// Empty or whitespace-only text is rejected. A glyph already in the
    /// palette is not added twice; the existing tool is returned.
    pub fn add_custom_sticker(&mut self, text: &str) -> Result<Tool, ToolError> {
        let tool = Tool::sticker(text)?;
        if let Some(existing) = self.entries.iter().find(|e| e.tool == tool) {
            return Ok(existing.tool.clone());
        }
        if let Tool::Sticker { glyph } = &tool {
            self.entries.push(PaletteEntry {
                label: glyph.clone(),
                tool: tool.clone(),
            });
        }
        Ok(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_rejects_bad_thickness() {
        assert_eq!(
            Tool::pen(0.0, InkColor::BLACK),
            Err(ToolError::InvalidThickness(0.0))
        );
        assert!(Tool::pen(-2.0, InkColor::BLACK).is_err());
        assert!(Tool::pen(f64::NAN, InkColor::BLACK).is_err());
        assert!(Tool::pen(3.0, InkColor::BLACK).is_ok());
    }

    #[test]
    fn test_pen_rejects_translucent_color() {
        let half_black = InkColor::new(0, 0, 0, 128);
        assert_eq!(
            Tool::pen(3.0, half_black),
            Err(ToolError::TranslucentColor(half_black))
        );

        // deserialized tools go through the same check
        let tool = Tool::Pen {
            thickness: 3.0,
            color: half_black,
        };
        assert_eq!(tool.validate(), Err(ToolError::TranslucentColor(half_black)));
    }

    #[test]
    fn test_palette_skips_translucent_marker() {
        let mut config = PadConfig::default();
        config.markers[0].color = InkColor::new(255, 0, 0, 10);
        let palette = ToolPalette::from_config(&config);
        assert_eq!(palette.len(), config.markers.len() + config.stickers.len() - 1);
        assert_eq!(palette.entries()[0].label, "Thick");
    }

    #[test]
    fn test_sticker_trims_and_rejects_empty() {
        assert_eq!(
            Tool::sticker("  🔥 "),
            Ok(Tool::Sticker {
                glyph: "🔥".to_string()
            })
        );
        assert_eq!(Tool::sticker(""), Err(ToolError::EmptyGlyph));
        assert_eq!(Tool::sticker(" \t\n"), Err(ToolError::EmptyGlyph));
    }

    #[test]
    fn test_tool_serde_uses_kind_tag() {
        let json = serde_json::to_value(Tool::sticker("⭐").unwrap()).unwrap();
        assert_eq!(json["kind"], "sticker");
        assert_eq!(json["glyph"], "⭐");

        let pen: Tool = serde_json::from_str(
            r#"{"kind":"pen","thickness":3.0,"color":{"r":0,"g":0,"b":0,"a":255}}"#,
        )
        .unwrap();
        assert_eq!(pen, Tool::default());
    }

    #[test]
    fn test_validate_deserialized_sticker() {
        let tool: Tool = serde_json::from_str(r#"{"kind":"sticker","glyph":"  "}"#).unwrap();
        assert_eq!(tool.validate(), Err(ToolError::EmptyGlyph));
    }

    #[test]
    fn test_palette_from_default_config() {
        let palette = ToolPalette::from_config(&PadConfig::default());
        assert!(palette.get(0).is_some_and(Tool::is_pen));
        assert_eq!(palette.default_tool(), *palette.get(0).unwrap());
        assert_eq!(palette.stickers().count(), PadConfig::default().stickers.len());
    }

    #[test]
    fn test_add_custom_sticker() {
        let mut palette = ToolPalette::new();
        assert_eq!(palette.add_custom_sticker("   "), Err(ToolError::EmptyGlyph));
        assert!(palette.is_empty());

        palette.add_custom_sticker("🦀").unwrap();
        palette.add_custom_sticker(" 🦀 ").unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.stickers().collect::<Vec<_>>(), vec!["🦀"]);
    }

    #[test]
    fn test_empty_palette_default_tool() {
        assert_eq!(ToolPalette::new().default_tool(), Tool::default());
    }
}
