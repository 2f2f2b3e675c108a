//! Theme system for editor hosts
//!
//! Provides YAML-based themes with compile-time embedded built-ins. The
//! editing core never reads colors; a host resolves token kinds to colors
//! through [`EditorTheme::color_for`] at render time.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::syntax::TokenKind;

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/default-dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/default-light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as ARGB u32
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim_start_matches('#');
        if !hex.is_ascii() {
            bail!("Invalid color format: {}", s);
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("Invalid color: {}", s))
        };
        match hex.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => bail!("Invalid color format: {}", s),
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub editor: EditorColorsData,
    /// Token kind → hex color; missing kinds use the editor foreground
    #[serde(default)]
    pub syntax: BTreeMap<TokenKind, String>,
}

/// Editor surface colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct EditorColorsData {
    pub background: String,
    pub foreground: String,
    pub cursor: String,
    #[serde(default)]
    pub selection_background: Option<String>,
    #[serde(default)]
    pub current_line_background: Option<String>,
    #[serde(default)]
    pub secondary_cursor: Option<String>,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq)]
pub struct EditorTheme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    pub cursor: Color,
    /// Background color for selected text
    pub selection_background: Color,
    pub current_line_background: Color,
    /// Color for non-primary cursors in multi-cursor mode
    pub secondary_cursor: Color,
    pub syntax: BTreeMap<TokenKind, Color>,
}

fn optional_color(value: &Option<String>, fallback: Color) -> Result<Color> {
    value
        .as_deref()
        .map(Color::from_hex)
        .transpose()
        .map(|c| c.unwrap_or(fallback))
}

impl EditorTheme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let data: ThemeData = serde_yaml::from_str(yaml).context("YAML parse error")?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self> {
        let Some(entry) = BUILTIN_THEMES.iter().find(|t| t.id == id) else {
            bail!("Unknown theme id: {}", id);
        };
        Self::from_yaml(entry.yaml).with_context(|| format!("Built-in theme {}", id))
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self> {
        let editor = &data.editor;
        let syntax = data
            .syntax
            .iter()
            .map(|(kind, hex)| {
                Color::from_hex(hex)
                    .with_context(|| format!("syntax.{}", kind.name()))
                    .map(|c| (*kind, c))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(EditorTheme {
            name: data.name,
            background: Color::from_hex(&editor.background).context("editor.background")?,
            foreground: Color::from_hex(&editor.foreground).context("editor.foreground")?,
            cursor: Color::from_hex(&editor.cursor).context("editor.cursor")?,
            selection_background: optional_color(
                &editor.selection_background,
                Color::rgb(0x26, 0x4F, 0x78),
            )?,
            current_line_background: optional_color(
                &editor.current_line_background,
                Color::rgb(0x2A, 0x2A, 0x2A),
            )?,
            secondary_cursor: optional_color(
                &editor.secondary_cursor,
                Color::rgba(0xFF, 0xFF, 0xFF, 0x80),
            )?,
            syntax,
        })
    }

    /// Color for a token kind, falling back to the foreground
    pub fn color_for(&self, kind: TokenKind) -> Color {
        self.syntax.get(&kind).copied().unwrap_or(self.foreground)
    }

    /// Default dark theme (YAML-backed with Rust fallback)
    pub fn default_dark() -> Self {
        match Self::from_yaml(DEFAULT_DARK_YAML) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Failed to parse built-in dark theme: {:#}", e);
                EditorTheme {
                    name: "Default Dark".to_string(),
                    background: Color::rgb(0x1E, 0x1E, 0x1E),
                    foreground: Color::rgb(0xD4, 0xD4, 0xD4),
                    cursor: Color::rgb(0xFF, 0xFF, 0xFF),
                    selection_background: Color::rgb(0x26, 0x4F, 0x78),
                    current_line_background: Color::rgb(0x2A, 0x2A, 0x2A),
                    secondary_cursor: Color::rgba(0xFF, 0xFF, 0xFF, 0x80),
                    syntax: BTreeMap::new(),
                }
            }
        }
    }
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self::default_dark()
    }
}
