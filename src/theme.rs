use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const USER_CONFIG_APP_DIR: &str = "grid-snake";
const PALETTE_FILE_NAME: &str = "palette.json";

/// Colours used by the renderer, HUD and overlays.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub board_bg: Color,
    pub border: Color,
    pub hud_text: Color,
    pub hud_accent: Color,
    pub overlay_bg: Color,
    pub overlay_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            snake_head: Color::Rgb(0x38, 0x8E, 0x3C),
            snake_body: Color::Rgb(0x4C, 0xAF, 0x50),
            food: Color::Rgb(0xFF, 0x57, 0x22),
            board_bg: Color::Rgb(0x11, 0x11, 0x11),
            border: Color::Rgb(0x44, 0x44, 0x44),
            hud_text: Color::Gray,
            hud_accent: Color::White,
            // Black at 70% over the dark board.
            overlay_bg: Color::Rgb(0x05, 0x05, 0x05),
            overlay_text: Color::White,
        }
    }
}

/// Errors raised while loading a palette override.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("failed to read palette file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid palette json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid colour {value:?} for {field}")]
    Color { field: &'static str, value: String },
}

/// Palette file layout; every field is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    snake_head: Option<String>,
    snake_body: Option<String>,
    food: Option<String>,
    board_bg: Option<String>,
    border: Option<String>,
    hud_text: Option<String>,
    hud_accent: Option<String>,
    overlay_bg: Option<String>,
    overlay_text: Option<String>,
}

/// Resolves the palette for this session.
///
/// An explicit path must exist and parse. Without one, the user config file
/// is used when present and the built-in palette otherwise.
pub fn resolve_palette(explicit: Option<&Path>) -> Result<Palette, PaletteError> {
    if let Some(path) = explicit {
        return load_palette(path);
    }

    match user_palette_path() {
        Some(path) if path.is_file() => load_palette(&path),
        _ => Ok(Palette::default()),
    }
}

/// Loads a palette override file and applies it over the defaults.
pub fn load_palette(path: &Path) -> Result<Palette, PaletteError> {
    let raw = fs::read_to_string(path).map_err(|source| PaletteError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let palette = parse_palette(&raw)?;
    debug!(path = %path.display(), "loaded palette override");
    Ok(palette)
}

/// Parses palette JSON, keeping default colours for absent fields.
pub fn parse_palette(raw: &str) -> Result<Palette, PaletteError> {
    let file = serde_json::from_str::<PaletteFile>(raw)?;
    let mut palette = Palette::default();

    apply(&mut palette.snake_head, "snake_head", file.snake_head)?;
    apply(&mut palette.snake_body, "snake_body", file.snake_body)?;
    apply(&mut palette.food, "food", file.food)?;
    apply(&mut palette.board_bg, "board_bg", file.board_bg)?;
    apply(&mut palette.border, "border", file.border)?;
    apply(&mut palette.hud_text, "hud_text", file.hud_text)?;
    apply(&mut palette.hud_accent, "hud_accent", file.hud_accent)?;
    apply(&mut palette.overlay_bg, "overlay_bg", file.overlay_bg)?;
    apply(&mut palette.overlay_text, "overlay_text", file.overlay_text)?;

    Ok(palette)
}

fn apply(slot: &mut Color, field: &'static str, value: Option<String>) -> Result<(), PaletteError> {
    let Some(value) = value else {
        return Ok(());
    };

    *slot = parse_color(&value).ok_or(PaletteError::Color { field, value })?;
    Ok(())
}

fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("reset") {
        return Some(Color::Reset);
    }

    parse_hex_color(value).or_else(|| value.parse::<Color>().ok())
}

fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(red, green, blue))
}

/// Returns the per-user palette file location.
#[must_use]
pub fn user_palette_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join(USER_CONFIG_APP_DIR).join(PALETTE_FILE_NAME))
}
