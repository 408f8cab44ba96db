//! Distribution-channel build modes and their scripting-define tokens.
//!
//! Each build mode contributes at most one conditional-compilation symbol to
//! the player settings. Swapping modes removes every known mode token from
//! the active define string before adding the new one, so two channels can
//! never be compiled in at once, while unrelated symbols (post-processing
//! stack and friends) pass through untouched.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

const SEPARATOR: char = ';';

/// Distribution channel a build is produced for. `None` is DRM-free.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
pub enum BuildMode {
    #[default]
    None,
    Steam,
    #[serde(rename = "GOG")]
    Gog,
    Arcade,
    Switch,
}

impl BuildMode {
    pub fn from_str_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(Self::None),
            "Steam" => Some(Self::Steam),
            "GOG" => Some(Self::Gog),
            "Arcade" => Some(Self::Arcade),
            "Switch" => Some(Self::Switch),
            _ => None,
        }
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Steam => "Steam",
            Self::Gog => "GOG",
            Self::Arcade => "Arcade",
            Self::Switch => "Switch",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

/// Immutable mode -> define-token table, built once at startup and shared by
/// reference.
#[derive(Debug, Clone)]
pub struct DefineRegistry {
    tokens: HashMap<BuildMode, String>,
}

impl Default for DefineRegistry {
    fn default() -> Self {
        Self::with_entries([
            (BuildMode::None, ""),
            (BuildMode::Steam, "STEAM_BUILD"),
            (BuildMode::Gog, "GOG_BUILD"),
            (BuildMode::Arcade, "ARCADE_BUILD"),
            (BuildMode::Switch, ""),
        ])
    }
}

impl DefineRegistry {
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (BuildMode, S)>,
        S: Into<String>,
    {
        Self {
            tokens: entries
                .into_iter()
                .map(|(mode, token)| (mode, token.into()))
                .collect(),
        }
    }

    /// The define token registered for `mode`. Modes without an entry report
    /// `None`; callers treat that as a no-op define.
    pub fn token(&self, mode: BuildMode) -> Option<&str> {
        self.tokens.get(&mode).map(String::as_str)
    }

    /// Replaces whichever mode token is active with the one for `mode`.
    ///
    /// Every registered token is removed first, not just the target mode's,
    /// so stray tokens left by manual edits are cleaned up in the same pass.
    /// Unregistered symbols keep their original order; the new token lands at
    /// the end. Unknown modes leave the string untouched.
    pub fn swap(&self, defines: &str, mode: BuildMode) -> String {
        let token = match self.token(mode) {
            Some(token) => token,
            None => {
                tracing::warn!(mode = %mode, "no define registered for mode, leaving defines unchanged");
                return defines.to_string();
            }
        };

        let mut symbols = split(defines);
        symbols.retain(|symbol| !self.tokens.values().any(|t| t == symbol));
        join_with(symbols, token)
    }

    /// Restores a previously captured define string: registered mode tokens
    /// are stripped from `defines`, then every symbol of `snapshot` is added
    /// back (without duplicates).
    pub fn restore(&self, defines: &str, snapshot: &str) -> String {
        let mut symbols = split(defines);
        symbols.retain(|symbol| !self.tokens.values().any(|t| t == symbol));
        for symbol in split(snapshot) {
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        symbols.join(&SEPARATOR.to_string())
    }
}

/// Appends `token` to a define string unless already present.
pub fn add(defines: &str, token: &str) -> String {
    join_with(split(defines), token)
}

/// Removes every occurrence of `token` from a define string.
pub fn remove(defines: &str, token: &str) -> String {
    let mut symbols = split(defines);
    symbols.retain(|symbol| *symbol != token);
    symbols.join(&SEPARATOR.to_string())
}

fn split(defines: &str) -> Vec<&str> {
    defines
        .split(SEPARATOR)
        .filter(|symbol| !symbol.is_empty())
        .collect()
}

fn join_with<'a>(mut symbols: Vec<&'a str>, token: &'a str) -> String {
    if !token.is_empty() && !symbols.contains(&token) {
        symbols.push(token);
    }
    symbols.join(&SEPARATOR.to_string())
}
