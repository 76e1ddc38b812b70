use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ghostscript `-dPDFSETTINGS` quality presets, ordered by spinner index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Output useful across a wide variety of uses, possibly larger.
    Default,
    /// Similar to Acrobat Distiller "Prepress Optimized".
    Prepress,
    /// Similar to Acrobat Distiller "Print Optimized".
    Printer,
    /// Medium-resolution output, Acrobat Distiller "eBook".
    Ebook,
    /// Low-resolution output, Acrobat Distiller "Screen Optimized".
    Screen,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Default,
        Preset::Prepress,
        Preset::Printer,
        Preset::Ebook,
        Preset::Screen,
    ];

    /// Index used when the caller does not choose one (printer).
    pub const DEFAULT_INDEX: u8 = 2;
    pub const MAX_INDEX: u8 = 4;

    pub fn from_index(index: i64) -> Result<Self, CompressError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(CompressError::InvalidPreset(index))
    }

    pub fn index(self) -> u8 {
        match self {
            Preset::Default => 0,
            Preset::Prepress => 1,
            Preset::Printer => 2,
            Preset::Ebook => 3,
            Preset::Screen => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Prepress => "prepress",
            Preset::Printer => "printer",
            Preset::Ebook => "ebook",
            Preset::Screen => "screen",
        }
    }

    /// Value passed as `-dPDFSETTINGS=<flag>`.
    pub fn flag(self) -> &'static str {
        match self {
            Preset::Default => "/default",
            Preset::Prepress => "/prepress",
            Preset::Printer => "/printer",
            Preset::Ebook => "/ebook",
            Preset::Screen => "/screen",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Default => "general purpose, possibly larger output",
            Preset::Prepress => "high quality, color preserving (Prepress Optimized)",
            Preset::Printer => "print quality (Print Optimized)",
            Preset::Ebook => "medium resolution (eBook)",
            Preset::Screen => "low resolution, smallest output (Screen Optimized)",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
