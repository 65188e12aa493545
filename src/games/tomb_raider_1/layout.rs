//! Supported versions and their memory layouts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::memory::Pointer;
use crate::{AutosplitterError, Result};

// DOSBox keeps the emulated game's memory behind this pointer
const DOSBOX_MEMORY_BASE: i64 = 0xA786B4;

/// Game versions with a known address layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVersion {
    /// The original DOS release running inside DOSBox
    DosBox,
    /// TombATI
    Ati,
    /// TombATI running the Unfinished Business expansion
    AtiUnfinishedBusiness,
}

impl GameVersion {
    pub fn process_names(self) -> &'static [&'static str] {
        match self {
            GameVersion::DosBox => &["dosbox.exe", "DOSBox.exe"],
            GameVersion::Ati => &["tombati.exe"],
            GameVersion::AtiUnfinishedBusiness => &["tombub.exe"],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameVersion::DosBox => "DOSBox [TR 1996]",
            GameVersion::Ati => "TombATI [TR 1996]",
            GameVersion::AtiUnfinishedBusiness => "TombATI [TR:UB]",
        }
    }

    /// Built-in address layout for this version
    pub fn layout(self) -> AddressLayout {
        match self {
            GameVersion::DosBox => AddressLayout {
                level: Pointer::module_relative(DOSBOX_MEMORY_BASE, &[0x0, 0x253FD4]),
                level_time: Pointer::module_relative(DOSBOX_MEMORY_BASE, &[0x0, 0x2513AC]),
                stats_screen: Pointer::module_relative(DOSBOX_MEMORY_BASE, &[0x0, 0x243D3C]),
                picked_passport_page: Pointer::module_relative(DOSBOX_MEMORY_BASE, &[0x0, 0x245C04]),
            },
            // The expansion ships as a second build of the same TombATI engine
            GameVersion::Ati | GameVersion::AtiUnfinishedBusiness => AddressLayout {
                level: Pointer::module_relative(0x53C4C, &[]),
                level_time: Pointer::module_relative(0x5BB08, &[]),
                stats_screen: Pointer::module_relative(0x5A014, &[]),
                picked_passport_page: Pointer::module_relative(0x5A080, &[]),
            },
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GameVersion {
    type Err = AutosplitterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dosbox" | "dos_box" => Ok(GameVersion::DosBox),
            "ati" | "tombati" => Ok(GameVersion::Ati),
            "ati_ub" | "unfinished-business" | "unfinished_business" | "tombub" => {
                Ok(GameVersion::AtiUnfinishedBusiness)
            }
            _ => Err(AutosplitterError::UnsupportedVersion(s.to_string())),
        }
    }
}

/// Where each tracked value lives in the game process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLayout {
    pub level: Pointer,
    pub level_time: Pointer,
    pub stats_screen: Pointer,
    pub picked_passport_page: Pointer,
}

impl AddressLayout {
    /// Parse a layout override, e.g.
    ///
    /// ```toml
    /// [level]
    /// base_offset = 0x53C4C
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_str() {
        assert_eq!("DOSBox".parse::<GameVersion>().unwrap(), GameVersion::DosBox);
        assert_eq!("ati".parse::<GameVersion>().unwrap(), GameVersion::Ati);
        assert_eq!(
            "unfinished-business".parse::<GameVersion>().unwrap(),
            GameVersion::AtiUnfinishedBusiness
        );
        assert_eq!("TombUB".parse::<GameVersion>().unwrap(), GameVersion::AtiUnfinishedBusiness);
        assert!(matches!(
            "steam".parse::<GameVersion>(),
            Err(AutosplitterError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_unfinished_business_version() {
        let version = GameVersion::AtiUnfinishedBusiness;
        assert_eq!(version.process_names(), &["tombub.exe"]);
        assert_eq!(version.to_string(), "TombATI [TR:UB]");
        assert_eq!(version.layout(), GameVersion::Ati.layout());
    }

    #[test]
    fn test_dosbox_values_sit_behind_emulator_base() {
        let layout = GameVersion::DosBox.layout();
        for pointer in [&layout.level, &layout.level_time, &layout.stats_screen, &layout.picked_passport_page] {
            assert_eq!(pointer.base_offset, DOSBOX_MEMORY_BASE);
            assert_eq!(pointer.offsets.len(), 2);
        }
    }

    #[test]
    fn test_layout_override_from_toml() {
        let document = r#"
            [level]
            base_offset = 0x1000

            [level_time]
            base_offset = 0x2000
            offsets = [0, 16]

            [stats_screen]
            base_offset = 0x3000

            [picked_passport_page]
            base_offset = 0x4000
        "#;

        let layout = AddressLayout::from_toml_str(document).unwrap();
        assert_eq!(layout.level, Pointer::module_relative(0x1000, &[]));
        assert_eq!(layout.level_time.offsets, vec![0, 16]);
        assert!(AddressLayout::from_toml_str("[level]").is_err());
    }
}
