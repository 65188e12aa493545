//! Level identifiers as stored in game memory

use std::fmt;

use serde::{Deserialize, Serialize};

/// The game's level and cutscene values.
///
/// Values up to [`Level::TheGreatPyramid`] are playable levels; everything
/// above is a cutscene, FMV or the title screen. Ordering follows the
/// in-memory value, which is also the completion order of a full-game run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Level {
    Manor = 0,
    Caves = 1,
    Vilcabamba = 2,
    LostValley = 3,
    Qualopec = 4,
    StFrancisFolly = 5,
    Colosseum = 6,
    PalaceMidas = 7,
    Cistern = 8,
    Tihocan = 9,
    CityOfKhamoon = 10,
    ObeliskOfKhamoon = 11,
    SanctuaryScion = 12,
    NatlasMines = 13,
    Atlantis = 14,
    TheGreatPyramid = 15,
    // Cutscenes and title screen
    QualopecCutscene = 16,
    TihocanCutscene = 17,
    MinesToAtlantis = 18,
    AfterAtlantisFmv = 19,
    TitleAndFirstFmv = 20,
}

/// Number of levels in a full-game run (Caves through The Great Pyramid)
pub const NUMBER_OF_LEVELS: usize = 15;

impl Level {
    pub const ALL: [Level; 21] = [
        Level::Manor,
        Level::Caves,
        Level::Vilcabamba,
        Level::LostValley,
        Level::Qualopec,
        Level::StFrancisFolly,
        Level::Colosseum,
        Level::PalaceMidas,
        Level::Cistern,
        Level::Tihocan,
        Level::CityOfKhamoon,
        Level::ObeliskOfKhamoon,
        Level::SanctuaryScion,
        Level::NatlasMines,
        Level::Atlantis,
        Level::TheGreatPyramid,
        Level::QualopecCutscene,
        Level::TihocanCutscene,
        Level::MinesToAtlantis,
        Level::AfterAtlantisFmv,
        Level::TitleAndFirstFmv,
    ];

    /// First level of a full-game run
    pub const FIRST: Level = Level::Caves;

    /// Last playable level
    pub const LAST_REAL: Level = Level::TheGreatPyramid;

    /// Look up a raw in-memory value
    pub fn from_id(id: u32) -> Option<Level> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u32 {
        self as u32
    }

    /// A playable level rather than a cutscene, FMV or title screen
    pub fn is_real(self) -> bool {
        self <= Self::LAST_REAL
    }

    /// The last playable level the runner was on.
    ///
    /// Cutscenes map back to the level that precedes them. The title screen
    /// has no such level.
    pub fn last_real_level(self) -> Option<Level> {
        match self {
            level if level.is_real() => Some(level),
            Level::QualopecCutscene => Some(Level::Qualopec),
            Level::TihocanCutscene => Some(Level::Tihocan),
            Level::MinesToAtlantis => Some(Level::NatlasMines),
            Level::AfterAtlantisFmv => Some(Level::Atlantis),
            _ => None,
        }
    }

    /// The level with the next in-memory value
    pub fn next(self) -> Option<Level> {
        Self::from_id(self.id() + 1)
    }

    /// The level with the previous in-memory value
    pub fn previous(self) -> Option<Level> {
        self.id().checked_sub(1).and_then(Self::from_id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Manor => "Lara's Home",
            Level::Caves => "Caves",
            Level::Vilcabamba => "City of Vilcabamba",
            Level::LostValley => "Lost Valley",
            Level::Qualopec => "Tomb of Qualopec",
            Level::StFrancisFolly => "St. Francis' Folly",
            Level::Colosseum => "Colosseum",
            Level::PalaceMidas => "Palace Midas",
            Level::Cistern => "The Cistern",
            Level::Tihocan => "Tomb of Tihocan",
            Level::CityOfKhamoon => "City of Khamoon",
            Level::ObeliskOfKhamoon => "Obelisk of Khamoon",
            Level::SanctuaryScion => "Sanctuary of the Scion",
            Level::NatlasMines => "Natla's Mines",
            Level::Atlantis => "Atlantis",
            Level::TheGreatPyramid => "The Great Pyramid",
            Level::QualopecCutscene => "Qualopec Cutscene",
            Level::TihocanCutscene => "Tihocan Cutscene",
            Level::MinesToAtlantis => "Mines to Atlantis",
            Level::AfterAtlantisFmv => "After Atlantis FMV",
            Level::TitleAndFirstFmv => "Title Screen",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
