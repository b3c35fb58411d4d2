use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Square,
    Triangle,
    Corner,
    Stair,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Corner,
        ShapeKind::Stair,
    ];

    /// Numeric code used by the compact wire format.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            ShapeKind::Square => 0,
            ShapeKind::Triangle => 1,
            ShapeKind::Corner => 2,
            ShapeKind::Stair => 3,
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Accepts the names older payloads used, including short and plural forms.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "square" | "sq" | "s" | "foundation" => Some(ShapeKind::Square),
            "triangle" | "tri" | "t" => Some(ShapeKind::Triangle),
            "corner" | "c" => Some(ShapeKind::Corner),
            "stair" | "stairs" | "st" => Some(ShapeKind::Stair),
            _ => None,
        }
    }

    #[must_use]
    pub fn vertex_count(self) -> usize {
        match self {
            ShapeKind::Square | ShapeKind::Stair => 4,
            ShapeKind::Triangle | ShapeKind::Corner => 3,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Corner => "corner",
            ShapeKind::Stair => "stair",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a corner piece's outer side is finished. Decides both the drawn
/// outline and the collision footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilletStyle {
    Round,
    Stepped,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildingStyle {
    #[default]
    A,
    B,
    C,
    D,
}

impl BuildingStyle {
    pub const ALL: [BuildingStyle; 4] = [
        BuildingStyle::A,
        BuildingStyle::B,
        BuildingStyle::C,
        BuildingStyle::D,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            BuildingStyle::A => 0,
            BuildingStyle::B => 1,
            BuildingStyle::C => 2,
            BuildingStyle::D => 3,
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "A" => Some(BuildingStyle::A),
            "B" => Some(BuildingStyle::B),
            "C" => Some(BuildingStyle::C),
            "D" => Some(BuildingStyle::D),
            _ => None,
        }
    }

    #[must_use]
    pub fn fillet(self) -> FilletStyle {
        match self {
            BuildingStyle::A | BuildingStyle::D => FilletStyle::Round,
            BuildingStyle::B => FilletStyle::Stepped,
            BuildingStyle::C => FilletStyle::Diagonal,
        }
    }

    /// Material units one piece of this style consumes.
    #[must_use]
    pub fn material_cost(self) -> u32 {
        match self {
            BuildingStyle::A => 50,
            BuildingStyle::B => 100,
            BuildingStyle::C => 150,
            BuildingStyle::D => 300,
        }
    }
}

impl fmt::Display for BuildingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildingStyle::A => "A",
            BuildingStyle::B => "B",
            BuildingStyle::C => "C",
            BuildingStyle::D => "D",
        };
        f.write_str(s)
    }
}

/// Arena key of a committed shape. Unique within one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
