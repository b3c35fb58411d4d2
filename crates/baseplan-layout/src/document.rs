//! Human-editable design documents (YAML or JSON).

use baseplan_core::{BuildingStyle, ShapeKind, Vec2};
use baseplan_geometry::{GeometryError, Piece};
use serde::{Deserialize, Serialize};

use crate::{BuildableArea, Design, LayoutError, Settings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignDocument {
    pub settings: Settings,
    pub floors: Vec<FloorDocument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub areas: Vec<BuildableArea>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorDocument {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub shapes: Vec<ShapeDocument>,
}

/// A shape given by pose, or by explicit vertices when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub kind: ShapeKind,
    #[serde(default)]
    pub style: BuildingStyle,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Vec2>>,
}

impl ShapeDocument {
    #[must_use]
    pub fn from_piece(piece: &Piece) -> Self {
        let c = piece.centroid();
        Self {
            kind: piece.kind(),
            style: piece.style(),
            x: c.x,
            y: c.y,
            rotation: piece.rotation(),
            vertices: Some(piece.vertices().to_vec()),
        }
    }

    pub fn to_piece(&self) -> Result<Piece, GeometryError> {
        match &self.vertices {
            Some(v) => Piece::from_vertices(self.kind, self.style, v.clone()),
            None => Ok(Piece::new(
                self.kind,
                self.style,
                Vec2::new(self.x, self.y),
                self.rotation,
            )),
        }
    }
}

impl DesignDocument {
    /// Build a design, validating every shape as if it were placed by hand.
    /// The result starts with an empty undo history.
    pub fn into_design(self) -> Result<Design, LayoutError> {
        let mut design = Design::with_settings(self.settings);
        if !self.areas.is_empty() {
            design.areas = self.areas;
        }
        for floor in self.floors {
            for shape in floor.shapes {
                design.insert_piece(floor.index, shape.to_piece()?)?;
            }
        }
        design.history.clear();
        Ok(design)
    }

    #[must_use]
    pub fn from_design(design: &Design) -> Self {
        Self {
            settings: design.settings.clone(),
            floors: design
                .floors()
                .map(|(index, floor)| FloorDocument {
                    index,
                    shapes: floor
                        .shapes()
                        .map(|s| ShapeDocument::from_piece(&s.piece))
                        .collect(),
                })
                .collect(),
            areas: design.areas().to_vec(),
        }
    }
}
