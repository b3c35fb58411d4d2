//! Copy/paste and reusable patterns of connected shapes.

use baseplan_core::{BuildingStyle, ShapeId, ShapeKind, Vec2};
use baseplan_geometry::Piece;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::group::group_centroid;
use crate::{Design, LayoutError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipEntry {
    pub kind: ShapeKind,
    pub style: BuildingStyle,
    /// Relative to the copied group's centroid.
    pub vertices: Vec<Vec2>,
}

/// A copied group, ready to be pasted anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    entries: Vec<ClipEntry>,
}

impl Clipboard {
    /// Copy the connected group around `seed`.
    pub fn copy(design: &Design, floor: u32, seed: ShapeId) -> Result<Self, LayoutError> {
        let pieces = member_pieces(design, floor, seed)?;
        let center = group_centroid(pieces.iter().copied());
        let entries = pieces
            .into_iter()
            .map(|p| ClipEntry {
                kind: p.kind(),
                style: p.style(),
                vertices: p.vertices().iter().map(|v| *v - center).collect(),
            })
            .collect();
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The copied pieces with their group centroid at `at`.
    pub fn pieces_at(&self, at: Vec2) -> Result<Vec<Piece>, LayoutError> {
        self.entries
            .iter()
            .map(|e| {
                let vertices = e.vertices.iter().map(|v| *v + at).collect();
                Piece::from_vertices(e.kind, e.style, vertices).map_err(LayoutError::from)
            })
            .collect()
    }

    /// Paste as one unit centered on `at`.
    pub fn paste(
        &self,
        design: &mut Design,
        floor: u32,
        at: Vec2,
    ) -> Result<Vec<ShapeId>, LayoutError> {
        let pieces = self.pieces_at(at)?;
        design.insert_pieces(floor, pieces)
    }
}

/// One member of a pattern.
///
/// `vertices` are relative to the member's own centroid and `offset` is that
/// centroid relative to the pattern's. Older saved patterns may lack the
/// vertices and carry only a rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternShape {
    pub kind: ShapeKind,
    #[serde(default)]
    pub style: BuildingStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Vec2>>,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub shapes: Vec<PatternShape>,
}

impl Pattern {
    /// Capture the connected group around `seed`.
    pub fn capture(
        name: impl Into<String>,
        design: &Design,
        floor: u32,
        seed: ShapeId,
    ) -> Result<Self, LayoutError> {
        let pieces = member_pieces(design, floor, seed)?;
        let center = group_centroid(pieces.iter().copied());
        let shapes = pieces
            .into_iter()
            .map(|p| PatternShape {
                kind: p.kind(),
                style: p.style(),
                vertices: Some(p.vertices().iter().map(|v| *v - p.centroid()).collect()),
                offset: p.centroid() - center,
                rotation: Some(p.rotation()),
            })
            .collect();
        Ok(Self {
            name: name.into(),
            shapes,
        })
    }

    /// Replay the pattern with its centroid at `at`, turned by `rotation`
    /// degrees. Members that cannot be rebuilt are skipped.
    #[must_use]
    pub fn instantiate(&self, at: Vec2, rotation: f64) -> Vec<Piece> {
        self.shapes
            .iter()
            .filter_map(|shape| self.build(shape, at + shape.offset.rotated(rotation), rotation))
            .collect()
    }

    /// Instantiate and commit as one unit.
    pub fn place(
        &self,
        design: &mut Design,
        floor: u32,
        at: Vec2,
        rotation: f64,
    ) -> Result<Vec<ShapeId>, LayoutError> {
        design.insert_pieces(floor, self.instantiate(at, rotation))
    }

    fn build(&self, shape: &PatternShape, centroid: Vec2, rotation: f64) -> Option<Piece> {
        if let Some(relative) = &shape.vertices {
            let placed = relative.iter().map(|v| v.rotated(rotation) + centroid).collect();
            match Piece::from_vertices(shape.kind, shape.style, placed) {
                Ok(piece) => return Some(piece),
                Err(err) => tracing::warn!(
                    pattern = %self.name,
                    %err,
                    "unusable pattern vertices, rebuilding from rotation"
                ),
            }
        }
        match shape.rotation {
            Some(own) => Some(Piece::new(shape.kind, shape.style, centroid, own + rotation)),
            None => {
                tracing::warn!(
                    pattern = %self.name,
                    kind = %shape.kind,
                    "pattern member has neither vertices nor rotation, skipped"
                );
                None
            }
        }
    }
}

/// Named patterns in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternLibrary {
    patterns: IndexMap<String, Pattern>,
}

impl PatternLibrary {
    /// Add `pattern`, replacing any pattern with the same name.
    pub fn insert(&mut self, pattern: Pattern) -> Option<Pattern> {
        self.patterns.insert(pattern.name.clone(), pattern)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Pattern> {
        self.patterns.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.patterns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn member_pieces(design: &Design, floor: u32, seed: ShapeId) -> Result<Vec<&Piece>, LayoutError> {
    design
        .group(floor, seed)?
        .into_iter()
        .map(|id| design.shape(floor, id).map(|s| &s.piece))
        .collect()
}
