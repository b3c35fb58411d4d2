use std::fmt;

use baseplan_core::{BuildingStyle, ShapeKind, Vec2};
use baseplan_geometry::Piece;
use serde::Deserialize;
use tracing::warn;

use crate::DecodeError;

/// Kinds and styles were written as numeric codes by some versions and as
/// names by others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum CodeOrName {
    Code(u8),
    Name(String),
}

impl CodeOrName {
    pub(crate) fn kind(&self) -> Option<ShapeKind> {
        match self {
            CodeOrName::Code(code) => ShapeKind::from_code(*code),
            CodeOrName::Name(name) => ShapeKind::from_name(name),
        }
    }

    pub(crate) fn style(&self) -> Option<BuildingStyle> {
        match self {
            CodeOrName::Code(code) => BuildingStyle::from_code(*code),
            CodeOrName::Name(name) => BuildingStyle::from_name(name),
        }
    }
}

/// Fields of one decoded shape, before geometry is derived.
#[derive(Debug)]
pub(crate) struct RawShape {
    pub kind: ShapeKind,
    pub style: BuildingStyle,
    pub vertices: Option<Vec<Vec2>>,
    /// Centroid and rotation, used only when the vertices are unusable.
    pub pose: Option<(Vec2, f64)>,
}

impl RawShape {
    /// Vertices win whenever they describe the kind. Otherwise the stored
    /// pose is used, and a shape with neither is dropped.
    pub(crate) fn into_piece(self, index: usize) -> Option<Piece> {
        if let Some(vertices) = self.vertices {
            match Piece::from_vertices(self.kind, self.style, vertices) {
                Ok(piece) => return Some(piece),
                Err(err) => warn!(index, %err, "ignoring stored vertices"),
            }
        }
        match self.pose {
            Some((centroid, rotation)) => Some(Piece::new(self.kind, self.style, centroid, rotation)),
            None => {
                warn!(index, kind = %self.kind, "skipping shape without usable geometry");
                None
            }
        }
    }
}

pub(crate) fn invalid(index: usize, reason: impl fmt::Display) -> DecodeError {
    DecodeError::InvalidShape {
        index,
        reason: reason.to_string(),
    }
}
