//! Intermediate layout: each shape is an object with short keys,
//! `{t, b?, v: [[x, y], ...]}`, or `{t, b?, x, y, r}` when vertices are
//! missing. Top-level keys are the same as the compact layout's.

use baseplan_core::{BuildingStyle, Vec2};
use baseplan_geometry::Piece;
use serde::Deserialize;
use serde_json::Value;

use crate::shape::{invalid, CodeOrName, RawShape};
use crate::DecodeError;

#[derive(Debug, Deserialize)]
struct KeyedShape {
    t: CodeOrName,
    b: Option<CodeOrName>,
    v: Option<Vec<[f64; 2]>>,
    x: Option<f64>,
    y: Option<f64>,
    #[serde(default)]
    r: f64,
}

pub(crate) fn read_object(index: usize, value: Value) -> Result<Option<Piece>, DecodeError> {
    let shape: KeyedShape = serde_json::from_value(value).map_err(|err| invalid(index, err))?;
    let kind = shape
        .t
        .kind()
        .ok_or_else(|| invalid(index, "unknown shape kind"))?;
    let style = match &shape.b {
        Some(b) => b
            .style()
            .ok_or_else(|| invalid(index, "unknown building style"))?,
        None => BuildingStyle::A,
    };
    let vertices = shape
        .v
        .map(|v| v.into_iter().map(|[x, y]| Vec2::new(x, y)).collect());
    let pose = shape.x.zip(shape.y).map(|(x, y)| (Vec2::new(x, y), shape.r));

    Ok(RawShape {
        kind,
        style,
        vertices,
        pose,
    }
    .into_piece(index))
}
