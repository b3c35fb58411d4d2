//! Oldest layout: verbose field names, one shape list for every floor.
//!
//! ```json
//! {"shapes": [{"type": "square", "x": 0, "y": 0, "rotation": 0,
//!   "buildingStyle": "A", "vertices": [{"x": -25, "y": -25}, ...],
//!   "floor": 1}],
//!  "gridEnabled": true, "gridSize": 50, "fiefEnabled": false, "fiefPadding": 0}
//! ```

use baseplan_core::{Vec2, GRID_SIZE};
use baseplan_layout::Settings;
use serde::Deserialize;
use serde_json::Value;

use crate::shape::{invalid, CodeOrName, RawShape};
use crate::{DecodeError, Decoded};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDoc {
    shapes: Vec<Value>,
    #[serde(default)]
    grid_enabled: bool,
    grid_size: Option<f64>,
    #[serde(default)]
    fief_enabled: bool,
    fief_padding: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyShape {
    #[serde(rename = "type")]
    kind: CodeOrName,
    x: Option<f64>,
    y: Option<f64>,
    #[serde(default)]
    rotation: f64,
    building_style: Option<CodeOrName>,
    vertices: Option<Vec<Vec2>>,
    #[serde(default)]
    floor: u32,
}

pub(crate) fn read(value: Value) -> Result<Decoded, DecodeError> {
    let doc: LegacyDoc = serde_json::from_value(value)?;
    let settings = Settings {
        grid_enabled: doc.grid_enabled,
        grid_size: doc.grid_size.filter(|size| *size > 0.0).unwrap_or(GRID_SIZE),
        fief_enabled: doc.fief_enabled,
        fief_padding: doc.fief_padding.unwrap_or(0.0),
        ..Settings::default()
    };

    let mut pieces = Vec::new();
    for (index, raw) in doc.shapes.into_iter().enumerate() {
        let shape: LegacyShape = serde_json::from_value(raw).map_err(|err| invalid(index, err))?;
        let kind = shape
            .kind
            .kind()
            .ok_or_else(|| invalid(index, "unknown shape type"))?;
        // some versions wrote unknown styles; those fall back to the default
        let style = shape
            .building_style
            .as_ref()
            .and_then(CodeOrName::style)
            .unwrap_or_default();
        let pose = shape
            .x
            .zip(shape.y)
            .map(|(x, y)| (Vec2::new(x, y), shape.rotation));
        let raw = RawShape {
            kind,
            style,
            vertices: shape.vertices,
            pose,
        };
        if let Some(piece) = raw.into_piece(index) {
            pieces.push((shape.floor, piece));
        }
    }

    Ok(Decoded {
        settings,
        areas: Vec::new(),
        pieces,
    })
}
