//! Current layout: short top-level keys, shapes as flat numeric arrays
//! `[kind, style?, x1, y1, x2, y2, ...]`. Anything equal to its default is
//! left out.

use std::collections::BTreeMap;

use baseplan_core::{BuildingStyle, Rect, ShapeKind, Vec2, GRID_SIZE};
use baseplan_geometry::Piece;
use baseplan_layout::{BuildableArea, ClickMode, Design, Settings, MAIN_AREA};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::keyed;
use crate::shape::{invalid, CodeOrName, RawShape};
use crate::{DecodeError, Decoded};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShortDoc {
    s: Vec<Value>,
    fi: u32,
    f: BTreeMap<String, Vec<Value>>,
    g: Value,
    gs: Option<f64>,
    b: Option<CodeOrName>,
    p: Option<f64>,
    st: Value,
    c: Value,
    a: Vec<Vec<Value>>,
}

pub(crate) fn to_value(design: &Design) -> Value {
    let mut floors: Vec<(u32, Vec<Value>)> = design
        .floors()
        .map(|(index, floor)| (index, floor.shapes().map(|s| shape_array(&s.piece)).collect()))
        .collect();
    let mut doc = settings_keys(&design.settings);
    let areas: Vec<Value> = design
        .areas()
        .iter()
        .filter(|area| **area != BuildableArea::main())
        .map(area_array)
        .collect();

    let ground_floor_only = matches!(floors.as_slice(), [] | [(0, _)]);
    if doc.is_empty() && areas.is_empty() && ground_floor_only {
        let shapes = floors.pop().map(|(_, shapes)| shapes).unwrap_or_default();
        return Value::Array(shapes);
    }

    if floors.len() == 1 {
        let (index, shapes) = floors.remove(0);
        doc.insert("s".into(), Value::Array(shapes));
        if index != 0 {
            doc.insert("fi".into(), index.into());
        }
    } else if !floors.is_empty() {
        let by_floor: Map<String, Value> = floors
            .into_iter()
            .map(|(index, shapes)| (index.to_string(), Value::Array(shapes)))
            .collect();
        doc.insert("f".into(), Value::Object(by_floor));
    }
    if !areas.is_empty() {
        doc.insert("a".into(), Value::Array(areas));
    }
    Value::Object(doc)
}

fn settings_keys(settings: &Settings) -> Map<String, Value> {
    let mut keys = Map::new();
    if settings.grid_enabled {
        keys.insert("g".into(), 1.into());
    }
    if settings.grid_size != GRID_SIZE {
        keys.insert("gs".into(), settings.grid_size.into());
    }
    if settings.active_style != BuildingStyle::A {
        keys.insert("b".into(), settings.active_style.code().into());
    }
    if settings.fief_padding != 0.0 {
        keys.insert("p".into(), settings.fief_padding.into());
    }
    if settings.fief_enabled {
        keys.insert("st".into(), 1.into());
    }
    if settings.click_mode == ClickMode::Swapped {
        keys.insert("c".into(), 1.into());
    }
    keys
}

pub(crate) fn shape_array(piece: &Piece) -> Value {
    let mut items = vec![Value::from(piece.kind().code())];
    if piece.style() != BuildingStyle::A {
        items.push(piece.style().code().into());
    }
    for v in piece.vertices() {
        items.push(coordinate(v.x));
        items.push(coordinate(v.y));
    }
    Value::Array(items)
}

fn area_array(area: &BuildableArea) -> Value {
    let parent = area.parent.clone().map_or(Value::Null, Value::String);
    let r = area.rect;
    Value::Array(vec![
        area.id.clone().into(),
        parent,
        coordinate(r.x),
        coordinate(r.y),
        coordinate(r.w),
        coordinate(r.h),
    ])
}

#[allow(clippy::cast_possible_truncation)]
fn coordinate(v: f64) -> Value {
    Value::from(v.round() as i64)
}

pub(crate) fn read(value: Value) -> Result<Decoded, DecodeError> {
    let doc = match value {
        Value::Array(shapes) => ShortDoc {
            s: shapes,
            ..ShortDoc::default()
        },
        other @ Value::Object(_) => serde_json::from_value(other)?,
        _ => return Err(DecodeError::UnrecognizedFormat),
    };

    let mut pieces = Vec::new();
    let mut index = 0;
    read_floor(doc.fi, &doc.s, &mut index, &mut pieces)?;
    for (key, shapes) in &doc.f {
        let floor: u32 = key.parse().map_err(|_| DecodeError::UnrecognizedFormat)?;
        read_floor(floor, shapes, &mut index, &mut pieces)?;
    }

    let settings = Settings {
        grid_enabled: truthy(&doc.g),
        grid_size: doc.gs.filter(|size| *size > 0.0).unwrap_or(GRID_SIZE),
        fief_enabled: truthy(&doc.st),
        fief_padding: doc.p.unwrap_or(0.0),
        active_style: doc.b.as_ref().and_then(CodeOrName::style).unwrap_or_default(),
        click_mode: if truthy(&doc.c) {
            ClickMode::Swapped
        } else {
            ClickMode::Standard
        },
        ..Settings::default()
    };

    Ok(Decoded {
        settings,
        areas: read_areas(&doc.a)?,
        pieces,
    })
}

fn read_floor(
    floor: u32,
    shapes: &[Value],
    index: &mut usize,
    out: &mut Vec<(u32, Piece)>,
) -> Result<(), DecodeError> {
    for shape in shapes {
        let piece = match shape {
            Value::Array(items) => read_array(*index, items)?,
            Value::Object(_) => keyed::read_object(*index, shape.clone())?,
            _ => return Err(invalid(*index, "shape is neither an array nor an object")),
        };
        if let Some(piece) = piece {
            out.push((floor, piece));
        }
        *index += 1;
    }
    Ok(())
}

fn read_array(index: usize, items: &[Value]) -> Result<Option<Piece>, DecodeError> {
    let numbers = items
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| invalid(index, "non-numeric entry"))?;
    let (&kind_code, rest) = numbers
        .split_first()
        .ok_or_else(|| invalid(index, "empty shape array"))?;
    let kind = small_code(kind_code)
        .and_then(ShapeKind::from_code)
        .ok_or_else(|| invalid(index, format!("unknown shape kind {kind_code}")))?;

    let (style, coordinates) = if numbers.len() % 2 == 0 {
        let (&style_code, coordinates) = rest
            .split_first()
            .ok_or_else(|| invalid(index, "missing style"))?;
        let style = small_code(style_code)
            .and_then(BuildingStyle::from_code)
            .ok_or_else(|| invalid(index, format!("unknown building style {style_code}")))?;
        (style, coordinates)
    } else {
        (BuildingStyle::A, rest)
    };

    let vertices = coordinates
        .chunks_exact(2)
        .map(|pair| Vec2::new(pair[0], pair[1]))
        .collect();
    Ok(RawShape {
        kind,
        style,
        vertices: Some(vertices),
        pose: None,
    }
    .into_piece(index))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn small_code(value: f64) -> Option<u8> {
    (value.fract() == 0.0 && (0.0..=255.0).contains(&value)).then(|| value as u8)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Claimed areas. `main` replaces the default root rectangle; an empty
/// list keeps the default.
fn read_areas(entries: &[Vec<Value>]) -> Result<Vec<BuildableArea>, DecodeError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }
    let mut areas = vec![BuildableArea::main()];
    for (index, entry) in entries.iter().enumerate() {
        let area = read_area(index, entry)?;
        if area.id == MAIN_AREA {
            areas[0].rect = area.rect;
        } else {
            areas.push(area);
        }
    }
    Ok(areas)
}

fn read_area(index: usize, entry: &[Value]) -> Result<BuildableArea, DecodeError> {
    let bad = |reason: &str| DecodeError::InvalidArea {
        index,
        reason: reason.to_owned(),
    };
    let [id, parent, x, y, w, h] = entry else {
        return Err(bad("expected [id, parent, x, y, w, h]"));
    };
    let id = id.as_str().ok_or_else(|| bad("id is not a string"))?;
    let parent = match parent {
        Value::Null => None,
        Value::String(parent) => Some(parent.clone()),
        _ => return Err(bad("parent is not a string")),
    };
    let number = |v: &Value| v.as_f64().ok_or_else(|| bad("bounds are not numeric"));
    let rect = Rect::new(number(x)?, number(y)?, number(w)?, number(h)?);
    Ok(BuildableArea::new(id, rect, parent))
}
