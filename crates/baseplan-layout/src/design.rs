use std::collections::BTreeMap;

use baseplan_core::ShapeId;
use baseplan_geometry::primitives::footprint_area;
use baseplan_geometry::{
    check_against, check_placement, piece_edges, Boundary, Obstacle, Piece, PlacementRejected,
};
use indexmap::IndexMap;
use serde::Serialize;

use crate::area::{BuildableArea, ClaimBook};
use crate::history::{History, Snapshot};
use crate::snap::{self, PlacementRequest, ShapeEdge, SnapTarget};
use crate::{LayoutError, Settings};

/// A committed piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub id: ShapeId,
    pub floor: u32,
    pub piece: Piece,
}

/// Shapes of one floor, keyed by id in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Floor {
    shapes: IndexMap<ShapeId, Shape>,
    #[serde(skip)]
    next_id: u32,
}

impl Floor {
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn insert(&mut self, floor: u32, piece: Piece) -> ShapeId {
        self.next_id += 1;
        let id = ShapeId(self.next_id);
        self.shapes.insert(id, Shape { id, floor, piece });
        id
    }
}

/// Outcome of a placement preview: where the piece would land and whether
/// it could be committed there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub piece: Piece,
    pub target: SnapTarget,
    pub rejection: Option<PlacementRejected>,
}

impl Preview {
    #[must_use]
    pub fn overlaps(&self) -> bool {
        self.rejection.is_some()
    }
}

/// The whole editable state: settings, floors, buildable areas, pending
/// claims and undo history.
#[derive(Debug, Clone, Serialize)]
pub struct Design {
    pub settings: Settings,
    pub(crate) floors: BTreeMap<u32, Floor>,
    pub(crate) areas: Vec<BuildableArea>,
    #[serde(skip)]
    pub(crate) claims: ClaimBook,
    #[serde(skip)]
    pub(crate) history: History,
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl Design {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            floors: BTreeMap::new(),
            areas: vec![BuildableArea::main()],
            claims: ClaimBook::default(),
            history: History::default(),
        }
    }

    /// Assemble a design from already-trusted pieces, skipping validation.
    /// An empty `areas` list falls back to the main area.
    pub fn from_pieces(
        settings: Settings,
        areas: Vec<BuildableArea>,
        pieces: impl IntoIterator<Item = (u32, Piece)>,
    ) -> Self {
        let mut design = Self::with_settings(settings);
        if !areas.is_empty() {
            design.areas = areas;
        }
        for (floor, piece) in pieces {
            design.floors.entry(floor).or_default().insert(floor, piece);
        }
        design
    }

    #[must_use]
    pub fn floor(&self, index: u32) -> Option<&Floor> {
        self.floors.get(&index)
    }

    /// Floors that hold at least one shape, lowest index first.
    pub fn floors(&self) -> impl Iterator<Item = (u32, &Floor)> + '_ {
        self.floors
            .iter()
            .filter(|(_, f)| !f.is_empty())
            .map(|(i, f)| (*i, f))
    }

    pub fn shapes(&self, floor: u32) -> impl Iterator<Item = &Shape> + '_ {
        self.floors.get(&floor).into_iter().flat_map(Floor::shapes)
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.floors.values().map(Floor::len).sum()
    }

    pub fn shape(&self, floor: u32, id: ShapeId) -> Result<&Shape, LayoutError> {
        self.floors
            .get(&floor)
            .ok_or(LayoutError::UnknownFloor(floor))?
            .get(id)
            .ok_or(LayoutError::UnknownShape { floor, id })
    }

    /// Every outward edge on `floor`, for hit-testing and snapping.
    #[must_use]
    pub fn edges(&self, floor: u32) -> Vec<ShapeEdge> {
        self.shapes(floor)
            .flat_map(|s| {
                piece_edges(&s.piece)
                    .into_iter()
                    .map(move |edge| ShapeEdge { shape: s.id, edge })
            })
            .collect()
    }

    #[must_use]
    pub fn areas(&self) -> &[BuildableArea] {
        &self.areas
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The buildable-area constraint, when the fief feature is on.
    #[must_use]
    pub fn boundary(&self) -> Option<Boundary> {
        self.settings.fief_enabled.then(|| Boundary {
            rects: self.areas.iter().map(|a| a.rect).collect(),
            padding: self.settings.fief_padding,
        })
    }

    /// Check `candidate` against `floor`, ignoring the shapes in `ignore`.
    pub fn validate(
        &self,
        floor: u32,
        candidate: &Piece,
        ignore: &[ShapeId],
    ) -> Result<(), PlacementRejected> {
        let obstacles: Vec<Obstacle<'_>> = self
            .shapes(floor)
            .filter(|s| !ignore.contains(&s.id))
            .map(|s| Obstacle::new(&s.piece))
            .collect();
        check_placement(candidate, &obstacles, self.boundary().as_ref())
    }

    /// Snap and validate without committing.
    #[must_use]
    pub fn preview(&self, floor: u32, request: &PlacementRequest) -> Preview {
        let edges = self.edges(floor);
        let floor_empty = self.floors.get(&floor).map_or(true, Floor::is_empty);
        let (piece, target) = snap::resolve(request, &edges, &self.settings, floor_empty);
        let rejection = self.validate(floor, &piece, &[]).err();
        Preview {
            piece,
            target,
            rejection,
        }
    }

    pub fn place(&mut self, floor: u32, request: &PlacementRequest) -> Result<ShapeId, LayoutError> {
        let preview = self.preview(floor, request);
        if let Some(reason) = preview.rejection {
            return Err(reason.into());
        }
        Ok(self.commit(floor, preview.piece))
    }

    /// Commit an explicit vertex set after validating it.
    pub fn insert_piece(&mut self, floor: u32, piece: Piece) -> Result<ShapeId, LayoutError> {
        self.validate(floor, &piece, &[])?;
        Ok(self.commit(floor, piece))
    }

    /// Commit several pieces as one unit: either all land or none do.
    pub fn insert_pieces(
        &mut self,
        floor: u32,
        pieces: Vec<Piece>,
    ) -> Result<Vec<ShapeId>, LayoutError> {
        if pieces.is_empty() {
            return Err(LayoutError::EmptyGroup);
        }
        let boundary = self.boundary();
        for (i, piece) in pieces.iter().enumerate() {
            let placed = self.shapes(floor).map(|s| &s.piece);
            check_against(piece, placed.chain(&pieces[..i]), boundary.as_ref())?;
        }
        self.checkpoint();
        let target = self.floors.entry(floor).or_default();
        Ok(pieces
            .into_iter()
            .map(|piece| target.insert(floor, piece))
            .collect())
    }

    pub fn delete(&mut self, floor: u32, id: ShapeId) -> Result<Shape, LayoutError> {
        self.shape(floor, id)?;
        self.checkpoint();
        self.floors
            .get_mut(&floor)
            .and_then(|f| f.shapes.shift_remove(&id))
            .ok_or(LayoutError::UnknownShape { floor, id })
    }

    /// Remove every shape on `floor`. Returns how many were removed.
    pub fn clear_floor(&mut self, floor: u32) -> usize {
        let n = self.floors.get(&floor).map_or(0, Floor::len);
        if n > 0 {
            self.checkpoint();
            self.floors.remove(&floor);
        }
        n
    }

    pub fn clear_all(&mut self) -> usize {
        let n = self.shape_count();
        if n > 0 {
            self.checkpoint();
            self.floors.clear();
        }
        n
    }

    /// Ground covered by the shapes on `floor`, corner fillets included.
    #[must_use]
    pub fn floor_area(&self, floor: u32) -> f64 {
        self.shapes(floor).map(|s| footprint_area(&s.piece)).sum()
    }

    #[must_use]
    pub fn material_cost(&self, floor: u32) -> u32 {
        self.shapes(floor)
            .map(|s| s.piece.style().material_cost())
            .sum()
    }

    pub fn undo(&mut self) -> Result<(), LayoutError> {
        let snapshot = self.history.pop().ok_or(LayoutError::NothingToUndo)?;
        self.floors = snapshot.floors;
        self.areas = snapshot.areas;
        tracing::debug!(remaining = self.history.len(), "undo");
        Ok(())
    }

    pub(crate) fn checkpoint(&mut self) {
        self.history.push(Snapshot {
            floors: self.floors.clone(),
            areas: self.areas.clone(),
        });
    }

    fn commit(&mut self, floor: u32, piece: Piece) -> ShapeId {
        self.checkpoint();
        let kind = piece.kind();
        let id = self.floors.entry(floor).or_default().insert(floor, piece);
        tracing::debug!(%id, floor, %kind, "shape placed");
        id
    }

    /// Swap in new geometry for existing shapes as a single undo step.
    pub(crate) fn replace_pieces(
        &mut self,
        floor: u32,
        updates: Vec<(ShapeId, Piece)>,
    ) -> Result<(), LayoutError> {
        for (id, _) in &updates {
            self.shape(floor, *id)?;
        }
        self.checkpoint();
        if let Some(target) = self.floors.get_mut(&floor) {
            for (id, piece) in updates {
                if let Some(shape) = target.shapes.get_mut(&id) {
                    shape.piece = piece;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use baseplan_core::{BuildingStyle, Direction, ShapeKind, Vec2, SIDE};

    fn square_at(x: f64, y: f64) -> PlacementRequest {
        PlacementRequest::new(ShapeKind::Square, BuildingStyle::A, Vec2::new(x, y))
    }

    fn origin_square() -> Piece {
        Piece::new(ShapeKind::Square, BuildingStyle::A, Vec2::ZERO, 0.0)
    }

    #[test]
    fn second_square_edge_snaps_next_to_the_first() {
        let mut design = Design::new();
        let first = design.insert_piece(0, origin_square()).unwrap();

        let preview = design.preview(0, &square_at(70.0, 4.0));
        assert!(!preview.overlaps());
        assert_eq!(preview.target, SnapTarget::Edge { shape: first, edge: 1 });
        assert_abs_diff_eq!(preview.piece.centroid().x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(preview.piece.centroid().y, 0.0, epsilon = 1e-9);

        design.place(0, &square_at(70.0, 4.0)).unwrap();
        assert_eq!(design.shapes(0).count(), 2);
    }

    #[test]
    fn overlapping_insert_is_rejected_and_nothing_changes() {
        let mut design = Design::new();
        design.insert_piece(0, origin_square()).unwrap();
        let err = design
            .insert_piece(0, origin_square().translated(Vec2::new(10.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, LayoutError::Rejected(_)));
        assert_eq!(design.shape_count(), 1);
        assert_eq!(design.history().len(), 1);
    }

    #[test]
    fn floors_are_independent() {
        let mut design = Design::new();
        design.insert_piece(0, origin_square()).unwrap();
        design.insert_piece(1, origin_square()).unwrap();
        assert_eq!(design.floors().count(), 2);
        assert_eq!(design.clear_floor(1), 1);
        assert_eq!(design.floors().count(), 1);
        assert_eq!(design.clear_floor(7), 0);
    }

    #[test]
    fn undo_restores_each_mutation_in_turn() {
        let mut design = Design::new();
        let a = design.insert_piece(0, origin_square()).unwrap();
        design
            .insert_piece(0, origin_square().translated(Vec2::new(SIDE, 0.0)))
            .unwrap();
        design.delete(0, a).unwrap();
        assert_eq!(design.shape_count(), 1);

        design.undo().unwrap();
        assert_eq!(design.shape_count(), 2);
        design.undo().unwrap();
        assert_eq!(design.shape_count(), 1);
        design.undo().unwrap();
        assert_eq!(design.shape_count(), 0);
        assert_eq!(design.undo(), Err(LayoutError::NothingToUndo));
    }

    #[test]
    fn delete_of_a_missing_shape_reports_it() {
        let mut design = Design::new();
        assert_eq!(design.delete(0, ShapeId(3)), Err(LayoutError::UnknownFloor(0)));
        design.insert_piece(0, origin_square()).unwrap();
        assert_eq!(
            design.delete(0, ShapeId(3)),
            Err(LayoutError::UnknownShape {
                floor: 0,
                id: ShapeId(3)
            })
        );
    }

    #[test]
    fn batch_insert_is_all_or_nothing() {
        let mut design = Design::new();
        let batch = vec![
            origin_square(),
            origin_square().translated(Vec2::new(SIDE, 0.0)),
            origin_square().translated(Vec2::new(SIDE + 5.0, 0.0)),
        ];
        assert!(design.insert_pieces(0, batch).is_err());
        assert_eq!(design.shape_count(), 0);
        assert!(design.history().is_empty());
    }

    #[test]
    fn fief_boundary_blocks_placement_outside_the_areas() {
        let mut design = Design::new();
        design.settings.fief_enabled = true;
        let far = origin_square().translated(Vec2::new(600.0, 0.0));
        assert!(design.insert_piece(0, far.clone()).is_err());

        design.settings.claim_countdown_ms = 0;
        design.start_claim(crate::MAIN_AREA, Direction::Right).unwrap();
        design.tick(crate::CLAIM_TICK);
        assert!(design.insert_piece(0, far).is_ok());
    }

    #[test]
    fn area_and_cost_follow_the_styles() {
        let mut design = Design::new();
        design.insert_piece(0, origin_square()).unwrap();
        design
            .insert_piece(
                0,
                origin_square()
                    .with_style(BuildingStyle::D)
                    .translated(Vec2::new(SIDE, 0.0)),
            )
            .unwrap();
        assert_abs_diff_eq!(design.floor_area(0), 2.0 * SIDE * SIDE, epsilon = 1e-6);
        assert_eq!(design.material_cost(0), 50 + 300);
        assert_eq!(design.material_cost(3), 0);
    }
}
