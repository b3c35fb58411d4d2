//! Connected groups: shapes linked by shared edges, moved and rotated as
//! one.

use std::collections::{HashSet, VecDeque};

use baseplan_core::{mean, ShapeId, Vec2, EDGE_TOLERANCE};
use baseplan_geometry::{check_placement, piece_edges, Edge, Obstacle, Piece, PlacementRejected};
use indexmap::IndexMap;
use serde::Serialize;

use crate::design::Floor;
use crate::snap::{group_grid_offset, vertex_snap_offset};
use crate::{Design, LayoutError};

/// Endpoint distance under which two edges count as the same side.
pub const LINK_TOLERANCE: f64 = 2.0 * EDGE_TOLERANCE;

/// True when some edge of `a` coincides with some edge of `b`.
#[must_use]
pub fn shares_edge(a: &Piece, b: &Piece) -> bool {
    let eb = piece_edges(b);
    piece_edges(a)
        .iter()
        .any(|x| eb.iter().any(|y| x.matches(y, LINK_TOLERANCE)))
}

fn adjacency(floor: &Floor) -> IndexMap<ShapeId, Vec<ShapeId>> {
    let edges: Vec<(ShapeId, Vec<Edge>)> = floor
        .shapes()
        .map(|s| (s.id, piece_edges(&s.piece)))
        .collect();
    let mut links: IndexMap<ShapeId, Vec<ShapeId>> =
        edges.iter().map(|(id, _)| (*id, Vec::new())).collect();
    for (i, (a, ea)) in edges.iter().enumerate() {
        for (b, eb) in &edges[i + 1..] {
            let linked = ea
                .iter()
                .any(|x| eb.iter().any(|y| x.matches(y, LINK_TOLERANCE)));
            if linked {
                links.entry(*a).or_default().push(*b);
                links.entry(*b).or_default().push(*a);
            }
        }
    }
    links
}

fn flood(
    links: &IndexMap<ShapeId, Vec<ShapeId>>,
    seed: ShapeId,
    visited: &mut HashSet<ShapeId>,
) -> Vec<ShapeId> {
    let mut group = Vec::new();
    let mut queue = VecDeque::new();
    visited.insert(seed);
    queue.push_back(seed);
    while let Some(id) = queue.pop_front() {
        group.push(id);
        for next in links.get(&id).into_iter().flatten() {
            if visited.insert(*next) {
                queue.push_back(*next);
            }
        }
    }
    group
}

/// Breadth-first closure of the shared-edge relation from `seed`. Empty when
/// `seed` is not on the floor.
#[must_use]
pub fn collect_group(floor: &Floor, seed: ShapeId) -> Vec<ShapeId> {
    if !floor.contains(seed) {
        return Vec::new();
    }
    flood(&adjacency(floor), seed, &mut HashSet::new())
}

/// Partition of the floor into connected groups, in insertion order of
/// their first member.
#[must_use]
pub fn groups_of(floor: &Floor) -> Vec<Vec<ShapeId>> {
    let links = adjacency(floor);
    let mut visited = HashSet::new();
    let mut groups = Vec::new();
    for id in links.keys() {
        if !visited.contains(id) {
            groups.push(flood(&links, *id, &mut visited));
        }
    }
    groups
}

/// Mean of every vertex of every piece.
#[must_use]
pub fn group_centroid<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Vec2 {
    let all: Vec<Vec2> = pieces
        .into_iter()
        .flat_map(|p| p.vertices().iter().copied())
        .collect();
    mean(&all)
}

/// Which snap the accepted group transform kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSnap {
    GridAndVertex,
    Grid,
    Vertex,
    Unsnapped,
}

/// A validated group transform, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub floor: u32,
    pub pieces: Vec<(ShapeId, Piece)>,
    pub snap: GroupSnap,
}

impl Design {
    /// The connected group containing `seed`.
    pub fn group(&self, floor: u32, seed: ShapeId) -> Result<Vec<ShapeId>, LayoutError> {
        self.shape(floor, seed)?;
        let floor = self.floor(floor).ok_or(LayoutError::UnknownFloor(floor))?;
        Ok(collect_group(floor, seed))
    }

    #[must_use]
    pub fn groups(&self, floor: u32) -> Vec<Vec<ShapeId>> {
        self.floor(floor).map(groups_of).unwrap_or_default()
    }

    /// Offset `members` by `delta`, then try grid and vertex snaps on top.
    pub fn plan_translate(
        &self,
        floor: u32,
        members: &[ShapeId],
        delta: Vec2,
    ) -> Result<GroupPlan, LayoutError> {
        let moved = self
            .member_pieces(floor, members)?
            .into_iter()
            .map(|(id, p)| (id, p.translated(delta)))
            .collect();
        self.choose_plan(floor, members, moved, self.settings.grid_enabled)
    }

    /// Rotate `members` about their shared vertex centroid.
    pub fn plan_rotate(
        &self,
        floor: u32,
        members: &[ShapeId],
        angle_deg: f64,
    ) -> Result<GroupPlan, LayoutError> {
        let current = self.member_pieces(floor, members)?;
        let pivot = group_centroid(current.iter().map(|(_, p)| *p));
        let moved = current
            .into_iter()
            .map(|(id, p)| (id, p.rotated_about(pivot, angle_deg)))
            .collect();
        self.choose_plan(floor, members, moved, false)
    }

    pub fn apply_plan(&mut self, plan: GroupPlan) -> Result<(), LayoutError> {
        tracing::debug!(
            floor = plan.floor,
            members = plan.pieces.len(),
            snap = ?plan.snap,
            "group transform"
        );
        self.replace_pieces(plan.floor, plan.pieces)
    }

    /// Move the whole group around `seed`. Returns the snap that was kept.
    pub fn translate_group(
        &mut self,
        floor: u32,
        seed: ShapeId,
        delta: Vec2,
    ) -> Result<GroupSnap, LayoutError> {
        let members = self.group(floor, seed)?;
        let plan = self.plan_translate(floor, &members, delta)?;
        let snap = plan.snap;
        self.apply_plan(plan)?;
        Ok(snap)
    }

    pub fn rotate_group(
        &mut self,
        floor: u32,
        seed: ShapeId,
        angle_deg: f64,
    ) -> Result<GroupSnap, LayoutError> {
        let members = self.group(floor, seed)?;
        let plan = self.plan_rotate(floor, &members, angle_deg)?;
        let snap = plan.snap;
        self.apply_plan(plan)?;
        Ok(snap)
    }

    fn member_pieces(
        &self,
        floor: u32,
        members: &[ShapeId],
    ) -> Result<Vec<(ShapeId, &Piece)>, LayoutError> {
        if members.is_empty() {
            return Err(LayoutError::EmptyGroup);
        }
        members
            .iter()
            .map(|id| self.shape(floor, *id).map(|s| (*id, &s.piece)))
            .collect()
    }

    /// Try the snapped variants of `moved` first and fall back towards the
    /// raw transform; the first one clear of every non-member wins.
    fn choose_plan(
        &self,
        floor: u32,
        members: &[ShapeId],
        moved: Vec<(ShapeId, Piece)>,
        grid: bool,
    ) -> Result<GroupPlan, LayoutError> {
        let others: Vec<&Piece> = self
            .shapes(floor)
            .filter(|s| !members.contains(&s.id))
            .map(|s| &s.piece)
            .collect();
        let external: Vec<Vec2> = others
            .iter()
            .flat_map(|p| p.vertices().iter().copied())
            .collect();
        let vertices: Vec<Vec2> = moved
            .iter()
            .flat_map(|(_, p)| p.vertices().iter().copied())
            .collect();
        let threshold = self.settings.snap_threshold;

        let mut candidates = Vec::new();
        if grid {
            let g = group_grid_offset(&vertices, self.settings.grid_size);
            let shifted: Vec<Vec2> = vertices.iter().map(|v| *v + g).collect();
            if let Some(v) = vertex_snap_offset(&shifted, &external, threshold) {
                candidates.push((GroupSnap::GridAndVertex, g + v));
            }
            candidates.push((GroupSnap::Grid, g));
        } else if let Some(v) = vertex_snap_offset(&vertices, &external, threshold) {
            candidates.push((GroupSnap::Vertex, v));
        }
        candidates.push((GroupSnap::Unsnapped, Vec2::ZERO));

        let obstacles: Vec<Obstacle<'_>> = others.iter().map(|p| Obstacle::new(p)).collect();
        let boundary = self.boundary();
        let mut last = PlacementRejected::Overlap;
        for (snap, offset) in candidates {
            let pieces: Vec<(ShapeId, Piece)> = moved
                .iter()
                .map(|(id, p)| (*id, p.translated(offset)))
                .collect();
            let verdict = pieces
                .iter()
                .try_for_each(|(_, p)| check_placement(p, &obstacles, boundary.as_ref()));
            match verdict {
                Ok(()) => {
                    return Ok(GroupPlan {
                        floor,
                        pieces,
                        snap,
                    })
                }
                Err(reason) => {
                    tracing::trace!(?snap, %reason, "group candidate rejected");
                    last = reason;
                }
            }
        }
        Err(last.into())
    }
}
