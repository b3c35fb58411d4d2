//! Pointer gestures that end in a commit or a clean cancel.
//!
//! Each gesture is a small state machine fed [`GestureEvent`]s. Nothing is
//! mutated until release; leaving the surface or pressing another button
//! drops the gesture without touching the design.

use baseplan_core::{BuildingStyle, ShapeId, ShapeKind, Vec2};
use baseplan_geometry::PlacementRejected;
use serde::{Deserialize, Serialize};

use crate::group::GroupPlan;
use crate::snap::PlacementRequest;
use crate::{Design, LayoutError, Preview};

/// Drag distance below which a placement keeps its starting rotation.
pub const ROTATE_DEADZONE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Pointer moved, in world coordinates.
    Move(Vec2),
    Release,
    /// Pointer left the drawing surface.
    Leave,
    ButtonPressed(PointerButton),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Committed(Vec<ShapeId>),
    Rejected(PlacementRejected),
    Cancelled,
}

/// Result of feeding one event: the gesture goes on or it is over.
#[derive(Debug)]
pub enum Step<G> {
    Active(G),
    Done(GestureOutcome),
}

/// Press, drag to aim, release to place.
#[derive(Debug, Clone)]
pub struct PlacementGesture {
    floor: u32,
    button: PointerButton,
    anchor: Vec2,
    request: PlacementRequest,
}

impl PlacementGesture {
    /// Start at `at`, or `None` when `button` is not the placement button.
    #[must_use]
    pub fn begin(
        design: &Design,
        floor: u32,
        kind: ShapeKind,
        style: BuildingStyle,
        at: Vec2,
        button: PointerButton,
    ) -> Option<Self> {
        if button != design.settings.click_mode.placement_button() {
            return None;
        }
        Some(Self {
            floor,
            button,
            anchor: at,
            request: PlacementRequest::new(kind, style, at),
        })
    }

    #[must_use]
    pub fn request(&self) -> &PlacementRequest {
        &self.request
    }

    #[must_use]
    pub fn preview(&self, design: &Design) -> Preview {
        design.preview(self.floor, &self.request)
    }

    pub fn handle(mut self, event: GestureEvent, design: &mut Design) -> Step<Self> {
        match event {
            GestureEvent::Move(p) => {
                let drag = p - self.anchor;
                if drag.length() > ROTATE_DEADZONE {
                    self.request.rotation = drag.angle_deg();
                }
                Step::Active(self)
            }
            GestureEvent::Release => match design.place(self.floor, &self.request) {
                Ok(id) => Step::Done(GestureOutcome::Committed(vec![id])),
                Err(err) => Step::Done(rejected(err)),
            },
            GestureEvent::Leave => Step::Done(GestureOutcome::Cancelled),
            GestureEvent::ButtonPressed(b) if b != self.button => {
                Step::Done(GestureOutcome::Cancelled)
            }
            GestureEvent::ButtonPressed(_) => Step::Active(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    Translate,
    Rotate,
}

/// Drag a connected group to move it, or around its centroid to turn it.
#[derive(Debug, Clone)]
pub struct GroupGesture {
    floor: u32,
    button: PointerButton,
    mode: GroupMode,
    members: Vec<ShapeId>,
    pivot: Vec2,
    start: Vec2,
    current: Vec2,
}

impl GroupGesture {
    pub fn begin(
        design: &Design,
        floor: u32,
        seed: ShapeId,
        at: Vec2,
        mode: GroupMode,
        button: PointerButton,
    ) -> Result<Self, LayoutError> {
        let members = design.group(floor, seed)?;
        let pivot = crate::group::group_centroid(
            members
                .iter()
                .filter_map(|id| design.shape(floor, *id).ok())
                .map(|s| &s.piece),
        );
        Ok(Self {
            floor,
            button,
            mode,
            members,
            pivot,
            start: at,
            current: at,
        })
    }

    #[must_use]
    pub fn members(&self) -> &[ShapeId] {
        &self.members
    }

    /// The transform a release would apply right now.
    pub fn plan(&self, design: &Design) -> Result<GroupPlan, LayoutError> {
        match self.mode {
            GroupMode::Translate => {
                design.plan_translate(self.floor, &self.members, self.current - self.start)
            }
            GroupMode::Rotate => design.plan_rotate(self.floor, &self.members, self.angle()),
        }
    }

    fn angle(&self) -> f64 {
        let from = self.start - self.pivot;
        let to = self.current - self.pivot;
        if from.normalized().is_none() || to.normalized().is_none() {
            return 0.0;
        }
        to.angle_deg() - from.angle_deg()
    }

    pub fn handle(mut self, event: GestureEvent, design: &mut Design) -> Step<Self> {
        match event {
            GestureEvent::Move(p) => {
                self.current = p;
                Step::Active(self)
            }
            GestureEvent::Release => {
                let outcome = self
                    .plan(design)
                    .and_then(|plan| design.apply_plan(plan))
                    .map(|()| GestureOutcome::Committed(self.members.clone()));
                Step::Done(outcome.unwrap_or_else(rejected))
            }
            GestureEvent::Leave => Step::Done(GestureOutcome::Cancelled),
            GestureEvent::ButtonPressed(b) if b != self.button => {
                Step::Done(GestureOutcome::Cancelled)
            }
            GestureEvent::ButtonPressed(_) => Step::Active(self),
        }
    }
}

fn rejected(err: LayoutError) -> GestureOutcome {
    match err {
        LayoutError::Rejected(reason) => GestureOutcome::Rejected(reason),
        other => {
            tracing::debug!(%other, "gesture dropped");
            GestureOutcome::Cancelled
        }
    }
}
