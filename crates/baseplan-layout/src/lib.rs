//! Stateful design model on top of the geometry kernel: per-floor shape
//! arenas, snapping, connected groups, undo history and buildable areas.

pub mod area;
pub mod design;
pub mod document;
pub mod gesture;
pub mod group;
pub mod history;
pub mod pattern;
pub mod settings;
pub mod snap;
pub mod ticker;

use baseplan_core::{Direction, ShapeId};
use baseplan_geometry::{GeometryError, PlacementRejected};
use thiserror::Error;

pub use area::{BuildableArea, ClaimBook, DropZone, PendingClaim, CLAIM_TICK, MAIN_AREA};
pub use design::{Design, Floor, Preview, Shape};
pub use document::{DesignDocument, FloorDocument, ShapeDocument};
pub use gesture::{
    GestureEvent, GestureOutcome, GroupGesture, GroupMode, PlacementGesture, PointerButton, Step,
};
pub use group::{GroupPlan, GroupSnap};
pub use history::{History, HISTORY_LIMIT};
pub use pattern::{Clipboard, Pattern, PatternLibrary, PatternShape};
pub use settings::{ClickMode, Settings};
pub use snap::{PlacementRequest, ShapeEdge, SnapTarget};
pub use ticker::{run_claim_countdowns, TickerExit};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("floor {0} does not exist")]
    UnknownFloor(u32),

    #[error("shape {id} does not exist on floor {floor}")]
    UnknownShape { floor: u32, id: ShapeId },

    #[error("placement rejected: {0}")]
    Rejected(#[from] PlacementRejected),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("buildable area \"{0}\" does not exist")]
    UnknownArea(String),

    #[error("pending claim {0} does not exist")]
    UnknownClaim(u32),

    #[error("{direction} of \"{area}\" is already claimed")]
    DirectionTaken { area: String, direction: Direction },

    #[error("nothing to place")]
    EmptyGroup,

    #[error("nothing to undo")]
    NothingToUndo,
}
