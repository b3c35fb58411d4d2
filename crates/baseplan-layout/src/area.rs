//! Buildable areas and the claims that extend them.

use std::time::Duration;

use baseplan_core::{Direction, Rect};
use serde::{Deserialize, Serialize};

use crate::{Design, LayoutError};

/// Id of the root area every claim chain starts from.
pub const MAIN_AREA: &str = "main";

/// Period of the claim countdown.
pub const CLAIM_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildableArea {
    pub id: String,
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl BuildableArea {
    pub fn new(id: impl Into<String>, rect: Rect, parent: Option<String>) -> Self {
        Self {
            id: id.into(),
            rect,
            parent,
        }
    }

    #[must_use]
    pub fn main() -> Self {
        Self::new(MAIN_AREA, Rect::new(-500.0, -500.0, 1000.0, 1000.0), None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingClaim {
    pub id: u32,
    pub direction: Direction,
    pub parent: String,
    pub rect: Rect,
    pub remaining: Duration,
}

impl PendingClaim {
    /// Id the area gets once the claim completes.
    #[must_use]
    pub fn area_id(&self) -> String {
        format!("{}-{}", self.parent, self.direction)
    }
}

/// A free spot next to an area where a claim can be dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropZone {
    pub parent: String,
    pub direction: Direction,
    pub rect: Rect,
}

/// Adjacent rectangles not yet covered by an area or a pending claim.
#[must_use]
pub fn drop_zones(areas: &[BuildableArea], claims: &[PendingClaim]) -> Vec<DropZone> {
    let mut zones: Vec<DropZone> = Vec::new();
    for area in areas {
        for direction in Direction::ALL {
            let rect = area.rect.adjacent(direction);
            if is_taken(&rect, areas, claims) || zones.iter().any(|z| z.rect == rect) {
                continue;
            }
            zones.push(DropZone {
                parent: area.id.clone(),
                direction,
                rect,
            });
        }
    }
    zones
}

fn is_taken(rect: &Rect, areas: &[BuildableArea], claims: &[PendingClaim]) -> bool {
    areas.iter().any(|a| a.rect.overlaps(rect)) || claims.iter().any(|c| c.rect.overlaps(rect))
}

/// Claims still counting down. Not part of undo history.
#[derive(Debug, Clone, Default)]
pub struct ClaimBook {
    pending: Vec<PendingClaim>,
    next_id: u32,
}

impl ClaimBook {
    #[must_use]
    pub fn pending(&self) -> &[PendingClaim] {
        &self.pending
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn start(&mut self, parent: &BuildableArea, direction: Direction, countdown: Duration) -> u32 {
        self.next_id += 1;
        self.pending.push(PendingClaim {
            id: self.next_id,
            direction,
            parent: parent.id.clone(),
            rect: parent.rect.adjacent(direction),
            remaining: countdown,
        });
        self.next_id
    }

    fn cancel(&mut self, id: u32) -> Option<PendingClaim> {
        let pos = self.pending.iter().position(|c| c.id == id)?;
        Some(self.pending.remove(pos))
    }

    /// Count every claim down by `elapsed` and hand back the finished ones.
    fn advance(&mut self, elapsed: Duration) -> Vec<PendingClaim> {
        for claim in &mut self.pending {
            claim.remaining = claim.remaining.saturating_sub(elapsed);
        }
        let (done, waiting) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|c| c.remaining.is_zero());
        self.pending = waiting;
        done
    }
}

impl Design {
    #[must_use]
    pub fn drop_zones(&self) -> Vec<DropZone> {
        drop_zones(&self.areas, self.claims.pending())
    }

    #[must_use]
    pub fn pending_claims(&self) -> &[PendingClaim] {
        self.claims.pending()
    }

    #[must_use]
    pub fn has_pending_claims(&self) -> bool {
        !self.claims.is_empty()
    }

    /// Start counting down a claim of the spot `direction` of `parent`.
    pub fn start_claim(&mut self, parent: &str, direction: Direction) -> Result<u32, LayoutError> {
        let area = self
            .areas
            .iter()
            .find(|a| a.id == parent)
            .ok_or_else(|| LayoutError::UnknownArea(parent.to_string()))?;
        let rect = area.rect.adjacent(direction);
        if is_taken(&rect, &self.areas, self.claims.pending()) {
            return Err(LayoutError::DirectionTaken {
                area: parent.to_string(),
                direction,
            });
        }
        let countdown = Duration::from_millis(self.settings.claim_countdown_ms);
        let id = self.claims.start(area, direction, countdown);
        tracing::debug!(id, parent, %direction, "claim started");
        Ok(id)
    }

    pub fn cancel_claim(&mut self, id: u32) -> Result<PendingClaim, LayoutError> {
        let claim = self.claims.cancel(id).ok_or(LayoutError::UnknownClaim(id))?;
        tracing::debug!(id, "claim cancelled");
        Ok(claim)
    }

    /// Drop every pending claim. Returns how many there were.
    pub fn cancel_all_claims(&mut self) -> usize {
        let n = self.claims.pending.len();
        self.claims.pending.clear();
        n
    }

    /// Advance every countdown and promote the finished claims to areas.
    /// Returns the ids of the new areas.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<String> {
        let done = self.claims.advance(elapsed);
        if done.is_empty() {
            return Vec::new();
        }
        self.checkpoint();
        done.into_iter()
            .map(|claim| {
                let id = claim.area_id();
                tracing::debug!(area = %id, parent = %claim.parent, "claim completed");
                self.areas
                    .push(BuildableArea::new(id.clone(), claim.rect, Some(claim.parent)));
                id
            })
            .collect()
    }
}
