// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position resolution.
//!
//! ## Overview
//!
//! The resolver does not fit-test anything. It hands the overlay primitive an
//! ordered candidate list (primary first, then the fixed fallback chain) and,
//! once the primitive reports which candidate it picked, maps that choice back
//! onto the panel's presentation:
//!
//! - [`classify`] turns the chosen [`ConnectionPair`] into a semantic
//!   [`Direction`] so the panel can point its arrow the right way.
//! - [`arrow_style`] computes where along the shared edge the arrow sits so it
//!   keeps pointing at the anchor center whichever fallback won.
//!
//! ```rust
//! use understory_popover::position::{candidates, classify};
//! use understory_popover::types::{Direction, TextDirection};
//!
//! let list = candidates(Direction::Bottom, TextDirection::Ltr);
//! assert_eq!(list.len(), 9);
//! assert_eq!(classify(&list[0], TextDirection::Ltr), Some(Direction::Bottom));
//! ```

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::placement::{ConnectionPair, FALLBACKS, primary, primary_offset};
use crate::types::{ArrowStyle, Direction, HorizontalPos, TextDirection, VerticalPos};

/// Ordered candidate list: primary plus the eight fallbacks.
pub type Candidates = SmallVec<[ConnectionPair; 9]>;

/// Anchor-relative position strategy handed to the overlay primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionStrategy<K> {
    /// Element the overlay is connected to.
    pub anchor: K,
    /// Candidates in evaluation order.
    pub candidates: Candidates,
    /// Offset used by candidates that carry none of their own.
    pub default_offset: Vec2,
}

impl<K> PositionStrategy<K> {
    /// Build the strategy for `anchor` opening towards `direction`.
    pub fn connected_to(anchor: K, direction: Direction, text: TextDirection) -> Self {
        Self {
            anchor,
            candidates: candidates(direction, text),
            default_offset: primary_offset(direction),
        }
    }
}

/// Ordered candidate list for `direction`.
pub fn candidates(direction: Direction, text: TextDirection) -> Candidates {
    let mut out = Candidates::new();
    out.push(primary(direction, text));
    out.extend(FALLBACKS);
    out
}

/// Semantic side of the anchor for a chosen candidate.
///
/// Returns `None` for pairs that do not place the overlay beside or across an
/// anchor edge; callers keep whatever direction the panel already shows.
pub fn classify(pair: &ConnectionPair, text: TextDirection) -> Option<Direction> {
    let rtl = text.is_rtl();
    if pair.origin_x == HorizontalPos::End && pair.overlay_x == HorizontalPos::Start {
        Some(if rtl { Direction::Left } else { Direction::Right })
    } else if pair.origin_y == VerticalPos::Bottom && pair.overlay_y == VerticalPos::Top {
        Some(Direction::Bottom)
    } else if pair.origin_x == HorizontalPos::Start && pair.overlay_x == HorizontalPos::End {
        Some(if rtl { Direction::Right } else { Direction::Left })
    } else if pair.origin_y == VerticalPos::Top && pair.overlay_y == VerticalPos::Bottom {
        Some(Direction::Top)
    } else {
        None
    }
}

/// Arrow placement for a chosen candidate.
///
/// `anchor` is the anchor's bounding rectangle and `pane_origin` the rendered
/// top-left corner of the overlay pane, both in the same coordinate space.
/// Side placements center the arrow vertically. Placements above or below the
/// anchor shift it horizontally so it lines up with the anchor center.
pub fn arrow_style(pair: &ConnectionPair, anchor: Rect, pane_origin: Point) -> Option<ArrowStyle> {
    let beside = matches!(pair.origin_x, HorizontalPos::Start | HorizontalPos::End)
        && pair.overlay_y == VerticalPos::Center;
    if beside {
        return Some(ArrowStyle::CenteredVertically);
    }
    let across = matches!(pair.origin_y, VerticalPos::Top | VerticalPos::Bottom)
        && pair.overlay_x == HorizontalPos::Center;
    if pair.origin_x == pair.overlay_x || across {
        return Some(ArrowStyle::Left(anchor.center().x - pane_origin.x));
    }
    None
}
