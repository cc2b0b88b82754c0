// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement table: the primary candidate per direction and the fixed fallback chain.
//!
//! A [`ConnectionPair`] pairs a point on the anchor (the *origin*) with a point
//! on the overlay and a pixel offset. The overlay primitive tries candidates in
//! order and keeps the first one that fits the viewport.
//!
//! The fallback chain is a single static table so its order can be audited in
//! one place. It never depends on the requested direction.
//!
//! ```rust
//! use understory_popover::placement::{FALLBACKS, primary};
//! use understory_popover::types::{Direction, HorizontalPos, TextDirection, VerticalPos};
//!
//! let top = primary(Direction::Top, TextDirection::Ltr);
//! assert_eq!(top.origin_y, VerticalPos::Top);
//! assert_eq!(top.overlay_y, VerticalPos::Bottom);
//! assert_eq!(top.origin_x, HorizontalPos::Center);
//! assert_eq!(FALLBACKS.len(), 8);
//! ```

use kurbo::Vec2;

use crate::types::{Direction, HorizontalPos, TextDirection, VerticalPos};

use HorizontalPos::{Center as HCenter, End, Start};
use VerticalPos::{Bottom, Center as VCenter, Top};

/// Offset magnitude of the primary candidate, in pixels.
pub const PRIMARY_OFFSET: f64 = 20.0;

/// Offset magnitude of every fallback candidate, in pixels.
pub const FALLBACK_OFFSET: f64 = 16.0;

/// One candidate placement: align `overlay_*` on the overlay with `origin_*` on the anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConnectionPair {
    /// Horizontal point on the anchor.
    pub origin_x: HorizontalPos,
    /// Vertical point on the anchor.
    pub origin_y: VerticalPos,
    /// Horizontal point on the overlay.
    pub overlay_x: HorizontalPos,
    /// Vertical point on the overlay.
    pub overlay_y: VerticalPos,
    /// Pixel offset applied after alignment.
    pub offset: Vec2,
}

impl ConnectionPair {
    /// Create a candidate.
    pub const fn new(
        origin: (HorizontalPos, VerticalPos),
        overlay: (HorizontalPos, VerticalPos),
        offset: Vec2,
    ) -> Self {
        Self {
            origin_x: origin.0,
            origin_y: origin.1,
            overlay_x: overlay.0,
            overlay_y: overlay.1,
            offset,
        }
    }
}

/// Fallback candidates, tried in this order after the primary one.
pub const FALLBACKS: [ConnectionPair; 8] = [
    ConnectionPair::new((Start, Bottom), (Start, Top), Vec2::new(0.0, FALLBACK_OFFSET)),
    ConnectionPair::new((End, Top), (End, Bottom), Vec2::new(0.0, -FALLBACK_OFFSET)),
    ConnectionPair::new((HCenter, Bottom), (HCenter, Top), Vec2::new(0.0, FALLBACK_OFFSET)),
    ConnectionPair::new((End, Bottom), (End, Top), Vec2::new(0.0, FALLBACK_OFFSET)),
    ConnectionPair::new((End, VCenter), (Start, VCenter), Vec2::new(FALLBACK_OFFSET, 0.0)),
    ConnectionPair::new((Start, VCenter), (End, VCenter), Vec2::new(-FALLBACK_OFFSET, 0.0)),
    ConnectionPair::new((HCenter, Top), (HCenter, Bottom), Vec2::new(0.0, -FALLBACK_OFFSET)),
    ConnectionPair::new((Start, Top), (Start, Bottom), Vec2::new(0.0, -FALLBACK_OFFSET)),
];

/// Default offset for the requested direction.
///
/// The sign follows the physical side: `Right` pushes the panel away to the
/// right and `Left` to the left, in both text directions.
pub const fn primary_offset(direction: Direction) -> Vec2 {
    match direction {
        Direction::Top => Vec2::new(0.0, -PRIMARY_OFFSET),
        Direction::Bottom => Vec2::new(0.0, PRIMARY_OFFSET),
        Direction::Right => Vec2::new(PRIMARY_OFFSET, 0.0),
        Direction::Left => Vec2::new(-PRIMARY_OFFSET, 0.0),
    }
}

/// Primary candidate for `direction`.
///
/// `Left`/`Right` are physical, so under RTL their logical `start`/`end`
/// points swap.
pub const fn primary(direction: Direction, text: TextDirection) -> ConnectionPair {
    let rtl = text.is_rtl();
    let offset = primary_offset(direction);
    match direction {
        Direction::Top => ConnectionPair::new((HCenter, Top), (HCenter, Bottom), offset),
        Direction::Bottom => ConnectionPair::new((HCenter, Bottom), (HCenter, Top), offset),
        Direction::Right => {
            if rtl {
                ConnectionPair::new((Start, VCenter), (End, VCenter), offset)
            } else {
                ConnectionPair::new((End, VCenter), (Start, VCenter), offset)
            }
        }
        Direction::Left => {
            if rtl {
                ConnectionPair::new((End, VCenter), (Start, VCenter), offset)
            } else {
                ConnectionPair::new((Start, VCenter), (End, VCenter), offset)
            }
        }
    }
}
