// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator seams.
//!
//! The controller never renders anything and never touches a concrete scene.
//! Everything it needs from the outside world goes through these traits:
//!
//! - [`Document`]: focus, containment, and geometry lookups keyed by node `K`.
//!   Node keys are plain lookups; the controller never assumes a key it
//!   remembered is still alive and probes [`Document::is_focusable`] first.
//! - [`Panel`]: the rendered panel content. It supplies the content handle to
//!   attach and receives presentation updates (id, direction, arrow, close
//!   affordance).
//! - [`OverlayHandle`] / [`OverlayFactory`]: the floating-surface primitive that
//!   actually positions, fit-tests, and mounts the content.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::focus::Tabbable;
use crate::position::PositionStrategy;
use crate::types::{ArrowStyle, Direction, ScrollStrategy};

/// Read/write access to the host's focusable node graph.
pub trait Document<K: Copy + Eq> {
    /// Node that currently holds keyboard focus.
    fn active_element(&self) -> Option<K>;

    /// Whether `node` still exists and can take focus.
    fn is_focusable(&self, node: K) -> bool;

    /// Move keyboard focus to `node`.
    fn focus(&mut self, node: K);

    /// Whether `node` is `ancestor` or lies inside its subtree.
    fn contains(&self, ancestor: K, node: K) -> bool;

    /// Tabbable descendants of `root`, in any order.
    fn tabbables(&self, root: K) -> Vec<Tabbable<K>>;

    /// Bounding rectangle of `node` in viewport space.
    fn bounding_rect(&self, node: K) -> Rect;
}

/// The panel collaborator: rendered content plus its presentation inputs.
pub trait Panel {
    /// Handle the overlay mounts (a template, a view builder, ...).
    type Content;

    /// Content to attach when the panel opens.
    fn content(&self) -> Self::Content;

    /// Set the id the trigger references while open.
    fn set_id(&mut self, id: &str);

    /// Show or hide the close affordance.
    fn set_show_close_button(&mut self, show: bool);

    /// Side of the anchor the panel currently renders on.
    fn set_direction(&mut self, direction: Direction);

    /// Arrow placement for the current side.
    fn set_arrow_style(&mut self, style: ArrowStyle);

    /// Re-render already attached content synchronously.
    fn detect_changes(&mut self);

    /// Emit the panel's own "closed" signal.
    fn emit_closed(&mut self);
}

/// Configuration for a freshly created overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig<K> {
    /// Anchor-relative position strategy.
    pub position: PositionStrategy<K>,
    /// Reaction to ancestor scrolling.
    pub scroll: ScrollStrategy,
    /// Whether a click-blocking backdrop is rendered behind the panel.
    pub has_backdrop: bool,
}

/// A created floating surface.
///
/// Lifecycle streams are synchronous with the calls that cause them: a
/// successful [`attach`](OverlayHandle::attach) is the attach event and a
/// `true` from [`detach`](OverlayHandle::detach) is the detach event. When the
/// surface detaches on its own (for example a close-on-scroll strategy), the
/// host reports it with [`OverlayEvent::Detached`](crate::events::OverlayEvent::Detached).
pub trait OverlayHandle<K, C> {
    /// Mount `content` and return its root node.
    fn attach(&mut self, content: C) -> K;

    /// Unmount the content. Returns `false` when nothing was attached.
    fn detach(&mut self) -> bool;

    /// Whether content is currently mounted.
    fn has_attached(&self) -> bool;

    /// Recompute the position right away.
    fn update_position(&mut self);

    /// Rendered top-left corner of the overlay pane.
    fn pane_origin(&self) -> Point;
}

/// Creates overlay surfaces.
pub trait OverlayFactory<K, C> {
    /// Concrete surface type.
    type Handle: OverlayHandle<K, C>;

    /// Create a surface; it starts detached.
    fn create(&mut self, config: OverlayConfig<K>) -> Self::Handle;
}
