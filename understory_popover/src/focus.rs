// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus scope: trap focus inside an open panel and give it back on close.
//!
//! A [`FocusScope`] lives exactly as long as the panel content is attached.
//!
//! - [`FocusScope::trap`] records the panel root and the element that held focus
//!   before opening.
//! - Initial focus is asynchronous: [`FocusScope::focus_initial_when_ready`]
//!   only marks the request, and [`FocusScope::resolve_initial`] runs it once the
//!   content has mounted. It reports whether focus moved so the caller can fall
//!   back to focusing the root.
//! - While trapped, [`FocusScope::cycle`] wraps Tab / Shift+Tab inside the panel.
//! - [`FocusScope::restore`] hands focus back to the remembered element, if that
//!   element can still take focus.
//!
//! Tab order follows explicit [`Tabbable::order`] first, then reading order
//! (top to bottom, then left to right).

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;

use crate::host::Document;

/// A focusable candidate inside a trapped subtree.
#[derive(Clone, Debug)]
pub struct Tabbable<K> {
    /// Node key.
    pub id: K,
    /// Bounds, in the same space for every entry of one scope.
    pub rect: Rect,
    /// Optional explicit ordering key.
    pub order: Option<i32>,
    /// Preferred as the initial focus target when the scope activates.
    pub autofocus: bool,
    /// Disabled entries are skipped.
    pub enabled: bool,
}

impl<K> Tabbable<K> {
    /// An enabled entry with no explicit order.
    pub fn new(id: K, rect: Rect) -> Self {
        Self {
            id,
            rect,
            order: None,
            autofocus: false,
            enabled: true,
        }
    }
}

/// Focus trap over one attached panel.
#[derive(Clone, Debug)]
pub struct FocusScope<K> {
    root: K,
    previously_focused: Option<K>,
    pending_initial: bool,
}

impl<K: Copy + Eq> FocusScope<K> {
    /// Install a trap over `root`, remembering `previously_focused` for [`restore`](Self::restore).
    pub fn trap(root: K, previously_focused: Option<K>) -> Self {
        Self {
            root,
            previously_focused,
            pending_initial: false,
        }
    }

    /// Root of the trapped subtree.
    pub fn root(&self) -> K {
        self.root
    }

    /// Element that will get focus back on close, if not yet consumed.
    pub fn previously_focused(&self) -> Option<K> {
        self.previously_focused
    }

    /// Request initial focus once the content is ready.
    pub fn focus_initial_when_ready(&mut self) {
        self.pending_initial = true;
    }

    /// Whether an initial-focus request is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending_initial
    }

    /// Run a pending initial-focus request.
    ///
    /// Returns `None` if nothing was pending, otherwise whether focus moved.
    pub fn resolve_initial<D: Document<K>>(&mut self, doc: &mut D) -> Option<bool> {
        if !core::mem::take(&mut self.pending_initial) {
            return None;
        }
        Some(self.focus_initial_element(doc))
    }

    /// Focus the preferred initial element: an `autofocus` entry, else the first in tab order.
    pub fn focus_initial_element<D: Document<K>>(&self, doc: &mut D) -> bool {
        let entries = doc.tabbables(self.root);
        let order = tab_order(&entries);
        let target = order
            .iter()
            .map(|&i| &entries[i])
            .find(|e| e.autofocus)
            .or_else(|| order.first().map(|&i| &entries[i]))
            .map(|e| e.id);
        match target {
            Some(id) => {
                doc.focus(id);
                true
            }
            None => false,
        }
    }

    /// Move focus to the next (or previous) tabbable, wrapping inside the scope.
    ///
    /// Focus outside the scope re-enters at the first (or last) entry. Returns
    /// the newly focused node, or `None` when the scope has no tabbables.
    pub fn cycle<D: Document<K>>(&self, doc: &mut D, backwards: bool) -> Option<K> {
        let entries = doc.tabbables(self.root);
        let order = tab_order(&entries);
        if order.is_empty() {
            return None;
        }
        let current = doc.active_element();
        let pos = order.iter().position(|&i| Some(entries[i].id) == current);
        let next = match (pos, backwards) {
            (Some(p), false) => order[(p + 1) % order.len()],
            (Some(p), true) => order[(p + order.len() - 1) % order.len()],
            (None, false) => order[0],
            (None, true) => order[order.len() - 1],
        };
        let id = entries[next].id;
        doc.focus(id);
        Some(id)
    }

    /// Give focus back to the element focused before [`trap`](Self::trap).
    ///
    /// Consumes the remembered element. Skipped silently if it can no longer
    /// take focus. Returns whether focus was restored.
    pub fn restore<D: Document<K>>(&mut self, doc: &mut D) -> bool {
        match self.previously_focused.take() {
            Some(node) if doc.is_focusable(node) => {
                doc.focus(node);
                true
            }
            _ => false,
        }
    }

    /// Release the trap.
    ///
    /// The scope holds no host resources; consuming it is the release, and
    /// [`restore`](Self::restore) can no longer run afterwards.
    pub fn destroy(self) {}
}

/// Indices of enabled entries in tab order.
fn tab_order<K>(entries: &[Tabbable<K>]) -> Vec<usize> {
    let mut indices: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.enabled.then_some(i))
        .collect();
    indices.sort_by(|&a, &b| compare_tab(&entries[a], &entries[b]));
    indices
}

fn compare_tab<K>(a: &Tabbable<K>, b: &Tabbable<K>) -> Ordering {
    match (a.order, b.order) {
        (Some(ao), Some(bo)) => ao
            .cmp(&bo)
            .then_with(|| compare_rect_reading(&a.rect, &b.rect)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_rect_reading(&a.rect, &b.rect),
    }
}

fn compare_rect_reading(a: &Rect, b: &Rect) -> Ordering {
    const RELATIVE_EPS: f64 = 1e-6;
    let (ay, by) = (a.y0, b.y0);
    if (ay - by).abs() > f64::max(ay.abs(), by.abs()) * RELATIVE_EPS {
        return ay.partial_cmp(&by).unwrap_or(Ordering::Equal);
    }
    a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;

    fn scope_doc() -> MockDocument {
        // 1 = trigger, 10 = panel root, 11..13 = panel children.
        let mut doc = MockDocument::new();
        doc.add(1, None, Rect::new(0.0, 0.0, 40.0, 20.0));
        doc.add(10, None, Rect::new(0.0, 40.0, 200.0, 140.0));
        doc.add_tabbable(11, 10, Rect::new(100.0, 50.0, 140.0, 70.0));
        doc.add_tabbable(12, 10, Rect::new(10.0, 50.0, 50.0, 70.0));
        doc.add_tabbable(13, 10, Rect::new(10.0, 100.0, 50.0, 120.0));
        doc
    }

    #[test]
    fn initial_focus_waits_until_resolved() {
        let mut doc = scope_doc();
        doc.focus(1);
        let mut scope = FocusScope::trap(10, Some(1));
        assert_eq!(scope.resolve_initial(&mut doc), None);

        scope.focus_initial_when_ready();
        assert!(scope.is_pending());
        assert_eq!(doc.active_element(), Some(1));

        assert_eq!(scope.resolve_initial(&mut doc), Some(true));
        // Reading order: 12 is left of 11 on the same row.
        assert_eq!(doc.active_element(), Some(12));
        assert!(!scope.is_pending());
    }

    #[test]
    fn autofocus_wins_over_tab_order() {
        let mut doc = scope_doc();
        doc.tabbable_mut(13).autofocus = true;
        let scope = FocusScope::trap(10, None);
        assert!(scope.focus_initial_element(&mut doc));
        assert_eq!(doc.active_element(), Some(13));
    }

    #[test]
    fn initial_focus_reports_empty_scope() {
        let mut doc = MockDocument::new();
        doc.add(10, None, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut scope = FocusScope::trap(10, None);
        scope.focus_initial_when_ready();
        assert_eq!(scope.resolve_initial(&mut doc), Some(false));
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let mut doc = scope_doc();
        let scope = FocusScope::trap(10, None);
        doc.focus(13);
        assert_eq!(scope.cycle(&mut doc, false), Some(12));
        assert_eq!(scope.cycle(&mut doc, true), Some(13));
        assert_eq!(scope.cycle(&mut doc, true), Some(11));
    }

    #[test]
    fn cycle_reenters_from_outside() {
        let mut doc = scope_doc();
        let scope = FocusScope::trap(10, None);
        doc.focus(1);
        assert_eq!(scope.cycle(&mut doc, true), Some(13));
        doc.focus(1);
        assert_eq!(scope.cycle(&mut doc, false), Some(12));
    }

    #[test]
    fn explicit_order_beats_reading_order() {
        let mut doc = scope_doc();
        doc.tabbable_mut(13).order = Some(0);
        doc.tabbable_mut(11).enabled = false;
        let scope = FocusScope::trap(10, None);
        assert!(scope.focus_initial_element(&mut doc));
        assert_eq!(doc.active_element(), Some(13));
        assert_eq!(scope.cycle(&mut doc, false), Some(12));
        assert_eq!(scope.cycle(&mut doc, false), Some(13));
    }

    #[test]
    fn restore_is_consumed_once() {
        let mut doc = scope_doc();
        let mut scope = FocusScope::trap(10, Some(1));
        doc.focus(12);
        assert!(scope.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(1));

        doc.focus(12);
        assert!(!scope.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(12));
    }

    #[test]
    fn restore_skips_removed_element() {
        let mut doc = scope_doc();
        let mut scope = FocusScope::trap(10, Some(1));
        doc.focus(12);
        doc.remove(1);
        assert!(!scope.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(12));
    }
}
