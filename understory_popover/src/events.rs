// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event composition: many input streams, one visibility contract.
//!
//! ## Overview
//!
//! A trigger listens to several independent sources:
//!
//! - local listeners on the trigger element (pointer enter/leave or touch
//!   start, click, activation keys, focus origin),
//! - window-level escape and the panel's close affordance,
//! - document clicks while the panel is open,
//! - overlay lifecycle (position changes, external detach, backdrop clicks).
//!
//! [`EventComposer`] tracks which of these are subscribed as a [`Listeners`]
//! set and routes each [`Input`] into at most one intent for the controller.
//! It never mutates visibility itself; like a responder router, it only
//! decides what should happen and leaves execution to the caller.
//!
//! ## Teardown
//!
//! Every subscription shares one [`Teardown`] signal. Firing it clears the set
//! and drops every later input, permanently. There is no per-subscription
//! cancellation apart from the outside-click listener, which is bounded by the
//! panel's own closed signal.

use alloc::rc::Rc;
use core::cell::Cell;

use bitflags::bitflags;

use crate::host::Document;
use crate::placement::ConnectionPair;
use crate::types::{FocusOrigin, Key, TriggerKind};

bitflags! {
    /// Subscriptions currently held by a trigger.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Listeners: u16 {
        /// Pointer entered the trigger element.
        const POINTER_ENTER = 1 << 0;
        /// Pointer left the trigger element.
        const POINTER_LEAVE = 1 << 1;
        /// Touch started on the trigger element (touch platforms).
        const TOUCH_START = 1 << 2;
        /// Keydown on the trigger element.
        const KEY_DOWN = 1 << 3;
        /// Click on the trigger element.
        const CLICK = 1 << 4;
        /// Focus-origin monitor on the trigger element.
        const FOCUS = 1 << 5;
        /// Window-level escape key.
        const ESCAPE = 1 << 6;
        /// Panel close affordance.
        const CLOSE_BUTTON = 1 << 7;
        /// Document clicks outside the trigger.
        const OUTSIDE_CLICK = 1 << 8;
        /// Overlay position changes.
        const POSITION = 1 << 9;
        /// Overlay detachments.
        const DETACH = 1 << 10;
        /// Overlay backdrop clicks.
        const BACKDROP = 1 << 11;

        /// Listeners the host installs on the trigger element itself.
        const LOCAL = Self::POINTER_ENTER.bits()
            | Self::POINTER_LEAVE.bits()
            | Self::TOUCH_START.bits()
            | Self::KEY_DOWN.bits()
            | Self::CLICK.bits()
            | Self::FOCUS.bits();
    }
}

impl Listeners {
    /// Local listeners for a platform: touch platforms simulate hover with touch start.
    pub fn local_for(touch_platform: bool) -> Self {
        let hover = if touch_platform {
            Self::TOUCH_START
        } else {
            Self::POINTER_ENTER | Self::POINTER_LEAVE
        };
        hover | Self::KEY_DOWN | Self::CLICK | Self::FOCUS
    }
}

/// Shared, fire-once cancellation signal.
///
/// Clones observe the same signal, so a host can tie its own listener
/// registrations to a trigger's lifetime.
#[derive(Clone, Debug, Default)]
pub struct Teardown(Rc<Cell<bool>>);

impl Teardown {
    /// A signal that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Returns `false` if it had already fired.
    pub fn fire(&self) -> bool {
        !self.0.replace(true)
    }

    /// Whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        self.0.get()
    }
}

/// Overlay lifecycle events reported by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    /// The overlay primitive settled on a candidate.
    PositionChanged(ConnectionPair),
    /// The overlay detached on its own, for example on scroll.
    Detached,
    /// The modal backdrop was clicked.
    BackdropClick,
}

/// Signals raised by the panel collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// The close affordance was clicked.
    CloseButtonClick,
    /// The panel emitted its closed signal.
    Closed,
}

/// Everything a host can feed into a trigger.
#[derive(Clone, Debug, PartialEq)]
pub enum Input<K> {
    /// Pointer entered the trigger element.
    PointerEnter,
    /// Pointer left the trigger element.
    PointerLeave,
    /// Touch started on the trigger element.
    TouchStart,
    /// The trigger element was clicked.
    Click,
    /// Keydown on the trigger element.
    KeyDown(Key),
    /// The trigger element gained focus.
    Focus(FocusOrigin),
    /// Keyup anywhere in the window.
    WindowKeyUp(Key),
    /// Keydown inside the open panel.
    PanelKeyDown(Key),
    /// A click anywhere in the document.
    DocumentClick {
        /// Deepest node under the click.
        target: K,
    },
    /// Overlay lifecycle.
    Overlay(OverlayEvent),
    /// Panel signals.
    Panel(PanelEvent),
}

/// What the controller should do in response to an input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Intent {
    Show(bool),
    Activate,
    CycleFocus { backwards: bool },
    Reposition(ConnectionPair),
    Detached,
}

/// Snapshot of controller state needed to route one input.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RouteContext<K> {
    pub(crate) trigger: TriggerKind,
    pub(crate) is_open: bool,
    pub(crate) anchor: K,
}

/// Subscription bookkeeping for one trigger.
#[derive(Clone, Debug)]
pub struct EventComposer {
    listeners: Listeners,
    teardown: Teardown,
}

impl EventComposer {
    /// Subscribe the local listeners for the platform.
    pub fn new(touch_platform: bool) -> Self {
        Self {
            listeners: Listeners::local_for(touch_platform),
            teardown: Teardown::new(),
        }
    }

    /// Current subscriptions.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Local listeners the host should keep installed on the trigger element.
    pub fn local_listeners(&self) -> Listeners {
        self.listeners & Listeners::LOCAL
    }

    /// The shared teardown signal.
    pub fn teardown(&self) -> &Teardown {
        &self.teardown
    }

    /// Whether `listener` is subscribed and teardown has not fired.
    pub fn is_subscribed(&self, listener: Listeners) -> bool {
        !self.teardown.is_fired() && self.listeners.contains(listener)
    }

    /// Add subscriptions. Ignored after teardown.
    pub fn subscribe(&mut self, listeners: Listeners) {
        if !self.teardown.is_fired() {
            self.listeners |= listeners;
        }
    }

    /// The panel's closed signal: ends the outside-click subscription.
    pub fn panel_closed(&mut self) {
        self.listeners.remove(Listeners::OUTSIDE_CLICK);
    }

    /// Fire teardown and drop every subscription. Returns `false` if already fired.
    pub fn tear_down(&mut self) -> bool {
        self.listeners = Listeners::empty();
        self.teardown.fire()
    }

    pub(crate) fn route<K, D>(
        &mut self,
        input: &Input<K>,
        cx: RouteContext<K>,
        doc: &D,
    ) -> Option<Intent>
    where
        K: Copy + Eq,
        D: Document<K>,
    {
        if self.teardown.is_fired() {
            return None;
        }
        if matches!(input, Input::Panel(PanelEvent::Closed)) {
            self.panel_closed();
            return None;
        }
        let hover = cx.trigger == TriggerKind::Hover;
        let on = |l: Listeners| self.is_subscribed(l);
        match input {
            Input::PointerEnter => {
                (on(Listeners::POINTER_ENTER) && hover).then_some(Intent::Show(true))
            }
            Input::PointerLeave => {
                (on(Listeners::POINTER_LEAVE) && hover).then_some(Intent::Show(false))
            }
            Input::TouchStart => {
                (on(Listeners::TOUCH_START) && hover).then_some(Intent::Show(true))
            }
            Input::Click => on(Listeners::CLICK).then_some(Intent::Activate),
            Input::KeyDown(key) => {
                (on(Listeners::KEY_DOWN) && key.is_activation()).then_some(Intent::Activate)
            }
            Input::Focus(origin) => (on(Listeners::FOCUS)
                && hover
                && *origin == FocusOrigin::Keyboard)
                .then_some(Intent::Show(true)),
            Input::WindowKeyUp(key) => (on(Listeners::ESCAPE)
                && *key == Key::Escape
                && cx.is_open)
                .then_some(Intent::Show(false)),
            Input::PanelKeyDown(Key::Tab { shift }) => cx
                .is_open
                .then_some(Intent::CycleFocus { backwards: *shift }),
            Input::PanelKeyDown(_) => None,
            Input::DocumentClick { target } => (on(Listeners::OUTSIDE_CLICK)
                && !doc.contains(cx.anchor, *target))
                .then_some(Intent::Show(false)),
            Input::Overlay(OverlayEvent::PositionChanged(pair)) => {
                on(Listeners::POSITION).then_some(Intent::Reposition(*pair))
            }
            Input::Overlay(OverlayEvent::Detached) => {
                on(Listeners::DETACH).then_some(Intent::Detached)
            }
            Input::Overlay(OverlayEvent::BackdropClick) => {
                on(Listeners::BACKDROP).then_some(Intent::Show(false))
            }
            Input::Panel(PanelEvent::CloseButtonClick) => {
                on(Listeners::CLOSE_BUTTON).then_some(Intent::Show(false))
            }
            Input::Panel(PanelEvent::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;
    use kurbo::Rect;

    fn doc() -> MockDocument {
        let mut doc = MockDocument::new();
        doc.add(1, None, Rect::new(0.0, 0.0, 40.0, 20.0));
        doc.add(2, Some(1), Rect::new(5.0, 5.0, 15.0, 15.0));
        doc.add(3, None, Rect::new(100.0, 100.0, 140.0, 120.0));
        doc.add(10, None, Rect::new(0.0, 40.0, 200.0, 140.0));
        doc.add(11, Some(10), Rect::new(10.0, 50.0, 50.0, 70.0));
        doc
    }

    fn cx(trigger: TriggerKind, is_open: bool) -> RouteContext<u32> {
        RouteContext {
            trigger,
            is_open,
            anchor: 1,
        }
    }

    #[test]
    fn touch_platforms_replace_pointer_listeners() {
        let desktop = Listeners::local_for(false);
        assert!(desktop.contains(Listeners::POINTER_ENTER | Listeners::POINTER_LEAVE));
        assert!(!desktop.contains(Listeners::TOUCH_START));

        let touch = Listeners::local_for(true);
        assert!(touch.contains(Listeners::TOUCH_START | Listeners::KEY_DOWN));
        assert!(!touch.intersects(Listeners::POINTER_ENTER | Listeners::POINTER_LEAVE));
    }

    #[test]
    fn hover_inputs_only_route_for_hover_triggers() {
        let d = doc();
        let mut c = EventComposer::new(false);
        let hover = cx(TriggerKind::Hover, false);
        assert_eq!(c.route(&Input::PointerEnter, hover, &d), Some(Intent::Show(true)));
        assert_eq!(c.route(&Input::PointerLeave, hover, &d), Some(Intent::Show(false)));
        let click = cx(TriggerKind::Click, false);
        assert_eq!(c.route(&Input::PointerEnter, click, &d), None);

        let mut touch = EventComposer::new(true);
        assert_eq!(touch.route(&Input::PointerEnter, hover, &d), None);
        assert_eq!(touch.route(&Input::TouchStart, hover, &d), Some(Intent::Show(true)));
    }

    #[test]
    fn activation_keys_route_like_clicks() {
        let d = doc();
        let mut c = EventComposer::new(false);
        for trigger in [TriggerKind::Click, TriggerKind::Hover, TriggerKind::Manual] {
            let cx = cx(trigger, false);
            assert_eq!(c.route(&Input::KeyDown(Key::Enter), cx, &d), Some(Intent::Activate));
            assert_eq!(c.route(&Input::KeyDown(Key::Space), cx, &d), Some(Intent::Activate));
            assert_eq!(c.route(&Input::KeyDown(Key::Other), cx, &d), None);
        }
    }

    #[test]
    fn keyboard_focus_opens_hover_triggers() {
        let d = doc();
        let mut c = EventComposer::new(false);
        let hover = cx(TriggerKind::Hover, false);
        assert_eq!(
            c.route(&Input::Focus(FocusOrigin::Keyboard), hover, &d),
            Some(Intent::Show(true))
        );
        assert_eq!(c.route(&Input::Focus(FocusOrigin::Mouse), hover, &d), None);
        let click = cx(TriggerKind::Click, false);
        assert_eq!(c.route(&Input::Focus(FocusOrigin::Keyboard), click, &d), None);
    }

    #[test]
    fn escape_needs_subscription_and_open_panel() {
        let d = doc();
        let mut c = EventComposer::new(false);
        let esc = Input::WindowKeyUp(Key::Escape);
        assert_eq!(c.route(&esc, cx(TriggerKind::Click, true), &d), None);
        c.subscribe(Listeners::ESCAPE);
        assert_eq!(c.route(&esc, cx(TriggerKind::Click, false), &d), None);
        assert_eq!(
            c.route(&esc, cx(TriggerKind::Manual, true), &d),
            Some(Intent::Show(false))
        );
    }

    #[test]
    fn outside_clicks_filter_trigger_targets_only() {
        let d = doc();
        let mut c = EventComposer::new(false);
        let open = cx(TriggerKind::Click, true);
        let outside = Input::DocumentClick { target: 3 };
        assert_eq!(c.route(&outside, open, &d), None);

        c.subscribe(Listeners::OUTSIDE_CLICK);
        assert_eq!(c.route(&outside, open, &d), Some(Intent::Show(false)));
        assert_eq!(c.route(&Input::DocumentClick { target: 1 }, open, &d), None);
        assert_eq!(c.route(&Input::DocumentClick { target: 2 }, open, &d), None);
        // Panel content lies outside the trigger element.
        assert_eq!(
            c.route(&Input::DocumentClick { target: 11 }, open, &d),
            Some(Intent::Show(false))
        );

        // The panel's closed signal ends the subscription.
        assert_eq!(c.route(&Input::Panel(PanelEvent::Closed), open, &d), None);
        assert!(!c.listeners().contains(Listeners::OUTSIDE_CLICK));
        assert_eq!(c.route(&outside, open, &d), None);
    }

    #[test]
    fn teardown_silences_everything_once() {
        let d = doc();
        let mut c = EventComposer::new(false);
        c.subscribe(Listeners::ESCAPE | Listeners::DETACH | Listeners::OUTSIDE_CLICK);
        let shared = c.teardown().clone();

        assert!(c.tear_down());
        assert!(!c.tear_down());
        assert!(shared.is_fired());
        assert!(c.local_listeners().is_empty());

        let open = cx(TriggerKind::Hover, true);
        for input in [
            Input::PointerEnter,
            Input::Click,
            Input::WindowKeyUp(Key::Escape),
            Input::DocumentClick { target: 3 },
            Input::Overlay(OverlayEvent::Detached),
        ] {
            assert_eq!(c.route(&input, open, &d), None);
        }
        c.subscribe(Listeners::ESCAPE);
        assert!(!c.is_subscribed(Listeners::ESCAPE));
    }
}
