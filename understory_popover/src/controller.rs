// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger controller: the open/close contract for one anchor and one panel.
//!
//! ## State
//!
//! `show` is the visibility intent and the overlay's attachment is the
//! visibility fact. They only change through two sequences:
//!
//! - **open** (on `show` becoming `true`): lazily create the overlay, attach the
//!   panel content, trap focus over the new root, request initial focus, and
//!   subscribe to outside clicks when the mode calls for it.
//! - **close** (on `show` becoming `false`): restore focus, detach the content,
//!   and release the trap.
//!
//! Setting `show` to its current value does nothing. A visibility change is
//! reported through [`TriggerController::take_show_changes`] exactly once per
//! attach and once per detach.
//!
//! When the overlay detaches on its own (a close-on-scroll strategy, for
//! example), the host reports [`OverlayEvent::Detached`](crate::events::OverlayEvent::Detached)
//! and the controller accepts it as a close: `show` is forced to `false`.
//!
//! ## Driving a trigger
//!
//! The host owns the node graph and passes it into every call that may touch
//! focus or geometry. Inputs go through [`TriggerController::handle`]. After
//! dispatching a batch of inputs, call [`TriggerController::flush`] to run the
//! deferred initial-focus step.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace};

use crate::error::TriggerError;
use crate::events::{EventComposer, Input, Intent, Listeners, RouteContext, Teardown};
use crate::focus::FocusScope;
use crate::host::{Document, OverlayConfig, OverlayFactory, OverlayHandle, Panel};
use crate::placement::ConnectionPair;
use crate::position::{PositionStrategy, arrow_style, classify};
use crate::types::{Direction, ScrollStrategy, TextDirection, TriggerKind};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Trigger configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerConfig {
    /// How interaction with the trigger element opens the panel.
    pub trigger: TriggerKind,
    /// Preferred side of the anchor.
    pub direction: Direction,
    /// Render a backdrop and skip the outside-click listener.
    pub modal: bool,
    /// Whether the panel shows a close affordance; `None` derives it from `trigger`.
    pub closeable: Option<bool>,
    /// Close on document clicks outside the trigger (non-modal only).
    pub close_on_click_outside: bool,
    /// What happens when an ancestor scrolls.
    pub scroll_strategy: ScrollStrategy,
    /// Open during [`TriggerController::init`].
    pub initially_visible: bool,
    /// Text direction of the document.
    pub text_direction: TextDirection,
    /// Hover is simulated with touch start instead of pointer enter/leave.
    pub touch_platform: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            trigger: TriggerKind::Click,
            direction: Direction::Right,
            modal: false,
            closeable: None,
            close_on_click_outside: true,
            scroll_strategy: ScrollStrategy::Close,
            initially_visible: false,
            text_direction: TextDirection::Ltr,
            touch_platform: false,
        }
    }
}

impl TriggerConfig {
    /// Set the trigger kind.
    pub fn with_trigger(mut self, trigger: TriggerKind) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set the preferred direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set modal mode.
    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Override the close affordance.
    pub fn with_closeable(mut self, closeable: bool) -> Self {
        self.closeable = Some(closeable);
        self
    }

    /// Set the scroll strategy.
    pub fn with_scroll_strategy(mut self, scroll_strategy: ScrollStrategy) -> Self {
        self.scroll_strategy = scroll_strategy;
        self
    }

    /// Set the text direction.
    pub fn with_text_direction(mut self, text_direction: TextDirection) -> Self {
        self.text_direction = text_direction;
        self
    }

    /// Mark the platform as touch-first.
    pub fn with_touch_platform(mut self, touch_platform: bool) -> Self {
        self.touch_platform = touch_platform;
        self
    }
}

/// Controller for one trigger element and the panel it opens.
pub struct TriggerController<K, P, F>
where
    P: Panel,
    F: OverlayFactory<K, P::Content>,
{
    id: String,
    anchor: K,
    config: TriggerConfig,
    show: bool,
    panel: Option<P>,
    factory: F,
    overlay: Option<F::Handle>,
    content_root: Option<K>,
    focus: Option<FocusScope<K>>,
    resolved_direction: Option<Direction>,
    events: EventComposer,
    show_changes: Vec<bool>,
}

impl<K, P, F> fmt::Debug for TriggerController<K, P, F>
where
    K: fmt::Debug,
    P: Panel,
    F: OverlayFactory<K, P::Content>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerController")
            .field("id", &self.id)
            .field("anchor", &self.anchor)
            .field("config", &self.config)
            .field("show", &self.show)
            .field("content_root", &self.content_root)
            .field("listeners", &self.events.listeners())
            .finish_non_exhaustive()
    }
}

impl<K, P, F> TriggerController<K, P, F>
where
    K: Copy + Eq + fmt::Debug,
    P: Panel,
    F: OverlayFactory<K, P::Content>,
{
    /// Create a controller for `anchor`. Local listeners are subscribed right away.
    pub fn new(anchor: K, factory: F, config: TriggerConfig) -> Self {
        let id = format!("popover-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            anchor,
            events: EventComposer::new(config.touch_platform),
            config,
            show: false,
            panel: None,
            factory,
            overlay: None,
            content_root: None,
            focus: None,
            resolved_direction: None,
            show_changes: Vec::new(),
        }
    }

    /// Bind `panel` and return the controller.
    pub fn with_panel(mut self, panel: P) -> Self {
        self.set_panel(panel);
        self
    }

    /// Bind the panel this trigger opens.
    pub fn set_panel(&mut self, mut panel: P) {
        panel.set_id(&self.id);
        panel.set_show_close_button(self.is_closeable());
        self.panel = Some(panel);
    }

    /// Finish setup once the panel is bound.
    ///
    /// Pushes the id and close affordance to the panel, subscribes the escape
    /// key and the close affordance, and opens the panel if it was configured
    /// as initially visible.
    pub fn init<D: Document<K>>(&mut self, doc: &mut D) -> Result<(), TriggerError> {
        self.ensure_live()?;
        let closeable = self.is_closeable();
        let panel = self.panel.as_mut().ok_or(TriggerError::MissingPanel)?;
        panel.set_id(&self.id);
        panel.set_show_close_button(closeable);
        self.events
            .subscribe(Listeners::ESCAPE | Listeners::CLOSE_BUTTON);
        if self.config.initially_visible || self.show {
            self.set_show(doc, true)?;
        }
        Ok(())
    }

    /// Unique id, also pushed to the panel.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The trigger element.
    pub fn anchor(&self) -> K {
        self.anchor
    }

    /// Current configuration.
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Visibility intent.
    pub fn show(&self) -> bool {
        self.show
    }

    /// Whether the overlay exists and has content attached.
    pub fn is_open(&self) -> bool {
        self.overlay.as_ref().is_some_and(|o| o.has_attached())
    }

    /// Whether the panel should show its close affordance.
    pub fn is_closeable(&self) -> bool {
        match self.config.closeable {
            Some(closeable) => closeable,
            None => self.config.trigger == TriggerKind::Click,
        }
    }

    /// Value for `aria-expanded` on the trigger element.
    pub fn aria_expanded(&self) -> bool {
        self.is_open()
    }

    /// Value for `aria-describedby` on the trigger element.
    pub fn aria_described_by(&self) -> Option<&str> {
        self.is_open().then_some(self.id.as_str())
    }

    /// Side the panel currently renders on, once the overlay has positioned it.
    pub fn resolved_direction(&self) -> Option<Direction> {
        self.resolved_direction
    }

    /// The bound panel.
    pub fn panel(&self) -> Option<&P> {
        self.panel.as_ref()
    }

    /// The bound panel, mutably.
    pub fn panel_mut(&mut self) -> Option<&mut P> {
        self.panel.as_mut()
    }

    /// The overlay, once the panel has been opened at least once.
    pub fn overlay(&self) -> Option<&F::Handle> {
        self.overlay.as_ref()
    }

    /// The active focus trap, present exactly while content is attached.
    pub fn focus_scope(&self) -> Option<&FocusScope<K>> {
        self.focus.as_ref()
    }

    /// Local listeners the host should keep installed on the trigger element.
    pub fn local_listeners(&self) -> Listeners {
        self.events.local_listeners()
    }

    /// Shared teardown signal for every subscription of this trigger.
    pub fn teardown(&self) -> Teardown {
        self.events.teardown().clone()
    }

    /// Drain visibility changes recorded since the last call.
    pub fn take_show_changes(&mut self) -> Vec<bool> {
        core::mem::take(&mut self.show_changes)
    }

    /// Change the trigger kind.
    pub fn set_trigger(&mut self, trigger: TriggerKind) {
        self.config.trigger = trigger;
        self.push_closeable();
    }

    /// Override (or with `None`, derive) the close affordance.
    pub fn set_closeable(&mut self, closeable: Option<bool>) {
        self.config.closeable = closeable;
        self.push_closeable();
    }

    /// Change the preferred direction. Applies when the overlay is first created.
    pub fn set_direction(&mut self, direction: Direction) {
        self.config.direction = direction;
    }

    /// Change modal mode. Applies when the overlay is first created.
    pub fn set_modal(&mut self, modal: bool) {
        self.config.modal = modal;
    }

    /// Change the scroll strategy. Applies when the overlay is first created.
    pub fn set_scroll_strategy(&mut self, scroll_strategy: ScrollStrategy) {
        self.config.scroll_strategy = scroll_strategy;
    }

    /// Change whether outside clicks close the panel. Applies from the next open.
    pub fn set_close_on_click_outside(&mut self, close: bool) {
        self.config.close_on_click_outside = close;
    }

    /// Open the panel.
    pub fn open<D: Document<K>>(&mut self, doc: &mut D) -> Result<(), TriggerError> {
        self.set_show(doc, true)
    }

    /// Close the panel.
    pub fn close<D: Document<K>>(&mut self, doc: &mut D) -> Result<(), TriggerError> {
        self.set_show(doc, false)
    }

    /// Flip the visibility intent.
    pub fn toggle<D: Document<K>>(&mut self, doc: &mut D) -> Result<(), TriggerError> {
        self.set_show(doc, !self.show)
    }

    /// Set the visibility intent, running the open or close sequence on a change.
    pub fn set_show<D: Document<K>>(&mut self, doc: &mut D, show: bool) -> Result<(), TriggerError> {
        self.ensure_live()?;
        self.apply_show(doc, show)
    }

    /// React to a click on the trigger element according to the trigger kind.
    pub fn handle_click<D: Document<K>>(&mut self, doc: &mut D) -> Result<(), TriggerError> {
        self.ensure_live()?;
        match self.config.trigger {
            TriggerKind::Click => self.apply_show(doc, !self.is_open()),
            TriggerKind::Hover => self.apply_show(doc, true),
            TriggerKind::Manual => Ok(()),
        }
    }

    /// Recompute the overlay position right away.
    pub fn update_position(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.update_position();
        }
    }

    /// Feed one input into the trigger.
    ///
    /// Inputs without a matching subscription, and every input after
    /// [`destroy`](Self::destroy), are dropped.
    pub fn handle<D: Document<K>>(&mut self, doc: &mut D, input: Input<K>) -> Result<(), TriggerError> {
        let cx = RouteContext {
            trigger: self.config.trigger,
            is_open: self.is_open(),
            anchor: self.anchor,
        };
        let Some(intent) = self.events.route(&input, cx, doc) else {
            trace!(id = %self.id, ?input, "input ignored");
            return Ok(());
        };
        match intent {
            Intent::Show(show) => self.apply_show(doc, show),
            Intent::Activate => self.handle_click(doc),
            Intent::CycleFocus { backwards } => {
                if let Some(scope) = self.focus.as_ref() {
                    scope.cycle(doc, backwards);
                }
                Ok(())
            }
            Intent::Reposition(pair) => {
                self.reposition(doc, &pair);
                Ok(())
            }
            Intent::Detached => {
                if self.content_root.is_none() && !self.show {
                    trace!(id = %self.id, "stale detach ignored");
                    return Ok(());
                }
                debug!(id = %self.id, show = self.show, "overlay detached externally");
                self.on_detached(doc);
                Ok(())
            }
        }
    }

    /// Run deferred work: the initial-focus request of a freshly opened panel.
    ///
    /// When the panel has nothing tabbable, its root is focused instead.
    pub fn flush<D: Document<K>>(&mut self, doc: &mut D) {
        let Some(scope) = self.focus.as_mut() else {
            return;
        };
        if scope.resolve_initial(doc) == Some(false) {
            doc.focus(scope.root());
        }
    }

    /// Close the panel and fire the teardown signal. Later calls do nothing.
    pub fn destroy<D: Document<K>>(&mut self, doc: &mut D) {
        if self.events.teardown().is_fired() {
            return;
        }
        debug!(id = %self.id, "destroying popover trigger");
        if self.show {
            self.hide(doc);
        }
        self.events.tear_down();
    }

    fn ensure_live(&self) -> Result<(), TriggerError> {
        if self.events.teardown().is_fired() {
            Err(TriggerError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn push_closeable(&mut self) {
        let closeable = self.is_closeable();
        if let Some(panel) = self.panel.as_mut() {
            panel.set_show_close_button(closeable);
        }
    }

    fn apply_show<D: Document<K>>(&mut self, doc: &mut D, show: bool) -> Result<(), TriggerError> {
        if self.show == show {
            return Ok(());
        }
        if show {
            // Fail before touching state so `show` never claims an unopenable panel.
            let content = self
                .panel
                .as_ref()
                .ok_or(TriggerError::MissingPanel)?
                .content();
            self.show = true;
            self.open_sequence(doc, content);
        } else {
            self.hide(doc);
        }
        Ok(())
    }

    /// Clear `show` and run the close sequence.
    ///
    /// The close is reported whenever content was attached as far as the
    /// controller knows, even if the overlay already detached on its own and
    /// its report has not arrived yet.
    fn hide<D: Document<K>>(&mut self, doc: &mut D) {
        self.show = false;
        let was_attached = self.content_root.is_some();
        self.close_sequence(doc);
        if was_attached {
            self.on_detached(doc);
        }
    }

    fn open_sequence<D: Document<K>>(&mut self, doc: &mut D, content: P::Content) {
        let overlay = self.overlay_handle();
        if overlay.has_attached() {
            return;
        }
        let previously_focused = doc.active_element();
        let root = overlay.attach(content);
        debug!(id = %self.id, ?root, "popover opened");
        self.content_root = Some(root);
        self.show_changes.push(self.show);

        let mut scope = FocusScope::trap(root, previously_focused);
        scope.focus_initial_when_ready();
        self.focus = Some(scope);

        if !self.config.modal && self.config.close_on_click_outside {
            self.events.subscribe(Listeners::OUTSIDE_CLICK);
        }
    }

    fn close_sequence<D: Document<K>>(&mut self, doc: &mut D) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        if let Some(scope) = self.focus.as_mut() {
            scope.restore(doc);
        }
        if overlay.detach() {
            debug!(id = %self.id, "popover closed");
        }
        self.content_root = None;
        if let Some(scope) = self.focus.take() {
            scope.destroy();
        }
    }

    fn on_detached<D: Document<K>>(&mut self, doc: &mut D) {
        if self.show {
            self.show = false;
            self.close_sequence(doc);
        }
        self.show_changes.push(self.show);
        if let Some(panel) = self.panel.as_mut() {
            panel.emit_closed();
        }
        self.events.panel_closed();
    }

    fn reposition<D: Document<K>>(&mut self, doc: &D, pair: &ConnectionPair) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if let Some(direction) = classify(pair, self.config.text_direction) {
            trace!(id = %self.id, %direction, "placement resolved");
            self.resolved_direction = Some(direction);
            panel.set_direction(direction);
        }
        if let Some(overlay) = self.overlay.as_ref() {
            let anchor = doc.bounding_rect(self.anchor);
            if let Some(style) = arrow_style(pair, anchor, overlay.pane_origin()) {
                panel.set_arrow_style(style);
            }
            if overlay.has_attached() {
                // Position changes land after the content rendered.
                panel.detect_changes();
            }
        }
    }

    fn overlay_handle(&mut self) -> &mut F::Handle {
        let Self {
            overlay,
            factory,
            config,
            events,
            anchor,
            ..
        } = self;
        overlay.get_or_insert_with(|| {
            let has_backdrop = config.modal && config.trigger == TriggerKind::Click;
            let mut subscriptions = Listeners::POSITION | Listeners::DETACH;
            if config.modal {
                subscriptions |= Listeners::BACKDROP;
            }
            events.subscribe(subscriptions);
            factory.create(OverlayConfig {
                position: PositionStrategy::connected_to(
                    *anchor,
                    config.direction,
                    config.text_direction,
                ),
                scroll: config.scroll_strategy,
                has_backdrop,
            })
        })
    }
}
