// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Popover: trigger and overlay controller for anchored popover panels.
//!
//! ## Overview
//!
//! A popover is a floating panel anchored to a trigger element. This crate owns
//! the part that decides *when* the panel is shown and *how* it behaves while
//! shown. It does not render anything:
//!
//! - [`controller::TriggerController`] holds the visibility intent and runs the
//!   open and close sequences against an overlay primitive.
//! - [`events`] composes the trigger's input streams (pointer, touch, keys,
//!   focus origin, document clicks, overlay lifecycle) into that one contract.
//! - [`placement`] and [`position`] build the ordered list of anchor-relative
//!   candidates and map the overlay's choice back to a [`types::Direction`] and
//!   an arrow placement.
//! - [`focus`] traps focus inside the open panel and restores it on close.
//!
//! The host plugs in its node graph, panel, and overlay through the traits in
//! [`host`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_popover::focus::Tabbable;
//! use understory_popover::host::{Document, OverlayConfig, OverlayFactory, OverlayHandle, Panel};
//! use understory_popover::types::{ArrowStyle, Direction};
//! use understory_popover::{Input, TriggerConfig, TriggerController};
//!
//! // Node 1 is the trigger, node 2 the panel root.
//! #[derive(Default)]
//! struct Doc { focused: Option<u32> }
//!
//! impl Document<u32> for Doc {
//!     fn active_element(&self) -> Option<u32> { self.focused }
//!     fn is_focusable(&self, _: u32) -> bool { true }
//!     fn focus(&mut self, node: u32) { self.focused = Some(node); }
//!     fn contains(&self, ancestor: u32, node: u32) -> bool { ancestor == node }
//!     fn tabbables(&self, _: u32) -> Vec<Tabbable<u32>> { Vec::new() }
//!     fn bounding_rect(&self, _: u32) -> Rect { Rect::new(0.0, 0.0, 40.0, 20.0) }
//! }
//!
//! struct Card;
//!
//! impl Panel for Card {
//!     type Content = ();
//!     fn content(&self) {}
//!     fn set_id(&mut self, _: &str) {}
//!     fn set_show_close_button(&mut self, _: bool) {}
//!     fn set_direction(&mut self, _: Direction) {}
//!     fn set_arrow_style(&mut self, _: ArrowStyle) {}
//!     fn detect_changes(&mut self) {}
//!     fn emit_closed(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct Pane { attached: bool }
//!
//! impl OverlayHandle<u32, ()> for Pane {
//!     fn attach(&mut self, _: ()) -> u32 { self.attached = true; 2 }
//!     fn detach(&mut self) -> bool { core::mem::take(&mut self.attached) }
//!     fn has_attached(&self) -> bool { self.attached }
//!     fn update_position(&mut self) {}
//!     fn pane_origin(&self) -> Point { Point::ZERO }
//! }
//!
//! struct Panes;
//!
//! impl OverlayFactory<u32, ()> for Panes {
//!     type Handle = Pane;
//!     fn create(&mut self, _: OverlayConfig<u32>) -> Pane { Pane::default() }
//! }
//!
//! let mut doc = Doc::default();
//! let mut trigger = TriggerController::new(1, Panes, TriggerConfig::default()).with_panel(Card);
//! trigger.init(&mut doc).unwrap();
//!
//! trigger.handle(&mut doc, Input::Click).unwrap();
//! trigger.flush(&mut doc);
//! assert!(trigger.is_open());
//! // Nothing tabbable inside: the panel root takes focus.
//! assert_eq!(doc.focused, Some(2));
//!
//! trigger.handle(&mut doc, Input::Click).unwrap();
//! assert!(!trigger.is_open());
//! assert_eq!(trigger.take_show_changes(), vec![true, false]);
//! ```
//!
//! ## Logging
//!
//! Lifecycle transitions are reported with [`tracing`] at `debug` level and
//! ignored inputs at `trace` level. Install any subscriber to see them.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod controller;
pub mod error;
pub mod events;
pub mod focus;
pub mod host;
pub mod placement;
pub mod position;
pub mod types;

#[cfg(test)]
mod testing;

pub use controller::{TriggerConfig, TriggerController};
pub use error::{ParseValueError, TriggerError};
pub use events::{Input, Listeners, OverlayEvent, PanelEvent, Teardown};
pub use types::{Direction, ScrollStrategy, TextDirection, TriggerKind};
