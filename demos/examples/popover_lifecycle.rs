// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a hover popover and a modal click popover through their lifecycles.
//!
//! This example wires `understory_popover` to a tiny in-memory document, a
//! panel that logs what it is told, and an overlay that "fits" whichever
//! candidate the script says. Demo progress and controller logs are printed
//! through `tracing-subscriber`.
//!
//! Run:
//! - `RUST_LOG=info,understory_popover=trace cargo run -p understory_demos --example popover_lifecycle`

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Point, Rect};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use understory_popover::focus::Tabbable;
use understory_popover::host::{Document, OverlayConfig, OverlayFactory, OverlayHandle, Panel};
use understory_popover::placement::FALLBACKS;
use understory_popover::types::{ArrowStyle, Key};
use understory_popover::{
    Direction, Input, OverlayEvent, TriggerConfig, TriggerController, TriggerKind,
};

const HOVER_TRIGGER: u32 = 1;
const MODAL_TRIGGER: u32 = 2;
const PAGE: u32 = 3;
const PANEL_ROOT: u32 = 100;
const PANEL_OK: u32 = 101;
const PANEL_CANCEL: u32 = 102;

/// Flat scene: every node has a rect and an optional parent.
#[derive(Default)]
struct Scene {
    nodes: HashMap<u32, (Option<u32>, Rect)>,
    tabbable: Vec<u32>,
    focused: Option<u32>,
}

impl Scene {
    fn insert(&mut self, id: u32, parent: Option<u32>, rect: Rect) {
        self.nodes.insert(id, (parent, rect));
    }
}

impl Document<u32> for Scene {
    fn active_element(&self) -> Option<u32> {
        self.focused
    }

    fn is_focusable(&self, node: u32) -> bool {
        self.nodes.contains_key(&node)
    }

    fn focus(&mut self, node: u32) {
        info!(node, "focus moved");
        self.focused = Some(node);
    }

    fn contains(&self, ancestor: u32, node: u32) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(&id).and_then(|(parent, _)| *parent);
        }
        false
    }

    fn tabbables(&self, root: u32) -> Vec<Tabbable<u32>> {
        self.tabbable
            .iter()
            .filter(|id| self.contains(root, **id))
            .map(|id| Tabbable::new(*id, self.bounding_rect(*id)))
            .collect()
    }

    fn bounding_rect(&self, node: u32) -> Rect {
        self.nodes.get(&node).map_or(Rect::ZERO, |(_, rect)| *rect)
    }
}

/// A panel that logs presentation updates.
struct PrintPanel {
    name: &'static str,
}

impl Panel for PrintPanel {
    type Content = u32;

    fn content(&self) -> u32 {
        PANEL_ROOT
    }

    fn set_id(&mut self, id: &str) {
        info!(panel = self.name, id, "panel id");
    }

    fn set_show_close_button(&mut self, show: bool) {
        info!(panel = self.name, show, "close button");
    }

    fn set_direction(&mut self, direction: Direction) {
        info!(panel = self.name, %direction, "panel direction");
    }

    fn set_arrow_style(&mut self, style: ArrowStyle) {
        info!(panel = self.name, ?style, "panel arrow");
    }

    fn detect_changes(&mut self) {}

    fn emit_closed(&mut self) {
        info!(panel = self.name, "panel closed");
    }
}

/// Overlay whose attachment flag is shared with the script, so it can
/// simulate a close-on-scroll detach.
struct Pane {
    attached: Rc<Cell<bool>>,
}

impl OverlayHandle<u32, u32> for Pane {
    fn attach(&mut self, content: u32) -> u32 {
        self.attached.set(true);
        content
    }

    fn detach(&mut self) -> bool {
        self.attached.replace(false)
    }

    fn has_attached(&self) -> bool {
        self.attached.get()
    }

    fn update_position(&mut self) {}

    fn pane_origin(&self) -> Point {
        Point::new(40.0, 80.0)
    }
}

#[derive(Default)]
struct Panes {
    attached: Rc<Cell<bool>>,
}

impl OverlayFactory<u32, u32> for Panes {
    type Handle = Pane;

    fn create(&mut self, config: OverlayConfig<u32>) -> Pane {
        info!(
            candidates = config.position.candidates.len(),
            scroll = ?config.scroll,
            backdrop = config.has_backdrop,
            "overlay created"
        );
        Pane {
            attached: Rc::clone(&self.attached),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut scene = Scene::default();
    scene.insert(PAGE, None, Rect::new(0.0, 0.0, 800.0, 600.0));
    scene.insert(HOVER_TRIGGER, Some(PAGE), Rect::new(40.0, 40.0, 120.0, 60.0));
    scene.insert(MODAL_TRIGGER, Some(PAGE), Rect::new(200.0, 40.0, 280.0, 60.0));
    scene.insert(PANEL_ROOT, None, Rect::new(40.0, 80.0, 240.0, 180.0));
    scene.insert(PANEL_OK, Some(PANEL_ROOT), Rect::new(60.0, 140.0, 120.0, 160.0));
    scene.insert(PANEL_CANCEL, Some(PANEL_ROOT), Rect::new(140.0, 140.0, 200.0, 160.0));
    scene.tabbable = vec![PANEL_CANCEL, PANEL_OK];

    info!("hover trigger, preferred direction top");
    let panes = Panes::default();
    let hover_attached = Rc::clone(&panes.attached);
    let config = TriggerConfig::default()
        .with_trigger(TriggerKind::Hover)
        .with_direction(Direction::Top);
    let mut hover = TriggerController::new(HOVER_TRIGGER, panes, config)
        .with_panel(PrintPanel { name: "hover" });
    if let Err(err) = hover.init(&mut scene) {
        error!(%err, "init failed");
        return;
    }

    let script = [
        Input::PointerEnter,
        // Not enough room above: the overlay settles on the first fallback.
        Input::Overlay(OverlayEvent::PositionChanged(FALLBACKS[0])),
        Input::PointerLeave,
        Input::PointerEnter,
    ];
    for input in script {
        info!(?input, "input");
        if let Err(err) = hover.handle(&mut scene, input) {
            error!(%err, "input rejected");
        }
        hover.flush(&mut scene);
    }
    info!("page scrolled, overlay closes itself");
    hover_attached.set(false);
    if let Err(err) = hover.handle(&mut scene, Input::Overlay(OverlayEvent::Detached)) {
        error!(%err, "input rejected");
    }
    info!(changes = ?hover.take_show_changes(), "visibility changes");

    info!("modal click trigger");
    scene.focused = Some(MODAL_TRIGGER);
    let config = TriggerConfig::default().with_modal(true);
    let mut modal = TriggerController::new(MODAL_TRIGGER, Panes::default(), config)
        .with_panel(PrintPanel { name: "modal" });
    if let Err(err) = modal.init(&mut scene) {
        error!(%err, "init failed");
        return;
    }
    let script = [
        Input::KeyDown(Key::Enter),
        Input::PanelKeyDown(Key::Tab { shift: false }),
        Input::PanelKeyDown(Key::Tab { shift: false }),
        Input::DocumentClick { target: PAGE },
        Input::Overlay(OverlayEvent::BackdropClick),
    ];
    for input in script {
        info!(?input, "input");
        if let Err(err) = modal.handle(&mut scene, input) {
            error!(%err, "input rejected");
        }
        modal.flush(&mut scene);
    }
    info!(changes = ?modal.take_show_changes(), "visibility changes");
    info!(focused = ?scene.focused, "focus after close");

    hover.destroy(&mut scene);
    modal.destroy(&mut scene);
}
