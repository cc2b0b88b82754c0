// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording collaborators for unit tests.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Rect};

use crate::focus::Tabbable;
use crate::host::{Document, OverlayConfig, OverlayFactory, OverlayHandle, Panel};
use crate::types::{ArrowStyle, Direction};

#[derive(Clone, Debug)]
struct Node {
    parent: Option<u32>,
    rect: Rect,
    tabbable: Option<Tabbable<u32>>,
}

/// A flat node table with parent links and a single focused node.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockDocument {
    nodes: BTreeMap<u32, Node>,
    focused: Option<u32>,
    pub(crate) focus_calls: usize,
}

impl MockDocument {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, id: u32, parent: Option<u32>, rect: Rect) {
        self.nodes.insert(
            id,
            Node {
                parent,
                rect,
                tabbable: None,
            },
        );
    }

    pub(crate) fn add_tabbable(&mut self, id: u32, parent: u32, rect: Rect) {
        self.nodes.insert(
            id,
            Node {
                parent: Some(parent),
                rect,
                tabbable: Some(Tabbable::new(id, rect)),
            },
        );
    }

    pub(crate) fn tabbable_mut(&mut self, id: u32) -> &mut Tabbable<u32> {
        self.nodes
            .get_mut(&id)
            .and_then(|n| n.tabbable.as_mut())
            .expect("node is tabbable")
    }

    pub(crate) fn remove(&mut self, id: u32) {
        self.nodes.remove(&id);
    }
}

impl Document<u32> for MockDocument {
    fn active_element(&self) -> Option<u32> {
        self.focused
    }

    fn is_focusable(&self, node: u32) -> bool {
        self.nodes.contains_key(&node)
    }

    fn focus(&mut self, node: u32) {
        self.focus_calls += 1;
        self.focused = Some(node);
    }

    fn contains(&self, ancestor: u32, node: u32) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn tabbables(&self, root: u32) -> Vec<Tabbable<u32>> {
        self.nodes
            .iter()
            .filter(|(id, _)| **id != root && self.contains(root, **id))
            .filter_map(|(_, n)| n.tabbable.clone())
            .collect()
    }

    fn bounding_rect(&self, node: u32) -> Rect {
        self.nodes.get(&node).map_or(Rect::ZERO, |n| n.rect)
    }
}

/// Panel whose content is the key of a pre-built root node.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockPanel {
    pub(crate) root: u32,
    pub(crate) id: String,
    pub(crate) show_close_button: Option<bool>,
    pub(crate) direction: Option<Direction>,
    pub(crate) arrow: Option<ArrowStyle>,
    pub(crate) detect_changes: usize,
    pub(crate) closed: usize,
}

impl MockPanel {
    pub(crate) fn new(root: u32) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }
}

impl Panel for MockPanel {
    type Content = u32;

    fn content(&self) -> u32 {
        self.root
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.into();
    }

    fn set_show_close_button(&mut self, show: bool) {
        self.show_close_button = Some(show);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    fn set_arrow_style(&mut self, style: ArrowStyle) {
        self.arrow = Some(style);
    }

    fn detect_changes(&mut self) {
        self.detect_changes += 1;
    }

    fn emit_closed(&mut self) {
        self.closed += 1;
    }
}

/// Everything the mock overlay saw, shared with the test body.
#[derive(Debug, Default)]
pub(crate) struct OverlayLog {
    pub(crate) created: usize,
    pub(crate) config: Option<OverlayConfig<u32>>,
    pub(crate) attached: bool,
    pub(crate) attaches: usize,
    pub(crate) detaches: usize,
    pub(crate) position_updates: usize,
    pub(crate) pane_origin: Point,
}

#[derive(Debug)]
pub(crate) struct MockOverlay {
    log: Rc<RefCell<OverlayLog>>,
}

impl OverlayHandle<u32, u32> for MockOverlay {
    fn attach(&mut self, content: u32) -> u32 {
        let mut log = self.log.borrow_mut();
        log.attached = true;
        log.attaches += 1;
        content
    }

    fn detach(&mut self) -> bool {
        let mut log = self.log.borrow_mut();
        if !log.attached {
            return false;
        }
        log.attached = false;
        log.detaches += 1;
        true
    }

    fn has_attached(&self) -> bool {
        self.log.borrow().attached
    }

    fn update_position(&mut self) {
        self.log.borrow_mut().position_updates += 1;
    }

    fn pane_origin(&self) -> Point {
        self.log.borrow().pane_origin
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockFactory {
    pub(crate) log: Rc<RefCell<OverlayLog>>,
}

impl OverlayFactory<u32, u32> for MockFactory {
    type Handle = MockOverlay;

    fn create(&mut self, config: OverlayConfig<u32>) -> MockOverlay {
        let mut log = self.log.borrow_mut();
        log.created += 1;
        log.config = Some(config);
        MockOverlay {
            log: Rc::clone(&self.log),
        }
    }
}
