// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared vocabulary types.
//!
//! Every configuration enum parses from the lowercase spelling a host would
//! read out of markup or a style sheet (`"click"`, `"top"`, `"rtl"`, ...).

use core::fmt;
use core::str::FromStr;

use crate::error::ParseValueError;

/// Side of the anchor the panel prefers to open on.
///
/// Also used for the resolved side after a fallback placement was chosen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left of the anchor.
    Left,
    /// Above the anchor.
    Top,
    /// Right of the anchor.
    #[default]
    Right,
    /// Below the anchor.
    Bottom,
}

impl Direction {
    /// Lowercase attribute spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for Direction {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ParseValueError::new("direction", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How user interaction with the trigger element opens the panel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// A click (or Space/Enter) toggles the panel.
    #[default]
    Click,
    /// Pointer enter opens, pointer leave closes.
    Hover,
    /// Only the public API opens or closes the panel.
    Manual,
}

impl TriggerKind {
    /// Lowercase attribute spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for TriggerKind {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "hover" => Ok(Self::Hover),
            "manual" => Ok(Self::Manual),
            _ => Err(ParseValueError::new("trigger", s)),
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the overlay does when an ancestor of the anchor scrolls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollStrategy {
    /// Detach the overlay; the trigger reconciles its state afterwards.
    #[default]
    Close,
    /// Recompute the position so the panel follows the anchor.
    Reposition,
}

impl FromStr for ScrollStrategy {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "close" => Ok(Self::Close),
            "reposition" => Ok(Self::Reposition),
            _ => Err(ParseValueError::new("scroll strategy", s)),
        }
    }
}

/// Text directionality of the surrounding document.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left; `start`/`end` swap sides.
    Rtl,
}

impl TextDirection {
    /// Whether this is [`TextDirection::Rtl`].
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

impl FromStr for TextDirection {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(ParseValueError::new("text direction", s)),
        }
    }
}

/// Horizontal anchor point on a box, in logical (bidi-aware) terms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalPos {
    /// Leading edge (left in LTR, right in RTL).
    Start,
    /// Horizontal center.
    Center,
    /// Trailing edge.
    End,
}

/// Vertical anchor point on a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VerticalPos {
    /// Top edge.
    Top,
    /// Vertical center.
    Center,
    /// Bottom edge.
    Bottom,
}

/// How a focus change reached the trigger element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusOrigin {
    /// Tab navigation or another keyboard gesture.
    Keyboard,
    /// Pointer press.
    Mouse,
    /// Touch press.
    Touch,
    /// Script called `focus()`.
    Program,
}

/// Keys the controller reacts to. Everything else is [`Key::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Space bar.
    Space,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab; `shift` is set for backwards navigation.
    Tab {
        /// Whether Shift was held.
        shift: bool,
    },
    /// Any other key.
    Other,
}

impl Key {
    /// Whether this key activates a focused trigger like a click does.
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Space | Self::Enter)
    }
}

/// Arrow placement pushed to the panel so the arrow keeps pointing at the anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrowStyle {
    /// Horizontal offset of the arrow from the panel's left edge, in pixels.
    Left(f64),
    /// Arrow vertically centered on the panel's side (`top: 50%`).
    CenteredVertically,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_spellings() {
        assert_eq!("top".parse::<Direction>(), Ok(Direction::Top));
        assert_eq!("hover".parse::<TriggerKind>(), Ok(TriggerKind::Hover));
        assert_eq!(
            "reposition".parse::<ScrollStrategy>(),
            Ok(ScrollStrategy::Reposition)
        );
        assert_eq!("rtl".parse::<TextDirection>(), Ok(TextDirection::Rtl));
    }

    #[test]
    fn rejects_unknown_spelling() {
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert_eq!(err.kind, "direction");
        assert_eq!(err.value, "sideways");
        assert!("Click".parse::<TriggerKind>().is_err());
    }

    #[test]
    fn defaults_match_trigger_defaults() {
        assert_eq!(Direction::default(), Direction::Right);
        assert_eq!(TriggerKind::default(), TriggerKind::Click);
        assert_eq!(ScrollStrategy::default(), ScrollStrategy::Close);
        assert_eq!(TextDirection::default(), TextDirection::Ltr);
    }
}
