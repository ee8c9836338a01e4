//! The floating action menu shown after a drag.

use serde::{Deserialize, Serialize};

/// Screen-space point, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    AskAi,
    Hide,
    Show,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::AskAi, MenuAction::Hide, MenuAction::Show];

    pub fn label(&self, range_string: &str) -> String {
        match self {
            MenuAction::AskAi => format!("Ask AI about {range_string}"),
            MenuAction::Hide => "Hide from AI".to_string(),
            MenuAction::Show => "Show to AI".to_string(),
        }
    }
}

/// Menu metrics used for placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    pub width: f32,
    pub item_height: f32,
    /// Vertical padding around the item list.
    pub padding: f32,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            width: 200.0,
            item_height: 24.0,
            padding: 8.0,
        }
    }
}

impl MenuLayout {
    pub fn size(&self) -> Size {
        let items = MenuAction::ALL.len() as f32;
        Size::new(self.width, items * self.item_height + self.padding)
    }
}

/// An open menu: where it sits and what it offers.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMenu {
    pub position: Point,
    pub size: Size,
    pub items: Vec<(MenuAction, String)>,
}

impl ActionMenu {
    /// Place the menu at `anchor`, pushed back inside `viewport`.
    pub fn open(anchor: Point, viewport: Size, layout: &MenuLayout, range_string: &str) -> Self {
        let size = layout.size();
        Self {
            position: clamp_to_viewport(anchor, size, viewport),
            size,
            items: MenuAction::ALL
                .iter()
                .map(|a| (*a, a.label(range_string)))
                .collect(),
        }
    }

    pub fn label(&self, action: MenuAction) -> Option<&str> {
        self.items
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, label)| label.as_str())
    }
}

/// Keep a `menu`-sized box at `at` inside `viewport`. A viewport smaller
/// than the menu pins it to the top-left corner.
pub fn clamp_to_viewport(at: Point, menu: Size, viewport: Size) -> Point {
    Point {
        x: at.x.min(viewport.width - menu.width).max(0.0),
        y: at.y.min(viewport.height - menu.height).max(0.0),
    }
}
