//! Idle -> Dragging -> MenuOpen -> Idle.
//!
//! Everything goes through [`transition`]; [`SelectionController`] just
//! owns the current state between events. No rendering types leak in, so
//! the whole gesture protocol is testable without a UI.

use crate::menu::{ActionMenu, MenuAction, MenuLayout, Point, Size};
use crate::range::{GridBounds, GridCoord, Selection, SelectionKind, SelectionRange};

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Cell(GridCoord),
    /// Zero-based row.
    RowHeader(usize),
    /// Zero-based column.
    ColumnHeader(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Press {
        target: PointerTarget,
        button: PointerButton,
        position: Point,
    },
    Move {
        target: PointerTarget,
    },
    Release {
        position: Point,
        viewport: Size,
    },
    Choose(MenuAction),
    /// Click outside the menu.
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging(Selection),
    MenuOpen {
        selection: Selection,
        range: SelectionRange,
        menu: ActionMenu,
    },
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Dragging(sel) => Some(sel),
            SelectionState::MenuOpen { selection, .. } => Some(selection),
        }
    }
}

/// Emitted when the user picks a menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEffect {
    AskAi(SelectionRange),
    Hide(SelectionRange),
    Show(SelectionRange),
}

impl SelectionEffect {
    pub fn range(&self) -> &SelectionRange {
        match self {
            SelectionEffect::AskAi(r) | SelectionEffect::Hide(r) | SelectionEffect::Show(r) => r,
        }
    }
}

/// The sheet a controller is driving.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionContext {
    pub sheet_name: String,
    pub bounds: GridBounds,
    pub layout: MenuLayout,
}

impl SelectionContext {
    pub fn new(sheet_name: impl Into<String>, bounds: GridBounds) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            bounds,
            layout: MenuLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: MenuLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Apply one event. Events that make no sense in the current state leave
/// it unchanged.
pub fn transition(
    state: SelectionState,
    event: SelectionEvent,
    ctx: &SelectionContext,
) -> (SelectionState, Option<SelectionEffect>) {
    match (state, event) {
        // A press always starts over, whatever was open
        (state, SelectionEvent::Press { target, button, .. }) => {
            if button != PointerButton::Primary || ctx.bounds.is_empty() {
                return (state, None);
            }
            let selection = start_drag(target, ctx.bounds);
            log::debug!("Selection drag started: {:?}", selection.kind);
            (SelectionState::Dragging(selection), None)
        }

        (SelectionState::Dragging(mut selection), SelectionEvent::Move { target }) => {
            if let Some(cursor) = drag_cursor(&selection, target, ctx.bounds) {
                selection.cursor = cursor;
            }
            (SelectionState::Dragging(selection), None)
        }

        (SelectionState::Dragging(selection), SelectionEvent::Release { position, viewport }) => {
            let range = SelectionRange::from_selection(&ctx.sheet_name, &selection, ctx.bounds);
            let menu = ActionMenu::open(position, viewport, &ctx.layout, &range.range_string);
            log::debug!("Selection released: {} ({} cells)", range.range_string, range.cells.len());
            (SelectionState::MenuOpen { selection, range, menu }, None)
        }

        (SelectionState::MenuOpen { range, .. }, SelectionEvent::Choose(action)) => {
            let effect = match action {
                MenuAction::AskAi => SelectionEffect::AskAi(range),
                MenuAction::Hide => SelectionEffect::Hide(range),
                MenuAction::Show => SelectionEffect::Show(range),
            };
            (SelectionState::Idle, Some(effect))
        }

        (_, SelectionEvent::Dismiss) => (SelectionState::Idle, None),

        (state, _) => (state, None),
    }
}

fn start_drag(target: PointerTarget, bounds: GridBounds) -> Selection {
    match target {
        PointerTarget::Cell(coord) => Selection::new(SelectionKind::Cells, bounds.clamp(coord)),
        PointerTarget::RowHeader(row) => {
            Selection::new(SelectionKind::Row, bounds.clamp(GridCoord::new(0, row)))
        }
        PointerTarget::ColumnHeader(col) => {
            Selection::new(SelectionKind::Column, bounds.clamp(GridCoord::new(col, 0)))
        }
    }
}

/// New cursor for a move, or `None` when the target is off the drag's axis.
fn drag_cursor(selection: &Selection, target: PointerTarget, bounds: GridBounds) -> Option<GridCoord> {
    let coord = match (selection.kind, target) {
        (SelectionKind::Cells, PointerTarget::Cell(c)) => c,
        (SelectionKind::Cells, PointerTarget::RowHeader(row)) => GridCoord::new(0, row),
        (SelectionKind::Cells, PointerTarget::ColumnHeader(col)) => GridCoord::new(col, 0),

        (SelectionKind::Row, PointerTarget::Cell(c)) => GridCoord::new(selection.cursor.col, c.row),
        (SelectionKind::Row, PointerTarget::RowHeader(row)) => GridCoord::new(selection.cursor.col, row),
        (SelectionKind::Row, PointerTarget::ColumnHeader(_)) => return None,

        (SelectionKind::Column, PointerTarget::Cell(c)) => GridCoord::new(c.col, selection.cursor.row),
        (SelectionKind::Column, PointerTarget::ColumnHeader(col)) => GridCoord::new(col, selection.cursor.row),
        (SelectionKind::Column, PointerTarget::RowHeader(_)) => return None,
    };
    Some(bounds.clamp(coord))
}

/// Owns the selection state for one sheet view.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    ctx: SelectionContext,
}

impl SelectionController {
    pub fn new(ctx: SelectionContext) -> Self {
        Self {
            state: SelectionState::Idle,
            ctx,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn context(&self) -> &SelectionContext {
        &self.ctx
    }

    /// Switch sheets or resize. Any live selection is dropped.
    pub fn set_context(&mut self, ctx: SelectionContext) {
        self.ctx = ctx;
        self.state = SelectionState::Idle;
    }

    pub fn handle(&mut self, event: SelectionEvent) -> Option<SelectionEffect> {
        let state = std::mem::take(&mut self.state);
        let (next, effect) = transition(state, event, &self.ctx);
        self.state = next;
        effect
    }

    /// The open menu, if any.
    pub fn menu(&self) -> Option<&ActionMenu> {
        match &self.state {
            SelectionState::MenuOpen { menu, .. } => Some(menu),
            _ => None,
        }
    }

    /// The range under the open menu, if any.
    pub fn open_range(&self) -> Option<&SelectionRange> {
        match &self.state {
            SelectionState::MenuOpen { range, .. } => Some(range),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SelectionContext {
        SelectionContext::new("Sheet1", GridBounds::new(20, 10))
    }

    fn press(target: PointerTarget) -> SelectionEvent {
        SelectionEvent::Press {
            target,
            button: PointerButton::Primary,
            position: Point::default(),
        }
    }

    fn release() -> SelectionEvent {
        SelectionEvent::Release {
            position: Point::new(100.0, 100.0),
            viewport: Size::new(800.0, 600.0),
        }
    }

    fn cell(col: usize, row: usize) -> PointerTarget {
        PointerTarget::Cell(GridCoord::new(col, row))
    }

    #[test]
    fn cell_drag_to_menu_to_hide() {
        let mut c = SelectionController::new(ctx());
        assert!(c.handle(press(cell(0, 0))).is_none());
        c.handle(SelectionEvent::Move { target: cell(1, 4) });
        c.handle(release());

        assert_eq!(c.open_range().map(|r| r.range_string.as_str()), Some("A1:B5"));
        let effect = c.handle(SelectionEvent::Choose(MenuAction::Hide)).unwrap();
        assert!(matches!(&effect, SelectionEffect::Hide(r) if r.cells.len() == 10));
        assert!(c.state().is_idle());
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut c = SelectionController::new(ctx());
        c.handle(SelectionEvent::Press {
            target: cell(0, 0),
            button: PointerButton::Secondary,
            position: Point::default(),
        });
        assert!(c.state().is_idle());
    }

    #[test]
    fn empty_sheet_ignores_press() {
        let mut c = SelectionController::new(SelectionContext::new("Empty", GridBounds::new(0, 0)));
        c.handle(press(cell(0, 0)));
        assert!(c.state().is_idle());
    }

    #[test]
    fn press_coordinates_are_clamped() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(cell(50, 50)));
        c.handle(SelectionEvent::Move { target: cell(99, 99) });
        c.handle(release());
        assert_eq!(c.open_range().map(|r| r.range_string.as_str()), Some("J20"));
    }

    #[test]
    fn row_drag_ignores_column_headers() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(PointerTarget::RowHeader(1)));
        c.handle(SelectionEvent::Move { target: PointerTarget::ColumnHeader(5) });
        c.handle(SelectionEvent::Move { target: cell(7, 3) });
        c.handle(release());
        let r = c.open_range().unwrap();
        assert_eq!(r.range_string, "Rows 2:4");
        assert_eq!(r.cells.len(), 30);
        assert_eq!(r.kind, SelectionKind::Row);
    }

    #[test]
    fn column_drag_follows_cells_and_headers() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(PointerTarget::ColumnHeader(2)));
        c.handle(SelectionEvent::Move { target: PointerTarget::RowHeader(8) });
        c.handle(SelectionEvent::Move { target: cell(0, 12) });
        c.handle(release());
        let r = c.open_range().unwrap();
        assert_eq!(r.range_string, "Columns A:C");
        assert_eq!(r.cells.len(), 60);
    }

    #[test]
    fn cell_drag_onto_headers() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(cell(3, 3)));
        c.handle(SelectionEvent::Move { target: PointerTarget::RowHeader(5) });
        assert_eq!(c.state().selection().map(|s| s.cursor), Some(GridCoord::new(0, 5)));
        c.handle(SelectionEvent::Move { target: PointerTarget::ColumnHeader(6) });
        assert_eq!(c.state().selection().map(|s| s.cursor), Some(GridCoord::new(6, 0)));
    }

    #[test]
    fn new_press_discards_open_menu() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(cell(0, 0)));
        c.handle(release());
        assert!(c.menu().is_some());

        c.handle(press(PointerTarget::RowHeader(4)));
        assert!(c.menu().is_none());
        assert!(matches!(c.state(), SelectionState::Dragging(s) if s.kind == SelectionKind::Row));
    }

    #[test]
    fn dismiss_clears_without_effect() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(cell(0, 0)));
        c.handle(release());
        assert!(c.handle(SelectionEvent::Dismiss).is_none());
        assert!(c.state().is_idle());
    }

    #[test]
    fn out_of_order_events_are_noops() {
        let mut c = SelectionController::new(ctx());
        assert!(c.handle(SelectionEvent::Choose(MenuAction::Show)).is_none());
        c.handle(SelectionEvent::Move { target: cell(1, 1) });
        c.handle(release());
        assert!(c.state().is_idle());

        c.handle(press(cell(0, 0)));
        assert!(c.handle(SelectionEvent::Choose(MenuAction::Show)).is_none());
        assert!(matches!(c.state(), SelectionState::Dragging(_)));
    }

    #[test]
    fn menu_is_clamped_at_release() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(cell(0, 0)));
        c.handle(SelectionEvent::Release {
            position: Point::new(790.0, 595.0),
            viewport: Size::new(800.0, 600.0),
        });
        let menu = c.menu().unwrap();
        assert_eq!(menu.position, Point::new(600.0, 520.0));
    }

    #[test]
    fn ask_ai_hands_over_range() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(PointerTarget::ColumnHeader(0)));
        c.handle(release());
        let effect = c.handle(SelectionEvent::Choose(MenuAction::AskAi)).unwrap();
        assert_eq!(effect.range().range_string, "Column A");
        assert_eq!(effect.range().sheet_name, "Sheet1");
    }

    #[test]
    fn set_context_drops_selection() {
        let mut c = SelectionController::new(ctx());
        c.handle(press(cell(0, 0)));
        c.set_context(SelectionContext::new("Other", GridBounds::new(3, 3)));
        assert!(c.state().is_idle());
        assert_eq!(c.context().sheet_name, "Other");
    }
}
