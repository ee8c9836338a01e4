// gridveil CLI - inspect and edit which spreadsheet data the AI may see

mod exit_codes;
mod target;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gridveil_config::Settings;
use gridveil_core::{column_index, parse_address, CellClass, Classify, SheetStructure, WorkbookStructure};
use gridveil_selection::{
    dispatch, GridBounds, GridCoord, MenuAction, MenuLayout, Point, PointerButton, PointerTarget,
    SelectionContext, SelectionController, SelectionEvent, Size,
};
use gridveil_visibility::{
    build_ai_context, visibility_summary, ContextLimits, FileStorage, StoreError, ToggleDirection,
    VisibilityStore,
};

use exit_codes::{
    EXIT_CONFIG, EXIT_ERROR, EXIT_REDACTED, EXIT_STORAGE, EXIT_STRUCTURE, EXIT_SUCCESS, EXIT_USAGE,
};
use target::{parse_target, Target};

#[derive(Parser)]
#[command(name = "gridveil")]
#[command(about = "Control which spreadsheet cells are shared with an AI assistant")]
#[command(version)]
struct Cli {
    /// Directory holding the visibility record
    #[arg(long, global = true, env = "GRIDVEIL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Settings file (default: platform config dir)
    #[arg(long, global = true, env = "GRIDVEIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recorded overrides
    #[command(after_help = "\
Examples:
  gridveil status
  gridveil status budget.xlsx --json")]
    Status {
        /// Only this file
        file: Option<String>,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep cells, rows or columns away from the AI
    #[command(after_help = "\
Targets:
  B3        one cell
  A1:C4     a rectangle of cells
  B:D       whole columns
  2:5       whole rows

Examples:
  gridveil hide budget.xlsx --sheet Summary C:C 7:9
  gridveil hide budget.xlsx --sheet Summary B3 --structure budget.json")]
    Hide {
        file: String,

        #[arg(long)]
        sheet: String,

        /// One or more targets
        #[arg(required = true)]
        targets: Vec<String>,

        /// Parsed workbook structure, used to classify cells
        #[arg(long)]
        structure: Option<PathBuf>,
    },

    /// Share cells, rows or columns with the AI
    #[command(after_help = "\
Numeric cells are withheld unless shown explicitly; everything else is
shared unless hidden. See `gridveil hide --help` for target syntax.")]
    Show {
        file: String,

        #[arg(long)]
        sheet: String,

        #[arg(required = true)]
        targets: Vec<String>,

        #[arg(long)]
        structure: Option<PathBuf>,
    },

    /// Report whether cells would be shared or withheld
    Resolve {
        file: String,

        #[arg(long)]
        sheet: String,

        /// Cell addresses or rectangles
        #[arg(required = true)]
        targets: Vec<String>,

        /// Classify cells from a parsed workbook structure
        #[arg(long, conflicts_with = "class")]
        structure: Option<PathBuf>,

        /// Classification to assume when no structure is given
        #[arg(long, value_enum, default_value = "numeric")]
        class: ClassArg,

        #[arg(long)]
        json: bool,

        /// Exit with code 6 if any cell is withheld
        #[arg(long)]
        check: bool,
    },

    /// Forget overrides for one file, or for everything
    Clear {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        file: Option<String>,

        #[arg(long)]
        all: bool,
    },

    /// Replay a drag on the grid and pick a menu action
    #[command(after_help = "\
Endpoints:
  B3        a cell
  row:3     a row header
  col:C     a column header

Examples:
  gridveil select budget.xlsx --sheet Summary --size 40x8 --from row:2 --to row:5 --action hide
  gridveil select budget.xlsx --sheet Summary --structure budget.json --from B2 --to D9 --action ask")]
    Select {
        file: String,

        #[arg(long)]
        sheet: String,

        /// Where the drag starts
        #[arg(long, value_parser = parse_endpoint)]
        from: PointerTarget,

        /// Where the drag is released (default: same as --from)
        #[arg(long, value_parser = parse_endpoint)]
        to: Option<PointerTarget>,

        #[arg(long, value_enum)]
        action: ActionArg,

        /// Grid size as ROWSxCOLS; taken from --structure when omitted
        #[arg(long, value_parser = parse_size, required_unless_present = "structure")]
        size: Option<GridBounds>,

        #[arg(long)]
        structure: Option<PathBuf>,
    },

    /// Print the payload sent alongside chat requests
    Payload,

    /// Print the AI prompt context for parsed workbooks
    Context {
        /// Workbook structure JSON files
        #[arg(required = true)]
        structures: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    Header,
    RowLabel,
    Formula,
    Text,
    Numeric,
    Empty,
}

impl From<ClassArg> for CellClass {
    fn from(c: ClassArg) -> Self {
        match c {
            ClassArg::Header => CellClass::Header,
            ClassArg::RowLabel => CellClass::RowLabel,
            ClassArg::Formula => CellClass::Formula,
            ClassArg::Text => CellClass::Text,
            ClassArg::Numeric => CellClass::Numeric,
            ClassArg::Empty => CellClass::Empty,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Ask,
    Hide,
    Show,
}

impl From<ActionArg> for MenuAction {
    fn from(a: ActionArg) -> Self {
        match a {
            ActionArg::Ask => MenuAction::AskAi,
            ActionArg::Hide => MenuAction::Hide,
            ActionArg::Show => MenuAction::Show,
        }
    }
}

fn parse_endpoint(s: &str) -> Result<PointerTarget, String> {
    let lower = s.trim().to_ascii_lowercase();
    if let Some(row) = lower.strip_prefix("row:") {
        let row: usize = row.parse().map_err(|_| format!("invalid row {row:?}"))?;
        if row == 0 {
            return Err("rows start at 1".to_string());
        }
        return Ok(PointerTarget::RowHeader(row - 1));
    }
    if let Some(col) = lower.strip_prefix("col:") {
        let col = column_index(&col.to_ascii_uppercase()).map_err(|e| e.to_string())?;
        return Ok(PointerTarget::ColumnHeader(col));
    }
    let addr = parse_address(&s.trim().to_ascii_uppercase()).map_err(|e| e.to_string())?;
    Ok(PointerTarget::Cell(GridCoord::new(addr.column_index(), addr.row_index())))
}

fn parse_size(s: &str) -> Result<GridBounds, String> {
    let bad = || format!("invalid size {s:?} (expected ROWSxCOLS, e.g. 40x8)");
    let (rows, cols) = s.split_once(|c: char| c == 'x' || c == 'X').ok_or_else(bad)?;
    Ok(GridBounds::new(
        rows.trim().parse().map_err(|_| bad())?,
        cols.trim().parse().map_err(|_| bad())?,
    ))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = load_settings(cli.config.as_deref()).and_then(|settings| {
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| settings.storage_directory.clone())
            .unwrap_or_else(FileStorage::default_dir);
        log::debug!("Using data directory {}", data_dir.display());
        let mut store =
            VisibilityStore::with_history_limit(FileStorage::new(data_dir), settings.history_max_entries);

        match cli.command {
            Commands::Status { file, json } => cmd_status(&store, file.as_deref(), json),
            Commands::Hide { file, sheet, targets, structure } => {
                cmd_toggle(&mut store, &file, &sheet, &targets, structure.as_deref(), ToggleDirection::Hide)
            }
            Commands::Show { file, sheet, targets, structure } => {
                cmd_toggle(&mut store, &file, &sheet, &targets, structure.as_deref(), ToggleDirection::Show)
            }
            Commands::Resolve { file, sheet, targets, structure, class, json, check } => {
                cmd_resolve(&store, &file, &sheet, &targets, structure.as_deref(), class.into(), json, check)
            }
            Commands::Select { file, sheet, from, to, action, size, structure } => cmd_select(
                &mut store,
                &file,
                &sheet,
                (from, to.unwrap_or(from)),
                action.into(),
                size,
                structure.as_deref(),
                &settings,
            ),
            Commands::Clear { file, all } => cmd_clear(&mut store, file.as_deref(), all),
            Commands::Payload => cmd_payload(&store),
            Commands::Context { structures } => cmd_context(&store, &structures, &settings),
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn structure(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STRUCTURE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self {
            code: EXIT_STORAGE,
            message: e.to_string(),
            hint: Some("check that --data-dir is writable".to_string()),
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path).map_err(|e| CliError {
            code: EXIT_CONFIG,
            message: e.to_string(),
            hint: None,
        }),
        None => Ok(Settings::load()),
    }
}

fn load_workbook(path: &Path) -> Result<WorkbookStructure, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::structure(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| CliError::structure(format!("{}: {e}", path.display())))
}

fn load_sheet(path: &Path, sheet: &str) -> Result<SheetStructure, CliError> {
    let workbook = load_workbook(path)?;
    match workbook.sheet(sheet) {
        Some(s) => Ok(s.clone()),
        None => {
            let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
            Err(CliError::structure(format!("sheet {sheet:?} not found in {}", path.display()))
                .with_hint(format!("available sheets: {}", names.join(", "))))
        }
    }
}

fn write_out(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

// ============================================================================
// status
// ============================================================================

fn cmd_status(store: &VisibilityStore, file: Option<&str>, json: bool) -> Result<(), CliError> {
    let snapshot = store.snapshot();

    if json {
        let value = match file {
            Some(f) => serde_json::to_value(store.file_visibility(f)),
            None => serde_json::to_value(&*snapshot),
        }
        .map_err(|e| CliError::io(e.to_string()))?;
        return write_out(&value.to_string());
    }

    let mut lines = Vec::new();
    for (filename, sheets) in snapshot.iter() {
        if file.is_some_and(|f| f != filename.as_str()) {
            continue;
        }
        lines.push(filename.clone());
        for (sheet, state) in sheets {
            let hidden = visibility_summary(state).unwrap_or_else(|| "[nothing hidden]".to_string());
            let shown = state.visible_columns.len() + state.visible_rows.len() + state.visible_cells.len();
            if shown > 0 {
                lines.push(format!("  {sheet}: {hidden} +{shown} shown"));
            } else {
                lines.push(format!("  {sheet}: {hidden}"));
            }
        }
    }
    if lines.is_empty() {
        lines.push("No overrides recorded.".to_string());
    }
    write_out(&lines.join("\n"))
}

// ============================================================================
// hide / show
// ============================================================================

/// Classification used when no structure is supplied: always record the
/// explicit override, so the requested outcome holds whatever the cell is.
struct ExplicitOverride(ToggleDirection);

impl Classify for ExplicitOverride {
    fn classify(&self, _address: &str) -> CellClass {
        match self.0 {
            ToggleDirection::Hide => CellClass::Text,
            ToggleDirection::Show => CellClass::Numeric,
        }
    }
}

fn cmd_toggle(
    store: &mut VisibilityStore,
    file: &str,
    sheet: &str,
    raw_targets: &[String],
    structure: Option<&Path>,
    direction: ToggleDirection,
) -> Result<(), CliError> {
    let targets = raw_targets
        .iter()
        .map(|t| parse_target(t))
        .collect::<Result<Vec<_>, _>>()
        .map_err(CliError::args)?;

    let sheet_structure = structure.map(|p| load_sheet(p, sheet)).transpose()?;
    let fallback = ExplicitOverride(direction);
    let classifier: &dyn Classify = match &sheet_structure {
        Some(s) => s,
        None => &fallback,
    };

    for target in targets {
        match target {
            Target::Cells(cells) => store.toggle_cells(file, sheet, &cells, direction, classifier)?,
            Target::Columns(cols) => store.toggle_columns(file, sheet, &cols, direction)?,
            Target::Rows(rows) => store.toggle_rows(file, sheet, rows, direction)?,
        }
    }

    let state = store.sheet_visibility(file, sheet);
    let summary = visibility_summary(&state).unwrap_or_else(|| "[nothing hidden]".to_string());
    write_out(&format!("{file} / {sheet}: {summary}"))
}

// ============================================================================
// resolve
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_resolve(
    store: &VisibilityStore,
    file: &str,
    sheet: &str,
    raw_targets: &[String],
    structure: Option<&Path>,
    class: CellClass,
    json: bool,
    check: bool,
) -> Result<(), CliError> {
    let mut cells = Vec::new();
    for raw in raw_targets {
        match parse_target(raw).map_err(CliError::args)? {
            Target::Cells(c) => cells.extend(c),
            _ => {
                return Err(CliError::args(format!("resolve takes cells, not {raw:?}"))
                    .with_hint("use B3 or A1:C4"))
            }
        }
    }

    let sheet_structure = structure.map(|p| load_sheet(p, sheet)).transpose()?;
    let results: Vec<(String, CellClass, bool)> = cells
        .into_iter()
        .map(|addr| {
            let class = sheet_structure.as_ref().map_or(class, |s| s.classification(&addr));
            let redacted = store.resolve(file, sheet, &addr, class).is_redacted();
            (addr, class, redacted)
        })
        .collect();

    if json {
        let map: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(addr, _, redacted)| {
                let r = if *redacted { "redacted" } else { "shown" };
                (addr.clone(), serde_json::Value::from(r))
            })
            .collect();
        write_out(&serde_json::Value::Object(map).to_string())?;
    } else {
        let lines: Vec<String> = results
            .iter()
            .map(|(addr, class, redacted)| {
                let r = if *redacted { "redacted" } else { "shown" };
                format!("{addr}\t{}\t{r}", class.as_str())
            })
            .collect();
        write_out(&lines.join("\n"))?;
    }

    if check && results.iter().any(|(_, _, redacted)| *redacted) {
        return Err(CliError { code: EXIT_REDACTED, message: String::new(), hint: None });
    }
    Ok(())
}

// ============================================================================
// select
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_select(
    store: &mut VisibilityStore,
    file: &str,
    sheet: &str,
    (from, to): (PointerTarget, PointerTarget),
    action: MenuAction,
    size: Option<GridBounds>,
    structure: Option<&Path>,
    settings: &Settings,
) -> Result<(), CliError> {
    let sheet_structure = structure.map(|p| load_sheet(p, sheet)).transpose()?;
    let bounds = match (size, &sheet_structure) {
        (Some(b), _) => b,
        (None, Some(s)) => GridBounds::new(s.rows, s.cols),
        (None, None) => {
            return Err(CliError::args("grid size unknown").with_hint("pass --size or --structure"))
        }
    };
    if bounds.is_empty() {
        return Err(CliError::args(format!("sheet {sheet:?} has no cells")));
    }

    let layout = MenuLayout {
        width: settings.menu_width,
        item_height: settings.menu_item_height,
        ..MenuLayout::default()
    };
    let mut controller = SelectionController::new(SelectionContext::new(sheet, bounds).with_layout(layout));
    controller.handle(SelectionEvent::Press {
        target: from,
        button: PointerButton::Primary,
        position: Point::default(),
    });
    controller.handle(SelectionEvent::Move { target: to });
    controller.handle(SelectionEvent::Release {
        position: Point::default(),
        viewport: Size::new(1280.0, 800.0),
    });

    let menu = controller
        .menu()
        .cloned()
        .ok_or_else(|| CliError::io("drag did not open the action menu"))?;
    let effect = controller
        .handle(SelectionEvent::Choose(action))
        .ok_or_else(|| CliError::io("menu action produced no effect"))?;
    let range = effect.range().clone();

    let fallback = ExplicitOverride(match action {
        MenuAction::Show => ToggleDirection::Show,
        _ => ToggleDirection::Hide,
    });
    let classifier: &dyn Classify = match &sheet_structure {
        Some(s) => s,
        None => &fallback,
    };
    dispatch(effect, store, file, classifier)?;

    let labels: Vec<&str> = menu.items.iter().map(|(_, label)| label.as_str()).collect();
    let out = serde_json::json!({
        "action": action,
        "range": range,
        "menu": {
            "width": menu.size.width,
            "height": menu.size.height,
            "items": labels,
        },
    });
    write_out(&out.to_string())
}

// ============================================================================
// clear / payload / context
// ============================================================================

fn cmd_clear(store: &mut VisibilityStore, file: Option<&str>, all: bool) -> Result<(), CliError> {
    match (file, all) {
        (_, true) => store.clear_all()?,
        (Some(f), false) => store.clear_visibility(f)?,
        (None, false) => return Err(CliError::args("nothing to clear").with_hint("pass a file or --all")),
    }
    Ok(())
}

fn cmd_payload(store: &VisibilityStore) -> Result<(), CliError> {
    let json = store
        .serialize_for_transport()
        .to_json()
        .map_err(|e| CliError::io(e.to_string()))?;
    write_out(&json)
}

fn cmd_context(store: &VisibilityStore, paths: &[PathBuf], settings: &Settings) -> Result<(), CliError> {
    let workbooks = paths
        .iter()
        .map(|p| load_workbook(p))
        .collect::<Result<Vec<_>, _>>()?;
    let limits = ContextLimits {
        max_row_labels: settings.max_row_labels,
        max_formulas: settings.max_formulas,
    };
    write_out(&build_ai_context(&workbooks, store, limits))
}
