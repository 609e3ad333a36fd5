//! Application state types and the operations driving them.
//!
//! Defines the view-state structs and enums for the single management screen
//! (form + table), the theme configuration, and the controller methods that
//! turn user intent into requests to the API worker and worker events back
//! into state changes. The event loop itself lives in `update` (re-exported
//! as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::Sender;

use crate::api::worker::{ApiEvent, ApiRequest};
use crate::api::{UserDraft, UserId, UserRecord};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    Modal,
}

/// The form field currently receiving keystrokes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Age,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Age,
            Self::Age => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Age,
            Self::Email => Self::Name,
            Self::Age => Self::Email,
        }
    }
}

/// What a submitted form means: create a new record, or overwrite the one
/// being edited. Explicit variant instead of an optional id so the dispatch
/// in `submit_form` is exhaustive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(UserId),
}

/// Transient input buffer for the create/edit form. Values stay raw strings
/// until the server sees them; only presence is checked client-side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl FormState {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.age.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.age.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age.clone(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Age => &self.age,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Age => &mut self.age,
        }
    }
}

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// Deletion must be confirmed first; `selected` 0 = Yes, 1 = No.
    ConfirmDelete {
        id: UserId,
        name: String,
        selected: usize,
    },
    Info {
        message: String,
    },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Plain dark theme built from named terminal colors.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
        }
    }

    /// Nord theme defaults.
    pub fn nord() -> Self {
        // Palette reference: https://www.nordtheme.com
        Self {
            text: Color::Rgb(0xd8, 0xde, 0xe9),         // snow storm
            title: Color::Rgb(0x88, 0xc0, 0xd0),        // frost
            border: Color::Rgb(0x4c, 0x56, 0x6a),       // polar night 3
            header_bg: Color::Rgb(0x3b, 0x42, 0x52),    // polar night 1
            header_fg: Color::Rgb(0x81, 0xa1, 0xc1),    // frost blue
            status_bg: Color::Rgb(0x43, 0x4c, 0x5e),    // polar night 2
            status_fg: Color::Rgb(0xd8, 0xde, 0xe9),    // snow storm
            highlight_fg: Color::Rgb(0xeb, 0xcb, 0x8b), // aurora yellow
            highlight_bg: Color::Rgb(0x43, 0x4c, 0x5e), // polar night 2
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `nord`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::nord();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                Color::Black => "#000000".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                other => format!("{:?}", other).to_ascii_lowercase(),
            }
        }

        let mut buf = String::new();
        buf.push_str("# user-roster theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default theme and return it.
    /// If present, load from it; on parse errors, return `nord`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::nord);
        }
        let t = Self::nord();
        let _ = t.write_file(path);
        t
    }
}

pub struct AppState {
    /// Snapshot of all records as last fetched, in server order.
    pub records: Vec<UserRecord>,
    pub form: FormState,
    pub mode: FormMode,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub form_focus: FormField,
    pub modal: Option<ModalState>,
    /// Outcome of the most recent remote operation, shown in the status bar.
    pub status: Option<String>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub requests: Sender<ApiRequest>,
    /// Sequence number stamped on the most recently issued list request.
    pub issued_seq: u64,
    /// Sequence number of the list response currently on screen.
    pub applied_seq: u64,
}

impl AppState {
    /// Create the initial state and issue the startup list fetch.
    pub fn new(requests: Sender<ApiRequest>) -> Self {
        let mut state = Self {
            records: Vec::new(),
            form: FormState::default(),
            mode: FormMode::Creating,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            form_focus: FormField::Name,
            modal: None,
            status: None,
            theme: Theme::load_or_init("theme.conf"),
            keymap: keymap::Keymap::load_or_init("keybinds.conf"),
            requests,
            issued_seq: 0,
            applied_seq: 0,
        };
        state.request_refresh();
        state
    }

    /// Ask the worker for a fresh list. Each request gets the next sequence
    /// number; responses that come back out of order are dropped on arrival.
    pub fn request_refresh(&mut self) {
        self.issued_seq += 1;
        tracing::debug!(seq = self.issued_seq, "requesting user list");
        let _ = self.requests.send(ApiRequest::List {
            seq: self.issued_seq,
        });
    }

    /// Clear the form and put it into create mode with the name field focused.
    pub fn open_create_form(&mut self) {
        self.form.clear();
        self.mode = FormMode::Creating;
        self.form_focus = FormField::Name;
        self.input_mode = InputMode::Form;
    }

    /// Fetch the selected record; the form switches to edit mode only once
    /// the record actually arrives.
    pub fn begin_edit(&mut self) {
        if let Some(record) = self.records.get(self.selected_index) {
            tracing::debug!(id = %record.id, "fetching record for edit");
            let _ = self.requests.send(ApiRequest::Fetch {
                id: record.id.clone(),
            });
        }
    }

    /// Open the delete confirmation for the selected record, defaulting to "No".
    pub fn confirm_delete(&mut self) {
        if let Some(record) = self.records.get(self.selected_index) {
            self.modal = Some(ModalState::ConfirmDelete {
                id: record.id.clone(),
                name: record.name.clone(),
                selected: 1,
            });
            self.input_mode = InputMode::Modal;
        }
    }

    /// Validate and dispatch the form: create when no record is being edited,
    /// update otherwise. Only presence is checked; an incomplete form blocks
    /// with a notice and changes nothing.
    pub fn submit_form(&mut self) {
        if !self.form.is_complete() {
            self.show_info("Please fill in all fields.");
            return;
        }
        let draft = self.form.draft();
        match self.mode.clone() {
            FormMode::Creating => {
                tracing::debug!("submitting new user record");
                let _ = self.requests.send(ApiRequest::Create { draft });
            }
            FormMode::Editing(id) => {
                tracing::debug!(%id, "submitting user record update");
                let _ = self.requests.send(ApiRequest::Update { id, draft });
            }
        }
    }

    pub fn request_delete(&mut self, id: UserId) {
        tracing::debug!(%id, "requesting user record deletion");
        let _ = self.requests.send(ApiRequest::Delete { id });
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.modal = Some(ModalState::Info {
            message: message.into(),
        });
        self.input_mode = InputMode::Modal;
    }

    /// Build the help modal from the live keymap so custom bindings show up.
    pub fn show_help(&mut self) {
        let mut by_action: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
        for ((mods, code), action) in self.keymap.all_bindings() {
            if matches!(action, keymap::KeyAction::Ignore) {
                continue;
            }
            by_action
                .entry(keymap::describe_action(action))
                .or_default()
                .insert(keymap::Keymap::format_key(mods, code));
        }
        let mut lines: Vec<String> = by_action
            .into_iter()
            .map(|(label, keys)| {
                format!(
                    "{}: {}",
                    label,
                    keys.into_iter().collect::<Vec<_>>().join(", ")
                )
            })
            .collect();
        lines.push(String::new());
        lines.push("Form: Tab/Shift-Tab switch field, Enter saves, Esc leaves".to_string());
        lines.push("Modals: Enter confirms, Esc cancels".to_string());
        self.show_info(lines.join("\n"));
    }

    /// Fold a worker event into the state. Every failure branch is handled:
    /// logged, surfaced, and the rest of the state left exactly as it was.
    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Listed { seq, outcome } => match outcome {
                Ok(records) => {
                    if seq <= self.applied_seq {
                        tracing::debug!(seq, applied = self.applied_seq, "dropping stale list");
                        return;
                    }
                    self.applied_seq = seq;
                    self.records = records;
                    if self.selected_index >= self.records.len() {
                        self.selected_index = self.records.len().saturating_sub(1);
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "list request failed");
                    self.status = Some(format!("refresh failed: {err}"));
                }
            },
            ApiEvent::Created { outcome } => match outcome {
                Ok(()) => {
                    self.form.clear();
                    self.input_mode = InputMode::Normal;
                    self.status = Some("user created".to_string());
                    self.request_refresh();
                }
                Err(err) => {
                    tracing::warn!(%err, "create request failed");
                    self.show_info(format!("Create failed: {err}"));
                }
            },
            ApiEvent::Fetched { id, outcome } => match outcome {
                Ok(record) => {
                    self.form.name = record.name;
                    self.form.email = record.email;
                    self.form.age = record.age.to_string();
                    self.mode = FormMode::Editing(id);
                    self.form_focus = FormField::Name;
                    self.input_mode = InputMode::Form;
                }
                Err(err) => {
                    tracing::warn!(%err, %id, "fetch request failed");
                    self.show_info(format!("Load failed: {err}"));
                }
            },
            ApiEvent::Updated { id, outcome } => match outcome {
                Ok(()) => {
                    self.form.clear();
                    self.mode = FormMode::Creating;
                    self.input_mode = InputMode::Normal;
                    self.status = Some("user updated".to_string());
                    self.request_refresh();
                }
                // Form and mode stay untouched so the edit can be retried.
                Err(err) => {
                    tracing::warn!(%err, %id, "update request failed");
                    self.show_info(format!("Update failed: {err}"));
                }
            },
            ApiEvent::Deleted { id, outcome } => match outcome {
                Ok(()) => {
                    self.status = Some("user deleted".to_string());
                    self.request_refresh();
                }
                Err(err) => {
                    tracing::warn!(%err, %id, "delete request failed");
                    self.show_info(format!("Delete failed: {err}"));
                }
            },
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
