//! Application state types and entry glue.
//!
//! Defines the screens, input modes and modal dialogs of the console, the
//! color theme, and re-exports the event loop as `run`.
//!
pub mod form;
pub mod keymap;
pub mod tasks;
pub mod update;

use std::path::Path;

use ratatui::style::Color;

use crate::config::Settings;
use crate::model::UserId;
use crate::store::CollectionStore;
use form::FormState;
use keymap::Keymap;

/// Which screen is shown.
#[derive(Clone, Debug)]
pub enum View {
    List,
    Form(Box<FormState>),
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
            success: Color::Green,
        }
    }

    /// Catppuccin Mocha, the default.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
        }
    }

    /// Load theme from a key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = Self::parse_color(val.trim()) else {
                tracing::warn!(key = key.trim(), value = val.trim(), "ignoring bad theme color");
                continue;
            };
            match key.trim() {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "error" => theme.error = color,
                "success" => theme.success = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse "#RRGGBB", "RRGGBB" or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            Color::Reset => "reset".to_string(),
            // Named colors: best-effort hex approximation
            Color::Black => "#000000".to_string(),
            Color::Red => "#FF0000".to_string(),
            Color::Green => "#00FF00".to_string(),
            Color::Yellow => "#FFFF00".to_string(),
            Color::Blue => "#0000FF".to_string(),
            Color::Magenta => "#FF00FF".to_string(),
            Color::Cyan => "#00FFFF".to_string(),
            Color::Gray => "#B3B3B3".to_string(),
            Color::DarkGray => "#4D4D4D".to_string(),
            Color::LightRed => "#FF6666".to_string(),
            Color::LightGreen => "#66FF66".to_string(),
            Color::LightYellow => "#FFFF66".to_string(),
            Color::LightBlue => "#6666FF".to_string(),
            Color::LightMagenta => "#FF66FF".to_string(),
            Color::LightCyan => "#66FFFF".to_string(),
            Color::White => "#FFFFFF".to_string(),
            Color::Indexed(_) => "reset".to_string(),
        }
    }

    /// Persist the theme in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-console theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        for (k, v) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("error", self.error),
            ("success", self.success),
        ] {
            let _ = writeln!(&mut buf, "{} = {}", k, Self::color_to_str(v));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the default there first if it is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

/// Modal dialogs layered over the current screen.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// Notification that must be dismissed.
    Info {
        title: String,
        message: String,
        is_error: bool,
    },
    /// Confirm deletion of the record captured when the dialog opened.
    DeleteConfirm {
        id: UserId,
        name: String,
        selected: usize,
    },
    Help {
        scroll: u16,
    },
}

pub struct AppState {
    pub store: CollectionStore,
    pub view: View,
    /// Row highlighted within the visible page.
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    /// List fetches in flight.
    pub pending_fetches: usize,
    pub api_url: String,
    pub should_quit: bool,
}

impl AppState {
    /// Build the initial state, loading theme and keybindings from the config directory.
    pub fn new(settings: &Settings) -> Self {
        Self {
            theme: Theme::load_or_init(&settings.config_file("theme.conf")),
            keymap: Keymap::load_or_init(&settings.config_file("keybinds.conf")),
            ..Self::with_defaults(settings.page_size, &settings.api_url)
        }
    }

    /// State with built-in theme and keymap, touching no files.
    pub fn with_defaults(page_size: usize, api_url: &str) -> Self {
        Self {
            store: CollectionStore::new(page_size),
            view: View::List,
            selected_row: 0,
            input_mode: InputMode::Normal,
            theme: Theme::mocha(),
            keymap: Keymap::default(),
            modal: None,
            pending_fetches: 0,
            api_url: api_url.to_string(),
            should_quit: false,
        }
    }

    pub fn form(&self) -> Option<&FormState> {
        match &self.view {
            View::Form(form) => Some(form.as_ref()),
            View::List => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match &mut self.view {
            View::Form(form) => Some(form.as_mut()),
            View::List => None,
        }
    }

    /// Show a dismissable notification.
    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>, is_error: bool) {
        self.modal = Some(ModalState::Info {
            title: title.into(),
            message: message.into(),
            is_error,
        });
        self.input_mode = InputMode::Modal;
    }

    /// Close the modal and return to the input mode of the current screen.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = self.screen_mode();
    }

    pub fn screen_mode(&self) -> InputMode {
        match self.view {
            View::List => InputMode::Normal,
            View::Form(_) => InputMode::Form,
        }
    }

    /// Keep the highlighted row inside the visible page.
    pub fn clamp_selection(&mut self) {
        let len = self.store.visible().len();
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
