//! Form state as an immutable value plus a pure reducer.
//!
//! Every user interaction is an [`Action`]; [`reduce`] maps the current
//! [`FormState`] and an action to the next state without side effects.

use crate::core::error::{Field, FieldErrors};
use crate::core::models::QrPayload;
use crate::payload::{submit_url, submit_wifi, Security};

pub const DEFAULT_FOREGROUND: &str = "#000000";
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Url,
    Wifi,
}

/// Field values for the form on the active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub url: String,
    pub ssid: String,
    pub password: String,
    pub security: Security,
    pub foreground: String,
    pub background: String,
}

impl Fields {
    fn with_colors(foreground: &str, background: &str) -> Self {
        Self {
            url: String::new(),
            ssid: String::new(),
            password: String::new(),
            security: Security::default(),
            foreground: foreground.to_string(),
            background: background.to_string(),
        }
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self::with_colors(DEFAULT_FOREGROUND, DEFAULT_BACKGROUND)
    }
}

/// Which screen is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Editing,
    Display(QrPayload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    tab: Tab,
    fields: Fields,
    errors: FieldErrors,
    view: View,
    default_colors: (String, String),
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_default_colors(DEFAULT_FOREGROUND, DEFAULT_BACKGROUND)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTab(Tab),
    EditUrl(String),
    EditSsid(String),
    EditPassword(String),
    SelectSecurity(Security),
    EditForeground(String),
    EditBackground(String),
    Submit,
    GoBack,
}

impl FormState {
    /// Start with the given colors prefilled, and use them again whenever a
    /// form is reset.
    pub fn with_default_colors(foreground: &str, background: &str) -> Self {
        Self {
            tab: Tab::default(),
            fields: Fields::with_colors(foreground, background),
            errors: FieldErrors::default(),
            view: View::Editing,
            default_colors: (foreground.to_string(), background.to_string()),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The payload on display, if a submission succeeded.
    pub fn payload(&self) -> Option<&QrPayload> {
        match &self.view {
            View::Display(payload) => Some(payload),
            View::Editing => None,
        }
    }

    fn fresh_fields(&self) -> Fields {
        Fields::with_colors(&self.default_colors.0, &self.default_colors.1)
    }

    fn edit(mut self, field: Field, apply: impl FnOnce(&mut Fields)) -> Self {
        apply(&mut self.fields);
        self.errors.clear(field);
        self
    }

    fn submit(mut self) -> Self {
        let f = &self.fields;
        let result = match self.tab {
            Tab::Url => submit_url(&f.url, &f.foreground, &f.background),
            Tab::Wifi => submit_wifi(&f.ssid, &f.password, f.security, &f.foreground, &f.background),
        };

        match result {
            Ok(payload) => {
                self.errors = FieldErrors::default();
                self.view = View::Display(payload);
            }
            Err(errors) => self.errors = errors,
        }
        self
    }
}

/// Compute the next state.
///
/// While a payload is on display only [`Action::GoBack`] has an effect, so a
/// second submission cannot happen until the view changes back.
pub fn reduce(state: FormState, action: Action) -> FormState {
    if let View::Display(_) = state.view {
        return match action {
            Action::GoBack => FormState {
                fields: state.fresh_fields(),
                errors: FieldErrors::default(),
                view: View::Editing,
                ..state
            },
            _ => state,
        };
    }

    match action {
        Action::SelectTab(tab) if tab == state.tab => state,
        Action::SelectTab(tab) => FormState {
            tab,
            fields: state.fresh_fields(),
            errors: FieldErrors::default(),
            ..state
        },
        Action::EditUrl(url) => state.edit(Field::Url, |f| f.url = url),
        Action::EditSsid(ssid) => state.edit(Field::Ssid, |f| f.ssid = ssid),
        Action::EditPassword(password) => state.edit(Field::Password, |f| f.password = password),
        Action::SelectSecurity(security) => {
            let mut next = state;
            next.fields.security = security;
            if !security.requires_password() {
                next.errors.clear(Field::Password);
            }
            next
        }
        Action::EditForeground(color) => state.edit(Field::Foreground, |f| f.foreground = color),
        Action::EditBackground(color) => state.edit(Field::Background, |f| f.background = color),
        Action::Submit => state.submit(),
        Action::GoBack => state,
    }
}
