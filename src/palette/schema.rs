use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Every color a palette must define, in the order the theme variation
/// object lists them.
pub const COLOR_NAMES: [&str; 24] = [
    "focus",
    "clientBG",
    "header_dark",
    "bgGameList",
    GAMELIST_OVERLAY,
    "frameBorder",
    "textentry",
    "online",
    "ingame",
    "offline",
    "golden",
    "white03",
    "white05",
    "white08",
    "white10",
    "white12",
    "white20",
    "white24",
    "white25",
    "white35",
    "white45",
    "white50",
    "white75",
    "white",
];

/// Library-only variable: the `white05` tint pre-blended onto the game list
/// background. Other stylesheets never define it.
pub const GAMELIST_OVERLAY: &str = "white05onbgGameList";

/// Variables listed in the `custom.css` reference snippet.
pub const SNIPPET_COLOR_NAMES: [&str; 9] = [
    "focus",
    "clientBG",
    "header_dark",
    "bgGameList",
    "frameBorder",
    "textentry",
    GAMELIST_OVERLAY,
    "white",
    "white45",
];

/// How a stylesheet writes comma lists: `"13,14,18"` or `"13, 14, 18"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommaStyle {
    Compact,
    Spaced,
}

impl CommaStyle {
    pub fn apply(self, value: &str) -> String {
        let parts = value.split(',').map(str::trim);
        match self {
            CommaStyle::Compact => parts.collect::<Vec<_>>().join(","),
            CommaStyle::Spaced => parts.collect::<Vec<_>>().join(", "),
        }
    }
}

/// Immutable color table for one named theme variation.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    /// Variation key in `theme.json` and title of the CSS snippet.
    pub name: String,
    /// Existing variation the new one is inserted after.
    #[serde(default = "default_anchor")]
    pub anchor: String,
    /// Text of the comment placed above `--focus`.
    #[serde(default)]
    pub comment: String,
    /// Scope string paired with every value in `theme.json`.
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Color name (without `--`) to compact comma list.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

fn default_anchor() -> String {
    "Midnight".to_string()
}

fn default_scope() -> String {
    "all".to_string()
}

impl Palette {
    /// The built-in Tsukimi palette.
    pub fn tsukimi() -> Self {
        let colors = [
            ("focus", "205,177,149"),
            ("clientBG", "13,14,18"),
            ("header_dark", "13,14,18"),
            ("bgGameList", "10,11,15"),
            (GAMELIST_OVERLAY, "15,16,21"),
            ("frameBorder", "37,42,54"),
            ("textentry", "13,14,18"),
            ("online", "138,159,186"),
            ("ingame", "138,154,128"),
            ("offline", "184,179,170"),
            ("golden", "229,213,184"),
            ("white03", "240,235,229,0.03"),
            ("white05", "240,235,229,0.05"),
            ("white08", "240,235,229,0.08"),
            ("white10", "240,235,229,0.10"),
            ("white12", "240,235,229,0.12"),
            ("white20", "240,235,229,0.20"),
            ("white24", "240,235,229,0.24"),
            ("white25", "240,235,229,0.25"),
            ("white35", "240,235,229,0.35"),
            ("white45", "240,235,229,0.45"),
            ("white50", "240,235,229,0.50"),
            ("white75", "240,235,229,0.75"),
            ("white", "240,235,229"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        Self {
            name: "Tsukimi".to_string(),
            anchor: default_anchor(),
            comment: "Tsukimi-inspired palette".to_string(),
            scope: default_scope(),
            colors,
        }
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    /// Root-block variable values for one stylesheet, in canonical order.
    ///
    /// [`GAMELIST_OVERLAY`] is included only when `with_overlay` is set.
    pub fn root_values(&self, style: CommaStyle, with_overlay: bool) -> Vec<(&'static str, String)> {
        COLOR_NAMES
            .iter()
            .filter(|name| with_overlay || **name != GAMELIST_OVERLAY)
            .filter_map(|name| self.color(name).map(|value| (*name, style.apply(value))))
            .collect()
    }

    /// Substring marking the snippet as already present in `custom.css`.
    pub fn sentinel(&self) -> String {
        format!("{} (dark)", self.name)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("name", &self.name),
            ("anchor", &self.anchor),
            ("comment", &self.comment),
            ("scope", &self.scope),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationIssue::MissingField { field });
            }
        }

        if !self.name.is_empty() && self.name == self.anchor {
            issues.push(ValidationIssue::InvalidField {
                field: "anchor",
                message: "must differ from the variation name".to_string(),
            });
        }

        for name in COLOR_NAMES {
            match self.color(name) {
                None => issues.push(ValidationIssue::MissingColor { name }),
                Some(value) if !is_color_list(value) => {
                    issues.push(ValidationIssue::InvalidColor {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        for name in self.colors.keys() {
            if !COLOR_NAMES.contains(&name.as_str()) {
                issues.push(ValidationIssue::UnknownColor { name: name.clone() });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::tsukimi()
    }
}

/// `r,g,b` or `r,g,b,a` with numeric components.
fn is_color_list(value: &str) -> bool {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    (3..=4).contains(&parts.len())
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.parse::<f64>().is_ok())
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    MissingField { field: &'static str },
    InvalidField { field: &'static str, message: String },
    MissingColor { name: &'static str },
    InvalidColor { name: String, value: String },
    UnknownColor { name: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "palette missing required field '{field}'")
            }
            ValidationIssue::InvalidField { field, message } => {
                write!(f, "palette field '{field}' is invalid: {message}")
            }
            ValidationIssue::MissingColor { name } => {
                write!(f, "palette missing color '{name}'")
            }
            ValidationIssue::InvalidColor { name, value } => write!(
                f,
                "palette color '{name}' = \"{value}\" is not an r,g,b or r,g,b,a list"
            ),
            ValidationIssue::UnknownColor { name } => {
                write!(f, "palette defines unknown color '{name}'")
            }
        }
    }
}
