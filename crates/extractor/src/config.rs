use crate::error::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Call shape recognised as an environment variable read.
///
/// `callee` is the dotted path of the called expression exactly as written
/// in source (`os.environ.get`, `os.getenv`, `env.str`). The variable name
/// must sit at `name_position` (or be passed as `name_keyword`); the default,
/// if the accessor takes one, at `default_position` or `default_keyword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorPattern {
    /// Dotted path of the called function
    pub callee: String,

    /// Positional index of the variable name argument
    pub name_position: usize,

    /// Keyword accepted instead of the positional name
    pub name_keyword: Option<String>,

    /// Positional index of the default argument
    pub default_position: Option<usize>,

    /// Keyword accepted instead of the positional default
    pub default_keyword: Option<String>,
}

impl AccessorPattern {
    /// `os.environ.get(key, default=None)`, the `Mapping.get` signature
    pub fn os_environ_get() -> Self {
        Self {
            callee: "os.environ.get".to_string(),
            name_position: 0,
            name_keyword: Some("key".to_string()),
            default_position: Some(1),
            default_keyword: Some("default".to_string()),
        }
    }

    /// `os.getenv(key, default=None)`
    pub fn os_getenv() -> Self {
        Self {
            callee: "os.getenv".to_string(),
            name_position: 0,
            name_keyword: Some("key".to_string()),
            default_position: Some(1),
            default_keyword: Some("default".to_string()),
        }
    }

    /// Accessor with a positional name and an optional positional default.
    pub fn positional(
        callee: impl Into<String>,
        name_position: usize,
        default_position: Option<usize>,
    ) -> Self {
        Self {
            callee: callee.into(),
            name_position,
            name_keyword: None,
            default_position,
            default_keyword: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_dotted_path(&self.callee) {
            return Err(ExtractorError::invalid_config(format!(
                "accessor callee '{}' is not a dotted identifier path",
                self.callee
            )));
        }
        if self.default_position == Some(self.name_position) {
            return Err(ExtractorError::invalid_config(format!(
                "accessor '{}' uses position {} for both name and default",
                self.callee, self.name_position
            )));
        }
        Ok(())
    }
}

/// Parses the command-line form `callee[:name_pos[:default_pos]]`.
///
/// `default_pos` defaults to `name_pos + 1`; `-` means the accessor takes no
/// default.
impl FromStr for AccessorPattern {
    type Err = ExtractorError;

    fn from_str(raw: &str) -> Result<Self> {
        let mut parts = raw.trim().split(':');
        let callee = parts.next().unwrap_or_default().trim();

        let name_position = match parts.next().map(str::trim) {
            None | Some("") => 0,
            Some(value) => value.parse::<usize>().map_err(|_| {
                ExtractorError::invalid_config(format!(
                    "invalid name position '{value}' in accessor '{raw}'"
                ))
            })?,
        };

        let default_position = match parts.next().map(str::trim) {
            None | Some("") => Some(name_position + 1),
            Some("-") => None,
            Some(value) => Some(value.parse::<usize>().map_err(|_| {
                ExtractorError::invalid_config(format!(
                    "invalid default position '{value}' in accessor '{raw}'"
                ))
            })?),
        };

        if parts.next().is_some() {
            return Err(ExtractorError::invalid_config(format!(
                "too many ':' separated fields in accessor '{raw}'"
            )));
        }

        let pattern = Self::positional(callee, name_position, default_position);
        pattern.validate()?;
        Ok(pattern)
    }
}

impl fmt::Display for AccessorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.default_position {
            Some(pos) => write!(f, "{}:{}:{}", self.callee, self.name_position, pos),
            None => write!(f, "{}:{}:-", self.callee, self.name_position),
        }
    }
}

fn is_dotted_path(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// Configuration for accessor extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Accessor call shapes to recognise
    pub accessors: Vec<AccessorPattern>,

    /// Fall back to the annotation of `NAME: T = accessor(...)` for the type tag
    pub infer_from_annotations: bool,

    /// Fall back to a wrapping builtin cast (`int(accessor(...))`) for the type tag
    pub infer_from_casts: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            accessors: vec![AccessorPattern::os_environ_get(), AccessorPattern::os_getenv()],
            infer_from_annotations: true,
            infer_from_casts: true,
        }
    }
}

impl ExtractorConfig {
    /// Default accessors plus the given extra patterns (duplicates by callee are replaced).
    pub fn with_accessors(extra: impl IntoIterator<Item = AccessorPattern>) -> Self {
        let mut config = Self::default();
        for pattern in extra {
            config.accessors.retain(|existing| existing.callee != pattern.callee);
            config.accessors.push(pattern);
        }
        config
    }

    /// Find the pattern registered for a callee path
    pub fn accessor_for(&self, callee: &str) -> Option<&AccessorPattern> {
        self.accessors.iter().find(|pattern| pattern.callee == callee)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.accessors.is_empty() {
            return Err(ExtractorError::invalid_config(
                "at least one accessor pattern is required",
            ));
        }
        for pattern in &self.accessors {
            pattern.validate()?;
        }
        Ok(())
    }
}
