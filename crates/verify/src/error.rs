use envcat_catalog::DefaultValue;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerifyError>;

/// First policy violation found by [`must_pass_check`](crate::must_pass_check)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyError {
    #[error("Required environment variable '{name}' is missing")]
    RequiredVariableMissing { name: String },

    #[error(
        "Environment variable '{name}' is missing and using default '{}', but warnings are treated as errors",
        display_default(.default_value)
    )]
    DefaultUsedAsError {
        name: String,
        default_value: Option<DefaultValue>,
    },
}

impl VerifyError {
    /// Name of the offending variable
    pub fn variable(&self) -> &str {
        match self {
            Self::RequiredVariableMissing { name } | Self::DefaultUsedAsError { name, .. } => name,
        }
    }
}

pub(crate) fn display_default(value: &Option<DefaultValue>) -> String {
    value
        .as_ref()
        .map_or_else(|| "None".to_string(), ToString::to_string)
}
