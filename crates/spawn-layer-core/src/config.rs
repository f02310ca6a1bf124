use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Argument count the original fixed-capacity launcher accepted
pub const LEGACY_MAX_ARGS: usize = 100;

/// Launcher configuration shared by every platform strategy
///
/// Fields that only make sense on one platform are ignored by the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct LauncherConfig {
    /// Unix: report a failed image replacement back to the caller through a
    /// close-on-exec status pipe. When false, success only means the calling
    /// process was duplicated.
    #[serde(default = "default_report_exec_failure")]
    #[builder(default = "default_report_exec_failure()")]
    pub report_exec_failure: bool,

    /// Windows: quote arguments following the MSVC runtime rules. When false,
    /// arguments are joined with single spaces and no escaping.
    #[serde(default = "default_quote_arguments")]
    #[builder(default = "default_quote_arguments()")]
    pub quote_arguments: bool,

    /// Optional cap on the argument count (None means unbounded)
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub max_args: Option<usize>,

    /// Windows: extra `CreateProcessW` creation flags
    #[serde(default)]
    #[builder(default)]
    pub creation_flags: u32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            report_exec_failure: default_report_exec_failure(),
            quote_arguments: default_quote_arguments(),
            max_args: None,
            creation_flags: 0,
        }
    }
}

impl LauncherConfig {
    pub fn builder() -> LauncherConfigBuilder {
        LauncherConfigBuilder::default()
    }

    /// Success as soon as the OS accepts the request; exec failures on Unix
    /// are only visible as the child exiting with status 127
    pub fn fire_and_forget() -> Self {
        Self {
            report_exec_failure: false,
            ..Self::default()
        }
    }

    /// Behaviour of the original launcher: no exec reporting, plain space
    /// joined command lines and the 100 argument cap
    pub fn legacy() -> Self {
        Self {
            report_exec_failure: false,
            quote_arguments: false,
            max_args: Some(LEGACY_MAX_ARGS),
            creation_flags: 0,
        }
    }

    /// Validate the configuration and return errors if invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_args == Some(0) {
            return Err(anyhow::anyhow!("max_args must allow at least one argument"));
        }

        Ok(())
    }
}

impl LauncherConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(0)) = self.max_args {
            return Err("max_args must allow at least one argument".to_string());
        }
        Ok(())
    }
}

fn default_report_exec_failure() -> bool {
    true
}
fn default_quote_arguments() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LauncherConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.report_exec_failure);
        assert!(config.quote_arguments);
        assert_eq!(config.max_args, None);
    }

    #[test]
    fn test_legacy_config() {
        let config = LauncherConfig::legacy();
        assert!(config.validate().is_ok());
        assert!(!config.report_exec_failure);
        assert!(!config.quote_arguments);
        assert_eq!(config.max_args, Some(LEGACY_MAX_ARGS));
    }

    #[test]
    fn test_builder() {
        let config = LauncherConfig::builder()
            .report_exec_failure(false)
            .max_args(16usize)
            .creation_flags(0x0800_0000u32)
            .build()
            .unwrap();
        assert!(!config.report_exec_failure);
        assert!(config.quote_arguments);
        assert_eq!(config.max_args, Some(16));
        assert_eq!(config.creation_flags, 0x0800_0000);
    }

    #[test]
    fn test_invalid_config() {
        assert!(LauncherConfig::builder().max_args(0usize).build().is_err());

        let config = LauncherConfig {
            max_args: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization() {
        let config = LauncherConfig::legacy();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("reportExecFailure"));
        let deserialized: LauncherConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);

        let partial: LauncherConfig = serde_json::from_str(r#"{"maxArgs": 8}"#).unwrap();
        assert!(partial.report_exec_failure);
        assert_eq!(partial.max_args, Some(8));
    }
}
