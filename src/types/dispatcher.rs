use super::scalar::{Level, LogLevel, Spelling, Toggle};

/// Error pass-through setting: off, on, or an explicit list of status codes
/// and ranges (`400-404,500`) whose error pages the web server renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    Toggle(Toggle),
    Codes(String),
}

impl PassError {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PassError::Toggle(t) => t.as_str(),
            PassError::Codes(codes) => codes,
        }
    }
}

/// Module-level settings shared by every farm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Absolute path of the composed farms artifact.
    pub config_file: String,
    pub log_file: String,
    pub log_level: Level,
    pub module_file: String,
    pub decline_root: Toggle,
    pub pass_error: PassError,
    pub use_processed_url: Toggle,
    pub no_server_header: Toggle,
}

impl DispatcherConfig {
    /// Defaults for everything but the three paths the caller must supply.
    #[must_use]
    pub fn new(
        config_file: impl Into<String>,
        log_file: impl Into<String>,
        module_file: impl Into<String>,
    ) -> Self {
        Self {
            config_file: config_file.into(),
            log_file: log_file.into(),
            log_level: Level {
                level: LogLevel::Warn,
                spelling: Spelling::Named,
            },
            module_file: module_file.into(),
            decline_root: Toggle::named(false),
            pass_error: PassError::Toggle(Toggle::numeric(false)),
            use_processed_url: Toggle::named(false),
            no_server_header: Toggle::named(false),
        }
    }

    /// Web-server directives that load the module and point it at the
    /// farms artifact.
    #[must_use]
    pub fn module_config(&self) -> String {
        let level = match self.log_level.spelling {
            Spelling::Named => self.log_level.level.name().to_owned(),
            Spelling::Numeric => self.log_level.level.number().to_string(),
        };
        format!(
            "LoadModule dispatcher_module {module}\n\
             \n\
             <IfModule disp_apache2.c>\n\
             \x20 DispatcherConfig {config}\n\
             \x20 DispatcherLog {log}\n\
             \x20 DispatcherLogLevel {level}\n\
             \x20 DispatcherNoServerHeader {no_server_header}\n\
             \x20 DispatcherDeclineRoot {decline_root}\n\
             \x20 DispatcherUseProcessedURL {use_processed_url}\n\
             \x20 DispatcherPassError {pass_error}\n\
             </IfModule>\n",
            module = self.module_file,
            config = self.config_file,
            log = self.log_file,
            no_server_header = self.no_server_header.as_str(),
            decline_root = self.decline_root.as_str(),
            use_processed_url = self.use_processed_url.as_str(),
            pass_error = self.pass_error.as_str(),
        )
    }
}
