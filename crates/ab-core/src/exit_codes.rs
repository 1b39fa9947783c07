//! Exit codes for the ab-core CLI.
//!
//! Exit code ranges:
//! - 0: success (the analysis ran; read the verdict from the payload)
//! - 10-19: user/input errors (fixable by changing arguments, input, or config)
//! - 20-29: internal errors (bugs, should be reported)

/// Stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Analysis completed and the payload was written.
    Clean = 0,

    /// Invalid command-line arguments or parameter values.
    ArgsError = 10,

    /// Experiment input could not be read, parsed, or is inconsistent.
    InputError = 11,

    /// Settings file missing, malformed, or semantically invalid.
    ConfigError = 12,

    /// Settings schema version not supported by this build.
    VersionError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// Failed writing the payload.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19: resolvable by the user.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Codes 20-29: bugs or environment failures.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Name used in structured error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::VersionError => "ERR_VERSION",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
