//! Runtime settings for dispatch and the interactive shell.

/// Default prompt printed before each line the shell reads
pub const DEFAULT_PROMPT: &str = "> ";
/// Default line printed when the shell starts
pub const DEFAULT_BANNER: &str = "Entering interactive mode:";

/// Settings shared by the dispatcher and the shell.
///
/// # Examples
///
/// ```
/// use fncli_core::config::Config;
///
/// let config = Config::default().interactive(false).prompt("$ ");
/// assert!(!config.interactive);
/// assert_eq!(config.prompt, "$ ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Open the shell when no subcommand is given.
    pub interactive: bool,
    pub prompt: String,
    pub banner: String,
    /// Suggest the closest command name when a name does not match.
    pub suggest_commands: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interactive: true,
            prompt: DEFAULT_PROMPT.to_string(),
            banner: DEFAULT_BANNER.to_string(),
            suggest_commands: true,
        }
    }
}

impl Config {
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    #[must_use]
    pub fn banner(mut self, banner: &str) -> Self {
        self.banner = banner.to_string();
        self
    }

    #[must_use]
    pub fn suggest_commands(mut self, suggest_commands: bool) -> Self {
        self.suggest_commands = suggest_commands;
        self
    }
}
