//! The input side of a console session: commands and launch arguments.

/// The command that ends an interactive session by convention.
pub const QUIT_COMMAND: &str = "quit";

/// Commands fed to a console program, and the arguments it is launched with.
///
/// Commands are fed one per simulated input read, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    commands: Vec<String>,
    args: Vec<String>,
}

impl Session {
    /// Create a session running the given commands.
    #[must_use]
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            args: Vec::new(),
        }
    }

    /// Create a session running a single command.
    #[must_use]
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            commands: vec![command.into()],
            args: Vec::new(),
        }
    }

    /// Set the launch arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add a launch argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append [`QUIT_COMMAND`] to the commands.
    #[must_use]
    pub fn with_quit(self) -> Self {
        self.with_terminator(QUIT_COMMAND)
    }

    /// Append a session-ending command to the commands.
    #[must_use]
    pub fn with_terminator(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Get the commands.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Get the launch arguments.
    #[must_use]
    pub fn launch_args(&self) -> &[String] {
        &self.args
    }
}

/// Return a copy of `commands` with [`QUIT_COMMAND`] appended.
#[must_use]
pub fn add_quit<I, S>(commands: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    commands
        .into_iter()
        .map(Into::into)
        .chain(std::iter::once(QUIT_COMMAND.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_builder() {
        let session = Session::new(["add 1 2", "print"]).args(["-v"]).arg("file.txt");
        assert_eq!(session.commands(), ["add 1 2", "print"]);
        assert_eq!(session.launch_args(), ["-v", "file.txt"]);
    }

    #[test]
    fn quit_is_opt_in() {
        let plain = Session::command("help");
        assert_eq!(plain.commands(), ["help"]);

        let quitting = plain.clone().with_quit();
        assert_eq!(quitting.commands(), ["help", "quit"]);
        assert_eq!(plain.commands(), ["help"]);
    }

    #[test]
    fn add_quit_copies() {
        let original = vec!["a".to_string(), "b".to_string()];
        let with_quit = add_quit(&original);
        assert_eq!(with_quit, ["a", "b", "quit"]);
        assert_eq!(original.len(), 2);
        assert_eq!(add_quit(Vec::<String>::new()), ["quit"]);
    }
}
