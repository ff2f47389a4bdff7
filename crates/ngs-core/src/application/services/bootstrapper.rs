//! Runs the module bootstrap command inside a freshly generated project.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{BootstrapCommand, CommandRunner, Filesystem},
    },
    domain::RelativePath,
    error::NgsResult,
};

/// Resolves the Go module's dependencies after materialization.
pub struct Bootstrapper<'a> {
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn CommandRunner,
    command: &'a BootstrapCommand,
    descriptor: &'a RelativePath,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        runner: &'a dyn CommandRunner,
        command: &'a BootstrapCommand,
        descriptor: &'a RelativePath,
    ) -> Self {
        Self {
            filesystem,
            runner,
            command,
            descriptor,
        }
    }

    /// Run the command with `root` as its working directory and return the
    /// combined output.
    ///
    /// The descriptor must already exist under `root`. Files are never
    /// removed on failure.
    #[instrument(skip_all, fields(command = %self.command, root = %root.display()))]
    pub fn bootstrap(&self, root: &Path) -> NgsResult<String> {
        let descriptor = self.descriptor.under(root);
        if !self.filesystem.exists(&descriptor) {
            return Err(ApplicationError::Precondition { path: descriptor }.into());
        }

        let result = self.runner.run(self.command, root)?;
        if !result.status.success() {
            warn!(status = %result.status, "bootstrap command failed");
            return Err(ApplicationError::Bootstrap {
                command: self.command.to_string(),
                status: result.status.to_string(),
                output: result.output,
            }
            .into());
        }

        info!("bootstrap command succeeded");
        Ok(result.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        CommandOutput, CommandStatus,
        output::{MockCommandRunner, MockFilesystem},
    };
    use crate::error::NgsError;
    use std::time::Duration;

    fn go_mod() -> RelativePath {
        RelativePath::try_new("go.mod").unwrap()
    }

    #[test]
    fn missing_descriptor_is_a_precondition_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let command = BootstrapCommand::default();
        let descriptor = go_mod();
        let err = Bootstrapper::new(&fs, &runner, &command, &descriptor)
            .bootstrap(Path::new("/srv/acme"))
            .unwrap_err();
        assert_eq!(err.kind(), "PreconditionError");
    }

    #[test]
    fn runs_in_project_root_and_returns_output() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/srv/acme/go.mod"))
            .returning(|_| true);
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd, cwd| cmd.program == "go" && cwd == Path::new("/srv/acme"))
            .times(1)
            .returning(|_, _| {
                Ok(CommandOutput {
                    status: CommandStatus::Exited(Some(0)),
                    output: "go: finding module".into(),
                })
            });

        let command = BootstrapCommand::default();
        let descriptor = go_mod();
        let output = Bootstrapper::new(&fs, &runner, &command, &descriptor)
            .bootstrap(Path::new("/srv/acme"))
            .unwrap();
        assert_eq!(output, "go: finding module");
    }

    #[test]
    fn non_zero_exit_carries_output_verbatim() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _| {
            Ok(CommandOutput {
                status: CommandStatus::Exited(Some(1)),
                output: "go: errors parsing go.mod".into(),
            })
        });

        let command = BootstrapCommand::default();
        let descriptor = go_mod();
        let err = Bootstrapper::new(&fs, &runner, &command, &descriptor)
            .bootstrap(Path::new("/srv/acme"))
            .unwrap_err();
        assert_eq!(
            err,
            NgsError::from(ApplicationError::Bootstrap {
                command: "go mod tidy".into(),
                status: "exit status: 1".into(),
                output: "go: errors parsing go.mod".into(),
            })
        );
    }

    #[test]
    fn timeout_is_reported_as_bootstrap_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _| {
            Ok(CommandOutput {
                status: CommandStatus::TimedOut(Duration::from_secs(5)),
                output: String::new(),
            })
        });

        let command = BootstrapCommand::default().with_timeout_secs(5);
        let descriptor = go_mod();
        let err = Bootstrapper::new(&fs, &runner, &command, &descriptor)
            .bootstrap(Path::new("/srv/acme"))
            .unwrap_err();
        assert!(err.to_string().contains("timed out after 5s"));
    }
}
