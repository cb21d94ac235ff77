use indexmap::IndexMap;
use ktl_reports_types::Invocation;
use ktl_reports_util::render_command_line;
use std::ffi::OsString;
use std::process::Stdio;
use tokio::process::Command;

const DEFAULT_PROGRAM: &str = "go";
const DEFAULT_LEADING_ARGS: &[&str] = &["run", "."];

/// How the external engine is launched.
///
/// The final argument vector is `leading_args` followed by the invocation's
/// sub-command arguments and definition path. The default runs the engine
/// from source with `go run .` in the facade root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    program: String,
    leading_args: Vec<String>,
    env: IndexMap<String, String>,
}

impl Default for EngineCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            leading_args: DEFAULT_LEADING_ARGS.iter().map(|arg| arg.to_string()).collect(),
            env: IndexMap::new(),
        }
    }
}

impl EngineCommand {
    /// A command for `program` with no leading arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            env: IndexMap::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Adds environment variables passed to every engine process.
    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env.extend(env.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    /// Full argument vector for one invocation, excluding the program.
    pub fn arguments(&self, invocation: &Invocation) -> Vec<OsString> {
        self.leading_args
            .iter()
            .map(OsString::from)
            .chain(invocation.arguments())
            .collect()
    }

    /// Shell-like rendering for logs.
    pub fn render(&self, invocation: &Invocation) -> String {
        render_command_line(&self.program, self.arguments(invocation))
    }

    /// Builds the process for one invocation.
    ///
    /// Standard input is closed, both output streams are captured, and the
    /// child is killed if the returned handle is dropped before it exits.
    pub(crate) fn to_command(&self, invocation: &Invocation) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.arguments(invocation))
            .current_dir(&invocation.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktl_reports_types::ReportOperation;

    #[test]
    fn default_command_runs_engine_from_source() {
        let command = EngineCommand::default();
        let invocation = Invocation::new(ReportOperation::Describe, "pkg/e2e/testdata/mcp-pods/pipeline.yaml", ".");
        assert_eq!(
            command.render(&invocation),
            "go run . mcp describe pkg/e2e/testdata/mcp-pods/pipeline.yaml"
        );
    }

    #[test]
    fn leading_args_precede_subcommand() {
        let command = EngineCommand::new("ktl").with_args(["--log-level", "warn"]);
        let invocation = Invocation::new(ReportOperation::Run, "/catalog/mcp-nodes/pipeline.yaml", "/srv");
        assert_eq!(
            command.arguments(&invocation),
            vec![
                OsString::from("--log-level"),
                OsString::from("warn"),
                OsString::from("run"),
                OsString::from("/catalog/mcp-nodes/pipeline.yaml"),
            ]
        );
    }

    #[test]
    fn env_entries_accumulate_in_order() {
        let command = EngineCommand::new("ktl")
            .with_env([("KUBECONFIG", "/etc/kube/config")])
            .with_env([("GOFLAGS", "-mod=mod")]);
        let keys = command.env.keys().cloned().collect::<Vec<String>>();
        assert_eq!(keys, vec!["KUBECONFIG", "GOFLAGS"]);
    }
}
