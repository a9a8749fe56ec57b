//! External process resolution strategy

use std::process::Command;
use tracing::debug;

use super::{ResolutionError, ResolutionResult, ResolutionStrategy};
use crate::rdf::{Graph, RdfFormat, RdfParser};
use crate::urn::ModelUrn;

/// Runs `<program> <args...> <urn>` and reads Turtle from its stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStrategy {
    program: String,
    args: Vec<String>,
}

impl CommandStrategy {
    /// Create a strategy for a program and its leading arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a whitespace-separated command line. Returns None if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl ResolutionStrategy for CommandStrategy {
    fn apply(&self, urn: &ModelUrn) -> ResolutionResult<Graph> {
        debug!("Running {} for {}", self.program, urn);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(urn.to_string())
            .output()
            .map_err(|e| ResolutionError::io(urn, format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolutionError::io(
                urn,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ResolutionError::io(urn, format!("output is not UTF-8: {}", e)))?;
        RdfParser::parse(&stdout, RdfFormat::Turtle)
            .map_err(|e| ResolutionError::io(urn, format!("invalid output of {}: {}", self.program, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urn() -> ModelUrn {
        ModelUrn::parse("urn:samm:com.example:1.0.0#Movement").unwrap()
    }

    #[test]
    fn test_from_command_line() {
        let strategy = CommandStrategy::from_command_line("  resolver --repo models ").unwrap();
        assert_eq!(strategy.program(), "resolver");
        assert_eq!(strategy.args(), &["--repo".to_string(), "models".to_string()]);
        assert!(CommandStrategy::from_command_line("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_parsed() {
        let script = "printf '<%s> a <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#Aspect> .' \"$1\"";
        let strategy = CommandStrategy::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "sh".to_string()],
        );
        let graph = strategy.apply(&urn()).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_io_error() {
        let strategy = CommandStrategy::new(
            "sh",
            vec!["-c".to_string(), "exit 3".to_string(), "sh".to_string()],
        );
        assert!(matches!(strategy.apply(&urn()), Err(ResolutionError::Io { .. })));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let strategy = CommandStrategy::new("definitely-not-a-real-resolver-binary", vec![]);
        assert!(matches!(strategy.apply(&urn()), Err(ResolutionError::Io { .. })));
    }
}
