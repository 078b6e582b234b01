//! Fetching task definition documents by identifier.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("'{origin}' is not a JSON document: {reason}")]
    InvalidDocument { origin: String, reason: String },
}

/// Something that turns an identifier into a JSON document
pub trait DocumentSource {
    fn fetch(&self, id: &str) -> Result<Value, RetrievalError>;
}

/// Reads the identifier as a local file path
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl DocumentSource for FileSource {
    fn fetch(&self, id: &str) -> Result<Value, RetrievalError> {
        let path = Path::new(id);
        let content = std::fs::read_to_string(path).map_err(|source| RetrievalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(id, &content)
    }
}

/// Asks the AWS CLI for a task definition by family, revision or ARN
#[derive(Debug, Clone)]
pub struct AwsCliSource {
    program: String,
    region: Option<String>,
}

impl AwsCliSource {
    pub fn new(region: Option<String>) -> Self {
        Self {
            program: "aws".to_string(),
            region,
        }
    }

    /// Use a different executable in place of `aws`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let mut args = vec![
            "ecs",
            "describe-task-definition",
            "--task-definition",
            id,
            "--output",
            "json",
        ];
        if let Some(region) = &self.region {
            args.extend(["--region", region.as_str()]);
        }
        args
    }
}

impl DocumentSource for AwsCliSource {
    fn fetch(&self, id: &str) -> Result<Value, RetrievalError> {
        let args = self.args(id);
        log::debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| RetrievalError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RetrievalError::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_document(id, &stdout)
    }
}

fn parse_document(origin: &str, content: &str) -> Result<Value, RetrievalError> {
    serde_json::from_str(content).map_err(|e| RetrievalError::InvalidDocument {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

/// A local file when `id` names one, the AWS CLI otherwise
pub fn source_for(id: &str, region: Option<String>) -> Box<dyn DocumentSource> {
    if Path::new(id).is_file() {
        Box::new(FileSource)
    } else {
        log::info!("'{id}' is not a file, asking AWS for the task definition");
        Box::new(AwsCliSource::new(region))
    }
}
