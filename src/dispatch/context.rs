use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::args::PartitionResult;

/// Signing options passed through to the runner untouched.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeystoreOptions {
    pub location: Option<PathBuf>,
    pub password: Option<String>,
    pub alias: Option<String>,
}

impl fmt::Debug for KeystoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreOptions")
            .field("location", &self.location)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("alias", &self.alias)
            .finish()
    }
}

/// State handed to the platform runner.
///
/// Partitioned arguments are attached exactly once, after provisioning has
/// succeeded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvocationContext {
    pub keystore: KeystoreOptions,
    test_tool_args: Option<Vec<String>>,
    passthrough_args: Option<Vec<String>>,
}

/// Returned when partitioned arguments are attached a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyAttached;

impl InvocationContext {
    pub fn new(keystore: KeystoreOptions) -> Self {
        Self {
            keystore,
            test_tool_args: None,
            passthrough_args: None,
        }
    }

    pub fn attach(&mut self, partition: PartitionResult) -> Result<(), AlreadyAttached> {
        if self.is_attached() {
            return Err(AlreadyAttached);
        }
        self.test_tool_args = Some(partition.test_tool_args);
        self.passthrough_args = Some(partition.passthrough_args);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.test_tool_args.is_some() || self.passthrough_args.is_some()
    }

    /// Testing-tool arguments; empty until attached.
    pub fn test_tool_args(&self) -> &[String] {
        self.test_tool_args.as_deref().unwrap_or_default()
    }

    /// Build-tool arguments; empty until attached.
    pub fn passthrough_args(&self) -> &[String] {
        self.passthrough_args.as_deref().unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
