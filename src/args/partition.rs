//! Argument partitioner — raw args → testing-tool args + build args.

use crate::args::registry::FlagTable;

/// Result of partitioning raw arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionResult {
    /// Canonical flag/value pairs for the testing tool, in input order.
    pub test_tool_args: Vec<String>,
    /// Everything else, unchanged, for the build tool.
    pub passthrough_args: Vec<String>,
    /// Warnings produced during partitioning (e.g., a trailing value flag).
    pub warnings: Vec<String>,
}

/// Split `raw_args` against `table`.
///
/// A value-taking flag consumes the next token verbatim, even when that token
/// looks like another flag. A value-taking flag in last position gets an empty
/// value and a warning.
pub fn partition(raw_args: &[String], table: &FlagTable) -> PartitionResult {
    let mut result = PartitionResult::default();
    let mut iter = raw_args.iter();

    while let Some(arg) = iter.next() {
        let Some((canonical, spec)) = table.resolve(arg) else {
            result.passthrough_args.push(arg.clone());
            continue;
        };

        result.test_tool_args.push(canonical.to_string());
        if !spec.has_value {
            continue;
        }

        match iter.next() {
            Some(value) => result.test_tool_args.push(value.clone()),
            None => {
                result
                    .warnings
                    .push(format!("{}: missing value, using an empty one", canonical));
                result.test_tool_args.push(String::new());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::registry::{extraction_table, FlagSpec};

    fn raw(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn alias_resolves_to_canonical() {
        let result = partition(&raw(&["-CT", "@smoke"]), &extraction_table());
        assert_eq!(result.test_tool_args, vec!["--tags", "@smoke"]);
        assert!(result.passthrough_args.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn value_is_taken_verbatim_even_if_flag_like() {
        let result = partition(&raw(&["--name", "-CT", "build"]), &extraction_table());
        assert_eq!(result.test_tool_args, vec!["--name", "-CT"]);
        assert_eq!(result.passthrough_args, vec!["build"]);
    }

    #[test]
    fn trailing_value_flag_gets_empty_value() {
        let result = partition(&raw(&["build", "-CF"]), &extraction_table());
        assert_eq!(result.test_tool_args, vec!["--format", ""]);
        assert_eq!(result.passthrough_args, vec!["build"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("--format: missing value"));
    }

    #[test]
    fn boolean_flag_consumes_nothing() {
        let table = extraction_table().with_flag("--dry-run", FlagSpec::canonical(false));
        let result = partition(&raw(&["--dry-run", "build"]), &table);
        assert_eq!(result.test_tool_args, vec!["--dry-run"]);
        assert_eq!(result.passthrough_args, vec!["build"]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            partition(&[], &extraction_table()),
            PartitionResult::default()
        );
    }
}
