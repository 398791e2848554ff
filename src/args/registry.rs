//! Flag registry — single source of truth for testing-tool flags.

use thiserror::Error;

/// Whether a flag takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagArity {
    /// Boolean flag, no value.
    NoValue,
    /// The next token is the flag's value (e.g., --tags <EXPR>).
    RequiresValue,
}

/// A single testing-tool flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Primary long form (e.g., "--tags").
    pub long: &'static str,
    /// Optional short alias (e.g., "-CT").
    pub short: Option<&'static str>,
    /// Does it take a value?
    pub arity: FlagArity,
    /// Whether the partitioner pulls this flag out of the build arguments.
    ///
    /// `--exclude` is declared but has never been extracted; it and its value
    /// reach the build tool untouched.
    pub extracted: bool,
    /// Human-readable description (for `--flags` output).
    pub description: &'static str,
}

/// Build the complete flag registry.
pub fn flag_registry() -> Vec<FlagDef> {
    vec![
        FlagDef {
            long: "--tags",
            short: Some("-CT"),
            arity: FlagArity::RequiresValue,
            extracted: true,
            description: "Only run scenarios matching the tag expression",
        },
        FlagDef {
            long: "--name",
            short: Some("-CN"),
            arity: FlagArity::RequiresValue,
            extracted: true,
            description: "Only run scenarios whose name matches",
        },
        FlagDef {
            long: "--exclude",
            short: Some("-CE"),
            arity: FlagArity::RequiresValue,
            extracted: false,
            description: "Skip feature files matching the pattern",
        },
        FlagDef {
            long: "--format",
            short: Some("-CF"),
            arity: FlagArity::RequiresValue,
            extracted: true,
            description: "Cucumber output formatter",
        },
    ]
}

/// Lookup entry for one flag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Canonical token this one stands for, if it is an alias.
    pub alias_of: Option<&'static str>,
    /// Whether the next raw token is consumed as this flag's value.
    pub has_value: bool,
}

impl FlagSpec {
    pub const fn canonical(has_value: bool) -> Self {
        Self {
            alias_of: None,
            has_value,
        }
    }

    pub const fn alias(target: &'static str) -> Self {
        Self {
            alias_of: Some(target),
            has_value: true,
        }
    }
}

/// Violations of the single-level alias rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagTableError {
    #[error("{flag}: alias target '{target}' is not in the flag table")]
    DanglingAlias {
        flag: &'static str,
        target: &'static str,
    },

    #[error("{flag}: alias target '{target}' is itself an alias")]
    ChainedAlias {
        flag: &'static str,
        target: &'static str,
    },

    #[error("{flag}: alias target '{target}' does not take a value")]
    ValuelessTarget {
        flag: &'static str,
        target: &'static str,
    },
}

/// Token → spec mapping consulted by the partitioner.
///
/// Entries keep insertion order so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    entries: Vec<(&'static str, FlagSpec)>,
}

impl FlagTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of every extracted flag in `defs`, short forms aliased to long.
    pub fn from_registry(defs: &[FlagDef]) -> Self {
        let mut table = Self::new();
        for def in defs.iter().filter(|d| d.extracted) {
            let has_value = def.arity == FlagArity::RequiresValue;
            table.insert(def.long, FlagSpec::canonical(has_value));
            if let Some(short) = def.short {
                table.insert(
                    short,
                    FlagSpec {
                        alias_of: Some(def.long),
                        has_value,
                    },
                );
            }
        }
        table
    }

    /// Add or replace a token.
    pub fn with_flag(mut self, token: &'static str, spec: FlagSpec) -> Self {
        self.insert(token, spec);
        self
    }

    fn insert(&mut self, token: &'static str, spec: FlagSpec) {
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((token, spec)),
        }
    }

    /// Raw lookup, no alias resolution.
    pub fn get(&self, token: &str) -> Option<&FlagSpec> {
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, spec)| spec)
    }

    /// Resolve `token` to its canonical form and spec.
    ///
    /// Returns `None` for tokens not in the table and for aliases whose
    /// target is missing.
    pub fn resolve(&self, token: &str) -> Option<(&'static str, FlagSpec)> {
        let (key, spec) = self.entries.iter().find(|(t, _)| *t == token)?;
        match spec.alias_of {
            None => Some((*key, *spec)),
            Some(target) => self.get(target).map(|resolved| (target, *resolved)),
        }
    }

    /// Check that every alias points at a value-taking canonical flag.
    pub fn validate(&self) -> Result<(), FlagTableError> {
        for &(flag, spec) in &self.entries {
            let Some(target) = spec.alias_of else {
                continue;
            };
            let resolved = self.get(target).ok_or(FlagTableError::DanglingAlias {
                flag,
                target,
            })?;
            if resolved.alias_of.is_some() {
                return Err(FlagTableError::ChainedAlias { flag, target });
            }
            if !resolved.has_value {
                return Err(FlagTableError::ValuelessTarget { flag, target });
            }
        }
        Ok(())
    }

    /// All tokens in insertion order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }
}

/// The table the dispatcher uses by default.
pub fn extraction_table() -> FlagTable {
    FlagTable::from_registry(&flag_registry())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert_eq!(extraction_table().validate(), Ok(()));
    }

    #[test]
    fn exclude_is_declared_but_not_extracted() {
        assert!(flag_registry().iter().any(|d| d.long == "--exclude"));
        let table = extraction_table();
        assert!(table.get("--exclude").is_none());
        assert!(table.get("-CE").is_none());
    }

    #[test]
    fn short_forms_resolve_to_long() {
        let table = extraction_table();
        assert_eq!(table.resolve("-CT").map(|(t, _)| t), Some("--tags"));
        assert_eq!(table.resolve("-CN").map(|(t, _)| t), Some("--name"));
        assert_eq!(table.resolve("-CF").map(|(t, _)| t), Some("--format"));
        assert_eq!(table.resolve("--tags").map(|(t, _)| t), Some("--tags"));
    }

    #[test]
    fn tokens_keep_insertion_order() {
        let tokens: Vec<_> = extraction_table().tokens().collect();
        assert_eq!(
            tokens,
            vec!["--tags", "-CT", "--name", "-CN", "--format", "-CF"]
        );
    }

    #[test]
    fn dangling_alias_rejected() {
        let table = FlagTable::new().with_flag("-X", FlagSpec::alias("--missing"));
        assert_eq!(
            table.validate(),
            Err(FlagTableError::DanglingAlias {
                flag: "-X",
                target: "--missing"
            })
        );
        assert!(table.resolve("-X").is_none());
    }

    #[test]
    fn chained_alias_rejected() {
        let table = FlagTable::new()
            .with_flag("--tags", FlagSpec::canonical(true))
            .with_flag("-CT", FlagSpec::alias("--tags"))
            .with_flag("-T", FlagSpec::alias("-CT"));
        assert!(matches!(
            table.validate(),
            Err(FlagTableError::ChainedAlias { flag: "-T", .. })
        ));
    }

    #[test]
    fn valueless_target_rejected() {
        let table = FlagTable::new()
            .with_flag("--dry-run", FlagSpec::canonical(false))
            .with_flag("-D", FlagSpec::alias("--dry-run"));
        assert!(matches!(
            table.validate(),
            Err(FlagTableError::ValuelessTarget { flag: "-D", .. })
        ));
    }

    #[test]
    fn with_flag_replaces_existing_entry() {
        let table = extraction_table().with_flag("--tags", FlagSpec::canonical(false));
        assert_eq!(table.get("--tags"), Some(&FlagSpec::canonical(false)));
        assert_eq!(table.tokens().filter(|t| *t == "--tags").count(), 1);
    }
}
