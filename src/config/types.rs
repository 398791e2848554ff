use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding the template assets directory.
pub const ASSETS_ENV: &str = "TICALABASH_ASSETS";

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub runners: RunnersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the Calabash templates (`features/`, `cucumber.yml`) live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Explicit assets directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Where the platform runner scripts live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnersConfig {
    /// Directory holding `run_ios` / `run_android`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Per-runner script paths, keyed by runner name.
    #[serde(default)]
    pub overrides: BTreeMap<String, PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Installation prefix: `<prefix>/bin/ticalabash` → `<prefix>`.
pub fn install_prefix() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent()?.parent().map(Path::to_path_buf)
}

impl AssetsConfig {
    /// Resolve the assets directory from the environment and install location.
    pub fn resolve(&self) -> PathBuf {
        let env_dir = std::env::var_os(ASSETS_ENV).map(PathBuf::from);
        self.resolve_with(env_dir, install_prefix().as_deref())
    }

    /// Precedence: env override, config file, `<prefix>/share/ticalabash/assets`,
    /// then `./assets`.
    pub fn resolve_with(&self, env_dir: Option<PathBuf>, prefix: Option<&Path>) -> PathBuf {
        if let Some(dir) = env_dir {
            return dir;
        }
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        match prefix {
            Some(prefix) => prefix.join("share").join("ticalabash").join("assets"),
            None => PathBuf::from("assets"),
        }
    }
}

impl RunnersConfig {
    /// Runner script directory, defaulting to `<prefix>/lib/ticalabash`.
    pub fn resolve_dir(&self, prefix: Option<&Path>) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        match prefix {
            Some(prefix) => prefix.join("lib").join("ticalabash"),
            None => PathBuf::from("runners"),
        }
    }

    /// Script path for `runner`: override first, then `<dir>/<runner>`.
    pub fn script_path(&self, runner: &str, prefix: Option<&Path>) -> PathBuf {
        match self.overrides.get(runner) {
            Some(path) => path.clone(),
            None => self.resolve_dir(prefix).join(runner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_env_wins_over_config() {
        let assets = AssetsConfig {
            dir: Some(PathBuf::from("/from/config")),
        };
        let resolved = assets.resolve_with(Some(PathBuf::from("/from/env")), None);
        assert_eq!(resolved, PathBuf::from("/from/env"));
    }

    #[test]
    fn assets_fall_back_to_install_prefix() {
        let resolved = AssetsConfig::default().resolve_with(None, Some(Path::new("/opt/tc")));
        assert_eq!(resolved, PathBuf::from("/opt/tc/share/ticalabash/assets"));
    }

    #[test]
    fn runner_override_wins() {
        let mut runners = RunnersConfig {
            dir: Some(PathBuf::from("/runners")),
            overrides: BTreeMap::new(),
        };
        runners
            .overrides
            .insert("run_ios".to_string(), PathBuf::from("/custom/ios.sh"));

        assert_eq!(
            runners.script_path("run_ios", None),
            PathBuf::from("/custom/ios.sh")
        );
        assert_eq!(
            runners.script_path("run_android", None),
            PathBuf::from("/runners/run_android")
        );
    }

    #[test]
    fn runner_dir_defaults_under_prefix() {
        let runners = RunnersConfig::default();
        assert_eq!(
            runners.resolve_dir(Some(Path::new("/usr/local"))),
            PathBuf::from("/usr/local/lib/ticalabash")
        );
    }
}
