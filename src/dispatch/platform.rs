use std::fmt;

use serde::Serialize;

/// Build targets Calabash can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    /// Older Titanium name for the iOS target.
    Iphone,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Iphone];

    /// Parse a platform identifier. Matching is exact and case-sensitive.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Iphone => "iphone",
        }
    }

    /// Name of the runner that builds this platform.
    pub fn runner_name(self) -> &'static str {
        match self {
            Platform::Android => "run_android",
            Platform::Ios | Platform::Iphone => "run_ios",
        }
    }

    /// Comma-separated list of accepted identifiers, for error messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
