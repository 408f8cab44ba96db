//! Build targets and target groups, named the way the editor names them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Player platform a build is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub enum BuildTarget {
    #[serde(rename = "StandaloneOSX")]
    StandaloneOsx,
    StandaloneWindows,
    StandaloneWindows64,
    StandaloneLinux64,
    #[serde(rename = "iOS")]
    Ios,
    Android,
    #[serde(rename = "WebGL")]
    WebGl,
    Switch,
}

/// Settings group a target belongs to; scripting defines are scoped per
/// group, not per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub enum TargetGroup {
    Standalone,
    #[serde(rename = "iOS")]
    Ios,
    Android,
    #[serde(rename = "WebGL")]
    WebGl,
    Switch,
}

impl BuildTarget {
    pub fn from_str_name(name: &str) -> Option<Self> {
        match name {
            "StandaloneOSX" => Some(Self::StandaloneOsx),
            "StandaloneWindows" => Some(Self::StandaloneWindows),
            "StandaloneWindows64" => Some(Self::StandaloneWindows64),
            "StandaloneLinux64" => Some(Self::StandaloneLinux64),
            "iOS" => Some(Self::Ios),
            "Android" => Some(Self::Android),
            "WebGL" => Some(Self::WebGl),
            "Switch" => Some(Self::Switch),
            _ => None,
        }
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::StandaloneOsx => "StandaloneOSX",
            Self::StandaloneWindows => "StandaloneWindows",
            Self::StandaloneWindows64 => "StandaloneWindows64",
            Self::StandaloneLinux64 => "StandaloneLinux64",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::WebGl => "WebGL",
            Self::Switch => "Switch",
        }
    }

    pub fn group(&self) -> TargetGroup {
        match self {
            Self::Ios => TargetGroup::Ios,
            Self::Android => TargetGroup::Android,
            Self::WebGl => TargetGroup::WebGl,
            Self::Switch => TargetGroup::Switch,
            Self::StandaloneOsx
            | Self::StandaloneWindows
            | Self::StandaloneWindows64
            | Self::StandaloneLinux64 => TargetGroup::Standalone,
        }
    }

    /// Extension the built player file carries, if the platform needs one.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::StandaloneWindows | Self::StandaloneWindows64 => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standalone => "Standalone",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::WebGl => "WebGL",
            Self::Switch => "Switch",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_targets_share_the_standalone_group() {
        for target in [
            BuildTarget::StandaloneOsx,
            BuildTarget::StandaloneWindows,
            BuildTarget::StandaloneWindows64,
            BuildTarget::StandaloneLinux64,
        ] {
            assert_eq!(target.group(), TargetGroup::Standalone);
        }
        assert_eq!(BuildTarget::Switch.group(), TargetGroup::Switch);
        assert_eq!(BuildTarget::Android.group(), TargetGroup::Android);
    }

    #[test]
    fn names_round_trip() {
        for name in ["StandaloneOSX", "StandaloneWindows64", "iOS", "WebGL", "Switch"] {
            let target = BuildTarget::from_str_name(name).expect("known target");
            assert_eq!(target.as_str_name(), name);
        }
        assert!(BuildTarget::from_str_name("Stadia").is_none());
    }

    #[test]
    fn only_windows_players_get_an_extension() {
        assert_eq!(BuildTarget::StandaloneWindows64.file_suffix(), ".exe");
        assert_eq!(BuildTarget::StandaloneWindows.file_suffix(), ".exe");
        assert_eq!(BuildTarget::StandaloneLinux64.file_suffix(), "");
        assert_eq!(BuildTarget::StandaloneOsx.file_suffix(), "");
    }
}
