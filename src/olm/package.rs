//! OLM package descriptor (`<name>.package.yaml`)

use serde::{Deserialize, Serialize};

/// Package document pointing each channel at its current CSV
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Package name, identical to the operator name
    pub package_name: String,

    /// Upgrade channels
    #[serde(default)]
    pub channels: Vec<PackageChannel>,
}

/// A named upgrade stream
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageChannel {
    /// Channel name (e.g. `alpha`, `stable`)
    pub name: String,

    /// CSV currently recommended on this channel
    #[serde(rename = "currentCSV")]
    pub current_csv: String,
}

impl Package {
    /// Build a single-channel package pointing at `current_csv`
    pub fn single_channel(
        package_name: impl Into<String>,
        channel: impl Into<String>,
        current_csv: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            channels: vec![PackageChannel {
                name: channel.into(),
                current_csv: current_csv.into(),
            }],
        }
    }

    /// CSV of the first channel, if any
    pub fn current_csv(&self) -> Option<&str> {
        self.channels.first().map(|c| c.current_csv.as_str())
    }
}
