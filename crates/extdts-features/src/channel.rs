use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release channel gating availability.
///
/// Ordered from most broadly available (`Stable`) to least (`Trunk`). The
/// derived `Ord` is the restriction order: a higher value is more
/// restrictive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Stable,
    Beta,
    Dev,
    Canary,
    Trunk,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Stable,
        Channel::Beta,
        Channel::Dev,
        Channel::Canary,
        Channel::Trunk,
    ];

    /// The channel that admits fewer users of the two.
    pub fn most_restrictive(a: Channel, b: Channel) -> Channel {
        a.max(b)
    }

    /// The channel that admits more users of the two.
    pub fn least_restrictive(a: Channel, b: Channel) -> Channel {
        a.min(b)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Beta => "beta",
            Channel::Dev => "dev",
            Channel::Canary => "canary",
            Channel::Trunk => "trunk",
        }
    }

    /// Documentation tag for this channel. Stable symbols carry none.
    pub const fn doc_tag(self) -> Option<&'static str> {
        match self {
            Channel::Stable => None,
            Channel::Beta => Some("beta"),
            Channel::Dev | Channel::Canary | Channel::Trunk => Some("alpha"),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown channel `{s}`"))
    }
}
