use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// The two physical variants of a blue/green service.
///
/// There is no "unset" variant: an absent colour is `None`
/// wherever a colour is optional, and an unknown name fails to parse.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlueGreenColour {
    Blue,
    Green,
}

impl BlueGreenColour {
    pub fn opposite(self) -> Self {
        match self {
            BlueGreenColour::Blue => BlueGreenColour::Green,
            BlueGreenColour::Green => BlueGreenColour::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlueGreenColour::Blue => "blue",
            BlueGreenColour::Green => "green",
        }
    }
}

impl fmt::Display for BlueGreenColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlueGreenColour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(BlueGreenColour::Blue),
            "green" => Ok(BlueGreenColour::Green),
            other => Err(Error::InvalidColour(other.to_owned())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentMethod {
    #[serde(rename = "rolling-upgrade")]
    RollingUpgrade,
    #[serde(rename = "bluegreen")]
    BlueGreen,
}

impl Default for DeploymentMethod {
    fn default() -> Self {
        DeploymentMethod::RollingUpgrade
    }
}

/// Internal blue/green bookkeeping.
///
/// `active` is only set on a parent service, `deployment_colour` and
/// `active_flag` only on one of its colored children.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct BlueGreenSettings {
    pub active: Option<BlueGreenColour>,
    pub deployment_colour: Option<BlueGreenColour>,
    pub active_flag: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct DeploymentSettings {
    pub method: DeploymentMethod,
    pub blue_green: Option<BlueGreenSettings>,
    pub custom_urls: BTreeMap<BlueGreenColour, Vec<String>>,
}

impl DeploymentSettings {
    pub fn blue_green(active: BlueGreenColour) -> Self {
        DeploymentSettings {
            method: DeploymentMethod::BlueGreen,
            blue_green: Some(BlueGreenSettings {
                active: Some(active),
                ..BlueGreenSettings::default()
            }),
            custom_urls: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_lookup() {
        assert_eq!("blue".parse::<BlueGreenColour>().unwrap(), BlueGreenColour::Blue);
        assert_eq!("green".parse::<BlueGreenColour>().unwrap(), BlueGreenColour::Green);
        assert!(matches!("".parse::<BlueGreenColour>(), Err(Error::InvalidColour(_))));
        assert!(matches!("Blue".parse::<BlueGreenColour>(), Err(Error::InvalidColour(_))));
    }

    #[test]
    fn test_colour_opposite() {
        assert_eq!(BlueGreenColour::Blue.opposite(), BlueGreenColour::Green);
        assert_eq!(BlueGreenColour::Green.opposite(), BlueGreenColour::Blue);
        assert_eq!(BlueGreenColour::Green.to_string(), "green");
    }

    #[test]
    fn test_deployment_method_serde() {
        let settings: DeploymentSettings =
            serde_json::from_str(r#"{"method": "bluegreen", "blue_green": {"active": "green"}}"#).unwrap();
        assert_eq!(settings.method, DeploymentMethod::BlueGreen);
        assert_eq!(settings.blue_green.unwrap().active, Some(BlueGreenColour::Green));

        let default: DeploymentSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(default.method, DeploymentMethod::RollingUpgrade);
    }
}
