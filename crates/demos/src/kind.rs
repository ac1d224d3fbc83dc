use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which demo to build at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    Color,
    Bump,
    Normal,
    Displacement,
    Alpha,
    #[default]
    Emissive,
    Gradient,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown demo '{0}' (expected one of: color, bump, normal, displacement, alpha, emissive, gradient)")]
pub struct ParseDemoKindError(pub String);

impl DemoKind {
    pub const ALL: [DemoKind; 7] = [
        DemoKind::Color,
        DemoKind::Bump,
        DemoKind::Normal,
        DemoKind::Displacement,
        DemoKind::Alpha,
        DemoKind::Emissive,
        DemoKind::Gradient,
    ];

    pub fn id(self) -> &'static str {
        match self {
            DemoKind::Color => "color",
            DemoKind::Bump => "bump",
            DemoKind::Normal => "normal",
            DemoKind::Displacement => "displacement",
            DemoKind::Alpha => "alpha",
            DemoKind::Emissive => "emissive",
            DemoKind::Gradient => "gradient",
        }
    }

    /// Human-readable title for window and panel headers.
    pub fn title(self) -> &'static str {
        match self {
            DemoKind::Color => "Color map",
            DemoKind::Bump => "Bump map",
            DemoKind::Normal => "Normal map",
            DemoKind::Displacement => "Displacement map",
            DemoKind::Alpha => "Alpha map",
            DemoKind::Emissive => "Emissive map",
            DemoKind::Gradient => "Gradient map (toon)",
        }
    }
}

impl FromStr for DemoKind {
    type Err = ParseDemoKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        DemoKind::ALL
            .into_iter()
            .find(|k| k.id() == lower)
            .or(match lower.as_str() {
                "toon" => Some(DemoKind::Gradient),
                _ => None,
            })
            .ok_or_else(|| ParseDemoKindError(s.to_owned()))
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Bump".parse::<DemoKind>().unwrap(), DemoKind::Bump);
        assert_eq!("toon".parse::<DemoKind>().unwrap(), DemoKind::Gradient);
        assert!("specular".parse::<DemoKind>().is_err());
    }

    #[test]
    fn ids_round_trip() {
        for kind in DemoKind::ALL {
            assert_eq!(kind.to_string().parse::<DemoKind>().unwrap(), kind);
        }
    }
}
