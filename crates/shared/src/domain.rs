use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! closed_set {
    ($name:ident, $what:literal, { $($variant:ident => $wire:literal, $label:literal;)+ }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Human-facing label shown next to the choice.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownChoice {
                        kind: $what,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

closed_set!(ProjectType, "project type", {
    Ios => "ios", "iOS App";
    Web => "web", "Web Platform";
    Design => "design", "UI/UX Design";
    Other => "other", "Other";
});

closed_set!(Budget, "budget", {
    Under5k => "<5k", "<5k USD";
    From5kTo10k => "5k-10k", "5k-10k USD";
    From10kTo25k => "10k-25k", "10k-25k USD";
    Over25k => ">25k", ">25k USD";
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_closed_sets() {
        let names: Vec<_> = ProjectType::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["ios", "web", "design", "other"]);
        let names: Vec<_> = Budget::ALL.iter().map(|b| b.as_str()).collect();
        assert_eq!(names, ["<5k", "5k-10k", "10k-25k", ">25k"]);
    }

    #[test]
    fn parses_and_serializes_with_wire_names() {
        assert_eq!("5k-10k".parse::<Budget>(), Ok(Budget::From5kTo10k));
        assert_eq!(
            serde_json::to_string(&Budget::Over25k).expect("json"),
            "\">25k\""
        );
        let err = "android".parse::<ProjectType>().expect_err("not in set");
        assert_eq!(err.to_string(), "unknown project type: 'android'");
    }
}
