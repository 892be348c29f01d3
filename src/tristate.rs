// std imports
use std::fmt;
use std::str::FromStr;

// local imports
use crate::error::Error;

// ---

/// A yes/no flag with an automatic default, as found in environment variables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Auto,
    Yes,
    No,
}

impl TriState {
    fn lookup(value: &str) -> Option<Self> {
        match value {
            "" | "auto" => Some(Self::Auto),
            "1" | "y" | "yes" | "t" | "true" | "on" => Some(Self::Yes),
            "0" | "n" | "no" | "f" | "false" | "off" => Some(Self::No),
            _ => None,
        }
    }
}

impl FromStr for TriState {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::lookup(value)
            .or_else(|| Self::lookup(&value.to_lowercase()))
            .ok_or_else(|| Error::InvalidTriState {
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Yes => "yes",
            Self::No => "no",
        })
    }
}

// ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("".parse::<TriState>().unwrap(), TriState::Auto);
        assert_eq!("auto".parse::<TriState>().unwrap(), TriState::Auto);
        assert_eq!("1".parse::<TriState>().unwrap(), TriState::Yes);
        assert_eq!("y".parse::<TriState>().unwrap(), TriState::Yes);
        assert_eq!("TRUE".parse::<TriState>().unwrap(), TriState::Yes);
        assert_eq!("on".parse::<TriState>().unwrap(), TriState::Yes);
        assert_eq!("0".parse::<TriState>().unwrap(), TriState::No);
        assert_eq!("Off".parse::<TriState>().unwrap(), TriState::No);
        assert_eq!("FALSE".parse::<TriState>().unwrap(), TriState::No);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "maybe".parse::<TriState>().unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_display() {
        assert_eq!(TriState::Auto.to_string(), "auto");
        assert_eq!(TriState::Yes.to_string(), "yes");
        assert_eq!(TriState::No.to_string(), "no");
        assert_eq!(TriState::default(), TriState::Auto);
    }
}
