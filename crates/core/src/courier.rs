//! Courier registry.
//!
//! The set of couriers is closed: every supported code is a variant of
//! [`Courier`], tagged with the services the remote API offers for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A courier supported by the RajaOngkir API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Courier {
    /// POS Indonesia
    Pos,
    /// Lion Parcel
    Lion,
    /// Ninja Xpress
    Ninja,
    /// ID Express
    Ide,
    /// SiCepat Express
    Sicepat,
    /// SAP Express
    Sap,
    /// Royal Express Indonesia
    Rex,
    /// Sentral Cargo
    Sentral,
    /// Jalur Nugraha Ekakurir
    Jne,
    /// Citra Van Titipan Kilat
    Tiki,
    /// Wahana Prestasi Logistik
    Wahana,
    /// J&T Express
    Jnt,
}

struct Capabilities {
    international: bool,
    tracking: bool,
}

impl Courier {
    /// Every courier, in registry order.
    pub const ALL: [Courier; 12] = [
        Courier::Pos,
        Courier::Lion,
        Courier::Ninja,
        Courier::Ide,
        Courier::Sicepat,
        Courier::Sap,
        Courier::Rex,
        Courier::Sentral,
        Courier::Jne,
        Courier::Tiki,
        Courier::Wahana,
        Courier::Jnt,
    ];

    /// The wire code sent to the API.
    pub const fn code(self) -> &'static str {
        match self {
            Courier::Pos => "pos",
            Courier::Lion => "lion",
            Courier::Ninja => "ninja",
            Courier::Ide => "ide",
            Courier::Sicepat => "sicepat",
            Courier::Sap => "sap",
            Courier::Rex => "rex",
            Courier::Sentral => "sentral",
            Courier::Jne => "jne",
            Courier::Tiki => "tiki",
            Courier::Wahana => "wahana",
            Courier::Jnt => "jnt",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Courier::Pos => "POS Indonesia",
            Courier::Lion => "Lion Parcel",
            Courier::Ninja => "Ninja Xpress",
            Courier::Ide => "ID Express",
            Courier::Sicepat => "SiCepat Express",
            Courier::Sap => "SAP Express",
            Courier::Rex => "Royal Express Indonesia",
            Courier::Sentral => "Sentral Cargo",
            Courier::Jne => "Jalur Nugraha Ekakurir",
            Courier::Tiki => "Citra Van Titipan Kilat",
            Courier::Wahana => "Wahana Prestasi Logistik",
            Courier::Jnt => "J&T Express",
        }
    }

    const fn capabilities(self) -> Capabilities {
        match self {
            Courier::Jne | Courier::Tiki | Courier::Pos => Capabilities {
                international: true,
                tracking: true,
            },
            Courier::Sicepat
            | Courier::Sap
            | Courier::Ninja
            | Courier::Jnt
            | Courier::Wahana
            | Courier::Lion => Capabilities {
                international: false,
                tracking: true,
            },
            Courier::Ide | Courier::Rex | Courier::Sentral => Capabilities {
                international: false,
                tracking: false,
            },
        }
    }

    /// Look up a courier by its exact code.
    ///
    /// Matching is case-sensitive and does not trim, so `"JNE"` and `" jne"`
    /// are rejected.
    pub fn parse(code: &str) -> Option<Courier> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Every courier can quote domestic costs.
    pub const fn supports_domestic(self) -> bool {
        true
    }

    pub const fn supports_international(self) -> bool {
        self.capabilities().international
    }

    /// Whether the API can track waybills issued by this courier.
    pub const fn supports_tracking(self) -> bool {
        self.capabilities().tracking
    }
}

impl fmt::Display for Courier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Courier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Courier::parse(s).ok_or_else(|| Error::invalid_argument(format!("Invalid courier code: {}", s)))
    }
}

impl From<Courier> for String {
    fn from(courier: Courier) -> Self {
        courier.code().to_string()
    }
}

impl AsRef<str> for Courier {
    fn as_ref(&self) -> &str {
        self.code()
    }
}

/// Whether `code` names a registered courier.
pub fn is_valid(code: &str) -> bool {
    Courier::parse(code).is_some()
}

/// All courier codes in registry order.
pub fn all_codes() -> Vec<&'static str> {
    Courier::ALL.iter().map(|c| c.code()).collect()
}

pub fn supports_domestic(code: &str) -> bool {
    Courier::parse(code).is_some_and(Courier::supports_domestic)
}

pub fn supports_international(code: &str) -> bool {
    Courier::parse(code).is_some_and(Courier::supports_international)
}

pub fn supports_tracking(code: &str) -> bool {
    Courier::parse(code).is_some_and(Courier::supports_tracking)
}

/// Codes in `values` that are not registered, unique and in first-seen order.
pub fn invalid_codes<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut invalid: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref();
        if !is_valid(value) && !invalid.iter().any(|seen| seen == value) {
            invalid.push(value.to_string());
        }
    }
    invalid
}

/// True when `values` is non-empty and every entry is a registered code.
pub fn validate_all<S: AsRef<str>>(values: &[S]) -> bool {
    !values.is_empty() && values.iter().all(|v| is_valid(v.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_and_codes() {
        assert_eq!(
            all_codes(),
            vec!["pos", "lion", "ninja", "ide", "sicepat", "sap", "rex", "sentral", "jne", "tiki", "wahana", "jnt"]
        );
        for courier in Courier::ALL {
            assert_eq!(Courier::parse(courier.code()), Some(courier));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Courier::parse("jne"), Some(Courier::Jne));
        assert_eq!(Courier::parse("JNE"), None);
        assert_eq!(Courier::parse(" jne"), None);
        assert_eq!(Courier::parse(""), None);
        assert!("dhl".parse::<Courier>().is_err());
    }

    #[test]
    fn test_capabilities() {
        let international: Vec<_> = Courier::ALL
            .into_iter()
            .filter(|c| c.supports_international())
            .map(Courier::code)
            .collect();
        assert_eq!(international, vec!["pos", "jne", "tiki"]);

        for code in ["jne", "sicepat", "sap", "ninja", "jnt", "tiki", "wahana", "pos", "lion"] {
            assert!(supports_tracking(code), "{} should be trackable", code);
        }
        for code in ["ide", "rex", "sentral"] {
            assert!(!supports_tracking(code));
        }

        assert!(Courier::ALL.iter().all(|c| c.supports_domestic()));
        assert!(!supports_domestic("fedex"));
        assert!(!supports_international("sicepat"));
    }

    #[test]
    fn test_invalid_codes_are_unique() {
        let values = ["jne", "fedex", "JNE", "fedex", "tiki"];
        assert_eq!(invalid_codes(&values), vec!["fedex".to_string(), "JNE".to_string()]);
        assert!(!validate_all(&values));
        assert!(validate_all(&["jne", "tiki"]));
        assert!(!validate_all::<&str>(&[]));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Courier::Sicepat).unwrap();
        assert_eq!(json, "\"sicepat\"");
        let back: Courier = serde_json::from_str("\"jnt\"").unwrap();
        assert_eq!(back, Courier::Jnt);
    }
}
