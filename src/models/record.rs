//! Raw per-unit snapshot records and the flag annotation enum.

use serde::{Deserialize, Serialize};

/// Operator-assigned categorical annotation on a (day, unit) cell.
///
/// The integer wire values are fixed by the persisted documents. `WholeModel`
/// (9) is special: applying it to one unit applies it to every unit of the
/// same model for that day, and clearing a unit that currently carries it
/// clears the whole model as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Flag {
    /// Explicitly cleared (0).
    Cleared,
    /// "Setting 4/5/6" band (4).
    Setting456,
    /// "Setting 5/6" band (5).
    Setting56,
    /// "Setting 6" (6).
    Setting6,
    /// Applies to every unit of the model (9).
    WholeModel,
}

/// Error for integer values outside the flag vocabulary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown flag value {0}")]
pub struct UnknownFlag(pub u8);

impl TryFrom<u8> for Flag {
    type Error = UnknownFlag;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Flag::Cleared),
            4 => Ok(Flag::Setting456),
            5 => Ok(Flag::Setting56),
            6 => Ok(Flag::Setting6),
            9 => Ok(Flag::WholeModel),
            other => Err(UnknownFlag(other)),
        }
    }
}

impl From<Flag> for u8 {
    fn from(f: Flag) -> u8 {
        match f {
            Flag::Cleared => 0,
            Flag::Setting456 => 4,
            Flag::Setting56 => 5,
            Flag::Setting6 => 6,
            Flag::WholeModel => 9,
        }
    }
}

/// One unit's measurement for one calendar day.
///
/// `unit_key` is the stable document key the persistence layer addresses a
/// unit by; it is unique within one day's snapshot. `unit_number` is the
/// physical cabinet label shown on the floor, `model_name` the machine model
/// the cabinet currently hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUnitRecord {
    pub unit_key: String,
    pub unit_number: String,
    pub model_name: String,
    /// Signed daily metric; `None` means the unit reported no data that day.
    pub diff: Option<i64>,
    /// Persisted annotation; `None` means unflagged.
    pub flag: Option<Flag>,
}

impl RawUnitRecord {
    /// Row identity used by the per-unit view: cabinet label plus model.
    ///
    /// A cabinet that swaps model mid-history intentionally becomes a new
    /// row; only the identity present on the latest day survives the
    /// latest-day filter.
    pub fn row_id(&self) -> String {
        format!("{}_{}", self.unit_number, self.model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wire_values() {
        for (flag, wire) in [
            (Flag::Cleared, 0u8),
            (Flag::Setting456, 4),
            (Flag::Setting56, 5),
            (Flag::Setting6, 6),
            (Flag::WholeModel, 9),
        ] {
            assert_eq!(u8::from(flag), wire);
            assert_eq!(Flag::try_from(wire).unwrap(), flag);
        }
    }

    #[test]
    fn test_flag_rejects_unknown() {
        assert!(Flag::try_from(1).is_err());
        assert!(Flag::try_from(7).is_err());
        assert!(Flag::try_from(255).is_err());
    }

    #[test]
    fn test_flag_serde_is_integer() {
        let json = serde_json::to_string(&Flag::WholeModel).unwrap();
        assert_eq!(json, "9");
        let back: Flag = serde_json::from_str("6").unwrap();
        assert_eq!(back, Flag::Setting6);
    }

    #[test]
    fn test_row_id_composite() {
        let rec = RawUnitRecord {
            unit_key: "k1".to_string(),
            unit_number: "101".to_string(),
            model_name: "Juggler".to_string(),
            diff: Some(1200),
            flag: None,
        };
        assert_eq!(rec.row_id(), "101_Juggler");
    }
}
