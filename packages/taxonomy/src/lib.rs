#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical UCR offense and state taxonomy.
//!
//! Defines the closed sets of offense types and state codes that the
//! forecast tools accept, along with normalization from free-form user
//! input (aliases, underscore variants, case/whitespace noise) into the
//! canonical form used in upstream API paths.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The offense types covered by the UCR forecasting models.
///
/// The canonical string form is hyphenated lower-case (e.g.
/// `"motor-vehicle-theft"`), which is also the path segment used by the
/// prediction service and the FBI Crime Data Explorer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Offense {
    /// All violent crimes combined (murder, rape, robbery, assault)
    ViolentCrime,
    /// All property crimes combined (burglary, theft, vehicle theft)
    PropertyCrime,
    /// Murder and non-negligent manslaughter
    Homicide,
    /// Unlawful entry to commit felony
    Burglary,
    /// Theft or attempted theft of motor vehicles
    MotorVehicleTheft,
}

impl Offense {
    /// All offenses, in canonical listing order.
    pub const ALL: &[Self] = &[
        Self::ViolentCrime,
        Self::PropertyCrime,
        Self::Homicide,
        Self::Burglary,
        Self::MotorVehicleTheft,
    ];

    /// Human-readable display name (e.g. `"Motor Vehicle Theft"`).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ViolentCrime => "Violent Crime",
            Self::PropertyCrime => "Property Crime",
            Self::Homicide => "Homicide",
            Self::Burglary => "Burglary",
            Self::MotorVehicleTheft => "Motor Vehicle Theft",
        }
    }

    /// Short name used in compact listings (e.g. the compare tool's model
    /// footer): `"-crime"` suffix dropped, hyphens replaced with spaces.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::ViolentCrime => "violent",
            Self::PropertyCrime => "property",
            Self::Homicide => "homicide",
            Self::Burglary => "burglary",
            Self::MotorVehicleTheft => "motor vehicle theft",
        }
    }

    /// Comma-separated canonical names, for error messages.
    #[must_use]
    pub fn valid_list() -> String {
        let mut names: Vec<String> = Self::ALL.iter().map(ToString::to_string).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

/// States with state-level model coverage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum StateCode {
    /// California
    Ca,
    /// Texas
    Tx,
    /// Florida
    Fl,
    /// New York
    Ny,
    /// Illinois
    Il,
}

impl StateCode {
    /// All supported states, in canonical listing order.
    pub const ALL: &[Self] = &[Self::Ca, Self::Tx, Self::Fl, Self::Ny, Self::Il];

    /// Full state name for display (e.g. `"California"`).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ca => "California",
            Self::Tx => "Texas",
            Self::Fl => "Florida",
            Self::Ny => "New York",
            Self::Il => "Illinois",
        }
    }

    /// Comma-separated valid codes, for error messages.
    #[must_use]
    pub fn valid_list() -> String {
        let mut codes: Vec<String> = Self::ALL.iter().map(ToString::to_string).collect();
        codes.sort_unstable();
        codes.join(", ")
    }
}

/// Errors from normalizing free-form offense/state input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The input matched neither a canonical offense nor a known alias.
    #[error(
        "Unknown offense type: '{input}'. Valid options are: {valid}. \
         Tip: Use hyphens instead of underscores (e.g., 'violent-crime' not 'violent_crime')."
    )]
    UnknownOffense {
        /// The rejected input, as provided.
        input: String,
        /// Comma-separated canonical offense names.
        valid: String,
    },

    /// The input is not a supported 2-letter state code.
    #[error(
        "Unknown state code: '{input}'. Valid options are: {valid}. \
         Use 2-letter state codes (e.g., 'CA' for California)."
    )]
    UnknownState {
        /// The rejected input, as provided.
        input: String,
        /// Comma-separated valid state codes.
        valid: String,
    },
}

/// Maps a known offense alias to its canonical form.
///
/// The input must already be lower-cased and trimmed. Returns `None` for
/// anything outside the alias table.
#[must_use]
fn resolve_alias(cleaned: &str) -> Option<Offense> {
    Some(match cleaned {
        "violent_crime" | "violentcrime" | "violent" | "violent crime" => Offense::ViolentCrime,
        "property_crime" | "propertycrime" | "property" | "property crime" => {
            Offense::PropertyCrime
        }
        "murder" | "homicides" => Offense::Homicide,
        "burglaries" | "break-in" | "breaking-and-entering" => Offense::Burglary,
        "motor_vehicle_theft" | "motorvehicletheft" | "motor vehicle theft" | "vehicle-theft"
        | "vehicle theft" | "car-theft" | "car theft" | "auto-theft" | "mvt" => {
            Offense::MotorVehicleTheft
        }
        _ => return None,
    })
}

/// Normalizes a free-form offense name to its canonical form.
///
/// Lower-cases and trims the input, then checks the canonical set followed
/// by the alias table. Pure and deterministic; performs no I/O.
///
/// # Errors
///
/// Returns [`NormalizeError::UnknownOffense`] if the input matches neither.
pub fn normalize_offense(input: &str) -> Result<Offense, NormalizeError> {
    let cleaned = input.trim().to_lowercase();

    if let Ok(offense) = Offense::from_str(&cleaned) {
        return Ok(offense);
    }

    resolve_alias(&cleaned).ok_or_else(|| NormalizeError::UnknownOffense {
        input: input.to_string(),
        valid: Offense::valid_list(),
    })
}

/// Normalizes an optional free-form state code.
///
/// `None` passes through unmodified; otherwise the input is upper-cased,
/// trimmed, and checked against the supported set.
///
/// # Errors
///
/// Returns [`NormalizeError::UnknownState`] if the input is not a supported
/// state code.
pub fn normalize_state(input: Option<&str>) -> Result<Option<StateCode>, NormalizeError> {
    let Some(input) = input else {
        return Ok(None);
    };

    let cleaned = input.trim().to_uppercase();

    StateCode::from_str(&cleaned)
        .map(Some)
        .map_err(|_| NormalizeError::UnknownState {
            input: input.to_string(),
            valid: StateCode::valid_list(),
        })
}
