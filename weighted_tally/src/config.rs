// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use crate::percentage::Percentage;

/// The token for a vote in favour.
pub const YES: &str = "YES";
/// The token for a vote against.
pub const NO: &str = "NO";
/// The placeholder shown in the ballot table before an owner votes.
pub const NOT_VOTED: &str = "Click to Cast Your Vote";

/// The content of the vote cell of a ballot row.
///
/// Only the exact tokens `YES` and `NO` are cast votes. Everything else
/// (placeholders, blanks, misspellings) means that this unit did not vote,
/// and the original text is kept for reporting.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum BallotChoice {
    Yes,
    No,
    Uncast(String),
}

impl BallotChoice {
    pub fn from_token(token: &str) -> BallotChoice {
        match token {
            YES => BallotChoice::Yes,
            NO => BallotChoice::No,
            s => BallotChoice::Uncast(s.to_string()),
        }
    }

    pub fn is_cast(&self) -> bool {
        !matches!(self, BallotChoice::Uncast(_))
    }

    /// The token as it would appear in the ballot table.
    pub fn token(&self) -> &str {
        match self {
            BallotChoice::Yes => YES,
            BallotChoice::No => NO,
            BallotChoice::Uncast(s) => s.as_str(),
        }
    }
}

/// One row of the ballot table.
#[derive(PartialEq, Debug, Clone)]
pub struct VoterRow {
    /// Not used by the tally, only for reporting.
    pub unit_identifier: String,
    /// The voting weight of this unit. Must be finite and non-negative.
    pub beneficial_interest: f64,
    pub vote: BallotChoice,
}

impl VoterRow {
    pub fn new(unit_identifier: &str, beneficial_interest: f64, vote: &str) -> VoterRow {
        VoterRow {
            unit_identifier: unit_identifier.to_string(),
            beneficial_interest,
            vote: BallotChoice::from_token(vote),
        }
    }
}

// ******** Output data structures *********

/// The outcome of one tally.
///
/// The fractions are relative to the total interest of all the rows, voters
/// and non-voters together. When the total interest is zero, all the
/// fractions are zero.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct TallyResult {
    pub yes_fraction: f64,
    pub no_fraction: f64,
    pub non_voter_fraction: f64,
    pub total_interest: f64,
    pub yes_interest: f64,
    pub no_interest: f64,
    pub non_voter_interest: f64,
}

impl TallyResult {
    pub const EMPTY: TallyResult = TallyResult {
        yes_fraction: 0.0,
        no_fraction: 0.0,
        non_voter_fraction: 0.0,
        total_interest: 0.0,
        yes_interest: 0.0,
        no_interest: 0.0,
        non_voter_interest: 0.0,
    };

    /// Labelled percentages (0 to 100), in the order YES, NO, non-voters.
    ///
    /// This is the series a pie chart of the vote distribution is drawn from.
    pub fn breakdown(&self) -> Vec<(String, f64)> {
        vec![
            (YES_LABEL.to_string(), self.yes_fraction * 100.0),
            (NO_LABEL.to_string(), self.no_fraction * 100.0),
            (NON_VOTERS_LABEL.to_string(), self.non_voter_fraction * 100.0),
        ]
    }

    /// The truncated percentages for YES, NO and the non-voters.
    pub fn percentages(&self) -> Result<(Percentage, Percentage, Percentage), TallyErrors> {
        Ok((
            Percentage::from_fraction(self.yes_fraction)?,
            Percentage::from_fraction(self.no_fraction)?,
            Percentage::from_fraction(self.non_voter_fraction)?,
        ))
    }
}

pub const YES_LABEL: &str = "YES";
pub const NO_LABEL: &str = "NO";
pub const NON_VOTERS_LABEL: &str = "Non-Voters";

/// Errors that prevent a tally from being computed or displayed.
#[derive(PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// The beneficial interest of a unit is missing, not a number, negative
    /// or not finite.
    InvalidWeight { unit: String, value: String },
    /// A fraction outside of [0, 1] was given for display.
    InvalidFraction(f64),
    /// The total interest of the table is too large to be represented.
    InterestOverflow,
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::InvalidWeight { unit, value } => write!(
                f,
                "Invalid beneficial interest for unit {}: {:?}",
                unit, value
            ),
            TallyErrors::InvalidFraction(x) => {
                write!(f, "Fraction {} is not a number between 0 and 1", x)
            }
            TallyErrors::InterestOverflow => {
                write!(f, "The total beneficial interest overflows")
            }
        }
    }
}
