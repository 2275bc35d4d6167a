pub use crate::config::*;

/// A builder for assembling a ballot table from raw cells.
///
/// Cells coming from a spreadsheet or a CSV file are text. The builder
/// checks the beneficial interest of every row as it is added, so that a
/// malformed table is reported with the offending unit.
///
/// ```
/// use weighted_tally::builder::Builder;
/// # use weighted_tally::TallyErrors;
///
/// let mut builder = Builder::new();
/// builder.add_row("0101", "60", "YES")?;
/// builder.add_row("0102", "25", "NO")?;
/// builder.add_row("0103", "15", "Click to Cast Your Vote")?;
///
/// let result = builder.tally()?;
/// assert!((result.yes_fraction - 0.6).abs() < 1e-9);
///
/// # Ok::<(), TallyErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _rows: Vec<VoterRow>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder { _rows: Vec::new() }
    }

    /// Adds a row from its text cells.
    ///
    /// The interest may be surrounded by whitespace. An empty cell is a
    /// missing interest and is rejected like a non-numeric one.
    pub fn add_row(&mut self, unit: &str, interest: &str, vote: &str) -> Result<(), TallyErrors> {
        let invalid = || TallyErrors::InvalidWeight {
            unit: unit.to_string(),
            value: interest.to_string(),
        };
        let beneficial_interest: f64 = interest.trim().parse().map_err(|_| invalid())?;
        if !valid_interest(beneficial_interest) {
            return Err(invalid());
        }
        self._rows.push(VoterRow::new(unit, beneficial_interest, vote));
        Ok(())
    }

    pub fn rows(&self) -> &[VoterRow] {
        &self._rows
    }

    pub fn tally(&self) -> Result<TallyResult, TallyErrors> {
        crate::compute_tally(&self._rows)
    }
}

pub(crate) fn valid_interest(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

pub(crate) fn check_interest(row: &VoterRow) -> Result<(), TallyErrors> {
    if valid_interest(row.beneficial_interest) {
        Ok(())
    } else {
        Err(TallyErrors::InvalidWeight {
            unit: row.unit_identifier.clone(),
            value: row.beneficial_interest.to_string(),
        })
    }
}
