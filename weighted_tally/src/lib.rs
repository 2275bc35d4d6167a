/*!
Weighted YES/NO tally for unit owner ballots.

Each unit of an association votes with a weight equal to its beneficial
interest. This crate computes which share of the total interest voted YES,
voted NO or did not vote, and renders those shares as percentages truncated
to two decimals.

```
use weighted_tally::*;

let rows = vec![
    VoterRow::new("0101", 60.0, "YES"),
    VoterRow::new("0102", 25.0, "NO"),
    VoterRow::new("0103", 15.0, "pending"),
];
let result = compute_tally(&rows)?;
assert_eq!(format_percentage(result.yes_fraction)?, "60.00");
assert_eq!(format_percentage(result.no_fraction)?, "25.00");
assert_eq!(format_percentage(result.non_voter_fraction)?, "15.00");
# Ok::<(), TallyErrors>(())
```

See the [manual] for the conventions used by the tally.
*/
pub mod builder;
mod config;
pub mod manual;
mod percentage;

use log::{debug, info};

pub use crate::config::*;
pub use crate::percentage::{format_percentage, Percentage};

/// Computes the weighted tally of a ballot table.
///
/// All the rows count toward the total interest, whether they voted or not.
/// The order of the rows does not matter and duplicated units are counted as
/// many times as they appear.
///
/// Fails with [TallyErrors::InvalidWeight] if the interest of a row is
/// negative or not finite, and with [TallyErrors::InterestOverflow] if the
/// weights add up to more than a `f64` can hold. A table with a total interest of zero (including
/// an empty table) is valid and returns [TallyResult::EMPTY].
pub fn compute_tally(rows: &[VoterRow]) -> Result<TallyResult, TallyErrors> {
    info!("compute_tally: Processing {:?} rows", rows.len());
    for row in rows.iter() {
        builder::check_interest(row)?;
    }

    let total_interest = interest_of(rows.iter());
    if !total_interest.is_finite() {
        return Err(TallyErrors::InterestOverflow);
    }
    if total_interest == 0.0 {
        debug!("compute_tally: no interest in the table");
        return Ok(TallyResult::EMPTY);
    }

    let voted_interest = interest_of(rows.iter().filter(|r| r.vote.is_cast()));
    let yes_interest = interest_of(rows.iter().filter(|r| r.vote == BallotChoice::Yes));
    // Filtered on the NO token: anything unrecognized stays with the non-voters.
    let no_interest = interest_of(rows.iter().filter(|r| r.vote == BallotChoice::No));
    let non_voter_interest = (total_interest - voted_interest).max(0.0);
    debug!(
        "compute_tally: total: {} voted: {} yes: {} no: {} non-voters: {}",
        total_interest, voted_interest, yes_interest, no_interest, non_voter_interest
    );

    // Partial sums may land one ulp above the total.
    let fraction = |x: f64| (x / total_interest).clamp(0.0, 1.0);
    let res = TallyResult {
        yes_fraction: fraction(yes_interest),
        no_fraction: fraction(no_interest),
        non_voter_fraction: fraction(non_voter_interest),
        total_interest,
        yes_interest,
        no_interest,
        non_voter_interest,
    };
    info!(
        "compute_tally: yes: {} no: {} non-voters: {}",
        res.yes_fraction, res.no_fraction, res.non_voter_fraction
    );
    Ok(res)
}

// Starts from +0.0 so that an empty sum does not display as "-0".
fn interest_of<'a>(rows: impl Iterator<Item = &'a VoterRow>) -> f64 {
    rows.fold(0.0, |acc, r| acc + r.beneficial_interest)
}
