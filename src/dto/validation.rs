//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::state::session::{MAX_CONTENT_RANGE, MAX_ROUNDS_LIMIT};

/// Validates that at least one content range is selected and that every
/// selected range is within the supported bounds.
pub fn validate_ranges(ranges: &[u8]) -> Result<(), ValidationError> {
    if ranges.is_empty() {
        let mut err = ValidationError::new("ranges_empty");
        err.message = Some("Select at least one content range".into());
        return Err(err);
    }

    if let Some(out_of_bounds) = ranges
        .iter()
        .find(|range| **range == 0 || **range > MAX_CONTENT_RANGE)
    {
        let mut err = ValidationError::new("range_out_of_bounds");
        err.message = Some(
            format!("Content range {out_of_bounds} is outside 1..={MAX_CONTENT_RANGE}").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that the configured round count stays within 1..=12.
pub fn validate_rounds(rounds: u8) -> Result<(), ValidationError> {
    if rounds == 0 || rounds > MAX_ROUNDS_LIMIT {
        let mut err = ValidationError::new("rounds_out_of_bounds");
        err.message =
            Some(format!("Round count must be between 1 and {MAX_ROUNDS_LIMIT}").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_selections() {
        assert!(validate_ranges(&[1]).is_ok());
        assert!(validate_ranges(&[1, 4, 8]).is_ok());
        assert!(validate_rounds(1).is_ok());
        assert!(validate_rounds(12).is_ok());
    }

    #[test]
    fn rejects_empty_or_out_of_bounds_ranges() {
        assert!(validate_ranges(&[]).is_err());
        assert!(validate_ranges(&[0]).is_err());
        assert!(validate_ranges(&[1, 9]).is_err());
    }

    #[test]
    fn rejects_round_counts_outside_bounds() {
        assert!(validate_rounds(0).is_err());
        assert!(validate_rounds(13).is_err());
    }
}
