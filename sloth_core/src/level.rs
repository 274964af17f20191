//! Level lookup from cumulative XP.

use crate::{Error, Result};

/// XP needed to leave each level, ascending
pub const LEVEL_BREAKPOINTS: [i64; 21] = [
    250, 500, 2000, 3750, 5750, 8250, 11000, 14250, 17750, 21750, 26000, 30750, 35750, 41250,
    47000, 53250, 59750, 66750, 74000, 82250, 90750,
];

/// Highest XP a level can be computed for
pub const MAX_SUPPORTED_XP: i64 = LEVEL_BREAKPOINTS[LEVEL_BREAKPOINTS.len() - 1];

/// Level for a cumulative XP total
///
/// Level is one plus the number of breakpoints already reached, so 0 XP is
/// level 1, 250 XP is level 2 and 90750 XP is level 22. Negative XP or XP
/// past the last breakpoint is an error rather than a clamped level.
pub fn level_for(xp: i64) -> Result<u32> {
    if xp < 0 {
        return Err(Error::CorruptedState(format!("negative XP ({})", xp)));
    }
    if xp > MAX_SUPPORTED_XP {
        return Err(Error::UnsupportedXp(xp));
    }

    let reached = LEVEL_BREAKPOINTS.partition_point(|&b| b <= xp);
    Ok(reached as u32 + 1)
}

/// XP still needed for the next level, `None` once the table runs out
pub fn xp_to_next_level(xp: i64) -> Option<i64> {
    LEVEL_BREAKPOINTS
        .iter()
        .find(|&&b| b > xp)
        .map(|b| b - xp.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for(0).unwrap(), 1);
        assert_eq!(level_for(249).unwrap(), 1);
        assert_eq!(level_for(250).unwrap(), 2);
        assert_eq!(level_for(1999).unwrap(), 3);
        assert_eq!(level_for(2000).unwrap(), 4);
        assert_eq!(level_for(90749).unwrap(), 21);
        assert_eq!(level_for(90750).unwrap(), 22);
    }

    #[test]
    fn test_level_beyond_table_fails() {
        assert!(matches!(level_for(90751), Err(Error::UnsupportedXp(90751))));
    }

    #[test]
    fn test_negative_xp_is_corruption() {
        assert!(matches!(level_for(-1), Err(Error::CorruptedState(_))));
    }

    #[test]
    fn test_xp_to_next_level() {
        assert_eq!(xp_to_next_level(0), Some(250));
        assert_eq!(xp_to_next_level(250), Some(250));
        assert_eq!(xp_to_next_level(90000), Some(750));
        assert_eq!(xp_to_next_level(90750), None);
    }
}
