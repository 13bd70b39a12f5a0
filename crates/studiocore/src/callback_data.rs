//! Building callback identifiers for inline buttons
//!
//! Telegram rejects a whole keyboard if any button's `callback_data` is over
//! 64 bytes, so identifiers are built through here rather than `format!`.

use itertools::Itertools;
use std::fmt::Display;

use crate::error::{RouterError, RouterResult};

/// Maximum `callback_data` length accepted by Telegram, in bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Separator between identifier parts (`project_details_42`)
pub const SEPARATOR: &str = "_";

/// Joins `parts` with [`SEPARATOR`] and checks the result fits.
///
/// # Example
///
/// ```
/// use studiocore::callback_data;
///
/// assert_eq!(callback_data::build(["project", "details", "42"]).unwrap(), "project_details_42");
/// ```
pub fn build<I, P>(parts: I) -> RouterResult<String>
where
    I: IntoIterator<Item = P>,
    P: Display,
{
    let data = parts.into_iter().join(SEPARATOR);
    validate(&data)?;
    Ok(data)
}

/// Checks that `data` fits into Telegram's limit.
pub fn validate(data: &str) -> RouterResult<()> {
    if data.len() > MAX_CALLBACK_DATA_LEN {
        return Err(RouterError::CallbackDataTooLong {
            data: data.to_string(),
            len: data.len(),
            limit: MAX_CALLBACK_DATA_LEN,
        });
    }
    Ok(())
}
