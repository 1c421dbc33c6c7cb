//! Generic "not found" error and chain-aware detection.

use std::error::Error as StdError;

use thiserror::Error;

use crate::error::Error as ChainError;

/// A resource of some category is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category} not found")]
pub struct NotFound {
    pub category: String,
}

impl NotFound {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

/// Whether the end of `err`'s `source()` chain is a [`NotFound`].
///
/// Frames and any other error exposing a source are walked through.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    let mut err = unwrap_chain_error(err);
    while let Some(next) = err.source() {
        err = unwrap_chain_error(next);
    }
    err.is::<NotFound>()
}

/// See through the [`ChainError`] enum to the value it holds.
fn unwrap_chain_error<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match err.downcast_ref::<ChainError>() {
        Some(e) => e.as_std(),
        None => err,
    }
}
