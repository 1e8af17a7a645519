//! Stream operators for observable queries.

use std::future;

use anyhow::Result;
use futures::{Stream, StreamExt};

/// Suppresses consecutive `Ok` items equal to the last emitted `Ok` item.
///
/// Errors always pass through and reset the comparison, so the first
/// successful value after a failure is emitted even if it matches the
/// value seen before the failure.
pub fn distinct_until_changed<S, T>(stream: S) -> impl Stream<Item = Result<T>>
where
    S: Stream<Item = Result<T>>,
    T: PartialEq + Clone,
{
    let mut last: Option<T> = None;
    stream.filter_map(move |item| {
        let emit = match &item {
            Ok(value) if last.as_ref() == Some(value) => false,
            Ok(value) => {
                last = Some(value.clone());
                true
            }
            Err(_) => {
                last = None;
                true
            }
        };
        future::ready(emit.then_some(item))
    })
}
