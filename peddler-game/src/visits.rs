//! Per-location visit counter driving the rotation cadence.

use crate::store::LocationStateStore;

/// Visit count currently recorded for a location; 0 when nothing is stored
/// or the store cannot be read.
pub fn current_visit<S: LocationStateStore + ?Sized>(store: &S, location: &str) -> u32 {
    match store.visit_count(location) {
        Ok(count) => count.unwrap_or(0),
        Err(err) => {
            log::warn!("visit count for {location} unreadable, treating as unvisited: {err}");
            0
        }
    }
}

/// Increment and persist the visit count for a location, returning the new
/// value. The first visit returns 1.
///
/// # Errors
///
/// Returns an error if the new count cannot be persisted.
pub fn next_visit<S: LocationStateStore + ?Sized>(
    store: &mut S,
    location: &str,
) -> Result<u32, S::Error> {
    let visit = current_visit(&*store, location).saturating_add(1);
    store.set_visit_count(location, visit)?;
    log::debug!("visit {visit} recorded for {location}");
    Ok(visit)
}
