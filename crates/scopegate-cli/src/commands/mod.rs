pub mod gate;
pub mod reset;

use scopegate_core::UnlockStore;

/// Resolve the flag store: an explicit directory wins, otherwise the
/// platform default under the system temp dir.
pub(crate) fn store_at(dir: Option<&str>) -> UnlockStore {
    match dir {
        Some(d) => UnlockStore::new(d),
        None => UnlockStore::at_default(),
    }
}
