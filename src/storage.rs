//! Thin helpers over the browser's local storage.
//!
//! Storage is best effort: a missing window, disabled storage or a quota
//! error is logged and otherwise ignored.

use log::warn;
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub(crate) fn read_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub(crate) fn write_item(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if let Err(error) = storage.set_item(key, value) {
            warn!("could not write \"{key}\" to local storage: {error:?}");
        }
    }
}

pub(crate) fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        if let Err(error) = storage.remove_item(key) {
            warn!("could not remove \"{key}\" from local storage: {error:?}");
        }
    }
}
