//! Attaching the UI tree to the host page.

use crate::{
    app::{App, AppProps},
    config::AppConfig,
};
use log::debug;
use std::{
    rc::Rc,
    sync::atomic::{AtomicBool, Ordering},
};
use yew::AppHandle;

/// Id of the element the `App` tree is rendered into.
pub const MOUNT_POINT_ID: &str = "app";

static MOUNTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("no global `window`, the environment is not supported")]
    NoWindow,
    #[error("no `document` attached to the window")]
    NoDocument,
    #[error("cannot read page location - {0}")]
    Location(String),
    #[error("mount point `#{0}` not found in the page")]
    MountPointMissing(String),
    #[error("the UI is already mounted")]
    AlreadyMounted,
}

/// Mounts the UI into [`MOUNT_POINT_ID`].
pub fn mount(config: AppConfig) -> Result<AppHandle<App>, BootstrapError> {
    mount_at(MOUNT_POINT_ID, config)
}

/// Mounts the UI into the element with the given id.
///
/// Only one tree may be mounted per page: a second call fails with
/// [`BootstrapError::AlreadyMounted`] and leaves the first tree in place.
pub fn mount_at(element_id: &str, config: AppConfig) -> Result<AppHandle<App>, BootstrapError> {
    let document = web_sys::window()
        .ok_or(BootstrapError::NoWindow)?
        .document()
        .ok_or(BootstrapError::NoDocument)?;
    let root = document
        .get_element_by_id(element_id)
        .ok_or_else(|| BootstrapError::MountPointMissing(element_id.to_string()))?;
    if MOUNTED.swap(true, Ordering::SeqCst) {
        return Err(BootstrapError::AlreadyMounted);
    }
    debug!(
        "Mounting into #{element_id}, backend at {}, flags {:?}",
        config.base_url, config.features
    );
    Ok(yew::Renderer::<App>::with_root_and_props(
        root,
        AppProps {
            config: Rc::new(config),
        },
    )
    .render())
}
