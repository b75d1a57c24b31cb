//! Loading user-supplied metrics ("drivers") from dynamic libraries.

use crate::errors::{Result, driver_not_found};
use crate::metric::Metric;
use libloading::{Library, Symbol};
use log::info;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};

/// Name of the constructor symbol a driver library must export.
pub const DRIVER_SYMBOL: &[u8] = b"driver";

/// Signature of the exported `driver` symbol.
pub type DriverEntry = unsafe fn() -> Box<dyn Metric>;

/// A metric loaded from a driver library.
///
/// Keeps the library mapped for as long as the metric is alive; the
/// metric must not outlive the code it points into.
pub struct Driver {
    metric: Box<dyn Metric>,
    _lib: Library,
}

impl Driver {
    pub fn metric(&self) -> &dyn Metric {
        self.metric.as_ref()
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("metric", &self.metric.name())
            .finish_non_exhaustive()
    }
}

/// Resolve `location` to a driver library file.
///
/// `location` may be the library itself, or a directory containing one
/// with the conventional name (`libdriver.so` and platform equivalents).
fn resolve(location: &Path) -> Result<PathBuf> {
    let path = if location.is_dir() {
        location.join(format!("{DLL_PREFIX}driver{DLL_SUFFIX}"))
    } else {
        location.to_path_buf()
    };
    if path.is_file() {
        Ok(path)
    } else {
        Err(driver_not_found(format!(
            "no driver library at {}",
            path.display()
        )))
    }
}

/// Load the metric exported as `driver` from the library at `location`.
pub fn load_driver(location: &Path) -> Result<Driver> {
    let path = resolve(location)?;
    info!("loading driver: {}", path.display());
    // The driver contract: the library exports `driver`, a constructor
    // returning a boxed Metric, and stays mapped while that value lives.
    let lib = unsafe { Library::new(&path) }
        .map_err(|e| driver_not_found(format!("cannot load {}: {e}", path.display())))?;
    let metric = {
        let entry: Symbol<DriverEntry> = unsafe { lib.get(DRIVER_SYMBOL) }.map_err(|e| {
            driver_not_found(format!(
                "{} exports no 'driver' symbol: {e}",
                path.display()
            ))
        })?;
        unsafe { entry() }
    };
    info!("loaded driver metric: {}", metric.name());
    Ok(Driver { metric, _lib: lib })
}
