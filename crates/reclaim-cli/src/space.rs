//! Free-space probe backed by the system's mounted disks.

use crate::error::CliError;
use reclaim_domain::traits::SpaceProbe;
use reclaim_domain::BYTES_PER_GB;
use std::path::{Path, PathBuf};
use sysinfo::Disks;

/// Measures free space on the volume holding a path.
#[derive(Debug, Clone)]
pub struct DiskSpaceProbe {
    path: PathBuf,
}

impl DiskSpaceProbe {
    /// Probe the volume that holds `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpaceProbe for DiskSpaceProbe {
    type Error = CliError;

    fn free_space_gb(&self) -> Result<f64, CliError> {
        let path = self.path.canonicalize()?;
        let disks = Disks::new_with_refreshed_list();

        let available = available_on(disks.list().iter().map(|d| (d.mount_point(), d.available_space())), &path)
            .ok_or_else(|| CliError::Disk(format!("no mounted volume holds {}", path.display())))?;

        let free_gb = available as f64 / BYTES_PER_GB;
        tracing::debug!("{:.2} GB free on the volume holding {}", free_gb, path.display());
        Ok(free_gb)
    }
}

/// Available bytes on the mount point that is the longest prefix of `path`.
fn available_on<'a, I>(mounts: I, path: &Path) -> Option<u64>
where
    I: IntoIterator<Item = (&'a Path, u64)>,
{
    mounts
        .into_iter()
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| available)
}
