use std::path::Path;

use sysinfo::Disks;

use super::MetricFault;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl DiskUsage {
    /// `df`-style accounting: blocks reserved for root are free, not used.
    pub fn from_blocks(blocks: u64, free_blocks: u64, fragment_size: u64) -> Self {
        Self {
            used_bytes: blocks.saturating_sub(free_blocks).saturating_mul(fragment_size),
            total_bytes: blocks.saturating_mul(fragment_size),
        }
    }
}

/// Used/total bytes of the filesystem mounted exactly at `mount`.
pub fn disk_usage(mount: &str) -> Result<DiskUsage, MetricFault> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new(mount))
        .ok_or_else(|| MetricFault::MountNotFound(mount.to_string()))?;

    #[cfg(unix)]
    return statvfs_usage(disk.mount_point());

    #[cfg(not(unix))]
    {
        let total_bytes = disk.total_space();
        Ok(DiskUsage {
            used_bytes: total_bytes.saturating_sub(disk.available_space()),
            total_bytes,
        })
    }
}

#[cfg(unix)]
fn statvfs_usage(path: &Path) -> Result<DiskUsage, MetricFault> {
    let stat = rustix::fs::statvfs(path)
        .map_err(|e| MetricFault::MountNotFound(format!("{}: {e}", path.display())))?;
    Ok(DiskUsage::from_blocks(stat.f_blocks, stat.f_bfree, stat.f_frsize))
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}
