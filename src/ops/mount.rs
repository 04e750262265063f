use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Pseudo-filesystems hidden from the default mount listing.
const PSEUDO_FS: &[&str] = &[
    "proc", "sysfs", "devpts", "tmpfs", "devtmpfs", "cgroup", "cgroup2",
    "pstore", "efivarfs", "securityfs", "debugfs", "tracefs", "bpf",
    "hugetlbfs", "mqueue", "fusectl", "configfs", "binfmt_misc",
    "overlay", "nsfs", "rpc_pipefs", "autofs", "squashfs",
];

/// One mounted filesystem from /proc/mounts, with usage from statvfs.
#[derive(Debug, Clone)]
pub struct MountEntry {
    pub device:      String,
    pub target:      String,
    pub fs_type:     String,
    pub total_bytes: u64,
    pub used_bytes:  u64,
    pub avail_bytes: u64,
}

impl MountEntry {
    pub fn use_pct(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Mount `partition` at `target` via the external mount utility.
/// `fs_type` becomes `-t`, `options` an extra `-o`; `read_only` prepends
/// `-o ro`.
pub fn mount(
    partition: &str,
    target: &str,
    fs_type: Option<&str>,
    options: Option<&str>,
    read_only: bool,
) -> Result<()> {
    run("mount", &mount_args(partition, target, fs_type, options, read_only))
}

/// Unmount `target` via the external umount utility.
pub fn umount(target: &str) -> Result<()> {
    run("umount", &[target.to_string()])
}

fn mount_args(
    partition: &str,
    target: &str,
    fs_type: Option<&str>,
    options: Option<&str>,
    read_only: bool,
) -> Vec<String> {
    let mut args = Vec::new();
    if read_only {
        args.push("-o".into());
        args.push("ro".into());
    }
    if let Some(fs) = fs_type {
        args.push("-t".into());
        args.push(fs.into());
    }
    if let Some(opts) = options {
        args.push("-o".into());
        args.push(opts.into());
    }
    args.push(partition.into());
    args.push(target.into());
    args
}

fn run(command: &str, args: &[String]) -> Result<()> {
    debug!(command, ?args, "invoking external command");
    let status = Command::new(command)
        .args(args)
        .status()
        .map_err(|source| Error::Spawn { command: command.into(), source })?;
    if !status.success() {
        return Err(Error::CommandFailed { command: command.into(), status });
    }
    Ok(())
}

/// Read the current mount table. Pseudo-filesystems and loop-mounted snaps
/// are skipped unless `all` is set. Sorted by mount point.
pub fn read_mounts(all: bool) -> Result<Vec<MountEntry>> {
    let content = std::fs::read_to_string("/proc/mounts")
        .map_err(|e| Error::read("/proc/mounts", e))?;

    let mut out = Vec::new();
    for (device, target, fs_type) in parse_mounts(&content) {
        if !all {
            if PSEUDO_FS.contains(&fs_type.as_str()) { continue; }
            if device.starts_with("/dev/loop") { continue; }
        }
        let (total, used, avail) = usage_for(&target).unwrap_or((0, 0, 0));
        out.push(MountEntry {
            device,
            target,
            fs_type,
            total_bytes: total,
            used_bytes:  used,
            avail_bytes: avail,
        });
    }

    out.sort_by(|a, b| a.target.cmp(&b.target));
    Ok(out)
}

/// True when `target` is a mount point in the current mount table.
pub fn is_mounted(target: &Path) -> Result<bool> {
    let target = target.to_string_lossy();
    Ok(read_mounts(true)?.iter().any(|m| m.target == target))
}

fn parse_mounts(content: &str) -> Vec<(String, String, String)> {
    let mut v = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 { continue; }
        v.push((fields[0].to_string(), fields[1].to_string(), fields[2].to_string()));
    }
    v
}

fn usage_for(target: &str) -> Option<(u64, u64, u64)> {
    use nix::sys::statvfs::statvfs;
    let stat = statvfs(target).ok()?;

    let frsize = stat.fragment_size() as u64;
    let total_bytes = stat.blocks() * frsize;
    let avail_bytes = stat.blocks_available() * frsize;
    let free_bytes  = stat.blocks_free() * frsize;
    Some((total_bytes, total_bytes.saturating_sub(free_bytes), avail_bytes))
}
