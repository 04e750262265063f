mod config;
mod error;
mod ops;
mod util;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use util::human::{fmt_bytes, fmt_pct};

#[derive(Parser, Debug)]
#[command(name = "fskit", about = "Shell-style filesystem and rescue helpers", version = "0.1")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount a partition (read-only unless --rw)
    Mount {
        partition: String,
        target: String,

        /// Filesystem type, passed as mount -t
        #[arg(short = 't', long)]
        fs_type: Option<String>,

        /// Extra mount options, passed as mount -o
        #[arg(short, long)]
        options: Option<String>,

        /// Mount read-write
        #[arg(long)]
        rw: bool,
    },

    /// Unmount a target
    Umount { target: PathBuf },

    /// List mounted filesystems with usage
    Mounts {
        /// Include pseudo-filesystems (proc, sysfs, ...)
        #[arg(short, long)]
        all: bool,

        /// Print a JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print lines of a file matching a regular expression
    Grep {
        pattern: String,
        file: PathBuf,

        /// Keep only the last N matches
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// Print a file, or only its tail
    Cat {
        file: PathBuf,

        /// Print only the last N lines
        #[arg(short = 'n', long)]
        tail: Option<usize>,
    },

    /// Pack a directory tree into a gzip tarball
    Archive { root: PathBuf, archive: PathBuf },

    /// Copy a file or a directory tree
    Copy { src: PathBuf, dst: PathBuf },

    /// MD5 checksum of a file or (recursively) a directory
    Md5 {
        path: PathBuf,

        /// Print a JSON snapshot instead of the md5sum line
        #[arg(long)]
        json: bool,
    },

    /// Parse a shell-style key=value config file
    Config {
        file: PathBuf,

        /// Print a single key instead of the whole file
        #[arg(short, long)]
        get: Option<String>,

        /// Value printed when --get finds nothing
        #[arg(short, long, default_value = "")]
        default: String,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();

    let cli = Cli::parse();
    let cfg = config::Config::load();

    match cli.command {
        Command::Mount { partition, target, fs_type, options, rw } => {
            let read_only = !rw && cfg.mount.read_only;
            ops::mount::mount(&partition, &target, fs_type.as_deref(), options.as_deref(), read_only)?;
            Ok(())
        }
        Command::Umount { target } => run_umount(&target),
        Command::Mounts { all, json } => run_mounts(all, json),
        Command::Grep { pattern, file, last } => run_grep(&pattern, &file, last),
        Command::Cat { file, tail } => run_cat(&file, tail),
        Command::Archive { root, archive } => run_archive(&root, &archive, &cfg.walk.exclude),
        Command::Copy { src, dst } => run_copy(&src, &dst, &cfg.walk.exclude),
        Command::Md5 { path, json } => run_md5(&path, json, &cfg.walk.exclude),
        Command::Config { file, get, default } => run_config(&file, get.as_deref(), &default),
    }
}

fn run_umount(target: &Path) -> Result<()> {
    if !ops::mount::is_mounted(target)? {
        bail!("{} is not mounted", target.display());
    }
    ops::mount::umount(&target.to_string_lossy())?;
    Ok(())
}

fn run_mounts(all: bool, json: bool) -> Result<()> {
    let mounts = ops::mount::read_mounts(all)?;

    if json {
        use serde_json::{json, Value};
        let entries: Vec<Value> = mounts.iter().map(|m| {
            json!({
                "device":     m.device,
                "mountpoint": m.target,
                "fstype":     m.fs_type,
                "total":      m.total_bytes,
                "used":       m.used_bytes,
                "avail":      m.avail_bytes,
                "total_hr":   fmt_bytes(m.total_bytes),
                "used_hr":    fmt_bytes(m.used_bytes),
                "avail_hr":   fmt_bytes(m.avail_bytes),
                "use_pct":    m.use_pct(),
            })
        }).collect();
        let snapshot = json!({
            "fskit_version": "0.1",
            "timestamp": chrono::Local::now().to_rfc3339(),
            "mounts": entries,
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{:<28} {:<24} {:<10} {:>9} {:>9} {:>9} {:>5}",
        "MOUNT", "DEVICE", "TYPE", "SIZE", "USED", "AVAIL", "USE%");
    for m in &mounts {
        println!("{:<28} {:<24} {:<10} {:>9} {:>9} {:>9} {:>5}",
            m.target,
            m.device,
            m.fs_type,
            fmt_bytes(m.total_bytes),
            fmt_bytes(m.used_bytes),
            fmt_bytes(m.avail_bytes),
            fmt_pct(m.use_pct()),
        );
    }
    Ok(())
}

fn run_grep(pattern: &str, file: &Path, last: Option<usize>) -> Result<()> {
    match last {
        Some(0) => bail!("--last must be at least 1"),
        Some(n) => {
            for line in ops::grep::grep_last(file, pattern, n)? {
                println!("{}", line);
            }
        }
        None => print!("{}", ops::grep::grep(file, pattern)?),
    }
    Ok(())
}

fn run_cat(file: &Path, tail: Option<usize>) -> Result<()> {
    match tail {
        Some(0) => bail!("--tail must be at least 1"),
        Some(n) => {
            for line in ops::text::tail(file, n)? {
                println!("{}", line);
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            ops::text::cat(file, &mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run_archive(root: &Path, archive: &Path, exclude: &[String]) -> Result<()> {
    let stats = ops::archive::tar_gz_dir(root, archive, exclude)?;
    println!(
        "archived {} file(s) ({}) into {}",
        stats.files,
        fmt_bytes(stats.bytes),
        archive.display()
    );
    Ok(())
}

fn run_copy(src: &Path, dst: &Path, exclude: &[String]) -> Result<()> {
    if src.is_dir() {
        let stats = ops::copy::copy_tree(src, dst, exclude)?;
        println!(
            "copied {} file(s) in {} dir(s) ({})",
            stats.files,
            stats.dirs + 1,
            fmt_bytes(stats.bytes)
        );
    } else {
        let bytes = ops::copy::copy_file(src, dst)?;
        println!("copied 1 file ({})", fmt_bytes(bytes));
    }
    Ok(())
}

fn run_md5(path: &Path, json: bool, exclude: &[String]) -> Result<()> {
    let digest = if path.is_dir() {
        ops::checksum::md5_dir(path, exclude)?
    } else {
        ops::checksum::md5_file(path)?
    };

    if json {
        use serde_json::json;
        let snapshot = json!({
            "fskit_version": "0.1",
            "timestamp": chrono::Local::now().to_rfc3339(),
            "path": path.display().to_string(),
            "md5":  digest,
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}  {}", digest, path.display());
    }
    Ok(())
}

fn run_config(file: &Path, get: Option<&str>, default: &str) -> Result<()> {
    let map = ops::shell_config::parse_file(file)?;

    if let Some(key) = get {
        println!("{}", ops::shell_config::lookup_or(&map, key, default));
        return Ok(());
    }

    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        println!("{}={}", key, map[key]);
    }
    Ok(())
}
