/// Format a raw byte count into a human-readable string: "12.5 MB"
pub fn fmt_bytes(bytes: u64) -> String {
    const UNITS: &[(f64, &str)] = &[
        (1_099_511_627_776.0, "TB"),
        (1_073_741_824.0, "GB"),
        (1_048_576.0, "MB"),
        (1_024.0, "KB"),
    ];
    let b = bytes as f64;
    for &(scale, unit) in UNITS {
        if b >= scale {
            return format!("{:.1} {}", b / scale, unit);
        }
    }
    format!("{:.0} B", b)
}

/// Format a percentage without decimals: "84%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.0}%", pct)
}
