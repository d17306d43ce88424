const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Render a byte count with binary (1024-based) units.
///
/// `rounded` drops the fraction; otherwise up to two decimals are kept and
/// trailing zeros are not printed (`1.5 KB`, `1 KB`).
#[must_use]
pub fn convert_size(size_bytes: u64, rounded: bool) -> String {
    if size_bytes == 0 {
        return "0 B".into();
    }

    let mut unit = 0;
    let mut scaled = size_bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let value = if rounded {
        scaled.round()
    } else {
        (scaled * 100.0).round() / 100.0
    };
    format!("{value} {}", SIZE_UNITS[unit])
}

/// Whole-number download percentage, or `None` when the total is unknown.
#[must_use]
pub fn progress_percent(downloaded: u64, total: Option<u64>) -> Option<u8> {
    match total {
        Some(total) if total > 0 => {
            let pct = downloaded.saturating_mul(100) / total;
            Some(pct.min(100) as u8)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes_human_readable() {
        assert_eq!(convert_size(0, false), "0 B");
        assert_eq!(convert_size(1024, false), "1 KB");
        assert_eq!(convert_size(1536, false), "1.5 KB");
        assert_eq!(convert_size(1536, true), "2 KB");
        assert_eq!(convert_size(512, true), "512 B");
        assert_eq!(convert_size(5 * 1024 * 1024, false), "5 MB");
        assert_eq!(convert_size(1_288_490_189, false), "1.2 GB");
    }

    #[test]
    fn largest_unit_is_yottabytes() {
        assert!(convert_size(u64::MAX, true).ends_with(" EB"));
        assert_eq!(SIZE_UNITS.last(), Some(&"YB"));
    }

    #[test]
    fn calculates_progress_percent() {
        assert_eq!(progress_percent(0, Some(10)), Some(0));
        assert_eq!(progress_percent(5, Some(10)), Some(50));
        assert_eq!(progress_percent(10, Some(10)), Some(100));
        assert_eq!(progress_percent(15, Some(10)), Some(100));
        assert_eq!(progress_percent(5, Some(0)), None);
        assert_eq!(progress_percent(5, None), None);
    }
}
