/// SI prefixes from yocto to yotta, ascending.
const PREFIXES: [(f64, &str); 17] = [
    (1e-24, "y"),
    (1e-21, "z"),
    (1e-18, "a"),
    (1e-15, "f"),
    (1e-12, "p"),
    (1e-9, "n"),
    (1e-6, "µ"),
    (1e-3, "m"),
    (1e0, ""),
    (1e3, "k"),
    (1e6, "M"),
    (1e9, "G"),
    (1e12, "T"),
    (1e15, "P"),
    (1e18, "E"),
    (1e21, "Z"),
    (1e24, "Y"),
];

/// Format `value` with the largest SI prefix not exceeding its magnitude.
///
/// `format_with_prefix(2.4e6, "W/m^2", 2)` gives `"2.40 MW/m^2"`. Zero and
/// non-finite values use no prefix; magnitudes below yocto use yocto.
pub fn format_with_prefix(value: f64, unit: &str, decimals: usize) -> String {
    let magnitude = value.abs();
    let (factor, prefix) = if magnitude == 0.0 || !magnitude.is_finite() {
        (1.0, "")
    } else {
        PREFIXES
            .iter()
            .rev()
            .find(|(f, _)| magnitude >= *f)
            .copied()
            .unwrap_or(PREFIXES[0])
    };
    format!("{:.*} {}{}", decimals, value / factor, prefix, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_largest_fitting_prefix() {
        assert_eq!(format_with_prefix(2.4e6, "W/m^2", 2), "2.40 MW/m^2");
        assert_eq!(format_with_prefix(1_000.0, "m", 1), "1.0 km");
        assert_eq!(format_with_prefix(999.0, "m", 0), "999 m");
        assert_eq!(format_with_prefix(0.0125, "s", 1), "12.5 ms");
        assert_eq!(format_with_prefix(3.2e-6, "J", 1), "3.2 µJ");
    }

    #[test]
    fn keeps_the_sign() {
        assert_eq!(format_with_prefix(-7_500.0, "m/s", 2), "-7.50 km/s");
    }

    #[test]
    fn edge_values() {
        assert_eq!(format_with_prefix(0.0, "K", 1), "0.0 K");
        assert_eq!(format_with_prefix(5e-30, "m", 0), "0 ym");
        assert_eq!(format_with_prefix(4.2e20, "J", 0), "420 EJ");
        assert_eq!(format_with_prefix(3e27, "J", 0), "3000 YJ");
        assert_eq!(format_with_prefix(f64::INFINITY, "W", 0), "inf W");
    }
}
