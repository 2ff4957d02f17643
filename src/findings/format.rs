use num_bigint::BigUint;

/// Decimals of every supported chain's native coin.
pub const NATIVE_DECIMALS: u32 = 18;

/// Display symbol for a chain's native coin.
pub fn native_symbol(chain_id: u64) -> &'static str {
    match chain_id {
        1 | 10 | 42161 => "ETH",
        56 => "BNB",
        137 => "MATIC",
        250 => "FTM",
        43114 => "AVAX",
        _ => "NATIVE",
    }
}

/// Format a base-unit amount with exactly `places` decimals, rounding half up,
/// with thousands separators.
pub fn format_units_fixed(value: &BigUint, decimals: u32, places: u32) -> String {
    let scaled = if places >= decimals {
        value * BigUint::from(10u8).pow(places - decimals)
    } else {
        let divisor = BigUint::from(10u8).pow(decimals - places);
        let quotient = value / &divisor;
        let remainder = value % &divisor;
        if remainder * 2u8 >= divisor {
            quotient + 1u8
        } else {
            quotient
        }
    };
    join_parts(&scaled, places, false)
}

/// Format a base-unit amount at full precision, trailing zeros trimmed.
pub fn format_units(value: &BigUint, decimals: u32) -> String {
    join_parts(value, decimals, true)
}

fn join_parts(scaled: &BigUint, places: u32, trim: bool) -> String {
    let unit = BigUint::from(10u8).pow(places);
    let integer = group_thousands(&(scaled / &unit).to_string());
    if places == 0 {
        return integer;
    }

    let fraction = scaled % &unit;
    let mut fraction = format!("{:0>width$}", fraction.to_string(), width = places as usize);
    if trim {
        let kept = fraction.trim_end_matches('0').len();
        fraction.truncate(kept);
        if fraction.is_empty() {
            return integer;
        }
    }
    format!("{integer}.{fraction}")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Relative-time phrase for a span of seconds ("a few seconds", "3 hours", ...).
pub fn humanize_duration(seconds: u64) -> String {
    let secs = seconds as f64;
    let minutes = (secs / 60.0).round() as u64;
    let hours = (secs / 3600.0).round() as u64;
    let days = (secs / 86_400.0).round() as u64;
    let months = (secs / (86_400.0 * 30.436875)).round() as u64;
    let years = (secs / (86_400.0 * 365.2425)).round() as u64;

    if seconds <= 44 {
        "a few seconds".into()
    } else if seconds <= 89 {
        "a minute".into()
    } else if minutes <= 44 {
        format!("{minutes} minutes")
    } else if minutes <= 89 || hours <= 1 {
        "an hour".into()
    } else if hours <= 21 {
        format!("{hours} hours")
    } else if hours <= 35 || days <= 1 {
        "a day".into()
    } else if days <= 25 {
        format!("{days} days")
    } else if days <= 45 || months <= 1 {
        "a month".into()
    } else if months <= 10 {
        format!("{months} months")
    } else if months <= 17 {
        "a year".into()
    } else {
        format!("{} years", years.max(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(whole: u64) -> BigUint {
        BigUint::from(whole) * BigUint::from(10u8).pow(18)
    }

    #[test]
    fn fixed_three_places() {
        assert_eq!(format_units_fixed(&ether(4), 18, 3), "4.000");
        assert_eq!(format_units_fixed(&(ether(4) + 1u8), 18, 3), "4.000");
        assert_eq!(format_units_fixed(&ether(1_234_567), 18, 3), "1,234,567.000");
    }

    #[test]
    fn fixed_rounds_half_up() {
        let value = BigUint::parse_bytes(b"1234500000000000000", 10).unwrap();
        assert_eq!(format_units_fixed(&value, 18, 3), "1.235");
        let value = BigUint::parse_bytes(b"1234499999999999999", 10).unwrap();
        assert_eq!(format_units_fixed(&value, 18, 3), "1.234");
        let value = BigUint::parse_bytes(b"999999999999999999999", 10).unwrap();
        assert_eq!(format_units_fixed(&value, 18, 3), "1,000.000");
    }

    #[test]
    fn full_precision_trims_zeros() {
        assert_eq!(format_units(&ether(1000), 18), "1,000");
        assert_eq!(format_units(&(ether(4) + 1u8), 18), "4.000000000000000001");
        let half = BigUint::parse_bytes(b"500000000000000000", 10).unwrap();
        assert_eq!(format_units(&half, 18), "0.5");
    }

    #[test]
    fn symbols() {
        assert_eq!(native_symbol(1), "ETH");
        assert_eq!(native_symbol(137), "MATIC");
        assert_eq!(native_symbol(56), "BNB");
        assert_eq!(native_symbol(999_999), "NATIVE");
    }

    #[test]
    fn humanized_buckets() {
        assert_eq!(humanize_duration(1), "a few seconds");
        assert_eq!(humanize_duration(60), "a minute");
        assert_eq!(humanize_duration(1199), "20 minutes");
        assert_eq!(humanize_duration(3000), "an hour");
        assert_eq!(humanize_duration(3 * 3600), "3 hours");
        assert_eq!(humanize_duration(30 * 3600), "a day");
        assert_eq!(humanize_duration(5 * 86_400), "5 days");
        assert_eq!(humanize_duration(40 * 86_400), "a month");
        assert_eq!(humanize_duration(120 * 86_400), "4 months");
        assert_eq!(humanize_duration(400 * 86_400), "a year");
        assert_eq!(humanize_duration(3 * 365 * 86_400), "3 years");
    }

    #[test]
    fn humanized_bucket_edges_stay_singular() {
        // 89.5 minutes rounds past the minute bucket but to a single hour
        assert_eq!(humanize_duration(5370), "an hour");
        assert_eq!(humanize_duration(35 * 3600 + 1800), "a day");
        assert_eq!(humanize_duration(3_939_840), "a month");
        assert_eq!(humanize_duration(5400), "2 hours");
    }
}
