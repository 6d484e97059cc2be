//! Formatting helpers for terminal output.

/// Format a currency amount with thousands separators: 245680 -> "$245,680.00"
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}${}.{}", sign, grouped, cents)
}

/// Format a 0..1 ratio as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Pad or truncate to an exact display width, adding ellipsis when cut
pub fn fit(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        format!("{:<width$}", s, width = width)
    } else if width <= 3 {
        s.chars().take(width).collect()
    } else {
        let truncated: String = s.chars().take(width - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(780.5), "$780.50");
        assert_eq!(format_amount(1250.0), "$1,250.00");
        assert_eq!(format_amount(245680.0), "$245,680.00");
        assert_eq!(format_amount(1234567.891), "$1,234,567.89");
        assert_eq!(format_amount(-87320.5), "-$87,320.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.25), "25.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(1.0), "100.0%");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("John", 6), "John  ");
        assert_eq!(fit("Sarah Johnson", 8), "Sarah...");
        assert_eq!(fit("Hi", 2), "Hi");
        assert_eq!(fit("Hello", 2), "He");
    }
}
