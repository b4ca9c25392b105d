/// Formats an integer with dot thousands separators
///
/// # Examples
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// assert_eq!(format_number(0), "0");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formats a monetary amount as Brazilian reais for log lines
///
/// # Examples
/// ```
/// use backend::shared::format::format_brl;
/// assert_eq!(format_brl(1234567.891), "R$ 1.234.567,89");
/// assert_eq!(format_brl(-15.5), "-R$ 15,50");
/// ```
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100) as usize;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, format_number(units), cents % 100)
}
