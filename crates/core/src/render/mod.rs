pub mod analysis;
pub mod chart;
pub mod dashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Success,
    Danger,
    Warning,
}

impl Accent {
    pub fn as_str(self) -> &'static str {
        match self {
            Accent::Success => "success",
            Accent::Danger => "danger",
            Accent::Warning => "warning",
        }
    }
}

/// Rupee amount with two decimals. Both views use this one rule.
pub fn format_inr(value: f64) -> String {
    format!("₹{value:.2}")
}

pub fn format_signed_inr(value: f64) -> String {
    if value < 0.0 {
        format!("-₹{:.2}", value.abs())
    } else {
        format!("+₹{value:.2}")
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_two_decimals() {
        assert_eq!(format_inr(3500.0), "₹3500.00");
        assert_eq!(format_inr(1234.567), "₹1234.57");
        assert_eq!(format_signed_inr(12.5), "+₹12.50");
        assert_eq!(format_signed_inr(0.0), "+₹0.00");
        assert_eq!(format_signed_inr(-7.25), "-₹7.25");
    }

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(format_number(60.0), "60");
        assert_eq!(format_number(62.5), "62.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"M&M's"</b>"#),
            "&lt;b&gt;&quot;M&amp;M&#39;s&quot;&lt;/b&gt;"
        );
    }
}
