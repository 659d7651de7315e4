use common::{Error, Result};

/// Formats amounts the way an en-US currency number format does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    code: String,
    prefix: String,
    fraction_digits: usize,
}

impl CurrencyFormatter {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::ChartError(format!("Invalid currency code: {}", code)));
        }

        let prefix = match code.as_str() {
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            other => format!("{}\u{a0}", other),
        };

        let fraction_digits = match code.as_str() {
            "JPY" | "KRW" => 0,
            _ => 2,
        };

        Ok(Self {
            code,
            prefix,
            fraction_digits,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn format(&self, value: f64) -> String {
        let sign = if value.is_sign_negative() && value != 0.0 { "-" } else { "" };

        if value.is_nan() {
            return format!("{}NaN", self.prefix);
        }
        if value.is_infinite() {
            return format!("{}{}∞", sign, self.prefix);
        }

        let fixed = format!("{:.*}", self.fraction_digits, value.abs());
        let (integer, fraction) = match fixed.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut out = format!("{}{}{}", sign, self.prefix, group_thousands(integer));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }

    /// Tooltip line for a series value, e.g. `Price: $1,234.50`
    pub fn tooltip_label(&self, label: &str, value: Option<f64>) -> String {
        let mut out = String::from(label);
        if !out.is_empty() {
            out.push_str(": ");
        }
        if let Some(value) = value {
            out.push_str(&self.format(value));
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
