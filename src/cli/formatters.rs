use chrono::NaiveDate;
use gestor_config::Config;
use gestor_core::format::{CurrencyFormatter, DateFormatter};

/// Locale-aware presentation helpers driven by the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    symbol: String,
    grouping: char,
    decimal: char,
    date_pattern: &'static str,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        let symbol = match config.currency.to_ascii_uppercase().as_str() {
            "BRL" => "R$".to_string(),
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            other => other.to_string(),
        };
        let brazilian = config.locale.to_ascii_lowercase().starts_with("pt");
        Self {
            symbol,
            grouping: if brazilian { '.' } else { ',' },
            decimal: if brazilian { ',' } else { '.' },
            date_pattern: if brazilian { "%d/%m/%Y" } else { "%Y-%m-%d" },
        }
    }
}

impl Default for CliFormatters {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: f64) -> String {
        let cents = (amount.abs() * 100.0).round();
        let whole = (cents / 100.0).trunc() as u64;
        let fraction = (cents % 100.0) as u64;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(self.grouping);
            }
            grouped.push(ch);
        }

        let sign = if amount < 0.0 && cents > 0.0 { "-" } else { "" };
        format!(
            "{sign}{} {grouped}{}{fraction:02}",
            self.symbol, self.decimal
        )
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_pattern).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_brazilian_real() {
        let fmt = CliFormatters::default();
        assert_eq!(fmt.format_amount(1234.56), "R$ 1.234,56");
        assert_eq!(fmt.format_amount(0.0), "R$ 0,00");
        assert_eq!(fmt.format_amount(-5000.0), "-R$ 5.000,00");
        assert_eq!(fmt.format_amount(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn formats_dates_day_first() {
        let fmt = CliFormatters::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(fmt.format_date(date), "07/03/2024");
    }

    #[test]
    fn other_locales_use_iso_dates_and_dot_decimals() {
        let config = Config {
            locale: "en-US".into(),
            currency: "USD".into(),
            ..Config::default()
        };
        let fmt = CliFormatters::from_config(&config);
        assert_eq!(fmt.format_amount(1234.5), "$ 1,234.50");
        assert_eq!(
            fmt.format_date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()),
            "2024-03-07"
        );
    }
}
