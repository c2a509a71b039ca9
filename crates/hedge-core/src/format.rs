//! 로케일 기반 숫자 출력.
//!
//! 시스템 로케일(`LANG`)에 따라 소수점과 천 단위 구분자를 선택합니다.

/// 결과 값을 사람이 읽을 문자열로 변환하는 포매터.
pub trait NumberFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// 소수점에 쉼표를 쓰는 언어 코드.
const COMMA_DECIMAL_LANGS: &[&str] = &[
    "ru", "uk", "be", "kk", "de", "fr", "es", "it", "pt", "nl", "pl", "cs", "sk", "fi", "sv",
    "da", "nb", "tr", "hu", "ro", "bg",
];

/// 기본 소수 자릿수.
pub const DEFAULT_PRECISION: usize = 6;

/// 로케일별 구분자를 사용하는 포매터.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFormatter {
    locale: String,
    decimal: char,
    group: Option<char>,
    precision: usize,
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::for_locale("en_US")
    }
}

impl LocaleFormatter {
    /// `ru_RU.UTF-8` 같은 로케일 문자열에서 생성합니다. 인코딩 부분은 무시합니다.
    pub fn for_locale(locale: &str) -> Self {
        let locale = locale.split('.').next().unwrap_or_default().trim().to_string();
        let lang = locale
            .split(|c| c == '_' || c == '-')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let (decimal, group) = if COMMA_DECIMAL_LANGS.contains(&lang.as_str()) {
            match lang.as_str() {
                "de" | "nl" | "it" | "es" | "pt" | "tr" | "da" | "ro" => (',', Some('.')),
                _ => (',', Some('\u{a0}')),
            }
        } else if lang.is_empty() || lang == "c" || lang == "posix" {
            ('.', None)
        } else {
            ('.', Some(','))
        };

        tracing::debug!(locale = %locale, decimal = %decimal, "Number formatter locale");

        Self {
            locale,
            decimal,
            group,
            precision: DEFAULT_PRECISION,
        }
    }

    /// `LANG` 환경 변수에서 생성합니다. 없으면 C 로케일 규칙을 사용합니다.
    pub fn from_env() -> Self {
        let lang = std::env::var("LANG").unwrap_or_default();
        Self::for_locale(&lang)
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal
    }
}

impl NumberFormatter for LocaleFormatter {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let raw = format!("{:.*}", self.precision, value.abs());
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (raw.as_str(), None),
        };

        let mut out = String::with_capacity(raw.len() + 4);
        if value.is_sign_negative() && raw.chars().any(|c| c != '0' && c != '.') {
            out.push('-');
        }

        match self.group {
            Some(sep) => {
                let digits: Vec<char> = int_part.chars().collect();
                for (i, d) in digits.iter().enumerate() {
                    if i > 0 && (digits.len() - i) % 3 == 0 {
                        out.push(sep);
                    }
                    out.push(*d);
                }
            }
            None => out.push_str(int_part),
        }

        if let Some(frac) = frac_part {
            out.push(self.decimal);
            out.push_str(frac);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_locale_uses_comma() {
        let f = LocaleFormatter::for_locale("ru_RU.UTF-8");
        assert_eq!(f.locale(), "ru_RU");
        assert_eq!(f.decimal_separator(), ',');
        assert_eq!(f.format(0.631579), "0,631579");
        assert_eq!(f.format(1234.5), "1\u{a0}234,500000");
    }

    #[test]
    fn test_english_locale_uses_dot() {
        let f = LocaleFormatter::for_locale("en_US.UTF-8");
        assert_eq!(f.decimal_separator(), '.');
        assert_eq!(f.format(-0.5), "-0.500000");
        assert_eq!(f.format(1234567.0), "1,234,567.000000");
    }

    #[test]
    fn test_c_locale_has_no_grouping() {
        let f = LocaleFormatter::for_locale("C");
        assert_eq!(f.format(1234.25), "1234.250000");
        assert_eq!(LocaleFormatter::for_locale("").format(1.0), "1.000000");
    }

    #[test]
    fn test_german_grouping() {
        let f = LocaleFormatter::for_locale("de_DE").with_precision(2);
        assert_eq!(f.format(1234.5), "1.234,50");
    }

    #[test]
    fn test_negative_zero_after_rounding() {
        let f = LocaleFormatter::for_locale("en_US").with_precision(2);
        assert_eq!(f.format(-0.001), "0.00");
    }
}
