use crate::protocol::ParseError;
use std::cmp::Ordering;

/// A content-negotiation token with its preference weight.
///
/// Parsed from `"token"` (weight 1.0) or `"token;q=0.123"`. The explicit
/// weight form is strict: it must contain a decimal point followed by one to
/// three digits, and the resulting value must lie in `[0.0, 1.0]`. Bare
/// integers like `q=1` are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityValue {
    value: String,
    weight: f32,
}

impl QualityValue {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ParseError::invalid_quality("empty token"));
        }

        match raw.split_once(';') {
            None => Ok(Self { value: raw.to_string(), weight: 1.0 }),
            Some((token, parameter)) => {
                let token = token.trim();
                if token.is_empty() {
                    return Err(ParseError::invalid_quality("empty token"));
                }
                let weight = parameter
                    .trim()
                    .strip_prefix("q=")
                    .ok_or_else(|| ParseError::invalid_quality(format!("expected q= parameter, got '{parameter}'")))?;
                Ok(Self { value: token.to_string(), weight: parse_weight(weight)? })
            }
        }
    }

    /// Parses a comma-separated negotiation header (e.g. `Accept-Encoding`)
    /// into a list ordered by descending weight. Equal weights keep their
    /// original relative order.
    pub fn parse_list(header_value: &str) -> Result<Vec<QualityValue>, ParseError> {
        let mut values = header_value
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(QualityValue::parse)
            .collect::<Result<Vec<_>, _>>()?;
        values.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
        Ok(values)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }
}

fn parse_weight(raw: &str) -> Result<f32, ParseError> {
    let (integer, fraction) = raw
        .split_once('.')
        .ok_or_else(|| ParseError::invalid_quality(format!("weight '{raw}' must contain a decimal point")))?;

    let fraction_ok = (1..=3).contains(&fraction.len()) && fraction.bytes().all(|b| b.is_ascii_digit());
    let integer_ok = matches!(integer, "0" | "1");
    if !fraction_ok || !integer_ok {
        return Err(ParseError::invalid_quality(format!("malformed weight '{raw}'")));
    }

    let weight: f32 = raw.parse().map_err(|_| ParseError::invalid_quality(format!("malformed weight '{raw}'")))?;
    if weight > 1.0 {
        return Err(ParseError::invalid_quality(format!("weight '{raw}' out of range")));
    }
    Ok(weight)
}
