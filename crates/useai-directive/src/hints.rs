//! Generation-hint comment parsing
//!
//! Two formats are accepted:
//!
//! ```text
//! // temperature=0.5, seed=42, model=foo/bar      one line, comma separated
//!
//! // temperature = 0.2                            several lines, one pair each
//! // instructions = Support USD, EUR, and GBP.
//! ```
//!
//! A block of several lines is never split on commas, so free text keeps its
//! punctuation.

use crate::metadata::{HintValue, Metadata};
use tracing::trace;

/// Parse a block of hint lines into metadata
///
/// One line is split on commas; more than one line is read one pair per line.
/// Blank lines do not count.
#[must_use]
pub fn parse_block<'a, I>(lines: I) -> Metadata
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: Vec<&str> = lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut metadata = Metadata::new();
    match lines.as_slice() {
        [] => {}
        [single] => {
            for pair in single.split(',') {
                apply_pair(&mut metadata, pair);
            }
        }
        many => {
            for line in many {
                apply_pair(&mut metadata, line);
            }
        }
    }
    metadata
}

/// Parse a single comma-separated line
#[inline]
#[must_use]
pub fn parse_line(line: &str) -> Metadata {
    parse_block([line])
}

/// Apply one `key = value` pair; unknown keys and malformed pairs are ignored
fn apply_pair(metadata: &mut Metadata, pair: &str) {
    let Some((key, value)) = pair.split_once('=') else {
        trace!(pair, "ignoring hint without '='");
        return;
    };
    let value = value.trim();

    match key.trim() {
        "temperature" => metadata.temperature = Some(HintValue::parse(value)),
        "seed" => metadata.seed = Some(HintValue::parse(value)),
        "instructions" => metadata.instructions = Some(strip_quotes(value).to_string()),
        "model" => metadata.model = Some(value.to_string()),
        other => trace!(key = other, "ignoring unrecognized hint key"),
    }
}

/// Strip one quote character from each end
fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix('\''))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comma_separated_line() {
        let m = parse_line("temperature=0.5, seed=42, model=foo/bar");
        assert_eq!(
            m,
            Metadata::new()
                .with_temperature(0.5)
                .with_seed(42_i64)
                .with_model("foo/bar")
        );
    }

    #[test]
    fn non_numeric_temperature_kept_raw() {
        let m = parse_line("temperature=warm");
        assert_eq!(m.temperature, Some(HintValue::Raw("warm".to_string())));
    }

    #[test]
    fn multi_line_block_keeps_commas() {
        let m = parse_block([
            "temperature=0.2",
            "model=openai/gpt-4-turbo",
            "seed=42",
            "instructions=Support USD, EUR, and GBP.",
        ]);
        assert_eq!(m.instructions.as_deref(), Some("Support USD, EUR, and GBP."));
        assert_eq!(m.seed.and_then(|s| s.as_i64()), Some(42));
        assert_eq!(m.model.as_deref(), Some("openai/gpt-4-turbo"));
    }

    #[test]
    fn spaces_around_equals() {
        let m = parse_block(["temperature = 0.3", "instructions = \"be terse\""]);
        assert_eq!(m.temperature.and_then(|t| t.as_f64()), Some(0.3));
        assert_eq!(m.instructions.as_deref(), Some("be terse"));
    }

    #[test]
    fn value_may_contain_equals() {
        let m = parse_block(["instructions=treat a=b as equal", "seed=1"]);
        assert_eq!(m.instructions.as_deref(), Some("treat a=b as equal"));
    }

    #[test]
    fn unknown_keys_and_noise_ignored() {
        let m = parse_line("colour=blue, just words, model=x");
        assert_eq!(m, Metadata::new().with_model("x"));
    }

    #[test]
    fn blank_lines_do_not_force_line_mode() {
        let m = parse_block(["", "temperature=0.1, seed=3", "  "]);
        assert_eq!(m.seed.and_then(|s| s.as_i64()), Some(3));
    }

    #[test]
    fn single_quotes_stripped() {
        assert_eq!(strip_quotes("'x'"), "x");
        assert_eq!(strip_quotes("x"), "x");
    }

    proptest::proptest! {
        #[test]
        fn numeric_temperature_round_trips(t in 0.0f64..2.0) {
            let m = parse_line(&format!("temperature={t}"));
            proptest::prop_assert_eq!(m.temperature.and_then(|v| v.as_f64()), Some(t));
        }

        #[test]
        fn arbitrary_text_never_panics(text in ".{0,200}") {
            let _ = parse_block(text.lines());
        }
    }
}
