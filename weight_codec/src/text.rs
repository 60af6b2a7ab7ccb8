//! Line oriented `name value` weight files.

use std::io::{BufRead, Write};

use feature_dict::{FeatureDictionary, UNKNOWN_FEATURE, escape, unescape};
use tracing::{debug, info, warn};

use crate::Weight;
use crate::config::CodecConfig;
use crate::error::WeightsError;

/// Parses text weights into `weights`, returning the number of entries read.
pub(crate) fn read_weights<R: BufRead>(
    reader: R,
    dict: &mut FeatureDictionary,
    weights: &mut Vec<Weight>,
    mut names: Option<&mut Vec<String>>,
    config: &CodecConfig,
) -> Result<usize, WeightsError> {
    let mut entries = 0usize;
    let mut unknown = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let Some((raw_name, value)) = parse_line(&line, line_number)? else {
            continue;
        };
        let name = unescape(&raw_name);
        if value.is_nan() {
            return Err(WeightsError::NanWeight {
                line: line_number,
                feature: name.into_owned(),
            });
        }

        let id = dict.convert(&name);
        if id == UNKNOWN_FEATURE {
            unknown += 1;
        }
        if let Some(names) = names.as_deref_mut() {
            names.push(name.into_owned());
        }
        if weights.len() <= id {
            weights.resize(id + 1, 0.0);
        }
        weights[id] = value;

        entries += 1;
        if config.progress_interval > 0 && entries % config.progress_interval == 0 {
            debug!(entries, "reading feature weights");
        }
        if config.summary_interval > 0 && entries % config.summary_interval == 0 {
            info!(entries, "feature weights read so far");
        }
    }

    if unknown > 0 {
        warn!(
            unknown,
            "frozen dictionary mapped unseen features to the unknown id"
        );
    }
    Ok(entries)
}

/// Splits one line into its name token and value.
///
/// Returns `None` for blank and comment lines. The last `=` or tab after the
/// first byte separates name and value; the name ends at the first space.
fn parse_line(
    line: &str,
    line_number: usize,
) -> Result<Option<(String, Weight)>, WeightsError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with(' ') {
        return Err(WeightsError::LeadingWhitespace {
            line: line_number,
            text: line.to_string(),
        });
    }

    let mut buf = line.to_string();
    let separator = line
        .rfind(|c: char| c == '=' || c == '\t')
        .filter(|&at| at > 0);
    if let Some(at) = separator {
        buf.replace_range(at..at + 1, " ");
    }
    let name_end = buf.find(' ').unwrap_or(buf.len());
    let value = parse_leading_float(buf[name_end..].trim_start_matches(' '));
    buf.truncate(name_end);
    Ok(Some((buf, value)))
}

/// Parses the longest numeric prefix of `text` the way C `strtod` does.
///
/// Leading whitespace is skipped, trailing garbage is ignored and text
/// without a numeric prefix yields `0.0`.
fn parse_leading_float(text: &str) -> Weight {
    let text = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let bytes = text.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let unsigned = &bytes[end..];
    for (word, value) in [
        ("infinity", Weight::INFINITY),
        ("inf", Weight::INFINITY),
        ("nan", Weight::NAN),
    ] {
        let prefix = unsigned.get(..word.len());
        if prefix.is_some_and(|prefix| prefix.eq_ignore_ascii_case(word.as_bytes())) {
            return if negative { -value } else { value };
        }
    }

    let integer_start = end;
    end += count_digits(&bytes[end..]);
    let mut mantissa_digits = end - integer_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_digits = count_digits(&bytes[end + 1..]);
        if mantissa_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
        mantissa_digits += fraction_digits;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent_end..]);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Writes `weights` as text, returning the number of feature lines written.
pub(crate) fn write_weights<W: Write>(
    mut out: W,
    dict: &FeatureDictionary,
    weights: &[Weight],
    hide_zero_value_features: bool,
    extra_comment: Option<&str>,
) -> Result<usize, WeightsError> {
    if let Some(comment) = extra_comment {
        for line in comment.lines() {
            writeln!(out, "# {line}")?;
        }
    }

    let mut written = 0;
    for id in 1..dict.num_feats() {
        let value = weights.get(id).copied().unwrap_or(0.0);
        if hide_zero_value_features && value == 0.0 {
            continue;
        }
        writeln!(out, "{} {:?}", escape(&dict.name(id)), value)?;
        written += 1;
    }
    Ok(written)
}
