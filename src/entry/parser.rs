use crate::entry::types::Entry;

/// Why a line could not be parsed into an entry.
///
/// Lenient callers drop these by design; [`parse_line_strict`] surfaces them
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
	#[error("unterminated quoted value")]
	UnterminatedQuote,

	#[error("unexpected token after value: {token:?}")]
	UnexpectedToken { token: String },
}

/// A malformed line recorded during strict bulk ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
	/// 1-based line number within the ingested source.
	pub line: usize,

	/// The raw line as read.
	pub text: String,

	/// What made it malformed.
	pub error: LineError,
}

/// Parse one raw text line into an entry.
///
/// Returns `None` both for lines that carry no directive (blank, lone `#`,
/// marker-only) and for malformed lines: permissive ingestion drops what it
/// cannot parse and never raises.
pub fn parse_line(raw: &str) -> Option<Entry> {
	parse_line_strict(raw).ok().flatten()
}

/// Strict variant of [`parse_line`] distinguishing "no directive on this
/// line" (`Ok(None)`) from malformed content (`Err`).
pub fn parse_line_strict(raw: &str) -> Result<Option<Entry>, LineError> {
	let normalized = raw.replace('\t', " ");
	let trimmed = normalized.trim();
	if trimmed.is_empty() || trimmed == "#" {
		return Ok(None);
	}

	let mut tokens: Vec<&str> = trimmed.split_whitespace().collect();

	// Activation stripping: a run of markers, stacked or as standalone
	// tokens, marks the entry inactive. The stream may drain entirely here
	// (a marker-only line), which yields no entry.
	let mut active = true;
	let mut idx = 0;
	while idx < tokens.len() {
		let tok = tokens[idx];
		if tok == "#" {
			active = false;
			idx += 1;
		} else if tok.starts_with('#') {
			active = false;
			tokens[idx] = &tok[1..];
		} else {
			break;
		}
	}
	if idx >= tokens.len() {
		return Ok(None);
	}

	let name = tokens[idx].to_string();
	idx += 1;

	let mut value = String::new();
	if idx < tokens.len() {
		let tok = tokens[idx];
		if tok.starts_with('#') {
			// No value; this token opens the trailing comment below.
		} else if tok.starts_with('"') {
			let (quoted, next) = scan_quoted(&tokens, idx)?;
			value = quoted;
			idx = next;
		} else {
			if idx + 1 < tokens.len() && !tokens[idx + 1].starts_with('#') {
				// An unquoted value admits no further non-comment token.
				return Err(LineError::UnexpectedToken {
					token: tokens[idx + 1].to_string(),
				});
			}
			value = tok.to_string();
			idx += 1;
		}
	}

	let mut comment = String::new();
	if idx < tokens.len() {
		let tok = tokens[idx];
		if !tok.starts_with('#') {
			return Err(LineError::UnexpectedToken {
				token: tok.to_string(),
			});
		}
		let mut parts: Vec<&str> = Vec::with_capacity(tokens.len() - idx);
		parts.push(&tok[1..]);
		parts.extend(&tokens[idx + 1..]);
		comment = parts.join(" ").trim().to_string();
	}

	Ok(Some(Entry::from_parts(active, name, value, comment)))
}

/// Scan a quoted value starting at `start`, returning the joined value
/// (quotes kept verbatim) and the index past its closing token.
///
/// A token closes the quote when it ends with a `"` that is not part of the
/// two-character sequence `\"`. The opening token may close itself only if it
/// is longer than a single quote character.
fn scan_quoted(tokens: &[&str], start: usize) -> Result<(String, usize), LineError> {
	for (j, tok) in tokens.iter().enumerate().skip(start) {
		let self_open = j == start && tok.len() == 1;
		if tok.ends_with('"') && !tok.ends_with("\\\"") && !self_open {
			return Ok((tokens[start..=j].join(" "), j + 1));
		}
	}
	Err(LineError::UnterminatedQuote)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parsed(raw: &str) -> Entry {
		parse_line(raw).unwrap_or_else(|| panic!("expected an entry from {raw:?}"))
	}

	#[test]
	fn test_empty_and_marker_only_lines() {
		assert_eq!(parse_line(""), None);
		assert_eq!(parse_line("   \t "), None);
		assert_eq!(parse_line("#"), None);
		assert_eq!(parse_line("  #  "), None);
		assert_eq!(parse_line("# # #"), None);
		assert_eq!(parse_line("###"), None);
	}

	#[test]
	fn test_active_name_value() {
		let entry = parsed("pcap-speed\t\t220");
		assert!(entry.is_active());
		assert_eq!(entry.name(), "pcap-speed");
		assert_eq!(entry.value(), "220");
		assert_eq!(entry.comment(), "");
	}

	#[test]
	fn test_inactive_with_value_and_comment() {
		let entry = parsed("# test 1.2.3.4 # comment");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "test");
		assert_eq!(entry.value(), "1.2.3.4");
		assert_eq!(entry.comment(), "comment");
	}

	#[test]
	fn test_tabs_and_runs_of_whitespace() {
		let entry = parsed("\t  # test   \t     1.2.3.4 #   \t  a comment");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "test");
		assert_eq!(entry.value(), "1.2.3.4");
		assert_eq!(entry.comment(), "a comment");
	}

	#[test]
	fn test_stacked_markers() {
		let entry = parsed("## test 1.2.3.4 # comment");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "test");
		assert_eq!(entry.value(), "1.2.3.4");
		assert_eq!(entry.comment(), "comment");
	}

	#[test]
	fn test_repeated_marker_tokens() {
		let entry = parsed("# # test 1.2.3.4 # comment");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "test");
		assert_eq!(entry.value(), "1.2.3.4");
	}

	#[test]
	fn test_marker_fused_to_name() {
		let entry = parsed("#sflow.drop.pool\t\t0");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "sflow.drop.pool");
		assert_eq!(entry.value(), "0");
	}

	#[test]
	fn test_name_only_inactive() {
		let entry = parsed("## TCP");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "TCP");
		assert_eq!(entry.value(), "");
		assert_eq!(entry.comment(), "");
	}

	#[test]
	fn test_comment_fused_to_marker() {
		let entry = parsed("sflow.drop.rate\t\t0 #1000");
		assert!(entry.is_active());
		assert_eq!(entry.value(), "0");
		assert_eq!(entry.comment(), "1000");
	}

	#[test]
	fn test_comment_without_value() {
		let entry = parsed("flag # switched off for now");
		assert!(entry.is_active());
		assert_eq!(entry.name(), "flag");
		assert_eq!(entry.value(), "");
		assert_eq!(entry.comment(), "switched off for now");
	}

	#[test]
	fn test_bare_value_followed_by_token_is_dropped() {
		assert_eq!(parse_line("#switch off cookie filter"), None);
		assert_eq!(
			parse_line_strict("#switch off cookie filter"),
			Err(LineError::UnexpectedToken {
				token: "cookie".to_string()
			})
		);
	}

	#[test]
	fn test_quoted_single_token_value() {
		let entry = parsed("mac\t\t\"ec:93:ed:01:00:00\"");
		assert!(entry.is_active());
		assert_eq!(entry.name(), "mac");
		assert_eq!(entry.value(), "\"ec:93:ed:01:00:00\"");
	}

	#[test]
	fn test_quoted_value_spanning_tokens() {
		let entry = parsed("motd \"maintenance at   dawn\" # rotate weekly");
		assert_eq!(entry.value(), "\"maintenance at dawn\"");
		assert_eq!(entry.comment(), "rotate weekly");
	}

	#[test]
	fn test_quoted_value_with_escaped_quote() {
		let entry = parsed("motd \"say \\\" twice\"");
		assert_eq!(entry.value(), "\"say \\\" twice\"");
	}

	#[test]
	fn test_lone_quote_cannot_close_itself() {
		let entry = parsed("sep \" \"");
		assert_eq!(entry.value(), "\" \"");
	}

	#[test]
	fn test_empty_quoted_value() {
		let entry = parsed("greeting \"\"");
		assert_eq!(entry.value(), "\"\"");
	}

	#[test]
	fn test_unterminated_quote_is_dropped() {
		assert_eq!(parse_line("motd \"never closed"), None);
		assert_eq!(
			parse_line_strict("motd \"never closed"),
			Err(LineError::UnterminatedQuote)
		);
	}

	#[test]
	fn test_token_after_quoted_value_is_dropped() {
		assert_eq!(parse_line("motd \"a b\" trailing"), None);
		assert_eq!(
			parse_line_strict("motd \"a b\" trailing"),
			Err(LineError::UnexpectedToken {
				token: "trailing".to_string()
			})
		);
	}

	#[test]
	fn test_inactive_words_become_name_and_value() {
		// "# Bucket configuration" reads as a deactivated directive, not as
		// prose: name "Bucket", value "configuration".
		let entry = parsed("# Bucket configuration");
		assert!(!entry.is_active());
		assert_eq!(entry.name(), "Bucket");
		assert_eq!(entry.value(), "configuration");
	}

	#[test]
	fn test_strict_no_entry_cases_are_ok() {
		assert_eq!(parse_line_strict(""), Ok(None));
		assert_eq!(parse_line_strict("#"), Ok(None));
		assert_eq!(parse_line_strict("## #"), Ok(None));
	}

	#[test]
	fn test_serialization_round_trip() {
		for raw in [
			"# test 1.2.3.4 # comment",
			"pcap-speed 220",
			"## TCP",
			"sflow.drop.rate 0 # 1000",
			"mac \"ec:93:ed:01:00:00\"",
		] {
			let entry = parsed(raw);
			let rendered = entry.to_string();
			let reparsed = parsed(&rendered);
			assert_eq!(entry, reparsed, "round trip drifted for {raw:?}");
		}
	}
}
