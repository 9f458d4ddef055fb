use crate::entry::parser::{ParseDiagnostic, parse_line, parse_line_strict};
use crate::entry::types::{Entry, MultiValueEntry, Record};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;

/// A named-key store for one configuration source.
///
/// Holds a scalar entry or a multi-valued collection per key, decided by the
/// layer's multiplicity scheme. The scheme is layer-scoped configuration:
/// declare repeatable keys with [`set_key_multiple`] before ingesting, it is
/// never inferred from the data itself.
///
/// Keys iterate in lexicographic order, which is also the persisted output
/// order.
///
/// [`set_key_multiple`]: ConfigLayer::set_key_multiple
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
	entries: BTreeMap<String, Record>,
	multi_keys: BTreeSet<String>,
}

impl ConfigLayer {
	pub fn new() -> Self {
		ConfigLayer::default()
	}

	/// A fresh empty layer sharing this layer's multiplicity scheme.
	///
	/// The "copy scheme, then parse" pattern: build a compatible sibling
	/// before populating it independently.
	pub fn copy_scheme(&self) -> Self {
		ConfigLayer {
			entries: BTreeMap::new(),
			multi_keys: self.multi_keys.clone(),
		}
	}

	/// Declare (or undeclare) a key as repeatable.
	///
	/// Has no effect on the shape of anything already stored; intended to be
	/// called before ingestion.
	pub fn set_key_multiple(&mut self, name: &str, multiple: bool) {
		if multiple {
			self.multi_keys.insert(name.to_string());
		} else {
			self.multi_keys.remove(name);
		}
	}

	pub fn is_multiple(&self, name: &str) -> bool {
		self.multi_keys.contains(name)
	}

	/// Iterate the repeatable-key scheme in name order.
	pub fn multi_keys(&self) -> impl Iterator<Item = &str> {
		self.multi_keys.iter().map(String::as_str)
	}

	/// Parse one line and fold the result into the layer.
	///
	/// Lines that parse to nothing (blank, comment-only, malformed) are
	/// dropped silently. A duplicate key reconciles through
	/// [`Entry::resolve_duplicate`], per value slot when the key is
	/// repeatable.
	pub fn ingest(&mut self, line: &str) {
		if let Some(entry) = parse_line(line) {
			self.fold_entry(entry);
		}
	}

	fn fold_entry(&mut self, entry: Entry) {
		let name = entry.name().to_string();
		match self.entries.remove(&name) {
			Some(Record::Single(existing)) => {
				let survivor = existing.resolve_duplicate(entry);
				self.entries.insert(name, Record::Single(survivor));
			}
			Some(Record::Multi(mut multi)) => {
				multi.fold(entry);
				self.entries.insert(name, Record::Multi(multi));
			}
			None => {
				let record = self.wrap(entry);
				self.entries.insert(name, record);
			}
		}
	}

	/// Explicit overwrite: the key's stored record is unconditionally
	/// replaced, bypassing duplicate resolution. The replacement is wrapped
	/// per the multiplicity scheme so the stored shape stays consistent.
	pub fn set(&mut self, entry: Entry) {
		let record = self.wrap(entry);
		self.entries.insert(record.name().to_string(), record);
	}

	fn wrap(&self, entry: Entry) -> Record {
		if self.is_multiple(entry.name()) {
			Record::Multi(MultiValueEntry::from_entry(entry))
		} else {
			Record::Single(entry)
		}
	}

	/// Store an already-shaped record under its own key. The merge engine
	/// builds multi-valued records directly and bypasses wrapping.
	pub(crate) fn insert_record(&mut self, record: Record) {
		self.entries.insert(record.name().to_string(), record);
	}

	pub fn get(&self, name: &str) -> Option<&Record> {
		self.entries.get(name)
	}

	/// Remove and return whatever is stored under the key.
	pub fn delete(&mut self, name: &str) -> Option<Record> {
		self.entries.remove(name)
	}

	/// Remove one value from a key.
	///
	/// A scalar record is removed wholesale regardless of `value`. A
	/// multi-valued record loses only the matching slot; the collection stays
	/// in place even when emptied.
	pub fn delete_value(&mut self, name: &str, value: &str) -> Option<Entry> {
		let scalar = matches!(self.entries.get(name)?, Record::Single(_));
		if scalar {
			match self.entries.remove(name) {
				Some(Record::Single(entry)) => Some(entry),
				_ => None,
			}
		} else {
			match self.entries.get_mut(name) {
				Some(Record::Multi(multi)) => multi.remove(value),
				_ => None,
			}
		}
	}

	/// Bulk ingestion: reset the stored entries (the multiplicity scheme is
	/// kept) and ingest each line in order, so the source's own vertical
	/// order drives duplicate resolution.
	pub fn ingest_lines<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.entries.clear();
		for line in lines {
			self.ingest(line.as_ref());
		}
	}

	/// Bulk ingestion from a newline-separated text.
	pub fn ingest_str(&mut self, text: &str) {
		self.ingest_lines(text.lines());
	}

	/// Like [`ingest_lines`], but collect a diagnostic for every malformed
	/// line instead of dropping it silently. Valid lines are ingested either
	/// way.
	///
	/// [`ingest_lines`]: ConfigLayer::ingest_lines
	pub fn ingest_lines_strict<I, S>(&mut self, lines: I) -> Vec<ParseDiagnostic>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.entries.clear();
		let mut diagnostics = Vec::new();
		for (index, line) in lines.into_iter().enumerate() {
			let raw = line.as_ref();
			match parse_line_strict(raw) {
				Ok(Some(entry)) => self.fold_entry(entry),
				Ok(None) => {}
				Err(error) => diagnostics.push(ParseDiagnostic {
					line: index + 1,
					text: raw.to_string(),
					error,
				}),
			}
		}
		diagnostics
	}

	/// Strict bulk ingestion from a newline-separated text.
	pub fn ingest_str_strict(&mut self, text: &str) -> Vec<ParseDiagnostic> {
		self.ingest_lines_strict(text.lines())
	}

	/// Iterate stored records in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
		self.entries.iter().map(|(name, record)| (name.as_str(), record))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Serialize to a byte sink, one directive per line, newline-terminated,
	/// keys in lexicographic order. Emptied multi-valued records produce no
	/// output.
	pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
		for record in self.entries.values() {
			if let Record::Multi(multi) = record
				&& multi.is_empty()
			{
				continue;
			}
			writeln!(writer, "{record}")?;
		}
		Ok(())
	}
}

impl fmt::Display for ConfigLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for record in self.entries.values() {
			if let Record::Multi(multi) = record
				&& multi.is_empty()
			{
				continue;
			}
			if !first {
				f.write_str("\n")?;
			}
			write!(f, "{record}")?;
			first = false;
		}
		Ok(())
	}
}
