use crate::error::{DirconfError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Check that a string is usable as a directive key name.
///
/// Names must be non-empty and free of whitespace; they double as tokens in
/// the serialized line format.
pub(crate) fn validate_key_name(name: &str) -> Result<()> {
	if name.is_empty() || name.chars().any(char::is_whitespace) {
		return Err(DirconfError::InvalidKeyName {
			name: name.to_string(),
		});
	}
	Ok(())
}

/// A single configuration directive.
///
/// Entries are immutable value objects: the fluent constructors return new
/// values, and anything already stored is replaced rather than mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	active: bool,
	name: String,
	value: String,
	comment: String,
}

impl Entry {
	/// Create an active entry with the given name and value (no comment).
	///
	/// Fails if the name is empty or contains whitespace.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
		let name = name.into();
		validate_key_name(&name)?;
		Ok(Entry {
			active: true,
			name,
			value: value.into(),
			comment: String::new(),
		})
	}

	/// Construct directly from parser output. Tokens are already trimmed and
	/// whitespace-free, so no validation is repeated here.
	pub(crate) fn from_parts(active: bool, name: String, value: String, comment: String) -> Self {
		Entry {
			active,
			name,
			value,
			comment,
		}
	}

	/// Return this entry marked inactive (serialized with a leading marker).
	pub fn inactive(mut self) -> Self {
		self.active = false;
		self
	}

	/// Return this entry with the given trailing comment.
	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = comment.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &str {
		&self.value
	}

	pub fn comment(&self) -> &str {
		&self.comment
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Decide which of two entries for the same key (or the same value slot)
	/// survives.
	///
	/// An inactive existing entry never blocks replacement; between two active
	/// entries the most recently seen wins; an active entry survives an
	/// inactive newcomer. This is the single tie-break used both when
	/// collapsing duplicate lines during ingestion and when folding slots of
	/// merged multi-valued keys.
	pub fn resolve_duplicate(self, incoming: Entry) -> Entry {
		if !self.active {
			return incoming;
		}
		if incoming.active {
			return incoming;
		}
		self
	}
}

impl fmt::Display for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.active {
			f.write_str("# ")?;
		}
		f.write_str(&self.name)?;
		if !self.value.is_empty() {
			write!(f, " {}", self.value)?;
		}
		if !self.comment.is_empty() {
			write!(f, " # {}", self.comment)?;
		}
		Ok(())
	}
}

/// An ordered-by-value collection of entries sharing one key.
///
/// Used when a key is declared repeatable: each distinct value occupies one
/// slot. Invariant: every slot entry carries this collection's name, and its
/// value equals its slot key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueEntry {
	name: String,
	slots: BTreeMap<String, Entry>,
}

impl MultiValueEntry {
	/// Empty collection for the given key. Slots are added via [`fold`].
	///
	/// [`fold`]: MultiValueEntry::fold
	pub(crate) fn new(name: impl Into<String>) -> Self {
		MultiValueEntry {
			name: name.into(),
			slots: BTreeMap::new(),
		}
	}

	/// Wrap a single entry as a one-slot collection.
	pub fn from_entry(entry: Entry) -> Self {
		let mut multi = MultiValueEntry::new(entry.name());
		multi.slots.insert(entry.value().to_string(), entry);
		multi
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Look up the slot holding the given value.
	pub fn get(&self, value: &str) -> Option<&Entry> {
		self.slots.get(value)
	}

	/// Remove and return the slot holding the given value, if any.
	pub fn remove(&mut self, value: &str) -> Option<Entry> {
		self.slots.remove(value)
	}

	/// Fold an entry into the slot identified by its value.
	///
	/// An occupied slot is reconciled with [`Entry::resolve_duplicate`]; an
	/// empty one simply takes the entry. The entry must carry this
	/// collection's key name.
	pub fn fold(&mut self, entry: Entry) {
		match self.slots.remove(entry.value()) {
			Some(existing) => {
				let survivor = existing.resolve_duplicate(entry);
				self.slots.insert(survivor.value().to_string(), survivor);
			}
			None => {
				self.slots.insert(entry.value().to_string(), entry);
			}
		}
	}

	/// Iterate slots in value order.
	pub fn entries(&self) -> impl Iterator<Item = &Entry> {
		self.slots.values()
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}
}

impl fmt::Display for MultiValueEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for entry in self.slots.values() {
			if !first {
				f.write_str("\n")?;
			}
			write!(f, "{entry}")?;
			first = false;
		}
		Ok(())
	}
}

/// What a layer stores under one key: a scalar entry or a multi-valued
/// collection, decided by the layer's multiplicity scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
	Single(Entry),
	Multi(MultiValueEntry),
}

impl Record {
	pub fn name(&self) -> &str {
		match self {
			Record::Single(entry) => entry.name(),
			Record::Multi(multi) => multi.name(),
		}
	}

	pub fn as_single(&self) -> Option<&Entry> {
		match self {
			Record::Single(entry) => Some(entry),
			Record::Multi(_) => None,
		}
	}

	pub fn as_multi(&self) -> Option<&MultiValueEntry> {
		match self {
			Record::Single(_) => None,
			Record::Multi(multi) => Some(multi),
		}
	}
}

impl fmt::Display for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Record::Single(entry) => write!(f, "{entry}"),
			Record::Multi(multi) => write!(f, "{multi}"),
		}
	}
}
