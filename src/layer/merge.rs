use crate::entry::types::{MultiValueEntry, Record};
use crate::layer::store::ConfigLayer;

/// Combine an ordered sequence of layers, least specific first, into one
/// resulting layer.
///
/// `None` elements are absent layers: skipped wherever they appear. An empty
/// or all-absent sequence merges to `None`.
///
/// Three phases, each re-scanning the layers in the given order:
/// 1. the result's multiplicity scheme is the union of every layer's scheme;
/// 2. keys outside the merged scheme are overwritten unconditionally by
///    later layers, an inactive entry shadowing an active one included;
/// 3. keys inside the merged scheme accumulate a fresh collection, folding
///    every layer's contribution slot by slot through duplicate resolution.
pub fn merge(layers: &[Option<&ConfigLayer>]) -> Option<ConfigLayer> {
	if layers.iter().all(Option::is_none) {
		return None;
	}

	let mut result = ConfigLayer::new();
	union_schemes(&mut result, layers);
	overwrite_single_keys(&mut result, layers);
	union_multi_keys(&mut result, layers);
	Some(result)
}

/// Phase 1 of [`merge`] alone: a fresh empty layer whose multiplicity scheme
/// is the union of every present layer's scheme.
///
/// Seeds a new layer compatible with existing ones before it is populated
/// independently. Same absence semantics as [`merge`].
pub fn merge_schemes_only(layers: &[Option<&ConfigLayer>]) -> Option<ConfigLayer> {
	if layers.iter().all(Option::is_none) {
		return None;
	}

	let mut result = ConfigLayer::new();
	union_schemes(&mut result, layers);
	Some(result)
}

fn union_schemes(result: &mut ConfigLayer, layers: &[Option<&ConfigLayer>]) {
	for layer in layers.iter().flatten() {
		for name in layer.multi_keys() {
			result.set_key_multiple(name, true);
		}
	}
}

fn overwrite_single_keys(result: &mut ConfigLayer, layers: &[Option<&ConfigLayer>]) {
	for layer in layers.iter().flatten() {
		for (name, record) in layer.iter() {
			if result.is_multiple(name) {
				continue;
			}
			if let Some(entry) = record.as_single() {
				result.set(entry.clone());
			}
		}
	}
}

fn union_multi_keys(result: &mut ConfigLayer, layers: &[Option<&ConfigLayer>]) {
	let names: Vec<String> = result.multi_keys().map(str::to_string).collect();
	for name in names {
		let mut merged = MultiValueEntry::new(name.as_str());
		let mut contributed = false;
		for layer in layers.iter().flatten() {
			match layer.get(&name) {
				Some(Record::Single(entry)) => {
					contributed = true;
					merged.fold(entry.clone());
				}
				Some(Record::Multi(multi)) => {
					contributed = true;
					for entry in multi.entries() {
						merged.fold(entry.clone());
					}
				}
				None => {}
			}
		}
		// A key no layer contributes produces no entry at all.
		if contributed {
			result.insert_record(Record::Multi(merged));
		}
	}
}
