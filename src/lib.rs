//! Dirconf - CLI tool for parsing and merging layered directive config files.
//!
//! This library provides the core functionality for dirconf, including:
//! - Line-grammar parsing of directive files (inactive markers, quoted
//!   values, trailing comments)
//! - Layered key-value stores with per-key multiplicity
//! - Deterministic merging of ordered layer sequences
//! - Manifest parsing and discovery for the multiplicity scheme
//!
//! # Example
//!
//! ```
//! use dirconf_cli::layer::{ConfigLayer, merge};
//!
//! let mut base = ConfigLayer::new();
//! base.set_key_multiple("sync", true);
//! base.ingest_str("sync 239.0.0.3\npcap-speed 220");
//!
//! let mut site = base.copy_scheme();
//! site.ingest_str("sync 239.1.0.3\n#pcap-speed 250");
//!
//! let merged = merge(&[Some(&base), Some(&site)]).unwrap();
//! assert_eq!(merged.get("sync").unwrap().as_multi().unwrap().len(), 2);
//! assert!(!merged.get("pcap-speed").unwrap().as_single().unwrap().is_active());
//! ```

pub mod entry;
pub mod error;
pub mod layer;
pub mod manifest;

pub use error::{DirconfError, Result};
