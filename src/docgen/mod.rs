//! Documentation synthesis for shapebind
//!
//! Derives renderer-consumable, JSON-Schema-compatible descriptors from
//! registered schemas (C3). Pure and idempotent per schema version.

mod synthesizer;

pub use synthesizer::{DocDescriptor, DocSynthesizer};
