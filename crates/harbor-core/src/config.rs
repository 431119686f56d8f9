//! Layered loading: resolve specifiers, load each source, deep-merge in order.
//!
//! Configuration and secrets are built by two independent calls over their
//! own specifier lists; nothing here ever mixes the two.

use crate::error::Result;
use crate::loader::SourceLoader;
use crate::merge::deep_merge;
use crate::resolve::{resolve, SourceId};
use crate::value::Mapping;

/// Which accumulator is being built. Secrets always go through the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Config,
    Secrets,
}

impl Layer {
    pub fn noun(self) -> &'static str {
        match self {
            Layer::Config => "configuration",
            Layer::Secrets => "secrets",
        }
    }

    fn force_secret(self) -> bool {
        matches!(self, Layer::Secrets)
    }
}

/// Resolve `specs`, load every source and fold them into one mapping.
///
/// `on_source` is called with the zero-based index and id of each source just
/// before it is loaded. The first failure aborts the whole pass.
pub fn load_layered<S, F>(
    specs: &[S],
    layer: Layer,
    loader: &SourceLoader<'_>,
    mut on_source: F,
) -> Result<Mapping>
where
    S: AsRef<str>,
    F: FnMut(usize, &SourceId),
{
    let mut acc = Mapping::new();
    for (i, id) in resolve(specs).enumerate() {
        let id = id?;
        on_source(i, &id);
        let loaded = loader.load(&id, layer.force_secret())?;
        deep_merge(&mut acc, loaded);
    }
    Ok(acc)
}
