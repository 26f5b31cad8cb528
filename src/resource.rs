//! The host boundary: the application owns resource storage and hands the
//! core raw bytes per resource id; the core hands back bytes to persist.

use crate::{
    bitmap::BitmapFont,
    error::FontResult,
    sfnt::FontContainer,
};

/// Classic resource ids are signed 16-bit values.
pub type ResourceId = i16;

/// Host-owned byte store. The core consumes nothing else across the
/// boundary.
pub trait ResourceProvider {
    fn load(&self, id: ResourceId) -> FontResult<Vec<u8>>;
    fn store(&mut self, id: ResourceId, bytes: &[u8]) -> FontResult<()>;
}

pub fn load_container<P: ResourceProvider>(provider: &P, id: ResourceId) -> FontResult<FontContainer> {
    let bytes = provider.load(id)?;

    FontContainer::decode(&bytes)
}

pub fn store_container<P: ResourceProvider>(
    provider: &mut P,
    id: ResourceId,
    container: &FontContainer,
) -> FontResult<()> {
    let bytes = container.encode()?;

    provider.store(id, &bytes)
}

pub fn load_bitmap_font<P: ResourceProvider>(provider: &P, id: ResourceId) -> FontResult<BitmapFont> {
    BitmapFont::new(provider.load(id)?)
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;
    use crate::error::FontError;

    #[derive(Default)]
    struct MemoryProvider {
        resources: HashMap<ResourceId, Vec<u8>>,
    }

    impl ResourceProvider for MemoryProvider {
        fn load(&self, id: ResourceId) -> FontResult<Vec<u8>> {
            self.resources
                .get(&id)
                .cloned()
                .ok_or(FontError::MissingResource { id })
        }

        fn store(&mut self, id: ResourceId, bytes: &[u8]) -> FontResult<()> {
            self.resources.insert(id, bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn missing_resource_errors() {
        let provider = MemoryProvider::default();

        assert!(matches!(
            load_container(&provider, 128),
            Err(FontError::MissingResource { id: 128 })
        ));
    }
}
