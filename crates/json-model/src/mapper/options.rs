//! Mapper configuration.

use crate::key_mapper::KeyMapper;

/// Options for the mapper.
#[derive(Debug, Clone, Default)]
pub struct MapperOptions {
    pub key_mapper: KeyMapper,
    /// Report payload keys no property maps to as field errors.
    pub deny_unknown_keys: bool,
}

impl MapperOptions {
    pub fn with_key_mapper(mut self, key_mapper: KeyMapper) -> Self {
        self.key_mapper = key_mapper;
        self
    }

    pub fn deny_unknown_keys(mut self, deny: bool) -> Self {
        self.deny_unknown_keys = deny;
        self
    }
}
