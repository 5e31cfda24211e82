use crate::common::ByteStr;
use super::fold::Fold;

/// Multidict record.
///
/// Contains the key identity, the key as inserted and the value.
#[derive(Clone, Debug)]
pub(crate) struct Record<V> {
    pub(crate) identity: ByteStr,
    pub(crate) key: ByteStr,
    pub(crate) value: V,
}

impl<V> Record<V> {
    #[inline]
    pub(crate) fn new<F: Fold>(key: ByteStr, value: V) -> Self {
        Self {
            identity: F::identity_of(&key),
            key,
            value,
        }
    }

    #[inline]
    pub(crate) fn is(&self, identity: &str) -> bool {
        self.identity.as_str() == identity
    }

    #[inline]
    pub(crate) fn into_pair(self) -> (ByteStr, V) {
        (self.key, self.value)
    }
}

/// Records compare by identity and value, the key spelling is ignored.
impl<V: PartialEq> PartialEq for Record<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.value == other.value
    }
}
