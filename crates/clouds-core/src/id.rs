use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for entity IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Stable identifier of a draggable entity.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(Spur);

impl EntityId {
    /// Intern a string as an EntityId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        EntityId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EntityId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let a = EntityId::intern("cloud_a");
        let b = EntityId::intern("cloud_a");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "cloud_a");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let id: EntityId = serde_json::from_str("\"cloud_b\"").unwrap();
        assert_eq!(id, EntityId::intern("cloud_b"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cloud_b\"");
    }

    #[test]
    fn display_is_bare_and_debug_is_tagged() {
        let id = EntityId::intern("sky");
        assert_eq!(id.to_string(), "sky");
        assert_eq!(format!("{id:?}"), "#sky");
    }
}
