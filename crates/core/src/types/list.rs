//! Logical list coordinates.

/// One of the per-customer call lists this service maintains.
///
/// Each list maps to a fixed (namespace, key) metafield coordinate on the
/// customer; at most one metafield record exists per coordinate. The pairs
/// are fixed at compile time so two deployments can never disagree about
/// where a list lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallList {
    /// Calls the customer has marked as read.
    Read,
    /// Calls the customer has pinned.
    Pinned,
}

impl CallList {
    /// Metafield namespace for this list.
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        "custom"
    }

    /// Metafield key for this list.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Read => "read_messages",
            Self::Pinned => "pinned_calls",
        }
    }
}

impl std::fmt::Display for CallList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace(), self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_coordinates() {
        assert_eq!(CallList::Read.namespace(), "custom");
        assert_eq!(CallList::Read.key(), "read_messages");
        assert_eq!(CallList::Pinned.namespace(), "custom");
        assert_eq!(CallList::Pinned.key(), "pinned_calls");
    }

    #[test]
    fn test_list_display() {
        assert_eq!(CallList::Read.to_string(), "custom.read_messages");
        assert_eq!(CallList::Pinned.to_string(), "custom.pinned_calls");
    }
}
