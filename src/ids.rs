use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw numeric value
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Ant identifier, assigned in creation order
    AgentId,
    "ant#"
);
entity_id!(
    /// Colony identifier, equal to the colony's index in creation order
    ColonyId,
    "colony#"
);
entity_id!(
    /// Resource node identifier, assigned in creation order
    ResourceId,
    "node#"
);

/// Monotonic id source. Ids are never reused, so creation order equals id order.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdSequence(u32);

impl IdSequence {
    #[inline]
    pub(crate) fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(AgentId(3).to_string(), "ant#3");
        assert_eq!(ColonyId(0).to_string(), "colony#0");
        assert_eq!(ResourceId(12).to_string(), "node#12");
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let mut seq = IdSequence::default();
        assert_eq!(seq.next(), 0);
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }
}
