//! Last-write-wins conflict policy.

use serde::{Deserialize, Serialize};

/// Which side of a conflict is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    Local,
    Server,
}

/// A timestamped revision of some entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision<T> {
    pub updated_at_ms: i64,
    pub value: T,
}

/// Compares revision timestamps. No field-level merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    /// The server wins only with a strictly newer timestamp; ties keep local.
    pub fn resolve(local_updated_at: i64, server_updated_at: i64) -> Winner {
        if server_updated_at > local_updated_at {
            Winner::Server
        } else {
            Winner::Local
        }
    }

    /// Keep the winning revision.
    pub fn resolve_revisions<T>(local: Revision<T>, server: Revision<T>) -> (Winner, Revision<T>) {
        match Self::resolve(local.updated_at_ms, server.updated_at_ms) {
            Winner::Server => (Winner::Server, server),
            Winner::Local => (Winner::Local, local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_server_wins() {
        assert_eq!(ConflictResolver::resolve(1000, 2000), Winner::Server);
    }

    #[test]
    fn newer_local_wins() {
        assert_eq!(ConflictResolver::resolve(3000, 2000), Winner::Local);
    }

    #[test]
    fn tie_favors_local() {
        assert_eq!(ConflictResolver::resolve(1000, 1000), Winner::Local);
    }

    #[test]
    fn picks_winning_revision() {
        let local = Revision { updated_at_ms: 5, value: "mine" };
        let server = Revision { updated_at_ms: 9, value: "theirs" };
        let (winner, kept) = ConflictResolver::resolve_revisions(local, server);
        assert_eq!(winner, Winner::Server);
        assert_eq!(kept.value, "theirs");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: swapping distinct timestamps swaps the winner.
            #[test]
            fn antisymmetric(a in any::<i64>(), b in any::<i64>()) {
                prop_assume!(a != b);
                let forward = ConflictResolver::resolve(a, b);
                let backward = ConflictResolver::resolve(b, a);
                prop_assert_ne!(forward, backward);
            }
        }
    }
}
