//! Request tokens
//!
//! Every fetch is tagged with a token drawn from a monotonically increasing
//! counter. Only the latest token per scope may complete; anything older is
//! stale and its result is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token attached to one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a fetch is loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingScope {
    Buildings,
    Stores,
    Inventory,
}

impl LoadingScope {
    pub const ALL: [LoadingScope; 3] = [Self::Buildings, Self::Stores, Self::Inventory];
}

impl fmt::Display for LoadingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buildings => "buildings",
            Self::Stores => "stores",
            Self::Inventory => "inventory",
        })
    }
}

/// Latest outstanding token per scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequests {
    next: u64,
    buildings: Option<RequestToken>,
    stores: Option<RequestToken>,
    inventory: Option<RequestToken>,
}

impl PendingRequests {
    fn slot(&mut self, scope: LoadingScope) -> &mut Option<RequestToken> {
        match scope {
            LoadingScope::Buildings => &mut self.buildings,
            LoadingScope::Stores => &mut self.stores,
            LoadingScope::Inventory => &mut self.inventory,
        }
    }

    /// Outstanding token for `scope`
    #[inline]
    #[must_use]
    pub fn current(&self, scope: LoadingScope) -> Option<RequestToken> {
        match scope {
            LoadingScope::Buildings => self.buildings,
            LoadingScope::Stores => self.stores,
            LoadingScope::Inventory => self.inventory,
        }
    }

    /// Issue a fresh token for `scope`, superseding any outstanding one
    pub fn issue(&mut self, scope: LoadingScope) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);
        *self.slot(scope) = Some(token);
        token
    }

    /// Whether `token` is the outstanding one for `scope`
    #[inline]
    #[must_use]
    pub fn is_current(&self, scope: LoadingScope, token: RequestToken) -> bool {
        self.current(scope) == Some(token)
    }

    /// Settle a completion; true if it was current (and is now cleared)
    pub fn settle(&mut self, scope: LoadingScope, token: RequestToken) -> bool {
        let slot = self.slot(scope);
        if *slot == Some(token) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Forget the outstanding token for `scope`
    pub fn cancel(&mut self, scope: LoadingScope) {
        *self.slot(scope) = None;
    }

    /// Most downstream scope with an outstanding request
    #[must_use]
    pub fn loading(&self) -> Option<LoadingScope> {
        LoadingScope::ALL
            .into_iter()
            .rev()
            .find(|scope| self.current(*scope).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn newer_token_supersedes() {
        let mut pending = PendingRequests::default();
        let first = pending.issue(LoadingScope::Stores);
        let second = pending.issue(LoadingScope::Stores);

        assert!(first < second);
        assert!(!pending.settle(LoadingScope::Stores, first));
        assert!(pending.settle(LoadingScope::Stores, second));
        assert!(pending.current(LoadingScope::Stores).is_none());
    }

    #[test]
    fn scopes_are_independent() {
        let mut pending = PendingRequests::default();
        let b = pending.issue(LoadingScope::Buildings);
        let s = pending.issue(LoadingScope::Stores);

        assert!(!pending.settle(LoadingScope::Stores, b));
        assert!(pending.settle(LoadingScope::Buildings, b));
        assert!(pending.is_current(LoadingScope::Stores, s));
    }

    #[test]
    fn loading_prefers_downstream_scope() {
        let mut pending = PendingRequests::default();
        assert_eq!(pending.loading(), None);

        pending.issue(LoadingScope::Buildings);
        pending.issue(LoadingScope::Inventory);
        assert_eq!(pending.loading(), Some(LoadingScope::Inventory));

        pending.cancel(LoadingScope::Inventory);
        assert_eq!(pending.loading(), Some(LoadingScope::Buildings));
    }

    proptest! {
        #[test]
        fn prop_only_latest_token_settles(issues in 1usize..20) {
            let mut pending = PendingRequests::default();
            let tokens: Vec<_> = (0..issues).map(|_| pending.issue(LoadingScope::Inventory)).collect();

            for stale in &tokens[..tokens.len() - 1] {
                prop_assert!(!pending.settle(LoadingScope::Inventory, *stale));
            }
            prop_assert!(pending.settle(LoadingScope::Inventory, *tokens.last().unwrap()));
        }
    }
}
