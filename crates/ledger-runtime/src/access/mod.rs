//! # Access Control
//!
//! Maps an authenticated address to a [`Caller`] with its role. The
//! transport layer authenticates; this module only decides the role.

use std::collections::BTreeSet;

use housing_ledger::domain::{Address, Caller};
use tracing::debug;

/// Resolves caller roles from the configured admin set.
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    admins: BTreeSet<Address>,
    genesis_admin: Option<Address>,
}

impl RoleResolver {
    /// Creates a resolver for the given admins, in configured order.
    #[must_use]
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        let mut set = BTreeSet::new();
        let mut genesis_admin = None;
        for admin in admins {
            genesis_admin.get_or_insert(admin);
            set.insert(admin);
        }
        Self {
            admins: set,
            genesis_admin,
        }
    }

    /// Caller for `address`: admin if configured as one, member otherwise.
    #[must_use]
    pub fn resolve(&self, address: Address) -> Caller {
        if self.admins.contains(&address) {
            debug!(caller = %address, "Resolved admin caller");
            Caller::admin(address)
        } else {
            Caller::member(address)
        }
    }

    /// The admin that applies genesis data: the first configured one.
    #[must_use]
    pub fn genesis_admin(&self) -> Option<Caller> {
        self.genesis_admin.map(Caller::admin)
    }

    /// Number of configured admins.
    #[must_use]
    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }
}
