//! The bidirectional address / user-id directory.
//!
//! Ids are dense and monotonic from 0, so the reverse map is a plain
//! vector indexed by id. Once assigned, an id never changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use openauction_types::{Address, AuctionError, Result, UserId};

/// Bidirectional `address <-> user_id` map with monotonic id allocation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserDirectory {
    ids: HashMap<Address, UserId>,
    addresses: Vec<Address>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the id for `address`, registering it if unseen.
    ///
    /// Returns the id and whether the registration was fresh.
    pub fn get_or_register(&mut self, address: Address) -> Result<(UserId, bool)> {
        if let Some(&id) = self.ids.get(&address) {
            return Ok((id, false));
        }
        let next = self.addresses.len() as u64;
        if next == u64::MAX {
            return Err(AuctionError::UserIdSpaceExhausted);
        }
        let id = UserId(next);
        self.ids.insert(address, id);
        self.addresses.push(address);
        Ok((id, true))
    }

    /// Resolve an issued id back to its address.
    pub fn resolve(&self, user_id: UserId) -> Result<Address> {
        self.addresses
            .get(user_id.0 as usize)
            .copied()
            .ok_or_else(|| AuctionError::Internal(format!("unknown {user_id}")))
    }

    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.ids.contains_key(address)
    }

    #[must_use]
    pub fn num_users(&self) -> u64 {
        self.addresses.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn ids_are_consecutive_from_zero() {
        let mut dir = UserDirectory::new();
        let (a, fresh_a) = dir.get_or_register(addr(1)).unwrap();
        let (b, fresh_b) = dir.get_or_register(addr(2)).unwrap();
        assert_eq!(a, UserId(0));
        assert_eq!(b, UserId(1));
        assert!(fresh_a && fresh_b);
        assert_eq!(dir.num_users(), 2);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut dir = UserDirectory::new();
        let (first, fresh) = dir.get_or_register(addr(1)).unwrap();
        assert!(fresh);
        let (second, fresh) = dir.get_or_register(addr(1)).unwrap();
        assert!(!fresh);
        assert_eq!(first, second);
        assert_eq!(dir.num_users(), 1);
    }

    #[test]
    fn resolve_inverts_registration() {
        let mut dir = UserDirectory::new();
        let (id, _) = dir.get_or_register(addr(7)).unwrap();
        assert_eq!(dir.resolve(id).unwrap(), addr(7));
    }

    #[test]
    fn resolve_unknown_id_fails() {
        let dir = UserDirectory::new();
        assert!(dir.resolve(UserId(0)).is_err());
    }

    #[test]
    fn contains_reflects_registration() {
        let mut dir = UserDirectory::new();
        assert!(!dir.contains(&addr(5)));
        dir.get_or_register(addr(5)).unwrap();
        assert!(dir.contains(&addr(5)));
    }
}
