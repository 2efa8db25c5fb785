//! The ledger collaborator: asset custody lives outside the engine.
//!
//! The engine issues abstract pulls (escrow in) and pushes (payout out);
//! both are assumed atomic with the calling operation, so a failure
//! propagates as the operation's error without leaving partial transfers
//! behind. The in-memory implementation backs the test suites.

use std::collections::HashMap;

use primitive_types::U256;

use openauction_types::{Address, Asset, AuctionError, Result};

/// Asset custody operations the engine delegates.
pub trait Ledger {
    /// Take `amount` atoms of `asset` from `from` into engine custody.
    fn pull(&mut self, asset: &Asset, from: Address, amount: U256) -> Result<()>;

    /// Credit `amount` atoms of `asset` from engine custody to `to`.
    fn push(&mut self, asset: &Asset, to: Address, amount: U256) -> Result<()>;
}

/// A plain balance-map ledger for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(Address, Asset), U256>,
    /// Atoms currently held by the engine, per asset.
    custody: HashMap<Asset, U256>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with funds.
    pub fn deposit(&mut self, asset: &Asset, owner: Address, amount: U256) {
        let entry = self.balances.entry((owner, asset.clone())).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// The free balance of an account.
    #[must_use]
    pub fn balance(&self, asset: &Asset, owner: Address) -> U256 {
        self.balances
            .get(&(owner, asset.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Atoms of `asset` currently held in engine custody.
    #[must_use]
    pub fn custody(&self, asset: &Asset) -> U256 {
        self.custody.get(asset).copied().unwrap_or_default()
    }

    /// Total supply of `asset` across all accounts and custody.
    #[must_use]
    pub fn total_supply(&self, asset: &Asset) -> U256 {
        let held: U256 = self
            .balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .fold(U256::zero(), |acc, (_, amount)| acc + amount);
        held + self.custody(asset)
    }
}

impl Ledger for InMemoryLedger {
    fn pull(&mut self, asset: &Asset, from: Address, amount: U256) -> Result<()> {
        let available = self.balance(asset, from);
        if available < amount {
            return Err(AuctionError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances
            .insert((from, asset.clone()), available - amount);
        let held = self.custody.entry(asset.clone()).or_default();
        *held = held
            .checked_add(amount)
            .ok_or(AuctionError::OverflowOrNarrowing)?;
        Ok(())
    }

    fn push(&mut self, asset: &Asset, to: Address, amount: U256) -> Result<()> {
        let held = self.custody.entry(asset.clone()).or_default();
        *held = held
            .checked_sub(amount)
            .ok_or(AuctionError::OverflowOrNarrowing)?;
        let entry = self.balances.entry((to, asset.clone())).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(AuctionError::OverflowOrNarrowing)?;
        Ok(())
    }
}
