//! Share positions held against a market.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AccountId, MarketId, PositionId};
use super::market::Outcome;

/// Address of a position: the market that owns it and its id there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionRef {
    pub market_id: MarketId,
    pub position_id: PositionId,
}

impl PositionRef {
    #[must_use]
    pub const fn new(market_id: MarketId, position_id: PositionId) -> Self {
        Self {
            market_id,
            position_id,
        }
    }
}

/// Shares of one outcome held by one owner in one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    id: PositionId,
    market_id: MarketId,
    owner: AccountId,
    outcome: Outcome,
    shares: u64,
    opened_at: DateTime<Utc>,
}

impl Position {
    #[must_use]
    pub fn id(&self) -> PositionId {
        self.id
    }

    #[must_use]
    pub fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn shares(&self) -> u64 {
        self.shares
    }

    #[must_use]
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Reference usable with the registry's trading operations.
    #[must_use]
    pub fn reference(&self) -> PositionRef {
        PositionRef::new(self.market_id.clone(), self.id)
    }

    #[must_use]
    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        &self.owner == account
    }
}

/// All live positions of a single market.
///
/// Holds at most one position per `(owner, outcome)` pair and indexes it so
/// lookups by holder are O(1). Only the owning market mutates the book; the
/// mutators are infallible because the market validates amounts first.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<PositionId, Position>,
    by_holder: HashMap<(AccountId, Outcome), PositionId>,
    next_id: u64,
}

impl PositionBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    /// Find the position `owner` holds on `outcome`, if any.
    #[must_use]
    pub fn find(&self, owner: &AccountId, outcome: Outcome) -> Option<&Position> {
        self.by_holder
            .get(&(owner.clone(), outcome))
            .and_then(|id| self.positions.get(id))
    }

    /// Positions held by `owner`, in id order.
    #[must_use]
    pub fn held_by(&self, owner: &AccountId) -> Vec<&Position> {
        let mut held: Vec<_> = [Outcome::Yes, Outcome::No]
            .into_iter()
            .filter_map(|outcome| self.find(owner, outcome))
            .collect();
        held.sort_by_key(|p| p.id);
        held
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Set the share count of `owner`'s `outcome` position, creating it if
    /// needed. Returns its id.
    pub(crate) fn upsert(
        &mut self,
        market_id: &MarketId,
        owner: &AccountId,
        outcome: Outcome,
        shares: u64,
        now: DateTime<Utc>,
    ) -> PositionId {
        let key = (owner.clone(), outcome);
        if let Some(id) = self.by_holder.get(&key) {
            if let Some(position) = self.positions.get_mut(id) {
                position.shares = shares;
                return *id;
            }
        }

        self.next_id += 1;
        let id = PositionId::new(self.next_id);
        self.positions.insert(
            id,
            Position {
                id,
                market_id: market_id.clone(),
                owner: owner.clone(),
                outcome,
                shares,
                opened_at: now,
            },
        );
        self.by_holder.insert(key, id);
        id
    }

    /// Set the share count of an existing position, destroying it at zero.
    pub(crate) fn set_shares(&mut self, id: PositionId, shares: u64) {
        if shares == 0 {
            self.remove(id);
        } else if let Some(position) = self.positions.get_mut(&id) {
            position.shares = shares;
        }
    }

    /// Destroy a position, returning it.
    pub(crate) fn remove(&mut self, id: PositionId) -> Option<Position> {
        let position = self.positions.remove(&id)?;
        self.by_holder
            .remove(&(position.owner.clone(), position.outcome));
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> MarketId {
        MarketId::new("market-1")
    }

    #[test]
    fn upsert_creates_then_updates_same_position() {
        let mut book = PositionBook::new();
        let alice = AccountId::from("alice");
        let now = Utc::now();

        let first = book.upsert(&market(), &alice, Outcome::Yes, 10, now);
        let second = book.upsert(&market(), &alice, Outcome::Yes, 25, now);

        assert_eq!(first, second);
        assert_eq!(book.len(), 1);
        assert_eq!(book.find(&alice, Outcome::Yes).unwrap().shares(), 25);
    }

    #[test]
    fn outcomes_are_separate_positions() {
        let mut book = PositionBook::new();
        let alice = AccountId::from("alice");
        let now = Utc::now();

        let yes = book.upsert(&market(), &alice, Outcome::Yes, 10, now);
        let no = book.upsert(&market(), &alice, Outcome::No, 5, now);

        assert_ne!(yes, no);
        let held = book.held_by(&alice);
        assert_eq!(held.len(), 2);
        assert_eq!(held[0].outcome(), Outcome::Yes);
    }

    #[test]
    fn zero_shares_destroys_position_and_index() {
        let mut book = PositionBook::new();
        let bob = AccountId::from("bob");
        let id = book.upsert(&market(), &bob, Outcome::No, 3, Utc::now());

        book.set_shares(id, 0);

        assert!(book.get(id).is_none());
        assert!(book.find(&bob, Outcome::No).is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut book = PositionBook::new();
        let bob = AccountId::from("bob");
        let now = Utc::now();
        let first = book.upsert(&market(), &bob, Outcome::Yes, 3, now);
        book.remove(first);
        let second = book.upsert(&market(), &bob, Outcome::Yes, 3, now);
        assert_ne!(first, second);
    }

    #[test]
    fn reference_points_back_to_market() {
        let mut book = PositionBook::new();
        let carol = AccountId::from("carol");
        let id = book.upsert(&market(), &carol, Outcome::Yes, 1, Utc::now());
        let position = book.get(id).unwrap();
        assert_eq!(position.reference(), PositionRef::new(market(), id));
        assert!(position.is_owned_by(&carol));
    }
}
