//! The auction house: phase-guarded operations over global state.
//!
//! One [`AuctionHouse`] owns every auction record and book, the user
//! directory, the fee parameters, and the event log. Each operation is an
//! atomic unit: all validation and phase checks run before any state
//! mutation, and ledger transfers are assumed atomic with the operation.
//!
//! Inside a placement or cancellation batch, a duplicate key or a stale
//! hint is skipped silently; a validation failure (bad amount, price not
//! better than the floor, foreign order) rejects the whole batch.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use primitive_types::U256;

use openauction_book::OrderedOrderSet;
use openauction_clearing::{
    claim_order, fee_payouts, precompute_sum, settle_seller, verify_price, ClearingOutcome, Payout,
};
use openauction_types::constants::{FEE_DENOMINATOR, MAX_FEE_NUMERATOR};
use openauction_types::{
    short_address, Address, Asset, AuctionError, AuctionId, AuctionState, Event, OrderKey, Result,
    UserId,
};

use crate::directory::UserDirectory;
use crate::ledger::Ledger;

/// Parameters for [`AuctionHouse::initiate_auction`].
#[derive(Debug, Clone)]
pub struct AuctionParams {
    pub offered_asset: Asset,
    pub bidding_asset: Asset,
    pub order_cancellation_end: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
    /// Offered-asset atoms put up for sale.
    pub offered_amount: u128,
    /// Minimum bidding-asset proceeds the seller accepts for the full supply.
    pub min_buy_amount: u128,
    /// Bids must sell strictly more than this many bidding atoms.
    pub min_bid_sell_amount: u128,
    /// Offered-asset demand below which the auction refunds everyone.
    pub min_funding_threshold: U256,
}

/// One bid inside a [`AuctionHouse::place_orders`] batch.
#[derive(Debug, Clone, Copy)]
pub struct OrderPlacement {
    /// Offered-asset atoms wanted.
    pub buy_amount: u128,
    /// Bidding-asset atoms paid.
    pub sell_amount: u128,
}

#[derive(Debug)]
struct Auction {
    state: AuctionState,
    book: OrderedOrderSet,
}

/// Global engine state and the externally callable operations.
#[derive(Debug)]
pub struct AuctionHouse<L> {
    ledger: L,
    manager: Address,
    auctions: HashMap<AuctionId, Auction>,
    auction_counter: u64,
    directory: UserDirectory,
    fee_numerator: u64,
    fee_receiver_user_id: UserId,
    events: Vec<Event>,
}

impl<L: Ledger> AuctionHouse<L> {
    /// Create an engine with an empty directory. `manager` is the only
    /// address allowed to change fee parameters.
    #[must_use]
    pub fn new(ledger: L, manager: Address) -> Self {
        Self {
            ledger,
            manager,
            auctions: HashMap::new(),
            auction_counter: 0,
            directory: UserDirectory::new(),
            fee_numerator: 0,
            fee_receiver_user_id: UserId(0),
            events: Vec::new(),
        }
    }

    // =================================================================
    // Users and fees
    // =================================================================

    /// Register `address`, returning its (possibly pre-existing) user id.
    pub fn register_user(&mut self, address: Address) -> Result<UserId> {
        let (user_id, fresh) = self.directory.get_or_register(address)?;
        if fresh {
            self.events.push(Event::NewUser { user_id, address });
            self.events.push(Event::UserRegistration { user_id, address });
            tracing::info!(
                user = %user_id,
                address = %short_address(&address),
                "User registered"
            );
        }
        Ok(user_id)
    }

    /// Update the global fee parameters. Applies to auctions initiated
    /// afterwards; running auctions keep their snapshot.
    pub fn set_fee(
        &mut self,
        caller: Address,
        numerator: u64,
        receiver: Address,
    ) -> Result<()> {
        if caller != self.manager {
            return Err(AuctionError::UnauthorizedFeeChange);
        }
        if numerator > MAX_FEE_NUMERATOR {
            return Err(AuctionError::FeeTooHigh { numerator });
        }
        let (receiver_id, fresh) = self.directory.get_or_register(receiver)?;
        if fresh {
            self.events.push(Event::NewUser {
                user_id: receiver_id,
                address: receiver,
            });
        }
        self.fee_numerator = numerator;
        self.fee_receiver_user_id = receiver_id;
        tracing::info!(numerator, receiver = %receiver_id, "Fee parameters updated");
        Ok(())
    }

    // =================================================================
    // Auction lifecycle
    // =================================================================

    /// Open a new auction. Pulls the supply plus the fee deposit from the
    /// seller and snapshots the current fee numerator.
    pub fn initiate_auction(
        &mut self,
        caller: Address,
        params: AuctionParams,
        now: DateTime<Utc>,
    ) -> Result<AuctionId> {
        if params.offered_amount == 0 {
            return Err(AuctionError::InvalidOrder {
                reason: "offered amount must be positive".into(),
            });
        }
        if params.min_buy_amount == 0 {
            return Err(AuctionError::InvalidOrder {
                reason: "minimum buy amount must be positive".into(),
            });
        }
        if params.min_bid_sell_amount == 0 {
            return Err(AuctionError::InvalidOrder {
                reason: "minimum bid sell amount must be positive".into(),
            });
        }
        if params.auction_end <= now {
            return Err(AuctionError::InvalidOrder {
                reason: "auction end must lie in the future".into(),
            });
        }
        if params.order_cancellation_end > params.auction_end {
            return Err(AuctionError::InvalidOrder {
                reason: "cancellation period cannot outlast the auction".into(),
            });
        }

        let (seller, fresh) = self.directory.get_or_register(caller)?;
        if fresh {
            self.events.push(Event::NewUser {
                user_id: seller,
                address: caller,
            });
        }

        let fee_numerator = self.fee_numerator;
        let initial_order =
            OrderKey::encode(seller, params.min_buy_amount, params.offered_amount)?;

        // The supply plus the fee deposit moves into custody up front.
        let deposit = U256::from(params.offered_amount)
            * U256::from(FEE_DENOMINATOR + fee_numerator)
            / U256::from(FEE_DENOMINATOR);
        self.ledger.pull(&params.offered_asset, caller, deposit)?;

        self.auction_counter += 1;
        let auction_id = AuctionId(self.auction_counter);
        let state = AuctionState::new(
            params.offered_asset.clone(),
            params.bidding_asset.clone(),
            params.order_cancellation_end,
            params.auction_end,
            initial_order,
            params.min_bid_sell_amount,
            params.min_funding_threshold,
            fee_numerator,
        );
        self.auctions.insert(
            auction_id,
            Auction {
                state,
                book: OrderedOrderSet::new(),
            },
        );

        tracing::info!(
            auction = %auction_id,
            seller = %seller,
            offered_asset = %params.offered_asset,
            bidding_asset = %params.bidding_asset,
            offered_amount = params.offered_amount,
            min_buy_amount = params.min_buy_amount,
            "Auction initiated"
        );
        self.events.push(Event::NewAuction {
            auction_id,
            offered_asset: params.offered_asset,
            bidding_asset: params.bidding_asset,
            order_cancellation_end: params.order_cancellation_end,
            auction_end: params.auction_end,
            seller_user_id: seller,
            offered_amount: params.offered_amount,
            min_buy_amount: params.min_buy_amount,
            min_bid_sell_amount: params.min_bid_sell_amount,
            min_funding_threshold: params.min_funding_threshold,
            fee_numerator,
        });
        Ok(auction_id)
    }

    /// Place a batch of bids. Every order is validated up front; duplicate
    /// keys and unusable hints are then skipped silently. The summed
    /// bidding-asset volume of the accepted orders is pulled in one go.
    ///
    /// Returns the keys that entered the book.
    pub fn place_orders(
        &mut self,
        auction_id: AuctionId,
        caller: Address,
        orders: &[OrderPlacement],
        hints: &[OrderKey],
        now: DateTime<Utc>,
    ) -> Result<Vec<OrderKey>> {
        if orders.len() != hints.len() {
            return Err(AuctionError::InvalidOrder {
                reason: "one hint per order required".into(),
            });
        }

        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::AuctionNotFound(auction_id))?;
        auction.state.ensure_placement(now)?;

        let (user, fresh) = self.directory.get_or_register(caller)?;
        if fresh {
            self.events.push(Event::NewUser {
                user_id: user,
                address: caller,
            });
        }

        let (_, seller_buy, supply) = auction.state.initial_order.decode();
        for order in orders {
            if order.buy_amount == 0 {
                return Err(AuctionError::InvalidOrder {
                    reason: "zero buy amount".into(),
                });
            }
            if order.sell_amount <= auction.state.min_bid_sell_amount {
                return Err(AuctionError::InvalidOrder {
                    reason: "sell amount at or below the auction minimum".into(),
                });
            }
            // The limit price must be strictly better than the seller's
            // floor: buy_i * S < seller_buy * sell_i.
            let lhs = U256::from(order.buy_amount) * U256::from(supply);
            let rhs = U256::from(seller_buy) * U256::from(order.sell_amount);
            if lhs >= rhs {
                return Err(AuctionError::InvalidOrder {
                    reason: "limit price not better than the seller floor".into(),
                });
            }
        }

        let mut accepted = Vec::new();
        let mut bidding_total = U256::zero();
        for (order, &hint) in orders.iter().zip(hints) {
            let key = OrderKey::encode(user, order.buy_amount, order.sell_amount)?;
            if auction.book.insert(key, hint) {
                bidding_total += U256::from(order.sell_amount);
                accepted.push(key);
            }
        }

        if !accepted.is_empty() {
            let bidding_asset = auction.state.bidding_asset.clone();
            if let Err(err) = self.ledger.pull(&bidding_asset, caller, bidding_total) {
                for &key in &accepted {
                    auction.book.remove(key);
                }
                return Err(err);
            }
        }

        for &key in &accepted {
            let (_, buy_amount, sell_amount) = key.decode();
            tracing::debug!(
                auction = %auction_id,
                user = %user,
                buy_amount,
                sell_amount,
                "Sell order placed"
            );
            self.events.push(Event::NewSellOrder {
                auction_id,
                user_id: user,
                buy_amount,
                sell_amount,
            });
        }
        Ok(accepted)
    }

    /// Cancel a batch of the caller's own bids and refund their bidding
    /// volume. Keys no longer live in the book are skipped; a key owned by
    /// someone else rejects the whole batch.
    pub fn cancel_orders(
        &mut self,
        auction_id: AuctionId,
        caller: Address,
        keys: &[OrderKey],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::AuctionNotFound(auction_id))?;
        auction.state.ensure_cancellation(now)?;

        let (user, fresh) = self.directory.get_or_register(caller)?;
        if fresh {
            self.events.push(Event::NewUser {
                user_id: user,
                address: caller,
            });
        }
        for key in keys {
            if key.user_id() != user {
                return Err(AuctionError::NotOwner {
                    expected: user,
                    got: key.user_id(),
                });
            }
        }

        let mut refund = U256::zero();
        let mut removed = Vec::new();
        for &key in keys {
            if auction.book.remove_keep_history(key) {
                refund += U256::from(key.sell_amount());
                removed.push(key);
            }
        }

        if !refund.is_zero() {
            let bidding_asset = auction.state.bidding_asset.clone();
            self.ledger.push(&bidding_asset, caller, refund)?;
        }

        for key in removed {
            let (_, buy_amount, sell_amount) = key.decode();
            tracing::debug!(
                auction = %auction_id,
                user = %user,
                buy_amount,
                sell_amount,
                "Sell order cancelled"
            );
            self.events.push(Event::CancellationSellOrder {
                auction_id,
                user_id: user,
                buy_amount,
                sell_amount,
            });
        }
        Ok(())
    }

    /// Phase A of clearing: advance the interim walk `steps` positions.
    pub fn precompute_sum(
        &mut self,
        auction_id: AuctionId,
        steps: u64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::AuctionNotFound(auction_id))?;
        auction.state.ensure_solution(now)?;
        precompute_sum(&mut auction.state, &auction.book, steps)
    }

    /// Phase B of clearing: verify the candidate price, collect fees,
    /// settle the seller, and finish the auction.
    pub fn verify_price(
        &mut self,
        auction_id: AuctionId,
        candidate: OrderKey,
        now: DateTime<Utc>,
    ) -> Result<ClearingOutcome> {
        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::AuctionNotFound(auction_id))?;
        auction.state.ensure_solution(now)?;

        let outcome = verify_price(&mut auction.state, &auction.book, candidate)?;
        let offered_asset = auction.state.offered_asset.clone();
        let bidding_asset = auction.state.bidding_asset.clone();

        let fees = if !auction.state.funding_threshold_not_reached
            && auction.state.fee_numerator > 0
        {
            Some(fee_payouts(&auction.state)?)
        } else {
            None
        };
        let seller_payout = settle_seller(&mut auction.state)?;
        let seller_address = self.directory.resolve(seller_payout.user_id)?;

        if let Some(fees) = fees {
            let receiver_address = self.directory.resolve(self.fee_receiver_user_id)?;
            if !fees.receiver_offered.is_zero() {
                self.ledger
                    .push(&offered_asset, receiver_address, fees.receiver_offered)?;
            }
            if !fees.seller_offered.is_zero() {
                self.ledger
                    .push(&offered_asset, seller_address, fees.seller_offered)?;
            }
        }
        if !seller_payout.offered.is_zero() {
            self.ledger
                .push(&offered_asset, seller_address, seller_payout.offered)?;
        }
        if !seller_payout.bidding.is_zero() {
            self.ledger
                .push(&bidding_asset, seller_address, seller_payout.bidding)?;
        }

        tracing::info!(
            auction = %auction_id,
            price_numerator = outcome.price_numerator,
            price_denominator = outcome.price_denominator,
            case = ?outcome.case,
            total_buy = %outcome.total_buy,
            "Auction cleared"
        );
        self.events.push(Event::AuctionCleared {
            auction_id,
            price_numerator: outcome.price_numerator,
            price_denominator: outcome.price_denominator,
        });
        Ok(outcome)
    }

    /// Claim the payouts for a batch of one user's orders and remove them
    /// from the book. Repeated or already-claimed keys reject the batch.
    ///
    /// Returns the aggregate payout pushed to the owner.
    pub fn claim_participant(
        &mut self,
        auction_id: AuctionId,
        keys: &[OrderKey],
        now: DateTime<Utc>,
    ) -> Result<Payout> {
        let auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::AuctionNotFound(auction_id))?;
        auction.state.ensure_finished(now)?;

        let Some(first) = keys.first() else {
            return Err(AuctionError::InvalidOrder {
                reason: "empty claim batch".into(),
            });
        };
        let user = first.user_id();
        let mut seen = HashSet::new();
        for key in keys {
            if key.user_id() != user {
                return Err(AuctionError::NotOwner {
                    expected: user,
                    got: key.user_id(),
                });
            }
            if !auction.book.contains(*key) || !seen.insert(*key) {
                return Err(AuctionError::AlreadyClaimed(*key));
            }
        }

        let mut total = Payout {
            user_id: user,
            offered: U256::zero(),
            bidding: U256::zero(),
        };
        for &key in keys {
            let payout = claim_order(&auction.state, key)?;
            total.offered += payout.offered;
            total.bidding += payout.bidding;
            auction.book.remove(key);
        }

        let offered_asset = auction.state.offered_asset.clone();
        let bidding_asset = auction.state.bidding_asset.clone();
        let address = self.directory.resolve(user)?;
        if !total.offered.is_zero() {
            self.ledger.push(&offered_asset, address, total.offered)?;
        }
        if !total.bidding.is_zero() {
            self.ledger.push(&bidding_asset, address, total.bidding)?;
        }

        for &key in keys {
            let (_, buy_amount, sell_amount) = key.decode();
            self.events.push(Event::ClaimedFromOrder {
                auction_id,
                user_id: user,
                buy_amount,
                sell_amount,
            });
        }
        tracing::info!(
            auction = %auction_id,
            user = %user,
            orders = keys.len(),
            offered = %total.offered,
            bidding = %total.bidding,
            "Orders claimed"
        );
        Ok(total)
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn auction_state(&self, auction_id: AuctionId) -> Option<&AuctionState> {
        self.auctions.get(&auction_id).map(|a| &a.state)
    }

    #[must_use]
    pub fn order_book(&self, auction_id: AuctionId) -> Option<&OrderedOrderSet> {
        self.auctions.get(&auction_id).map(|a| &a.book)
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Host-side access to the ledger (funding accounts, reconciliation).
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    #[must_use]
    pub fn fee_numerator(&self) -> u64 {
        self.fee_numerator
    }

    /// Number of auctions initiated so far; the latest auction id.
    #[must_use]
    pub fn auction_counter(&self) -> u64 {
        self.auction_counter
    }

    /// Events emitted so far, in operation order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the event log for host-side persistence.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
