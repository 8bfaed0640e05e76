//! In-memory lending ledger.
//!
//! Isolated markets with share-based debt, per-account authorization and
//! synchronous callbacks on supply-collateral and repay. Interest never
//! accrues, and prices come from a fixed table keyed by oracle address that
//! stands in for a real price feed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;
use tracing::debug;

use super::shares::{
    mul_div_down, oracle_price_scale, to_assets_down, to_assets_up, to_shares_down, to_shares_up,
    w_mul_down,
};
use crate::domain::{MarketDescriptor, MarketId, Position, WAD};
use crate::error::{LedgerError, Result};
use crate::port::outbound::{Caller, LendingLedger, TokenLedger};

/// Aggregate supply and borrow totals of one market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketTotals {
    pub supply_assets: U256,
    pub supply_shares: U256,
    pub borrow_assets: U256,
    pub borrow_shares: U256,
}

#[derive(Debug, Clone)]
struct MarketRecord {
    params: MarketDescriptor,
    totals: MarketTotals,
}

/// Point-in-time copy of the whole ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    markets: HashMap<MarketId, MarketRecord>,
    positions: HashMap<(MarketId, Address), Position>,
    authorizations: HashSet<(Address, Address)>,
    prices: HashMap<Address, U256>,
}

impl LedgerSnapshot {
    fn record(&self, id: MarketId) -> std::result::Result<&MarketRecord, LedgerError> {
        self.markets
            .get(&id)
            .ok_or(LedgerError::MarketNotCreated(id))
    }

    fn position(&self, id: MarketId, account: Address) -> Position {
        self.positions
            .get(&(id, account))
            .copied()
            .unwrap_or_default()
    }

    fn is_authorized(&self, caller: Address, on_behalf: Address) -> bool {
        caller == on_behalf || self.authorizations.contains(&(on_behalf, caller))
    }

    fn ensure_authorized(
        &self,
        caller: Address,
        on_behalf: Address,
    ) -> std::result::Result<(), LedgerError> {
        if self.is_authorized(caller, on_behalf) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized { caller, on_behalf })
        }
    }

    /// Whether `position` stays within the market's borrow capacity.
    fn is_healthy(
        &self,
        params: &MarketDescriptor,
        totals: &MarketTotals,
        position: &Position,
    ) -> std::result::Result<bool, LedgerError> {
        if !position.has_debt() {
            return Ok(true);
        }

        let price = self
            .prices
            .get(&params.oracle)
            .copied()
            .ok_or(LedgerError::PriceUnavailable(params.oracle))?;
        let borrowed = to_assets_up(
            position.borrow_shares,
            totals.borrow_assets,
            totals.borrow_shares,
        )?;
        let capacity = w_mul_down(
            mul_div_down(position.collateral, price, oracle_price_scale())?,
            params.lltv,
        )?;

        Ok(capacity >= borrowed)
    }
}

fn exactly_one_zero(assets: U256, shares: U256) -> std::result::Result<(), LedgerError> {
    if assets.is_zero() == shares.is_zero() {
        return Err(LedgerError::InconsistentInput);
    }
    Ok(())
}

fn nonzero_address(address: Address) -> std::result::Result<(), LedgerError> {
    if address.is_zero() {
        return Err(LedgerError::ZeroAddress);
    }
    Ok(())
}

fn add(a: U256, b: U256) -> std::result::Result<U256, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::MathOverflow)
}

/// Lending ledger kept entirely in memory.
///
/// State mutations happen under a lock that is always released before the
/// ledger calls out to a callback or the token book, so a callback may
/// re-enter the ledger freely.
pub struct InMemoryLedger {
    address: Address,
    tokens: Arc<dyn TokenLedger>,
    state: Mutex<LedgerSnapshot>,
}

impl InMemoryLedger {
    pub fn new(address: Address, tokens: Arc<dyn TokenLedger>) -> Self {
        Self {
            address,
            tokens,
            state: Mutex::new(LedgerSnapshot::default()),
        }
    }

    /// Register a market.
    ///
    /// # Errors
    ///
    /// Fails if the market exists or the LLTV is not below 100%.
    pub fn create_market(&self, params: MarketDescriptor) -> Result<MarketId> {
        let id = params.id();
        if params.lltv.is_zero() || params.lltv >= U256::from(WAD) {
            return Err(LedgerError::LltvNotAllowed(params.lltv).into());
        }

        let mut state = self.state.lock();
        if state.markets.contains_key(&id) {
            return Err(LedgerError::MarketAlreadyCreated(id).into());
        }
        state.markets.insert(
            id,
            MarketRecord {
                params,
                totals: MarketTotals::default(),
            },
        );
        debug!(market = %id, "Market created");
        Ok(id)
    }

    /// Fix the price reported for `oracle`, scaled by 1e36.
    pub fn set_price(&self, oracle: Address, price: U256) {
        self.state.lock().prices.insert(oracle, price);
    }

    /// Let `authorized` manage the positions of `authorizer`.
    pub fn set_authorization(&self, authorizer: Address, authorized: Address, enabled: bool) {
        let mut state = self.state.lock();
        if enabled {
            state.authorizations.insert((authorizer, authorized));
        } else {
            state.authorizations.remove(&(authorizer, authorized));
        }
    }

    #[must_use]
    pub fn is_authorized(&self, authorizer: Address, authorized: Address) -> bool {
        self.state.lock().is_authorized(authorized, authorizer)
    }

    #[must_use]
    pub fn market(&self, id: MarketId) -> Option<MarketDescriptor> {
        self.state.lock().markets.get(&id).map(|record| record.params)
    }

    #[must_use]
    pub fn totals(&self, id: MarketId) -> Option<MarketTotals> {
        self.state.lock().markets.get(&id).map(|record| record.totals)
    }

    /// Lend `assets` of the loan asset into `market` for `on_behalf`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown market, zero amount, or if the caller cannot pay.
    pub fn supply(
        &self,
        caller: Address,
        market: &MarketDescriptor,
        assets: U256,
        on_behalf: Address,
    ) -> Result<U256> {
        if assets.is_zero() {
            return Err(LedgerError::ZeroAmount.into());
        }
        nonzero_address(on_behalf)?;

        let id = market.id();
        let shares = {
            let mut state = self.state.lock();
            let mut totals = state.record(id)?.totals;
            let shares = to_shares_down(assets, totals.supply_assets, totals.supply_shares)?;
            totals.supply_assets = add(totals.supply_assets, assets)?;
            totals.supply_shares = add(totals.supply_shares, shares)?;

            let mut position = state.position(id, on_behalf);
            position.supply_shares = add(position.supply_shares, shares)?;
            state.positions.insert((id, on_behalf), position);
            if let Some(record) = state.markets.get_mut(&id) {
                record.totals = totals;
            }
            shares
        };

        self.tokens
            .transfer_from(market.loan_token, self.address, caller, self.address, assets)?;
        debug!(market = %id, on_behalf = %on_behalf, assets = %assets, "Supplied");
        Ok(shares)
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().clone()
    }

    pub fn restore(&self, snapshot: LedgerSnapshot) {
        *self.state.lock() = snapshot;
    }
}

impl LendingLedger for InMemoryLedger {
    fn address(&self) -> Address {
        self.address
    }

    fn position(&self, market: MarketId, account: Address) -> Position {
        self.state.lock().position(market, account)
    }

    fn supply_collateral(
        &self,
        caller: Caller<'_>,
        market: &MarketDescriptor,
        assets: U256,
        on_behalf: Address,
        data: &[u8],
    ) -> Result<()> {
        if assets.is_zero() {
            return Err(LedgerError::ZeroAmount.into());
        }
        nonzero_address(on_behalf)?;

        let id = market.id();
        {
            let mut state = self.state.lock();
            state.record(id)?;
            let mut position = state.position(id, on_behalf);
            position.collateral = add(position.collateral, assets)?;
            state.positions.insert((id, on_behalf), position);
        }
        debug!(market = %id, on_behalf = %on_behalf, assets = %assets, "Collateral credited");

        if !data.is_empty() {
            let callbacks = caller
                .callbacks()
                .ok_or(LedgerError::CallbackUnsupported(caller.address()))?;
            callbacks.on_supply_collateral(self.address, assets, data)?;
        }

        self.tokens.transfer_from(
            market.collateral_token,
            self.address,
            caller.address(),
            self.address,
            assets,
        )
    }

    fn withdraw_collateral(
        &self,
        caller: Address,
        market: &MarketDescriptor,
        assets: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<()> {
        if assets.is_zero() {
            return Err(LedgerError::ZeroAmount.into());
        }
        nonzero_address(receiver)?;

        let id = market.id();
        {
            let mut state = self.state.lock();
            state.ensure_authorized(caller, on_behalf)?;
            let record = state.record(id)?;
            let (params, totals) = (record.params, record.totals);

            let mut position = state.position(id, on_behalf);
            position.collateral = position.collateral.checked_sub(assets).ok_or(
                LedgerError::WithdrawExceedsCollateral {
                    account: on_behalf,
                    amount: assets,
                },
            )?;
            if !state.is_healthy(&params, &totals, &position)? {
                return Err(LedgerError::InsufficientCollateral {
                    market: id,
                    account: on_behalf,
                }
                .into());
            }
            state.positions.insert((id, on_behalf), position);
        }
        debug!(market = %id, on_behalf = %on_behalf, assets = %assets, "Collateral withdrawn");

        self.tokens
            .transfer(market.collateral_token, self.address, receiver, assets)
    }

    fn borrow(
        &self,
        caller: Address,
        market: &MarketDescriptor,
        assets: U256,
        shares: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(U256, U256)> {
        exactly_one_zero(assets, shares)?;
        nonzero_address(receiver)?;

        let id = market.id();
        let (assets, shares) = {
            let mut state = self.state.lock();
            state.ensure_authorized(caller, on_behalf)?;
            let record = state.record(id)?;
            let (params, mut totals) = (record.params, record.totals);

            let (assets, shares) = if assets.is_zero() {
                (
                    to_assets_down(shares, totals.borrow_assets, totals.borrow_shares)?,
                    shares,
                )
            } else {
                (
                    assets,
                    to_shares_up(assets, totals.borrow_assets, totals.borrow_shares)?,
                )
            };

            let mut position = state.position(id, on_behalf);
            position.borrow_shares = add(position.borrow_shares, shares)?;
            totals.borrow_shares = add(totals.borrow_shares, shares)?;
            totals.borrow_assets = add(totals.borrow_assets, assets)?;

            if !state.is_healthy(&params, &totals, &position)? {
                return Err(LedgerError::InsufficientCollateral {
                    market: id,
                    account: on_behalf,
                }
                .into());
            }
            if totals.borrow_assets > totals.supply_assets {
                return Err(LedgerError::InsufficientLiquidity(id).into());
            }

            state.positions.insert((id, on_behalf), position);
            if let Some(record) = state.markets.get_mut(&id) {
                record.totals = totals;
            }
            (assets, shares)
        };
        debug!(market = %id, on_behalf = %on_behalf, assets = %assets, shares = %shares, "Borrowed");

        self.tokens
            .transfer(market.loan_token, self.address, receiver, assets)?;
        Ok((assets, shares))
    }

    fn repay(
        &self,
        caller: Caller<'_>,
        market: &MarketDescriptor,
        assets: U256,
        shares: U256,
        on_behalf: Address,
        data: &[u8],
    ) -> Result<(U256, U256)> {
        exactly_one_zero(assets, shares)?;
        nonzero_address(on_behalf)?;

        let id = market.id();
        let (assets, shares) = {
            let mut state = self.state.lock();
            let mut totals = state.record(id)?.totals;

            let (assets, shares) = if assets.is_zero() {
                (
                    to_assets_up(shares, totals.borrow_assets, totals.borrow_shares)?,
                    shares,
                )
            } else {
                (
                    assets,
                    to_shares_down(assets, totals.borrow_assets, totals.borrow_shares)?,
                )
            };

            let mut position = state.position(id, on_behalf);
            position.borrow_shares = position.borrow_shares.checked_sub(shares).ok_or(
                LedgerError::RepayExceedsDebt {
                    account: on_behalf,
                    shares,
                },
            )?;
            totals.borrow_shares = totals.borrow_shares.saturating_sub(shares);
            totals.borrow_assets = totals.borrow_assets.saturating_sub(assets);

            state.positions.insert((id, on_behalf), position);
            if let Some(record) = state.markets.get_mut(&id) {
                record.totals = totals;
            }
            (assets, shares)
        };
        debug!(market = %id, on_behalf = %on_behalf, assets = %assets, shares = %shares, "Debt repaid");

        if !data.is_empty() {
            let callbacks = caller
                .callbacks()
                .ok_or(LedgerError::CallbackUnsupported(caller.address()))?;
            callbacks.on_repay(self.address, assets, data)?;
        }

        self.tokens.transfer_from(
            market.loan_token,
            self.address,
            caller.address(),
            self.address,
            assets,
        )?;
        Ok((assets, shares))
    }
}
