//! In-memory asset book.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{Result, TokenError};
use crate::port::outbound::TokenLedger;

/// Point-in-time copy of every balance and allowance.
#[derive(Debug, Clone, Default)]
pub struct TokenSnapshot {
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl TokenSnapshot {
    fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<(), TokenError> {
        let balance = self.balance(token, from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                token,
                owner: from,
                balance,
                needed: amount,
            });
        }
        self.balances.insert((token, from), balance - amount);

        let credited = self
            .balance(token, to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert((token, to), credited);
        Ok(())
    }
}

/// Multi-asset balance book with ERC-20 transfer and allowance rules.
///
/// A `U256::MAX` allowance is treated as unlimited and never decremented.
#[derive(Debug, Default)]
pub struct InMemoryTokens {
    book: Mutex<TokenSnapshot>,
}

impl InMemoryTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `to` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Overflow`] if the balance would exceed `U256::MAX`.
    pub fn mint(&self, token: Address, to: Address, amount: U256) -> Result<()> {
        let mut book = self.book.lock();
        let credited = book
            .balance(token, to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        book.balances.insert((token, to), credited);
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> TokenSnapshot {
        self.book.lock().clone()
    }

    pub fn restore(&self, snapshot: TokenSnapshot) {
        *self.book.lock() = snapshot;
    }
}

impl TokenLedger for InMemoryTokens {
    fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.book.lock().balance(token, owner)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.book.lock().allowance(token, owner, spender)
    }

    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        self.book.lock().move_balance(token, from, to, amount)?;
        trace!(token = %token, from = %from, to = %to, amount = %amount, "transfer");
        Ok(())
    }

    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let mut book = self.book.lock();
        let allowance = book.allowance(token, from, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                allowance,
                needed: amount,
            }
            .into());
        }

        book.move_balance(token, from, to, amount)?;
        if allowance != U256::MAX {
            book.allowances
                .insert((token, from, spender), allowance - amount);
        }
        trace!(token = %token, spender = %spender, from = %from, to = %to, amount = %amount, "transfer_from");
        Ok(())
    }

    fn increase_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()> {
        let mut book = self.book.lock();
        let granted = book
            .allowance(token, owner, spender)
            .saturating_add(amount);
        book.allowances.insert((token, owner, spender), granted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const TOKEN: Address = Address::ZERO;

    fn alice() -> Address {
        Address::repeat_byte(0xA1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xB0)
    }

    #[test]
    fn transfer_moves_balance() {
        let tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, alice(), U256::from(100)).unwrap();

        tokens.transfer(TOKEN, alice(), bob(), U256::from(40)).unwrap();

        assert_eq!(tokens.balance_of(TOKEN, alice()), U256::from(60));
        assert_eq!(tokens.balance_of(TOKEN, bob()), U256::from(40));
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, alice(), U256::from(10)).unwrap();

        let err = tokens
            .transfer(TOKEN, alice(), bob(), U256::from(11))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Token(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(tokens.balance_of(TOKEN, alice()), U256::from(10));
    }

    #[test]
    fn allowances_are_additive_and_spent() {
        let tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, alice(), U256::from(100)).unwrap();
        tokens
            .increase_allowance(TOKEN, alice(), bob(), U256::from(30))
            .unwrap();
        tokens
            .increase_allowance(TOKEN, alice(), bob(), U256::from(20))
            .unwrap();
        assert_eq!(tokens.allowance(TOKEN, alice(), bob()), U256::from(50));

        tokens
            .transfer_from(TOKEN, bob(), alice(), bob(), U256::from(45))
            .unwrap();
        assert_eq!(tokens.allowance(TOKEN, alice(), bob()), U256::from(5));
        assert_eq!(tokens.balance_of(TOKEN, bob()), U256::from(45));

        let err = tokens
            .transfer_from(TOKEN, bob(), alice(), bob(), U256::from(6))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Token(TokenError::InsufficientAllowance { .. })
        ));
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, alice(), U256::from(100)).unwrap();
        tokens
            .increase_allowance(TOKEN, alice(), bob(), U256::MAX)
            .unwrap();

        tokens
            .transfer_from(TOKEN, bob(), alice(), bob(), U256::from(100))
            .unwrap();
        assert_eq!(tokens.allowance(TOKEN, alice(), bob()), U256::MAX);
    }

    #[test]
    fn restore_discards_later_changes() {
        let tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, alice(), U256::from(100)).unwrap();
        let snapshot = tokens.snapshot();

        tokens.transfer(TOKEN, alice(), bob(), U256::from(100)).unwrap();
        tokens.restore(snapshot);

        assert_eq!(tokens.balance_of(TOKEN, alice()), U256::from(100));
        assert_eq!(tokens.balance_of(TOKEN, bob()), U256::ZERO);
    }
}
