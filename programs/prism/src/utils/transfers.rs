//! SPL token transfer helpers
//!
//! Thin wrappers over the token program CPI so handlers stay focused on
//! market state. Vault-side transfers sign with the market PDA.

use anchor_lang::prelude::*;
#[allow(deprecated)]
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

/// Transfer from a user-owned token account into a vault.
pub fn transfer_from_user<'info>(
    token_program: &Program<'info, Token>,
    from: &Account<'info, TokenAccount>,
    to: &Account<'info, TokenAccount>,
    authority: &Signer<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    #[allow(deprecated)]
    token::transfer(
        CpiContext::new(
            token_program.to_account_info(),
            Transfer {
                from: from.to_account_info(),
                to: to.to_account_info(),
                authority: authority.to_account_info(),
            },
        ),
        amount,
    )
}

/// Transfer from a market vault to a user-owned token account, signed by the
/// market PDA.
pub fn transfer_from_vault<'info>(
    token_program: &Program<'info, Token>,
    from: &Account<'info, TokenAccount>,
    to: &Account<'info, TokenAccount>,
    market_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    #[allow(deprecated)]
    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: from.to_account_info(),
                to: to.to_account_info(),
                authority: market_authority,
            },
            signer_seeds,
        ),
        amount,
    )
}
