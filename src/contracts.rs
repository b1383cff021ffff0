//! Contract Definitions
//!
//! Solidity interfaces used by the live agents, defined with alloy's
//! `sol!` macro. `#[sol(rpc)]` generates instance types that can make
//! calls through any alloy Provider.
//!
//! Created: 2026-10-19

use alloy::sol;

// ── ERC20 ─────────────────────────────────────────────────────────────

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy::sol_types::SolCall;

    #[test]
    fn test_transfer_calldata_layout() {
        let call = IERC20::transferCall {
            to: Address::repeat_byte(0x11),
            amount: U256::from(1u64),
        };
        let data = call.abi_encode();

        // selector + address word + amount word
        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data[4 + 31], 0x11);
        assert_eq!(data[4 + 32 + 31], 1);
    }

    #[test]
    fn test_balance_of_selector() {
        let call = IERC20::balanceOfCall { account: Address::ZERO };
        assert_eq!(&call.abi_encode()[..4], &[0x70, 0xa0, 0x82, 0x31]);
    }
}
