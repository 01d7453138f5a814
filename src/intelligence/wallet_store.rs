use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::WalletProfile;

/// In-memory rolling statistics per wallet, created lazily on first sight.
///
/// Ordering contract: `snapshot` is taken before the current trade is
/// scored, `record` is applied after, so a trade never counts toward its
/// own wallet average.
#[derive(Debug, Default)]
pub struct WalletHistoryStore {
    wallets: HashMap<String, WalletProfile>,
}

impl WalletHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current profile for a wallet; zero-valued for unseen wallets.
    pub fn snapshot(&self, wallet_address: &str) -> WalletProfile {
        self.wallets.get(wallet_address).cloned().unwrap_or_default()
    }

    pub fn record(&mut self, wallet_address: &str, size_usd: Decimal) {
        let profile = self.wallets.entry(wallet_address.to_string()).or_default();
        profile.trade_count += 1;
        profile.total_size_usd += size_usd;
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_unseen_wallet_is_zero() {
        let store = WalletHistoryStore::new();
        let profile = store.snapshot("0xunknown");
        assert_eq!(profile.trade_count, 0);
        assert_eq!(profile.total_size_usd, Decimal::ZERO);
    }

    #[test]
    fn test_record_accumulates() {
        let mut store = WalletHistoryStore::new();
        store.record("0xabc", Decimal::from(100));
        store.record("0xabc", Decimal::from(300));

        let profile = store.snapshot("0xabc");
        assert_eq!(profile.trade_count, 2);
        assert_eq!(profile.total_size_usd, Decimal::from(400));
        assert_eq!(profile.average_size_usd(), Decimal::from(200));
    }

    #[test]
    fn test_wallets_are_independent() {
        let mut store = WalletHistoryStore::new();
        store.record("0xabc", Decimal::from(100));

        assert_eq!(store.snapshot("0xdef").trade_count, 0);
        assert_eq!(store.len(), 1);
    }
}
