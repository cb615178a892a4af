//! Generates builder code for the most recent order on an account.

use crate::error::Error;
use crate::orders::{code_for_builder, construct_repeat_order};
use schwab_client::{AccessTokenProvider, Order, SchwabClient, Transport};
use tracing::debug;

/// Which orders to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSelector {
    /// Plain account number; its hash is looked up first.
    AccountId(String),
    /// Account hash as used in URLs.
    AccountHash(String),
    /// Every linked account.
    All,
}

/// Code that rebuilds one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestOrderCode {
    /// Broker order id.
    pub order_id: i64,
    /// Rust source.
    pub code: String,
}

impl LatestOrderCode {
    /// Text printed by the command line tool.
    #[must_use]
    pub fn render(&self) -> String {
        format!("# Order ID {}\n{}", self.order_id, self.code)
    }
}

/// Fetches recent orders and generates code for the one with the highest id.
///
/// Returns `Ok(None)` when there are no recent orders.
///
/// # Errors
/// - [`Error::AccountNotFound`] if an account number is not linked.
/// - API errors from the account or order endpoints.
/// - Reconstruction errors for orders that cannot be placed again.
pub async fn latest_order_code<A, T>(
    client: &SchwabClient<A, T>,
    selector: &AccountSelector,
) -> Result<Option<LatestOrderCode>, Error>
where
    A: AccessTokenProvider,
    T: Transport,
{
    let orders = match selector {
        AccountSelector::AccountId(account_id) => {
            let hash = account_hash_for(client, account_id).await?;
            client.get_orders_for_account(&hash, None).await?
        }
        AccountSelector::AccountHash(hash) => client.get_orders_for_account(hash, None).await?,
        AccountSelector::All => client.get_orders_for_all_linked_accounts(None).await?,
    };
    debug!(count = orders.len(), "fetched recent orders");

    let Some((order_id, order)) = most_recent(&orders) else {
        return Ok(None);
    };
    let builder = construct_repeat_order(order)?;
    Ok(Some(LatestOrderCode {
        order_id,
        code: code_for_builder(&builder),
    }))
}

async fn account_hash_for<A, T>(
    client: &SchwabClient<A, T>,
    account_id: &str,
) -> Result<String, Error>
where
    A: AccessTokenProvider,
    T: Transport,
{
    client
        .get_account_numbers()
        .await?
        .into_iter()
        .find(|account| account.account_number == account_id)
        .map(|account| account.hash_value)
        .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))
}

fn most_recent(orders: &[Order]) -> Option<(i64, &Order)> {
    orders
        .iter()
        .filter_map(|order| order.order_id.map(|id| (id, order)))
        .max_by_key(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schwab_client::OrderStrategyType;

    fn order(id: Option<i64>) -> Order {
        Order {
            order_id: id,
            order_strategy_type: Some(OrderStrategyType::Single),
            ..Order::default()
        }
    }

    #[test]
    fn test_most_recent_picks_highest_id() {
        let orders = vec![order(Some(7)), order(Some(42)), order(None), order(Some(3))];
        let (id, _) = most_recent(&orders).unwrap();
        assert_eq!(id, 42);
    }

    #[test]
    fn test_most_recent_empty() {
        assert!(most_recent(&[]).is_none());
        assert!(most_recent(&[order(None)]).is_none());
    }

    #[test]
    fn test_render() {
        let latest = LatestOrderCode {
            order_id: 1001,
            code: "fn build_order() {}\n".to_string(),
        };
        assert_eq!(latest.render(), "# Order ID 1001\nfn build_order() {}\n");
    }
}
