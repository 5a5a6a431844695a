//! Sale returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Money, SaleItem};

/// Reversal of a previously recorded sale.
///
/// `amount` is the refunded amount — the sale's **paid** amount, not its
/// total (an unpaid shortfall was never received, so it is not refunded).
/// `items` is an immutable copy of the originating sale's items taken at
/// return time, so later edits or deletion of the sale cannot change what
/// gets restocked or un-restocked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReturn {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub party: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
}
