use serde::{Deserialize, Serialize};

use crate::models::records::CreditWallet;

/// Order lifecycle states. Forward progress runs Pending -> Processing ->
/// Shipped -> Delivered; Cancelled is reachable from Pending only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "Processing" => Some(Self::Processing),
            "Shipped" => Some(Self::Shipped),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether the transition `self -> next` is allowed.
    pub fn can_transition(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Cancelled)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

/// Units accepted on an order line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    G,
    Ml,
    L,
    Pieces,
    Packs,
    Bottles,
    Dozen,
    Units,
    Boxes,
    Cans,
}

/// Outcome of the best-effort eco-crediting step that follows order
/// persistence. A `Failed` outcome never fails the order itself; it is logged
/// and reported as zero points awarded.
#[derive(Debug)]
pub enum EcoAward {
    Awarded { points: i64, wallet: CreditWallet },
    NoEligibleItems,
    Failed { reason: String },
}

impl EcoAward {
    pub fn points_awarded(&self) -> i64 {
        match self {
            Self::Awarded { points, .. } => *points,
            Self::NoEligibleItems | Self::Failed { .. } => 0,
        }
    }

    pub fn wallet(&self) -> Option<CreditWallet> {
        match self {
            Self::Awarded { wallet, .. } => Some(*wallet),
            Self::NoEligibleItems | Self::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_only_from_pending() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Processing.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_forward_chain() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition(OrderStatus::Processing));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Processing));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("Unknown"), None);
    }

    #[test]
    fn test_eco_award_reporting() {
        let failed = EcoAward::Failed {
            reason: "buyer not found".to_string(),
        };
        assert_eq!(failed.points_awarded(), 0);
        assert!(failed.wallet().is_none());
        assert_eq!(EcoAward::NoEligibleItems.points_awarded(), 0);
    }
}
