//! # Settlement recording
//!
//! A `Settlement` row is written once per order, the moment `confirm`
//! lands the order at `ACCEPTED` with an attached payment already marked
//! `PAID`. Nothing here drives the order state machine — settlement is
//! strictly observational, recorded by [`crate::domain::actions`] after
//! a successful `confirm`.

use beckn_types::{Payment, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStatus {
    Paid,
    NotPaid,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconStatus {
    Matched,
    Unmatched,
    Disputed,
    Overpaid,
    Underpaid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub order_id: String,
    pub collector_app_id: String,
    pub receiver_app_id: String,
    pub settlement_status: SettlementStatus,
    pub recon_status: ReconStatus,
    pub amount: String,
    pub currency: String,
    pub reference: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Settlement {
    /// `None` when `payment` is absent or not yet `PAID` — there is
    /// nothing to reconcile for an order that hasn't settled.
    /// `recon_status` always starts `UNMATCHED`; an out-of-band
    /// reconciliation job is what moves it to `MATCHED`/`DISPUTED`/etc.
    pub fn for_confirmed_order(
        order_id: impl Into<String>,
        bap_id: impl Into<String>,
        bpp_id: impl Into<String>,
        payment: Option<&Payment>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Option<Self> {
        let paid = matches!(payment.and_then(|p| p.status), Some(PaymentStatus::Paid));
        if !paid {
            return None;
        }
        Some(Self {
            order_id: order_id.into(),
            collector_app_id: bap_id.into(),
            receiver_app_id: bpp_id.into(),
            settlement_status: SettlementStatus::Paid,
            recon_status: ReconStatus::Unmatched,
            amount: amount.into(),
            currency: currency.into(),
            reference: payment.and_then(|p| p.collected_by.clone()),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(status: Option<PaymentStatus>) -> Payment {
        Payment { status, collected_by: Some("bpp.local".into()), r#type: Some("ON-ORDER".into()) }
    }

    #[test]
    fn paid_payment_records_a_settlement_pending_reconciliation() {
        let settlement = Settlement::for_confirmed_order("O1", "bap1", "bpp1", Some(&payment(Some(PaymentStatus::Paid))), "100", "INR");
        assert!(settlement.is_some());
        let settlement = settlement.unwrap();
        assert_eq!(settlement.settlement_status, SettlementStatus::Paid);
        assert_eq!(settlement.recon_status, ReconStatus::Unmatched);
    }

    #[test]
    fn unpaid_or_missing_payment_records_nothing() {
        assert!(Settlement::for_confirmed_order("O1", "bap1", "bpp1", Some(&payment(Some(PaymentStatus::NotPaid))), "100", "INR").is_none());
        assert!(Settlement::for_confirmed_order("O1", "bap1", "bpp1", None, "100", "INR").is_none());
    }
}
