use crate::application::workflow::FulfillmentSummary;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Flat, caller-facing view of a completed order.
#[derive(Debug, Serialize)]
pub struct Receipt<'a> {
    pub order_id: &'a str,
    pub customer: &'a str,
    pub email: &'a str,
    pub total: Decimal,
    pub payment_method: &'a str,
    pub status: &'static str,
    pub transaction_id: &'a str,
    pub tracking_number: &'a str,
    pub fraud_review: bool,
}

impl<'a> From<&'a FulfillmentSummary> for Receipt<'a> {
    fn from(summary: &'a FulfillmentSummary) -> Self {
        Self {
            order_id: summary.order.id().as_str(),
            customer: summary.customer.name(),
            email: summary.customer.email(),
            total: summary.order.total_amount(),
            payment_method: summary.order.payment_method(),
            status: summary.order.status().as_str(),
            transaction_id: &summary.transaction_id,
            tracking_number: &summary.tracking_number,
            fraud_review: summary.fraud_flag.is_some(),
        }
    }
}

/// Writes receipts as CSV with a header row.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_receipt(&mut self, summary: &FulfillmentSummary) -> Result<()> {
        self.writer.serialize(Receipt::from(summary))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a receipt as a single pretty-printed JSON document.
pub fn write_receipt_json<W: Write>(sink: W, summary: &FulfillmentSummary) -> Result<()> {
    serde_json::to_writer_pretty(sink, &Receipt::from(summary))?;
    Ok(())
}
