//! Customer notification composition
//!
//! Pure text formatting: given order + invoice + shop data, produce the
//! message body and a prefilled WhatsApp share link. Delivery (email send,
//! opening the link) is the caller's concern; nothing here performs I/O.

use url::Url;

use shared::util::{format_date_millis, format_money};

use crate::db::models::{Invoice, Order};

/// Invoice summary sent when an order is completed.
pub fn invoice_message(order: &Order, invoice: &Invoice, shop_name: &str) -> String {
    let mut lines = vec![
        format!("Hello {},", order.customer_name),
        format!(
            "Your order at {} is ready for billing (Invoice {}).",
            shop_name, invoice.number
        ),
        format!("Items: {}", order.content.summary()),
        format!("Total: {}", format_money(invoice.total_amount)),
    ];
    if invoice.advance_amount > 0.0 {
        lines.push(format!(
            "Advance paid: {}",
            format_money(invoice.advance_amount)
        ));
    }
    lines.push(format!("Balance due: {}", format_money(invoice.due_amount)));
    lines.push(format!("Due date: {}", order.due_date.format("%Y-%m-%d")));
    lines.push(format!("Thank you for choosing {shop_name}!"));
    lines.join("\n")
}

/// "Ready for delivery" notice sent after the payment step.
pub fn ready_message(order: &Order, shop_name: &str) -> String {
    let mut lines = vec![
        format!("Hello {},", order.customer_name),
        format!(
            "Your order ({}) at {} is ready for pickup.",
            order.content.summary(),
            shop_name
        ),
    ];
    if order.remaining_amount > 0.0 {
        lines.push(format!(
            "Balance to be collected: {}",
            format_money(order.remaining_amount)
        ));
        if let Some(date) = order.pay_later_date {
            lines.push(format!("Payment scheduled for: {}", date.format("%Y-%m-%d")));
        }
    } else if let Some(at) = order.payment_completed_at {
        lines.push(format!("Payment received on {}. Nothing due.", format_date_millis(at)));
    }
    lines.push(format!("Thank you for choosing {shop_name}!"));
    lines.join("\n")
}

/// Prefilled `wa.me` link for the given phone number and message text.
///
/// Non-digit characters are stripped from the phone number; the text is
/// percent-encoded by the URL builder.
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let base = format!("https://wa.me/{digits}");
    match Url::parse_with_params(&base, &[("text", text)]) {
        Ok(url) => url.to_string(),
        Err(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::{
        InvoicePaymentStatus, OrderContent, OrderStatus, PaymentStatus,
    };
    use surrealdb::RecordId;

    fn sample_order() -> Order {
        Order {
            id: Some(RecordId::from_table_key("orders", "o1")),
            tailor: RecordId::from_table_key("tailor", "t1"),
            customer_id: None,
            customer_name: "Asha".to_string(),
            customer_phone: "+91 98765-43210".to_string(),
            customer_email: None,
            content: OrderContent::Legacy {
                order_type: "Kurta".to_string(),
                measurements: Default::default(),
            },
            notes: None,
            price: 1200.0,
            advance_payment: 500.0,
            discount: 0.0,
            remaining_amount: 700.0,
            payment_status: PaymentStatus::Scheduled,
            payments: vec![],
            status: OrderStatus::Completed,
            due_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            pay_later_enabled: true,
            pay_later_date: NaiveDate::from_ymd_opt(2025, 9, 5),
            pay_later_amount: 700.0,
            created_at: 0,
            cutting_completed_at: None,
            completed_at: None,
            payment_completed_at: None,
            delivered_at: None,
            invoice_id: None,
        }
    }

    fn sample_invoice() -> Invoice {
        Invoice {
            id: None,
            number: "INV-0007".to_string(),
            order_id: RecordId::from_table_key("orders", "o1"),
            tailor: RecordId::from_table_key("tailor", "t1"),
            customer_name: "Asha".to_string(),
            customer_phone: "9876543210".to_string(),
            customer_email: None,
            lines: vec![],
            total_amount: 1200.0,
            advance_amount: 500.0,
            due_amount: 700.0,
            due_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            payment_status: InvoicePaymentStatus::AdvancePaid,
            note: None,
            created_at: 0,
        }
    }

    #[test]
    fn invoice_message_golden() {
        let msg = invoice_message(&sample_order(), &sample_invoice(), "KStitch Tailors");
        assert_eq!(
            msg,
            "Hello Asha,\n\
             Your order at KStitch Tailors is ready for billing (Invoice INV-0007).\n\
             Items: Kurta\n\
             Total: Rs. 1200.00\n\
             Advance paid: Rs. 500.00\n\
             Balance due: Rs. 700.00\n\
             Due date: 2025-09-01\n\
             Thank you for choosing KStitch Tailors!"
        );
    }

    #[test]
    fn ready_message_mentions_outstanding_balance() {
        let msg = ready_message(&sample_order(), "KStitch Tailors");
        assert!(msg.contains("Balance to be collected: Rs. 700.00"));
        assert!(msg.contains("Payment scheduled for: 2025-09-05"));
    }

    #[test]
    fn whatsapp_link_strips_and_encodes() {
        let link = whatsapp_link("+91 98765-43210", "Hello Asha, total Rs. 700.00");
        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(!link.contains(' '));
    }
}
