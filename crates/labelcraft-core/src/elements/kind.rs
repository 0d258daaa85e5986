//! The closed catalog of element types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an element's bound data is projected into content at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// Content is a template string with `{field}` placeholders.
    TextLike,
    /// Barcodes and QR codes: the first bound value replaces the content.
    Code,
    /// Multi-field blocks and tables: the renderer iterates the resolved field map.
    Composite,
    /// Literal content, optionally filled from bound values when empty.
    Plain,
}

/// Element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    // Basic
    Text,
    Image,
    Barcode,
    QrCode,
    Divider,
    Spacer,
    // Parties and addresses
    Recipient,
    Sender,
    CustomerInfo,
    ShippingAddress,
    BillingAddress,
    // Order
    OrderSummary,
    OrderDetails,
    OrderItems,
    OrderTotals,
    PaymentInfo,
    // Products
    ProductList,
    ProductDetails,
    InventoryInfo,
    // Shipping
    TrackingInfo,
    CarrierInfo,
    ShippingMethod,
    DeliveryInfo,
    // Marketplaces
    PlatformInfo,
    TrendyolInfo,
    HepsiburadaInfo,
    #[serde(rename = "n11_info")]
    N11Info,
    AmazonInfo,
    // Finance and compliance
    InvoiceInfo,
    TaxInfo,
    ComplianceData,
    // Layout
    Header,
    Footer,
    // Custom
    CustomField,
    CustomTable,
    CustomList,
}

impl ElementKind {
    /// Get all element kinds, in palette order.
    pub fn all() -> &'static [ElementKind] {
        use ElementKind::*;
        &[
            Text,
            Image,
            Barcode,
            QrCode,
            Divider,
            Spacer,
            Recipient,
            Sender,
            CustomerInfo,
            ShippingAddress,
            BillingAddress,
            OrderSummary,
            OrderDetails,
            OrderItems,
            OrderTotals,
            PaymentInfo,
            ProductList,
            ProductDetails,
            InventoryInfo,
            TrackingInfo,
            CarrierInfo,
            ShippingMethod,
            DeliveryInfo,
            PlatformInfo,
            TrendyolInfo,
            HepsiburadaInfo,
            N11Info,
            AmazonInfo,
            InvoiceInfo,
            TaxInfo,
            ComplianceData,
            Header,
            Footer,
            CustomField,
            CustomTable,
            CustomList,
        ]
    }

    /// Wire name, as stored in the `type` key of a persisted element.
    pub fn as_str(&self) -> &'static str {
        use ElementKind::*;
        match self {
            Text => "text",
            Image => "image",
            Barcode => "barcode",
            QrCode => "qr_code",
            Divider => "divider",
            Spacer => "spacer",
            Recipient => "recipient",
            Sender => "sender",
            CustomerInfo => "customer_info",
            ShippingAddress => "shipping_address",
            BillingAddress => "billing_address",
            OrderSummary => "order_summary",
            OrderDetails => "order_details",
            OrderItems => "order_items",
            OrderTotals => "order_totals",
            PaymentInfo => "payment_info",
            ProductList => "product_list",
            ProductDetails => "product_details",
            InventoryInfo => "inventory_info",
            TrackingInfo => "tracking_info",
            CarrierInfo => "carrier_info",
            ShippingMethod => "shipping_method",
            DeliveryInfo => "delivery_info",
            PlatformInfo => "platform_info",
            TrendyolInfo => "trendyol_info",
            HepsiburadaInfo => "hepsiburada_info",
            N11Info => "n11_info",
            AmazonInfo => "amazon_info",
            InvoiceInfo => "invoice_info",
            TaxInfo => "tax_info",
            ComplianceData => "compliance_data",
            Header => "header",
            Footer => "footer",
            CustomField => "custom_field",
            CustomTable => "custom_table",
            CustomList => "custom_list",
        }
    }

    /// Resolution category of this kind.
    pub fn category(&self) -> ElementCategory {
        use ElementKind::*;
        match self {
            Text | Header | Footer | CustomField => ElementCategory::TextLike,
            Barcode | QrCode => ElementCategory::Code,
            Recipient | Sender | CustomerInfo | ShippingAddress | BillingAddress
            | OrderSummary | OrderDetails | OrderItems | OrderTotals | PaymentInfo
            | ProductList | ProductDetails | PlatformInfo | TrendyolInfo | HepsiburadaInfo
            | N11Info | AmazonInfo | InvoiceInfo | TaxInfo | CustomTable | CustomList => {
                ElementCategory::Composite
            }
            Image | Divider | Spacer | InventoryInfo | TrackingInfo | CarrierInfo
            | ShippingMethod | DeliveryInfo | ComplianceData => ElementCategory::Plain,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown element type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element type: {0}")]
pub struct UnknownElementKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownElementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownElementKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for &kind in ElementKind::all() {
            assert_eq!(kind.as_str().parse::<ElementKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("sticker".parse::<ElementKind>().is_err());
        assert!(serde_json::from_str::<ElementKind>("\"sticker\"").is_err());
    }

    #[test]
    fn test_categories() {
        assert_eq!(ElementKind::Header.category(), ElementCategory::TextLike);
        assert_eq!(ElementKind::QrCode.category(), ElementCategory::Code);
        assert_eq!(ElementKind::OrderItems.category(), ElementCategory::Composite);
        assert_eq!(ElementKind::TrackingInfo.category(), ElementCategory::Plain);
    }
}
