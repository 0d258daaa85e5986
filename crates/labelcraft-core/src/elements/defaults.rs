//! Per-kind default geometry, content, style and bindings.

use super::{DataMapping, ElementKind, FieldFlags, Style};
use kurbo::Size;
use serde_json::json;

/// The template a freshly added element of a given kind is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDefaults {
    /// Default size in percent of the page.
    pub size: Size,
    /// Default content.
    pub content: String,
    /// Default presentation attributes.
    pub style: Style,
    /// Sub-fields enabled by default (composite kinds only).
    pub fields: Option<FieldFlags>,
    /// Default field -> path bindings.
    pub data_mapping: Option<DataMapping>,
}

impl ElementDefaults {
    fn new(width: f64, height: f64, content: &str, style: Style) -> Self {
        Self {
            size: Size::new(width, height),
            content: content.to_string(),
            style,
            fields: None,
            data_mapping: None,
        }
    }

    fn bound(mut self, bindings: &[(&str, &str)]) -> Self {
        self.data_mapping = Some(
            bindings
                .iter()
                .map(|(field, path)| (field.to_string(), path.to_string()))
                .collect(),
        );
        self
    }

    /// Bind and enable every listed sub-field.
    fn block(mut self, bindings: &[(&str, &str)]) -> Self {
        self.fields = Some(bindings.iter().map(|(field, _)| (field.to_string(), true)).collect());
        self.bound(bindings)
    }
}

fn text_style(font_size: u32, font_weight: &str, text_align: &str) -> Style {
    let mut style = Style::new();
    style.insert("fontSize".into(), json!(font_size));
    style.insert("fontWeight".into(), json!(font_weight));
    style.insert("textAlign".into(), json!(text_align));
    style.insert("color".into(), json!("#000000"));
    style.insert("fontFamily".into(), json!("Arial"));
    style
}

fn block_style(font_size: u32) -> Style {
    let mut style = text_style(font_size, "normal", "left");
    style.insert("border".into(), json!("1px solid #000000"));
    style.insert("padding".into(), json!(4));
    style.insert("showLabels".into(), json!(true));
    style
}

fn table_style() -> Style {
    let mut style = block_style(9);
    style.insert("headerBackground".into(), json!("#f0f0f0"));
    style.insert("showHeader".into(), json!(true));
    style
}

fn marketplace_style(brand_color: &str) -> Style {
    let mut style = block_style(10);
    style.insert("accentColor".into(), json!(brand_color));
    style
}

impl ElementKind {
    /// Defaults a newly added element of this kind starts from.
    pub fn defaults(self) -> ElementDefaults {
        use ElementKind::*;
        match self {
            Text => ElementDefaults::new(30.0, 5.0, "Text", text_style(12, "normal", "left")),
            Image => {
                let mut style = Style::new();
                style.insert("objectFit".into(), json!("contain"));
                ElementDefaults::new(20.0, 15.0, "", style)
            }
            Barcode => {
                let mut style = Style::new();
                style.insert("format".into(), json!("CODE128"));
                style.insert("displayValue".into(), json!(true));
                ElementDefaults::new(40.0, 12.0, "1234567890", style)
                    .bound(&[("value", "shipping.trackingNumber")])
            }
            QrCode => {
                let mut style = Style::new();
                style.insert("errorCorrection".into(), json!("M"));
                ElementDefaults::new(20.0, 20.0, "https://", style)
                    .bound(&[("value", "shipping.trackingUrl")])
            }
            Divider => {
                let mut style = Style::new();
                style.insert("borderTop".into(), json!("1px solid #000000"));
                ElementDefaults::new(90.0, 1.0, "", style)
            }
            Spacer => ElementDefaults::new(90.0, 3.0, "", Style::new()),
            Recipient => ElementDefaults::new(45.0, 20.0, "", block_style(11)).block(&[
                ("name", "customer.name"),
                ("address", "shippingAddress.address"),
                ("district", "shippingAddress.district"),
                ("city", "shippingAddress.city"),
                ("postalCode", "shippingAddress.postalCode"),
                ("phone", "customer.phone"),
            ]),
            Sender => ElementDefaults::new(45.0, 15.0, "", block_style(10)).block(&[
                ("name", "sender.name"),
                ("address", "sender.address"),
                ("city", "sender.city"),
                ("phone", "sender.phone"),
            ]),
            CustomerInfo => ElementDefaults::new(45.0, 12.0, "", block_style(10)).block(&[
                ("name", "customer.name"),
                ("email", "customer.email"),
                ("phone", "customer.phone"),
            ]),
            ShippingAddress => ElementDefaults::new(45.0, 15.0, "", block_style(10)).block(&[
                ("address", "shippingAddress.address"),
                ("district", "shippingAddress.district"),
                ("city", "shippingAddress.city"),
                ("postalCode", "shippingAddress.postalCode"),
                ("country", "shippingAddress.country"),
            ]),
            BillingAddress => ElementDefaults::new(45.0, 15.0, "", block_style(10)).block(&[
                ("address", "billingAddress.address"),
                ("district", "billingAddress.district"),
                ("city", "billingAddress.city"),
                ("postalCode", "billingAddress.postalCode"),
                ("country", "billingAddress.country"),
            ]),
            OrderSummary => ElementDefaults::new(90.0, 12.0, "", block_style(10)).block(&[
                ("orderNumber", "orderNumber"),
                ("orderDate", "orderDate"),
                ("status", "status"),
                ("total", "totalAmount"),
            ]),
            OrderDetails => ElementDefaults::new(90.0, 15.0, "", block_style(10)).block(&[
                ("orderNumber", "orderNumber"),
                ("orderDate", "orderDate"),
                ("platform", "platform"),
                ("status", "status"),
            ]),
            OrderItems => ElementDefaults::new(90.0, 25.0, "", table_style()).block(&[
                ("name", "items[].productName"),
                ("quantity", "items[].quantity"),
                ("price", "items[].price"),
            ]),
            OrderTotals => ElementDefaults::new(40.0, 12.0, "", block_style(10)).block(&[
                ("subtotal", "subtotal"),
                ("shipping", "shippingCost"),
                ("tax", "taxAmount"),
                ("total", "totalAmount"),
            ]),
            PaymentInfo => ElementDefaults::new(45.0, 10.0, "", block_style(10)).block(&[
                ("method", "payment.method"),
                ("status", "payment.status"),
            ]),
            ProductList => ElementDefaults::new(90.0, 25.0, "", table_style()).block(&[
                ("name", "items[].productName"),
                ("sku", "items[].sku"),
                ("quantity", "items[].quantity"),
            ]),
            ProductDetails => ElementDefaults::new(45.0, 15.0, "", block_style(10)).block(&[
                ("name", "items[0].productName"),
                ("sku", "items[0].sku"),
                ("barcode", "items[0].barcode"),
            ]),
            InventoryInfo => ElementDefaults::new(40.0, 8.0, "", text_style(10, "normal", "left"))
                .bound(&[("sku", "items[0].sku"), ("location", "items[0].warehouseLocation")]),
            TrackingInfo => ElementDefaults::new(45.0, 6.0, "", text_style(11, "bold", "left"))
                .bound(&[("trackingNumber", "shipping.trackingNumber")]),
            CarrierInfo => ElementDefaults::new(30.0, 6.0, "", text_style(11, "bold", "left"))
                .bound(&[("carrier", "shipping.carrier")]),
            ShippingMethod => ElementDefaults::new(30.0, 5.0, "", text_style(10, "normal", "left"))
                .bound(&[("method", "shipping.method")]),
            DeliveryInfo => ElementDefaults::new(40.0, 5.0, "", text_style(10, "normal", "left"))
                .bound(&[("estimatedDelivery", "shipping.estimatedDelivery")]),
            PlatformInfo => ElementDefaults::new(45.0, 8.0, "", block_style(10)).block(&[
                ("platform", "platform"),
                ("platformOrderId", "platformOrderId"),
            ]),
            TrendyolInfo => ElementDefaults::new(45.0, 10.0, "", marketplace_style("#f27a1a")).block(&[
                ("orderNumber", "platformOrderId"),
                ("packageNumber", "platformData.trendyol.packageNumber"),
                ("cargoTrackingNumber", "platformData.trendyol.cargoTrackingNumber"),
            ]),
            HepsiburadaInfo => ElementDefaults::new(45.0, 10.0, "", marketplace_style("#ff6000")).block(&[
                ("orderNumber", "platformOrderId"),
                ("packageNumber", "platformData.hepsiburada.packageNumber"),
                ("merchantId", "platformData.hepsiburada.merchantId"),
            ]),
            N11Info => ElementDefaults::new(45.0, 10.0, "", marketplace_style("#7b2cbf")).block(&[
                ("orderNumber", "platformOrderId"),
                ("shipmentCode", "platformData.n11.shipmentCode"),
            ]),
            AmazonInfo => ElementDefaults::new(45.0, 10.0, "", marketplace_style("#ff9900")).block(&[
                ("orderNumber", "platformData.amazon.amazonOrderId"),
                ("fulfillmentChannel", "platformData.amazon.fulfillmentChannel"),
            ]),
            InvoiceInfo => ElementDefaults::new(45.0, 10.0, "", block_style(10)).block(&[
                ("invoiceNumber", "invoice.number"),
                ("invoiceDate", "invoice.date"),
            ]),
            TaxInfo => ElementDefaults::new(45.0, 8.0, "", block_style(10)).block(&[
                ("taxNumber", "customer.taxNumber"),
                ("taxOffice", "customer.taxOffice"),
            ]),
            ComplianceData => ElementDefaults::new(
                90.0,
                6.0,
                "This package complies with applicable shipping regulations.",
                text_style(8, "normal", "left"),
            ),
            Header => ElementDefaults::new(90.0, 8.0, "SHIPPING LABEL", text_style(18, "bold", "center")),
            Footer => ElementDefaults::new(
                90.0,
                5.0,
                "Thank you for your order!",
                text_style(9, "normal", "center"),
            ),
            CustomField => ElementDefaults::new(40.0, 5.0, "{value}", text_style(11, "normal", "left")),
            CustomTable => ElementDefaults::new(90.0, 20.0, "", table_style()),
            CustomList => ElementDefaults::new(45.0, 15.0, "", block_style(10)),
        }
    }
}
