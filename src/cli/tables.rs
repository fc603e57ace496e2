use jiff::civil::DateTime;
use skawsh_coupons::{
    checkout::format_inr,
    coupons::{Coupon, DiscountType},
    partition::HistoryEntry,
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

pub(crate) fn coupons_table(coupons: &[Coupon]) -> String {
    let mut builder = Builder::default();

    builder.push_record([
        "ID", "Code", "Title", "Category", "Discount", "Usage", "Validity", "Status",
    ]);

    for coupon in coupons {
        builder.push_record([
            coupon.id.to_string(),
            coupon.code.clone(),
            coupon.title.clone(),
            coupon.category.to_string(),
            discount_label(coupon),
            usage_label(coupon),
            validity_label(coupon),
            coupon.status.to_string(),
        ]);
    }

    render(builder, 5)
}

pub(crate) fn history_table(entries: &[HistoryEntry]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Title", "Discount", "Usage", "Ended", "Reason"]);

    for HistoryEntry { coupon, reason } in entries {
        builder.push_record([
            coupon.code.clone(),
            coupon.title.clone(),
            discount_label(coupon),
            usage_label(coupon),
            date_label(coupon.end_date),
            reason.to_string(),
        ]);
    }

    render(builder, 3)
}

fn render(builder: Builder, usage_column: usize) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(usage_column..=usage_column), Alignment::right());

    table.to_string()
}

pub(crate) fn discount_label(coupon: &Coupon) -> String {
    match coupon.discount_type {
        DiscountType::Flat => format!("{} off", format_inr(coupon.discount_value)),
        DiscountType::Percentage => match coupon.discount_cap() {
            Some(cap) => format!("{}% (max {})", coupon.discount_value, format_inr(cap)),
            None => format!("{}%", coupon.discount_value),
        },
    }
}

fn usage_label(coupon: &Coupon) -> String {
    if coupon.usage_limit == 0 {
        coupon.usage_count.to_string()
    } else {
        format!("{} / {}", coupon.usage_count, coupon.usage_limit)
    }
}

fn validity_label(coupon: &Coupon) -> String {
    format!(
        "{} to {}",
        date_label(coupon.start_date),
        date_label(coupon.end_date)
    )
}

fn date_label(value: Option<DateTime>) -> String {
    value.map_or_else(|| "-".to_string(), |datetime| datetime.date().to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use skawsh_coupons::coupons::form::CouponFormData;

    use super::*;

    #[test]
    fn percentage_labels_show_the_cap() {
        let coupon = CouponFormData {
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(20),
            max_discount: Decimal::from(200),
            ..CouponFormData::default()
        }
        .preview_coupon();

        let label = discount_label(&coupon);

        assert!(label.starts_with("20% (max "));
        assert!(label.contains("200"));
    }

    #[test]
    fn table_has_a_row_per_coupon() {
        let mut coupon = CouponFormData::default().preview_coupon();
        coupon.code = "ROW-1".to_string();

        let table = coupons_table(&[coupon]);

        assert!(table.contains("ROW-1"));
        assert!(table.contains("Draft"));
    }
}
