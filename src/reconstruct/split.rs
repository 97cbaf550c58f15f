use anyhow::{Context, Result, bail};

use crate::model::RawRow;

// The extraction collapses six printed columns into four cells, and only the
// width of the whitespace inside a cell tells the columns apart. These widths
// were measured on the aging report's layout and are not general.

/// Field holding "order/invoice number" and "date" separated by one space.
const INVOICE_DATE_INDEX: usize = 2;
/// Field holding "amount" and "payment" separated by a four-space run.
const AMOUNT_PAYMENT_INDEX: usize = 3;
/// Shorter invoice/date cells carry no invoice line to split.
const INVOICE_DATE_MIN_LEN: usize = 4;
const INVOICE_DATE_SEPARATOR: &str = " ";
const AMOUNT_PAYMENT_SEPARATOR: &str = "    ";
/// Separates the 61-90 and Over 90 values inside the second-to-last cell.
const AGING_BUCKET_SEPARATOR: &str = "   ";
/// Separates the Over 90 tail and the status inside the last cell.
const STATUS_SEPARATOR: &str = " ";

pub fn split_combined_columns(rows: &mut [RawRow]) -> Result<()> {
    for (index, row) in rows.iter_mut().enumerate() {
        split_invoice_amount_fields(row)
            .with_context(|| format!("failed to split invoice columns of row {index}"))?;
        split_trailing_fields(row)
            .with_context(|| format!("failed to split trailing columns of row {index}"))?;
    }
    Ok(())
}

pub(super) fn split_invoice_amount_fields(row: &mut RawRow) -> Result<()> {
    if row.len() <= AMOUNT_PAYMENT_INDEX {
        bail!(
            "row has {} fields, expected at least {}",
            row.len(),
            AMOUNT_PAYMENT_INDEX + 1
        );
    }

    if row[INVOICE_DATE_INDEX].chars().count() <= INVOICE_DATE_MIN_LEN {
        row.insert(AMOUNT_PAYMENT_INDEX, String::new());
        return Ok(());
    }

    let (invoice, date) = split_pair(&row[INVOICE_DATE_INDEX], INVOICE_DATE_SEPARATOR)
        .context("invoice/date field")?;
    let (amount, payment) = split_pair(&row[AMOUNT_PAYMENT_INDEX], AMOUNT_PAYMENT_SEPARATOR)
        .context("amount/payment field")?;

    let replacement = vec![invoice.to_string(), format!("{date}{payment}"), amount.to_string()];
    row.splice(INVOICE_DATE_INDEX..=AMOUNT_PAYMENT_INDEX, replacement);
    Ok(())
}

pub(super) fn split_trailing_fields(row: &mut RawRow) -> Result<()> {
    if row.len() < 2 {
        bail!("row has {} fields, expected at least 2", row.len());
    }

    let buckets_index = row.len() - 2;
    let buckets = row[buckets_index].clone();
    let mut tokens = buckets.split(AGING_BUCKET_SEPARATOR);
    let head = tokens.next().unwrap_or_default();
    let tail = tokens.last().unwrap_or(head);
    row[buckets_index] = head.to_string();
    row.insert(buckets_index + 1, tail.trim_matches(' ').to_string());

    let last_index = row.len() - 1;
    let (over_ninety_tail, status) =
        split_pair(&row[last_index], STATUS_SEPARATOR).context("status field")?;
    let (over_ninety_tail, status) = (over_ninety_tail.to_string(), status.to_string());
    row[last_index - 1].push_str(&over_ninety_tail);
    row[last_index] = status;
    Ok(())
}

fn split_pair<'a>(value: &'a str, separator: &str) -> Result<(&'a str, &'a str)> {
    let mut tokens = value.split(separator);
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => bail!("expected {separator:?} to split {value:?} into two tokens"),
    }
}
