use crate::model::RawRow;

pub const CONTINUATION_SEPARATOR: char = '\\';

pub fn merge_continuation_rows(rows: &mut Vec<RawRow>) -> usize {
    let mut merged = Vec::<RawRow>::with_capacity(rows.len());
    let mut merge_count = 0usize;

    for row in rows.drain(..) {
        if is_continuation_row(&row)
            && let Some(acquirer) = merged.last_mut()
        {
            let acquired = row.into_iter().next().unwrap_or_default();
            match acquirer.first_mut() {
                Some(label) => {
                    label.push(CONTINUATION_SEPARATOR);
                    label.push_str(&acquired);
                }
                None => acquirer.push(format!("{CONTINUATION_SEPARATOR}{acquired}")),
            }
            merge_count += 1;
            continue;
        }

        merged.push(row);
    }

    *rows = merged;
    merge_count
}

pub(super) fn is_continuation_row(row: &[String]) -> bool {
    row.iter().skip(1).all(|cell| cell.is_empty())
}
