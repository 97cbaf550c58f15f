use crate::model::RawRow;

pub fn propagate_labels(rows: &mut [RawRow]) -> usize {
    let mut filled = 0usize;

    for index in 1..rows.len() {
        let (above, rest) = rows.split_at_mut(index);
        let previous = &above[index - 1];
        let row = &mut rest[0];

        let has_label = row.first().map(|label| !label.is_empty()).unwrap_or(false);
        if has_label {
            continue;
        }

        if row.is_empty() {
            row.push(String::new());
        }
        for (cell, carried) in row.iter_mut().zip(previous.iter()) {
            if cell.is_empty() {
                cell.clone_from(carried);
            }
        }
        filled += 1;
    }

    filled
}
