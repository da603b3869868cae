use crate::error::PifError;
use crate::extraction::{PageLayout, Word};

/// Settings for [`extract_table`].
///
/// Columns are bounded by explicit vertical lines; rows come from the text
/// itself, grouping words whose top edges lie within `snap_y_tolerance`.
#[derive(Debug, Clone)]
pub struct TableSettings {
    pub vertical_lines: Vec<f32>,
    pub snap_y_tolerance: f32,
}

impl TableSettings {
    fn validate(&self) -> Result<(), PifError> {
        if self.vertical_lines.len() < 2 {
            return Err(PifError::InvalidTableSettings(format!(
                "need at least 2 vertical lines, got {}",
                self.vertical_lines.len()
            )));
        }
        if self.vertical_lines.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PifError::InvalidTableSettings(format!(
                "vertical lines must be strictly increasing: {:?}",
                self.vertical_lines
            )));
        }
        if !self.snap_y_tolerance.is_finite() || self.snap_y_tolerance < 0.0 {
            return Err(PifError::InvalidTableSettings(format!(
                "snap_y_tolerance must be a non-negative number, got {}",
                self.snap_y_tolerance
            )));
        }
        Ok(())
    }

    fn column_of(&self, word: &Word) -> Option<usize> {
        let x = word.bbox.center_x();
        self.vertical_lines
            .windows(2)
            .position(|w| x >= w[0] && x < w[1])
    }
}

/// Extract one table from a page.
///
/// Every returned row has `vertical_lines.len() - 1` cells; a cell with no
/// words is an empty string. Rows are ordered top to bottom.
pub fn extract_table(
    page: &PageLayout,
    settings: &TableSettings,
) -> Result<Vec<Vec<String>>, PifError> {
    settings.validate()?;
    let columns = settings.vertical_lines.len() - 1;

    let mut placed: Vec<(usize, &Word)> = page
        .words()
        .filter_map(|w| settings.column_of(w).map(|c| (c, w)))
        .collect();
    placed.sort_by(|(_, a), (_, b)| {
        a.bbox
            .y_min
            .total_cmp(&b.bbox.y_min)
            .then(a.bbox.x_min.total_cmp(&b.bbox.x_min))
    });

    // Group into physical rows anchored on the first word's top edge
    let mut rows: Vec<Vec<(usize, &Word)>> = Vec::new();
    let mut anchor_top = f32::NEG_INFINITY;
    for (column, word) in placed {
        match rows.last_mut() {
            Some(row) if word.bbox.y_min - anchor_top <= settings.snap_y_tolerance => {
                row.push((column, word));
            }
            _ => {
                anchor_top = word.bbox.y_min;
                rows.push(vec![(column, word)]);
            }
        }
    }

    let table = rows
        .into_iter()
        .map(|mut row| {
            row.sort_by(|(_, a), (_, b)| a.bbox.x_min.total_cmp(&b.bbox.x_min));
            let mut cells = vec![String::new(); columns];
            for (column, word) in row {
                let cell = &mut cells[column];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(&word.text);
            }
            cells
        })
        .collect();

    Ok(table)
}
