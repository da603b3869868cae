use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::config::WorkbookConfig;
use crate::error::PifError;
use crate::model::Assessment;

/// Scores of all assessments joined on parameter name.
///
/// Columns follow the order of the assessments. Rows follow the order in
/// which parameters were first seen: the first document's rows, then any
/// parameters only later documents have.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    pub columns: Vec<String>,
    pub rows: IndexMap<String, Vec<Option<i64>>>,
}

impl ScoreTable {
    pub fn from_assessments(assessments: &[Assessment]) -> Self {
        let columns: Vec<String> = assessments.iter().map(|a| a.name.clone()).collect();
        let mut rows: IndexMap<String, Vec<Option<i64>>> = IndexMap::new();

        for (column, assessment) in assessments.iter().enumerate() {
            for item in &assessment.items {
                let cells = rows
                    .entry(item.parameter.clone())
                    .or_insert_with(|| vec![None; columns.len()]);
                // First occurrence within a document wins
                if cells[column].is_none() {
                    cells[column] = Some(item.value);
                }
            }
        }

        ScoreTable { columns, rows }
    }

    pub fn value(&self, parameter: &str, column: usize) -> Option<i64> {
        self.rows.get(parameter)?.get(column).copied().flatten()
    }
}

/// Write the table as a single worksheet.
pub fn export_xlsx(
    table: &ScoreTable,
    config: &WorkbookConfig,
    output: &Path,
) -> Result<(), PifError> {
    log::info!("Exporting to {}", output.display());

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    worksheet.set_column_width(0, config.label_column_width)?;
    for column in 1..=table.columns.len() {
        worksheet.set_column_width(excel_col(column)?, config.score_column_width)?;
    }

    worksheet.write_string_with_format(0, 0, &config.title, &bold)?;
    for (i, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, excel_col(i + 1)?, name, &bold)?;
    }

    for (i, (parameter, cells)) in table.rows.iter().enumerate() {
        let row = excel_row(i + 1)?;
        worksheet.write_string(row, 0, parameter)?;
        for (j, cell) in cells.iter().enumerate() {
            if let Some(value) = cell {
                worksheet.write_number(row, excel_col(j + 1)?, *value as f64)?;
            }
        }
    }

    workbook.save(output)?;
    Ok(())
}

fn excel_col(index: usize) -> Result<u16, PifError> {
    u16::try_from(index)
        .map_err(|_| PifError::SheetLimit(format!("too many documents for one sheet: {index}")))
}

fn excel_row(index: usize) -> Result<u32, PifError> {
    u32::try_from(index)
        .map_err(|_| PifError::SheetLimit(format!("too many parameters for one sheet: {index}")))
}
