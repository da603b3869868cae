use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::error::PifError;
use crate::extraction::table::{extract_table, TableSettings};
use crate::extraction::{BBox, DocumentLayout, PageLayout};
use crate::model::{Assessment, AssessmentWarning};
use crate::rows::{RawRow, RowMerger};

/// Builds an [`Assessment`] from the layout of one report.
#[derive(Debug, Clone)]
pub struct AssessmentBuilder {
    config: LayoutConfig,
    merger: RowMerger,
}

impl AssessmentBuilder {
    pub fn new(config: LayoutConfig) -> Self {
        let merger = RowMerger::new(config.table_header.clone());
        AssessmentBuilder { config, merger }
    }

    pub fn build(&self, layout: &DocumentLayout) -> Result<Assessment, PifError> {
        let name = self.resolve_name(layout)?;
        log::info!("Name: {name}");

        let (page, vertical_lines) = self.resolve_columns(layout)?;
        log::debug!(
            "table on page {} with vertical lines {:?}",
            page.page_number,
            vertical_lines
        );

        let settings = TableSettings {
            vertical_lines,
            snap_y_tolerance: self.config.snap_y_tolerance,
        };
        let rows: Vec<RawRow> = extract_table(page, &settings)?
            .into_iter()
            .map(to_raw_row)
            .collect();

        let outcome = self.merger.merge(&rows)?;
        let mut warnings = outcome.warnings;
        warnings.extend(duplicate_parameters(&outcome.items));
        for w in &warnings {
            log::warn!("{name}: {w}");
        }

        Ok(Assessment {
            name,
            source: Default::default(),
            items: outcome.items,
            warnings,
        })
    }

    /// The name sits a fixed distance from its caption line. Only whole lines
    /// inside the moved caption box count.
    fn resolve_name(&self, layout: &DocumentLayout) -> Result<String, PifError> {
        let label = &self.config.name_label;
        let (page, line) =
            layout
                .find_line_containing(label)
                .ok_or_else(|| PifError::LabelNotFound {
                    label: label.clone(),
                })?;

        let area = line.bbox.shifted_y(self.config.name_vertical_offset);
        let lines = match page.lines_within(&area, self.config.containment_tolerance) {
            Ok(lines) if !lines.is_empty() => lines,
            Ok(_) => {
                return Err(PifError::NameNotFound {
                    label: label.clone(),
                })
            }
            Err(partial) => {
                log::debug!(
                    "line '{}' at {:?} only partly inside name box {:?}",
                    partial.text,
                    partial.bbox,
                    area
                );
                return Err(PifError::NameNotFound {
                    label: label.clone(),
                });
            }
        };

        Ok(lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Four vertical lines around the three columns, taken from the header
    /// captions. The table is read from the page of the first caption.
    fn resolve_columns<'a>(
        &self,
        layout: &'a DocumentLayout,
    ) -> Result<(&'a PageLayout, Vec<f32>), PifError> {
        let [first, second, third] = &self.config.table_header;
        let (page, col1) = layout.find_label(first).ok_or_else(|| PifError::LabelNotFound {
            label: first.clone(),
        })?;
        let col2 = find_on_page(page, second)?;
        let col3 = find_on_page(page, third)?;

        let pad = self.config.column_left_padding;
        Ok((
            page,
            vec![col1.x_min - pad, col2.x_min - pad, col3.x_min, col3.x_max],
        ))
    }
}

fn find_on_page(page: &PageLayout, label: &str) -> Result<BBox, PifError> {
    page.find_label(label).ok_or_else(|| PifError::LabelNotFound {
        label: label.to_string(),
    })
}

fn to_raw_row(cells: Vec<String>) -> RawRow {
    let mut cells = cells.into_iter();
    [
        cells.next().unwrap_or_default(),
        cells.next().unwrap_or_default(),
        cells.next().unwrap_or_default(),
    ]
}

fn duplicate_parameters(items: &[crate::model::AData]) -> Vec<AssessmentWarning> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|i| !seen.insert(i.parameter.as_str()))
        .map(|i| AssessmentWarning::DuplicateParameter {
            parameter: i.parameter.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tests::word;
    use crate::extraction::{TextLine, Word};
    use crate::model::AData;

    fn line(words: Vec<Word>) -> TextLine {
        TextLine::from_words(words).unwrap()
    }

    /// A page shaped like the real report: caption, name 22pt below it,
    /// header row and a table with one wrapped description.
    fn report_page() -> PageLayout {
        PageLayout {
            page_number: 1,
            width: 595.0,
            height: 842.0,
            lines: vec![
                line(vec![
                    word("Тест", 40.0, 60.0, 70.0, 72.0),
                    word("потенциала", 72.0, 60.0, 130.0, 72.0),
                    word("Potential", 132.0, 60.0, 180.0, 72.0),
                    word("in", 182.0, 60.0, 190.0, 72.0),
                    word("Focus", 192.0, 60.0, 230.0, 72.0),
                ]),
                line(vec![
                    word("Иванов", 40.0, 82.0, 90.0, 94.0),
                    word("Иван", 92.0, 82.0, 120.0, 94.0),
                ]),
                line(vec![
                    word("ШКАЛА", 40.0, 150.0, 80.0, 160.0),
                    word("ОПИСАНИЕ", 150.0, 150.0, 200.0, 160.0),
                    word("ШКАЛЫ", 202.0, 150.0, 240.0, 160.0),
                    word("Процентиль", 400.0, 150.0, 460.0, 160.0),
                ]),
                line(vec![
                    word("Лидерство", 40.0, 170.0, 100.0, 180.0),
                    word("Умение", 150.0, 170.0, 190.0, 180.0),
                    word("вести", 192.0, 170.0, 220.0, 180.0),
                ]),
                line(vec![
                    word("за", 150.0, 182.0, 165.0, 192.0),
                    word("собой", 167.0, 182.0, 200.0, 192.0),
                    word("57", 420.0, 182.0, 432.0, 192.0),
                ]),
                line(vec![
                    word("Гибкость", 40.0, 200.0, 100.0, 210.0),
                    word("Адаптация", 150.0, 200.0, 210.0, 210.0),
                    word("12.9", 420.0, 200.0, 440.0, 210.0),
                ]),
            ],
        }
    }

    fn layout() -> DocumentLayout {
        DocumentLayout {
            pages: vec![report_page()],
        }
    }

    #[test]
    fn test_build_extracts_name_and_items() {
        let assessment = AssessmentBuilder::new(LayoutConfig::default())
            .build(&layout())
            .unwrap();

        assert_eq!(assessment.name, "Иванов Иван");
        assert_eq!(
            assessment.items,
            vec![
                AData {
                    parameter: "Лидерство".into(),
                    description: "Умение вести за собой".into(),
                    value: 57,
                },
                AData {
                    parameter: "Гибкость".into(),
                    description: "Адаптация".into(),
                    value: 12,
                },
            ]
        );
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn test_column_boundaries_from_captions() {
        let builder = AssessmentBuilder::new(LayoutConfig::default());
        let doc = layout();
        let (page, lines) = builder.resolve_columns(&doc).unwrap();
        assert_eq!(page.page_number, 1);
        assert_eq!(lines, vec![35.0, 145.0, 400.0, 460.0]);
    }

    #[test]
    fn test_missing_name_label_is_an_error() {
        let config = LayoutConfig {
            name_label: "Assessment of".into(),
            ..LayoutConfig::default()
        };
        let err = AssessmentBuilder::new(config).build(&layout()).unwrap_err();
        assert!(matches!(err, PifError::LabelNotFound { ref label } if label == "Assessment of"));
    }

    #[test]
    fn test_wrong_offset_finds_no_name() {
        let config = LayoutConfig {
            name_vertical_offset: 300.0,
            ..LayoutConfig::default()
        };
        let err = AssessmentBuilder::new(config).build(&layout()).unwrap_err();
        assert!(matches!(err, PifError::NameNotFound { .. }));
    }

    #[test]
    fn test_name_wider_than_caption_is_an_error() {
        let mut doc = layout();
        doc.pages[0].lines[1] = line(vec![
            word("Иванова", 40.0, 82.0, 100.0, 94.0),
            word("Александра", 102.0, 82.0, 190.0, 94.0),
            word("Владимировна", 192.0, 82.0, 290.0, 94.0),
        ]);
        let err = AssessmentBuilder::new(LayoutConfig::default())
            .build(&doc)
            .unwrap_err();
        assert!(matches!(err, PifError::NameNotFound { .. }));
    }

    #[test]
    fn test_missing_header_caption_is_an_error() {
        let mut doc = layout();
        doc.pages[0].lines.remove(2);
        let err = AssessmentBuilder::new(LayoutConfig::default())
            .build(&doc)
            .unwrap_err();
        assert!(matches!(err, PifError::LabelNotFound { ref label } if label == "ШКАЛА"));
    }

    #[test]
    fn test_duplicate_parameters_are_flagged() {
        let mut doc = layout();
        doc.pages[0].lines.push(line(vec![
            word("Гибкость", 40.0, 220.0, 100.0, 230.0),
            word("40", 420.0, 220.0, 432.0, 230.0),
        ]));
        let assessment = AssessmentBuilder::new(LayoutConfig::default())
            .build(&doc)
            .unwrap();
        assert_eq!(assessment.items.len(), 3);
        assert_eq!(
            assessment.warnings,
            vec![AssessmentWarning::DuplicateParameter {
                parameter: "Гибкость".into()
            }]
        );
    }
}
