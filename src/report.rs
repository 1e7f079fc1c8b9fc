use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::{ChosenDraft, SearchOutcome};

pub const NO_RESULT_MESSAGE: &str = "No balanced drafts generated. Run again to get new results.";

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Write the outcome of a search in the requested format.
///
/// A run with no balanced draft always prints the plain failure message.
pub fn render<W: Write>(outcome: &SearchOutcome, format: OutputFormat, out: &mut W) -> Result<()> {
    let Some(chosen) = &outcome.chosen else {
        writeln!(out, "{NO_RESULT_MESSAGE}")?;
        return Ok(());
    };

    match format {
        OutputFormat::Table => render_table(chosen, out),
        OutputFormat::Json => render_json(outcome, out),
        OutputFormat::Csv => render_csv(chosen, out),
    }
}

fn render_table<W: Write>(chosen: &ChosenDraft, out: &mut W) -> Result<()> {
    writeln!(out, "{:8} {:8} Frequency", "Shaft", "Draft")?;
    for group in &chosen.groups {
        writeln!(
            out,
            "{:<9}{:<9}{:.5}",
            group.index.to_string(),
            group.label(),
            group.mean_frequency
        )?;
    }
    Ok(())
}

fn render_json<W: Write>(outcome: &SearchOutcome, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, outcome)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct CsvRow {
    shaft: usize,
    draft: String,
    frequency: String,
}

fn render_csv<W: Write>(chosen: &ChosenDraft, out: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for group in &chosen.groups {
        writer.serialize(CsvRow {
            shaft: group.index,
            draft: group.label(),
            frequency: format!("{:.5}", group.mean_frequency),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::LetterStat;
    use crate::partition::Group;

    fn outcome() -> SearchOutcome {
        let letter = |c: char| LetterStat::new(c, 4, 0.25);
        SearchOutcome {
            trials_run: 10,
            accepted: 10,
            baseline: 0.25,
            chosen: Some(ChosenDraft {
                acceptance: 3,
                trial: 2,
                spread: 0.0,
                groups: vec![
                    Group::new(1, vec![letter('C')]),
                    Group::new(2, vec![letter('A')]),
                    Group::new(3, vec![letter('D')]),
                    Group::new(4, vec![letter('B')]),
                ],
            }),
        }
    }

    fn rendered(outcome: &SearchOutcome, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render(outcome, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let text = rendered(&outcome(), OutputFormat::Table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Shaft    Draft    Frequency");
        assert_eq!(lines[1], "1        C        0.25000");
        assert_eq!(lines[4], "4        B        0.25000");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_table_sorts_member_letters() {
        let mut outcome = outcome();
        outcome.chosen.as_mut().unwrap().groups[0] = Group::new(
            1,
            vec![
                LetterStat::new('Z', 1, 0.1),
                LetterStat::new('E', 1, 0.2),
                LetterStat::new('M', 1, 0.3),
            ],
        );
        let text = rendered(&outcome, OutputFormat::Table);
        assert_eq!(text.lines().nth(1).unwrap(), "1        EMZ      0.20000");
    }

    #[test]
    fn test_csv_rows() {
        let text = rendered(&outcome(), OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "shaft,draft,frequency");
        assert_eq!(lines[1], "1,C,0.25000");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_json_contains_groups_and_baseline() {
        let text = rendered(&outcome(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["baseline"], 0.25);
        assert_eq!(value["chosen"]["groups"].as_array().unwrap().len(), 4);
        assert_eq!(value["chosen"]["groups"][0]["members"][0]["letter"], "C");
    }

    #[test]
    fn test_no_result_message_for_every_format() {
        let empty = SearchOutcome {
            trials_run: 10,
            accepted: 0,
            baseline: 0.25,
            chosen: None,
        };
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            assert_eq!(rendered(&empty, format), format!("{NO_RESULT_MESSAGE}\n"));
        }
    }

    #[test]
    fn test_format_display_names() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
