use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::leaderboard::Leaderboard;
use crate::score::ParticipantResult;

/// Standings CSV: `Rank, Player, Total Score, Pick 1..N, Unmatched Picks`.
/// Pick cells use the `"{name} ({score})"` contract.
pub fn write_results_csv(path: &Path, results: &[ParticipantResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;

    let pick_count = max_pick_count(results);
    let mut header = vec!["Rank".to_string(), "Player".to_string(), "Total Score".to_string()];
    for n in 1..=pick_count {
        header.push(format!("Pick {n}"));
    }
    header.push("Unmatched Picks".to_string());
    writer.write_record(&header).context("write csv header")?;

    for result in results {
        let mut record = vec![
            result.rank.to_string(),
            result.id.clone(),
            result.total.to_string(),
        ];
        for n in 0..pick_count {
            record.push(
                result
                    .picks
                    .get(n)
                    .map(|p| p.display())
                    .unwrap_or_default(),
            );
        }
        record.push(unmatched_summary(result));
        writer.write_record(&record).context("write csv row")?;
    }

    writer.flush().context("flush csv")?;
    Ok(())
}

/// Two-sheet workbook: pool standings (unmatched picks in red, fallback
/// matches in orange) plus the resolved field.
pub fn export_results_xlsx(
    path: &Path,
    results: &[ParticipantResult],
    leaderboard: &Leaderboard,
) -> Result<()> {
    let header_format = Format::new().set_bold();
    let unmatched_format = Format::new().set_font_color(Color::Red);
    let fallback_format = Format::new().set_font_color(Color::Orange);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_standings_sheet(sheet, results, &header_format, &unmatched_format, &fallback_format)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Field")?;
        write_field_sheet(sheet, leaderboard, &header_format)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save {}", path.display()))?;
    Ok(())
}

fn write_standings_sheet(
    sheet: &mut Worksheet,
    results: &[ParticipantResult],
    header_format: &Format,
    unmatched_format: &Format,
    fallback_format: &Format,
) -> Result<()> {
    let pick_count = max_pick_count(results);
    let mut header = vec!["Rank".to_string(), "Player".to_string(), "Total Score".to_string()];
    for n in 1..=pick_count {
        header.push(format!("Pick {n}"));
    }
    header.push("Unmatched Picks".to_string());
    for (col, title) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, header_format)?;
    }

    for (idx, result) in results.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, result.rank as f64)?;
        sheet.write_string(row, 1, &result.id)?;
        sheet.write_number(row, 2, result.total as f64)?;
        for n in 0..pick_count {
            let col = (3 + n) as u16;
            let Some(pick) = result.picks.get(n) else {
                continue;
            };
            if !pick.matched {
                sheet.write_string_with_format(row, col, pick.display(), unmatched_format)?;
            } else if pick.via_fallback {
                sheet.write_string_with_format(row, col, pick.display(), fallback_format)?;
            } else {
                sheet.write_string(row, col, pick.display())?;
            }
        }
        let summary = unmatched_summary(result);
        if !summary.is_empty() {
            sheet.write_string_with_format(
                row,
                (3 + pick_count) as u16,
                summary,
                unmatched_format,
            )?;
        }
    }

    sheet.autofit();
    Ok(())
}

fn write_field_sheet(
    sheet: &mut Worksheet,
    leaderboard: &Leaderboard,
    header_format: &Format,
) -> Result<()> {
    for (col, title) in ["Rank", "Player", "Reported Position"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header_format)?;
    }
    for (idx, competitor) in leaderboard.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, competitor.rank as f64)?;
        sheet.write_string(row, 1, &competitor.display_name)?;
        match competitor.position {
            Some(position) => sheet.write_number(row, 2, position as f64)?,
            None => sheet.write_string(row, 2, "-")?,
        };
    }
    sheet.autofit();
    Ok(())
}

fn max_pick_count(results: &[ParticipantResult]) -> usize {
    results.iter().map(|r| r.picks.len()).max().unwrap_or(0)
}

fn unmatched_summary(result: &ParticipantResult) -> String {
    result
        .unmatched()
        .map(|p| p.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
