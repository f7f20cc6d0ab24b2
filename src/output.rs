use std::io::{self, Write};

use clap::ValueEnum;

use crate::db::OfferRow;
use crate::model::JobOffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Table,
    Csv,
    Json,
}

const TABLE_COLUMNS: [&str; 5] = ["title", "company", "city", "salary", "source"];
const CSV_COLUMNS: [&str; 8] = [
    "source",
    "title",
    "company",
    "city",
    "salary_min_pln",
    "salary_max_pln",
    "skills",
    "offer_url",
];

pub fn format_salary(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{}-{} PLN", lo, hi),
        (Some(lo), None) => format!("from {} PLN", lo),
        (None, Some(hi)) => format!("up to {} PLN", hi),
        (None, None) => "n/a".to_string(),
    }
}

pub fn write_rows<W: Write>(
    mut w: W,
    rows: &[OfferRow],
    total: usize,
    format: Format,
    verbose: bool,
) -> io::Result<()> {
    match format {
        Format::Text => write_text(&mut w, rows, total, verbose),
        Format::Table => write_table(&mut w, rows),
        Format::Csv => write_csv(&mut w, rows),
        Format::Json => {
            serde_json::to_writer_pretty(&mut w, rows)?;
            writeln!(w)
        }
    }
}

fn write_text<W: Write>(w: &mut W, rows: &[OfferRow], total: usize, verbose: bool) -> io::Result<()> {
    writeln!(w, "Total rows in DB: {}", total)?;
    writeln!(w, "Matching rows: {}", rows.len())?;
    writeln!(w)?;
    for r in rows {
        writeln!(
            w,
            "  {} | {} | {} | {} | {}",
            r.title,
            r.company,
            r.city.as_deref().unwrap_or("?"),
            format_salary(r.salary_min_pln, r.salary_max_pln),
            r.source
        )?;
        if verbose {
            writeln!(w, "    skills: {}", r.skills.join(", "))?;
            writeln!(w, "    url:    {}", r.offer_url)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_table<W: Write>(w: &mut W, rows: &[OfferRow]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(w, "(no results)");
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.title.clone(),
                r.company.clone(),
                r.city.clone().unwrap_or_else(|| "?".into()),
                format_salary(r.salary_min_pln, r.salary_max_pln),
                r.source.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .zip(widths)
        .map(|(col, width)| pad(&col.to_uppercase(), width))
        .collect();
    writeln!(w, "{}", header.join(" | ").trim_end())?;
    let sep: Vec<String> = widths.iter().map(|n| "-".repeat(*n)).collect();
    writeln!(w, "{}", sep.join("-+-"))?;

    for row in &cells {
        let line: Vec<String> = row.iter().zip(widths).map(|(c, width)| pad(c, width)).collect();
        writeln!(w, "{}", line.join(" | ").trim_end())?;
    }
    Ok(())
}

/// Left-align to `width` display characters.
fn pad(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(n)))
}

fn write_csv<W: Write>(w: &mut W, rows: &[OfferRow]) -> io::Result<()> {
    let header: Vec<String> = CSV_COLUMNS.iter().map(|c| c.to_string()).collect();
    write_csv_row(&mut *w, &header)?;
    for r in rows {
        let fields = vec![
            r.source.clone(),
            r.title.clone(),
            r.company.clone(),
            r.city.clone().unwrap_or_default(),
            r.salary_min_pln.map(|v| v.to_string()).unwrap_or_default(),
            r.salary_max_pln.map(|v| v.to_string()).unwrap_or_default(),
            r.skills.join("; "),
            r.offer_url.clone(),
        ];
        write_csv_row(&mut *w, &fields)?;
    }
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

pub fn write_csv_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// One-line summary used after a fetch cycle.
pub fn preview_line(index: usize, offer: &JobOffer) -> String {
    let skills = if offer.skills.is_empty() {
        "n/a".to_string()
    } else {
        offer.skills.iter().take(4).cloned().collect::<Vec<_>>().join(", ")
    };
    format!(
        "{}. {} | {} | {} | salary: {} | skills: {}",
        index,
        offer.title,
        offer.company,
        offer.workplace_type,
        format_salary(offer.salary_min_pln, offer.salary_max_pln),
        skills
    )
}

// ── Tests ──
