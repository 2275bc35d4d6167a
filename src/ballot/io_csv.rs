// Primitives for reading and writing CSV ballot tables.

use std::fs::File;

use crate::ballot::{io_common::make_default_id, *};

pub fn read_csv_table(path: &str, cfs: &FileSource) -> BallotResult<Vec<ParsedRow>> {
    let default_id = make_default_id(path);
    let (mut records, header_row) = get_records(path, cfs)?;

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu {
                lineno: header_row + 1,
            })?
            .iter()
            .map(|s| s.trim().to_string())
            .collect(),
        None => whatever!("No header found in {}", path),
    };
    let columns = cfs.columns(&header)?;

    let mut res: Vec<ParsedRow> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // Line numbers start at 1, like in a spreadsheet.
        let lineno = idx + header_row + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_table: lineno: {:?} line: {:?}", lineno, line);
        if line.iter().all(|s| s.trim().is_empty()) {
            continue;
        }

        let unit = match line.get(columns.unit).map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => default_id(lineno),
        };
        // A missing interest is reported by the validation, with the unit.
        let interest = line.get(columns.interest).unwrap_or("").to_string();
        let vote = columns
            .vote
            .map(|idx| line.get(idx).unwrap_or("").trim().to_string());

        res.push(ParsedRow {
            lineno,
            unit,
            interest,
            vote,
        });
    }
    Ok(res)
}

fn get_records(path: &str, cfs: &FileSource) -> BallotResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let header_row = cfs.first_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..header_row {
        _ = records.next();
    }
    Ok((records, header_row))
}

/// Writes the ballot table with its current votes.
pub fn write_csv_table(path: &str, rows: &[VoterRow]) -> BallotResult<()> {
    info!("Writing {} rows to {:?}", rows.len(), path);
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    wtr.write_record([UNIT_HEADER, INTEREST_HEADER, VOTE_HEADER])
        .context(CsvWriteSnafu { path })?;
    for row in rows.iter() {
        wtr.write_record([
            row.unit_identifier.as_str(),
            row.beneficial_interest.to_string().as_str(),
            row.vote.token(),
        ])
        .context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    Ok(())
}
