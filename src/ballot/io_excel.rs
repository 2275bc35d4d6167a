use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::ballot::{io_common::make_default_id, *};

pub fn read_excel_table(path: &str, cfs: &FileSource) -> BallotResult<Vec<ParsedRow>> {
    let default_id = make_default_id(path);
    let wrange = get_range(path, cfs)?;
    let header_row = cfs.first_row_index()?;

    let mut iter = wrange.rows().skip(header_row);
    let header_cells = iter.next().context(EmptyExcelSnafu { path })?;
    let header: Vec<String> = header_cells
        .iter()
        .map(|c| read_cell(c, header_row + 1))
        .collect::<BallotResult<Vec<String>>>()?;
    debug!("read_excel_table: header: {:?}", header);
    let columns = cfs.columns(&header)?;

    let mut res: Vec<ParsedRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + header_row + 2;
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, row);
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            continue;
        }
        let cell = |i: usize| -> BallotResult<String> {
            row.get(i)
                .map(|c| read_cell(c, lineno))
                .unwrap_or_else(|| Ok("".to_string()))
        };

        let unit = match cell(columns.unit)? {
            s if s.is_empty() => default_id(lineno),
            s => s,
        };
        let interest = cell(columns.interest)?;
        let vote = match columns.vote {
            Some(i) => Some(cell(i)?),
            None => None,
        };
        res.push(ParsedRow {
            lineno,
            unit,
            interest,
            vote,
        });
    }
    Ok(res)
}

fn read_cell(cell: &DataType, lineno: usize) -> BallotResult<String> {
    match cell {
        DataType::String(s) => Ok(s.trim().to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Empty => Ok("".to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> BallotResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    };
    wrange.context(OpeningExcelSnafu { path })
}
