use crate::ballot::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const UNIT_HEADER: &str = "Unit Number";
pub const INTEREST_HEADER: &str = "Beneficial Interest";
pub const VOTE_HEADER: &str = "Vote";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "unitColumnIndex")]
    pub unit_column_index: Option<JSValue>,
    #[serde(rename = "interestColumnIndex")]
    pub interest_column_index: Option<JSValue>,
    #[serde(rename = "voteColumnIndex")]
    pub vote_column_index: Option<JSValue>,
    #[serde(rename = "firstRowIndex")]
    _first_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

/// The positions of the columns of interest in a ballot table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct TableColumns {
    pub unit: usize,
    pub interest: usize,
    pub vote: Option<usize>,
}

impl FileSource {
    /// A source that only relies on the default header names.
    pub fn from_input(path: &str, provider: &str, excel_worksheet_name: Option<String>) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: path.to_string(),
            unit_column_index: None,
            interest_column_index: None,
            vote_column_index: None,
            _first_row_index: None,
            excel_worksheet_name,
        }
    }

    /// The (zero-based) index of the header row. Defaults to the first row.
    pub fn first_row_index(&self) -> BallotResult<usize> {
        match &self._first_row_index {
            None => Ok(0),
            Some(JSValue::Number(n)) => n
                .as_u64()
                .filter(|x| *x >= 1)
                .map(|x| (x - 1) as usize)
                .context(ParsingColumnSnafu {
                    content: n.to_string(),
                }),
            Some(JSValue::String(s)) => match s.parse::<usize>() {
                Ok(x) if x >= 1 => Ok(x - 1),
                _ => ParsingColumnSnafu { content: s.clone() }.fail(),
            },
            Some(x) => ParsingColumnSnafu {
                content: x.to_string(),
            }
            .fail(),
        }
    }

    /// Finds the columns in the given header.
    ///
    /// The vote column is optional unless it is explicitly configured.
    pub fn columns(&self, header: &[String]) -> BallotResult<TableColumns> {
        let unit = resolve_column(&self.unit_column_index, header, UNIT_HEADER)?;
        let interest = resolve_column(&self.interest_column_index, header, INTEREST_HEADER)?;
        let vote = if self.vote_column_index.is_some() {
            Some(resolve_column(&self.vote_column_index, header, VOTE_HEADER)?)
        } else {
            header.iter().position(|h| h == VOTE_HEADER)
        };
        debug!(
            "columns: unit: {:?} interest: {:?} vote: {:?} header: {:?}",
            unit, interest, vote, header
        );
        Ok(TableColumns {
            unit,
            interest,
            vote,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct BallotRules {
    #[serde(rename = "resetVotes")]
    pub reset_votes: Option<bool>,
    #[serde(rename = "notVotedLabel")]
    pub not_voted_label: Option<String>,
}

impl BallotRules {
    pub fn not_voted_label(&self) -> String {
        self.not_voted_label
            .clone()
            .unwrap_or_else(|| NOT_VOTED.to_string())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "ballotFileSources")]
    pub ballot_file_sources: Vec<FileSource>,
    #[serde(default)]
    pub rules: BallotRules,
}

pub fn read_config(path: &str) -> BallotResult<BallotConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> BallotResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_summary: content: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// A column is referenced by its header name, its number (starting at 1)
/// or its letter in a spreadsheet. Header names take precedence.
fn resolve_column(x: &Option<JSValue>, header: &[String], default_name: &str) -> BallotResult<usize> {
    match x {
        None => find_header(header, default_name),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .filter(|x| *x >= 1)
            .map(|x| (x - 1) as usize)
            .context(ParsingColumnSnafu {
                content: n.to_string(),
            }),
        Some(JSValue::String(s)) if header.iter().any(|h| h == s) => find_header(header, s),
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            match s.parse::<usize>() {
                Ok(x) if x >= 1 => Ok(x - 1),
                _ => ParsingColumnSnafu { content: s.clone() }.fail(),
            }
        }
        Some(JSValue::String(s)) if is_column_letter(s) => Ok(excel_column(s)),
        Some(JSValue::String(s)) => MissingColumnSnafu { name: s.clone() }.fail(),
        Some(x) => ParsingColumnSnafu {
            content: x.to_string(),
        }
        .fail(),
    }
}

fn find_header(header: &[String], name: &str) -> BallotResult<usize> {
    header
        .iter()
        .position(|h| h == name)
        .context(MissingColumnSnafu { name })
}

fn is_column_letter(s: &str) -> bool {
    !s.is_empty() && s.len() <= 3 && s.chars().all(|c| c.is_ascii_alphabetic())
}

// A -> 0, Z -> 25, AA -> 26
fn excel_column(s: &str) -> usize {
    let n = s
        .to_ascii_uppercase()
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
    n - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header() -> Vec<String> {
        ["Unit Number", "Beneficial Interest", "Vote", "B"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn excel_letters() {
        assert_eq!(excel_column("A"), 0);
        assert_eq!(excel_column("c"), 2);
        assert_eq!(excel_column("Z"), 25);
        assert_eq!(excel_column("AA"), 26);
        assert_eq!(excel_column("AB"), 27);
    }

    #[test]
    fn column_references() {
        let h = header();
        assert_eq!(resolve_column(&None, &h, VOTE_HEADER).unwrap(), 2);
        assert_eq!(resolve_column(&Some(json!(2)), &h, VOTE_HEADER).unwrap(), 1);
        assert_eq!(resolve_column(&Some(json!("3")), &h, VOTE_HEADER).unwrap(), 2);
        assert_eq!(resolve_column(&Some(json!("C")), &h, VOTE_HEADER).unwrap(), 2);
        // A header called "B" wins over the column letter.
        assert_eq!(resolve_column(&Some(json!("B")), &h, VOTE_HEADER).unwrap(), 3);
        assert_eq!(
            resolve_column(&Some(json!("Vote")), &h, UNIT_HEADER).unwrap(),
            2
        );
        assert!(resolve_column(&Some(json!(0)), &h, VOTE_HEADER).is_err());
        assert!(resolve_column(&Some(json!("Not a column")), &h, VOTE_HEADER).is_err());
        assert!(resolve_column(&Some(json!(true)), &h, VOTE_HEADER).is_err());
        assert!(resolve_column(&None, &h, "Owner").is_err());
    }

    #[test]
    fn optional_vote_column() {
        let cfs = FileSource::from_input("x.csv", "csv", None);
        let h: Vec<String> = vec![UNIT_HEADER.to_string(), INTEREST_HEADER.to_string()];
        assert_eq!(
            cfs.columns(&h).unwrap(),
            TableColumns {
                unit: 0,
                interest: 1,
                vote: None
            }
        );
        assert_eq!(cfs.first_row_index().unwrap(), 0);
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": {"contestName": "roof"},
            "ballotFileSources": [
                {"provider": "csv", "filePath": "a.csv", "voteColumnIndex": "C", "firstRowIndex": 2}
            ]
        }"#;
        let config: BallotConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.rules, BallotRules::default());
        assert_eq!(config.rules.not_voted_label(), NOT_VOTED);
        let cfs = &config.ballot_file_sources[0];
        assert_eq!(cfs.first_row_index().unwrap(), 1);
        assert_eq!(cfs.columns(&header()).unwrap().vote, Some(2));
    }
}
