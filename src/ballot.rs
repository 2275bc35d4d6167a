use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use weighted_tally::builder::Builder;
use weighted_tally::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::ballot::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum BallotError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("No worksheet named {name} in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not understand the column or row index {content}"))]
    ParsingColumn { content: String },
    #[snafu(display("Column {name} not found"))]
    MissingColumn { name: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Invalid ballot table: {source}"))]
    InvalidBallot { source: TallyErrors },
    #[snafu(display("Invalid row at line {lineno}: {source}"))]
    InvalidRow { source: TallyErrors, lineno: usize },
    #[snafu(display("Could not understand the vote {content}, expected UNIT=CHOICE"))]
    ParsingVote { content: String },
    #[snafu(display("Unit {unit} is not in the ballot table"))]
    UnknownUnit { unit: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BallotResult<T> = Result<T, BallotError>;

/// A row of the ballot table, as parsed by the readers.
/// This is before checking the interest and applying the rules.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRow {
    pub lineno: usize,
    pub unit: String,
    pub interest: String,
    // None if the table has no vote column.
    pub vote: Option<String>,
}

fn read_ballot_table(root_path: &Path, cfs: &FileSource) -> BallotResult<Vec<ParsedRow>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_table(&p2, cfs),
        "excel" => io_excel::read_excel_table(&p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn validate_rows(parsed_rows: &[ParsedRow], rules: &BallotRules) -> BallotResult<Vec<VoterRow>> {
    let not_voted = rules.not_voted_label();
    let reset = rules.reset_votes.unwrap_or(false);
    let mut builder = Builder::new();
    for pr in parsed_rows.iter() {
        let vote = match &pr.vote {
            Some(v) if !reset => v.as_str(),
            _ => not_voted.as_str(),
        };
        builder
            .add_row(&pr.unit, &pr.interest, vote)
            .context(InvalidRowSnafu { lineno: pr.lineno })?;
    }
    Ok(builder.rows().to_vec())
}

/// Parses the vote overrides passed on the command line, as `UNIT=CHOICE`.
fn parse_votes(votes: &[String]) -> BallotResult<Vec<(String, BallotChoice)>> {
    let mut res = Vec::new();
    for s in votes.iter() {
        match s.split_once('=') {
            Some((unit, choice)) if !unit.trim().is_empty() => {
                res.push((
                    unit.trim().to_string(),
                    BallotChoice::from_token(choice.trim()),
                ));
            }
            _ => return ParsingVoteSnafu { content: s.clone() }.fail(),
        }
    }
    Ok(res)
}

/// Sets the votes of the given units. All the rows of a unit are updated.
fn apply_votes(rows: &mut [VoterRow], votes: &[(String, BallotChoice)]) -> BallotResult<()> {
    for (unit, choice) in votes.iter() {
        let mut found = false;
        for row in rows.iter_mut().filter(|r| r.unit_identifier == *unit) {
            debug!(
                "apply_votes: unit {}: {:?} -> {:?}",
                unit, row.vote, choice
            );
            row.vote = choice.clone();
            found = true;
        }
        ensure!(found, UnknownUnitSnafu { unit });
        if !choice.is_cast() {
            warn!("apply_votes: unit {}: {:?} is not a vote", unit, choice.token());
        }
    }
    Ok(())
}

fn build_summary_js(config: &BallotConfig, rows: &[VoterRow], result: &TallyResult) -> BallotResult<JSValue> {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
    };
    let (yes, no, non_voters) = result.percentages().context(InvalidBallotSnafu {})?;
    let breakdown: Vec<JSValue> = result
        .breakdown()
        .into_iter()
        .map(|(label, value)| json!({"label": label, "value": value}))
        .collect();
    Ok(json!({
        "config": c,
        "results": {
            "rows": rows.len(),
            "voted": rows.iter().filter(|r| r.vote.is_cast()).count(),
            "interest": {
                "total": result.total_interest.to_string(),
                "yes": result.yes_interest.to_string(),
                "no": result.no_interest.to_string(),
                "nonVoters": result.non_voter_interest.to_string(),
            },
            "percentages": {
                "YES": yes.to_string(),
                "NO": no.to_string(),
                "Non-Voters": non_voters.to_string(),
            },
            "breakdown": breakdown,
        }
    }))
}

fn print_metrics(result: &TallyResult) -> BallotResult<()> {
    let (yes, no, non_voters) = result.percentages().context(InvalidBallotSnafu {})?;
    println!("YES | vote %: {}%", yes);
    println!("NO | vote %: {}%", no);
    println!("Non-voters | vote %: {}%", non_voters);
    Ok(())
}

/// Finds the configuration of the ballot, either from the config file or
/// from the input flags.
fn load_config(args: &Args) -> BallotResult<(BallotConfig, PathBuf)> {
    let input_source = args.input.as_ref().map(|input| {
        let provider = args
            .input_type
            .clone()
            .unwrap_or_else(|| io_common::guess_provider(input).to_string());
        FileSource::from_input(input, &provider, args.excel_worksheet_name.clone())
    });

    match (&args.config, input_source) {
        (Some(config_path), input_source) => {
            let mut config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?;
            // The input flag overrides the sources of the configuration.
            if let Some(cfs) = input_source {
                config.ballot_file_sources = vec![cfs];
            }
            Ok((config, root_p.to_path_buf()))
        }
        (None, Some(cfs)) => {
            let config = BallotConfig {
                output_settings: OutputSettings {
                    contest_name: io_common::simplify_file_name(&cfs.file_path),
                    output_directory: None,
                    contest_date: None,
                },
                ballot_file_sources: vec![cfs],
                rules: BallotRules::default(),
            };
            Ok((config, PathBuf::new()))
        }
        (None, None) => whatever!("Either a configuration file or an input file is required"),
    }
}

fn write_summary(pretty_js: &str, out: &Option<String>, settings: &OutputSettings, root_p: &Path) -> BallotResult<()> {
    let target: Option<String> = out.clone().or_else(|| {
        settings.output_directory.as_ref().map(|dir| {
            root_p
                .join(dir)
                .join(format!("{}_summary.json", settings.contest_name))
                .display()
                .to_string()
        })
    });
    match target.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

fn check_summary(pretty_js_stats: &str, summary_p: &str) -> BallotResult<()> {
    let summary_ref = read_summary(summary_p)?;
    info!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Reads the ballot table, applies the votes and tallies the result.
fn tally_ballot(config: &BallotConfig, root_p: &Path, votes: &[String]) -> BallotResult<(Vec<VoterRow>, TallyResult)> {
    let votes = parse_votes(votes)?;
    if config.ballot_file_sources.is_empty() {
        whatever!("No ballot file sources detected");
    }

    let mut parsed_rows: Vec<ParsedRow> = Vec::new();
    for cfs in config.ballot_file_sources.iter() {
        let mut file_data = read_ballot_table(root_p, cfs)?;
        parsed_rows.append(&mut file_data);
    }
    debug!("data: {:?}", parsed_rows);

    let mut rows = validate_rows(&parsed_rows, &config.rules)?;
    apply_votes(&mut rows, &votes)?;

    let result = compute_tally(&rows).context(InvalidBallotSnafu {})?;
    info!("result: {:?}", result);
    Ok((rows, result))
}

pub fn run_tally(args: &Args) -> BallotResult<()> {
    let (config, root_p) = load_config(args)?;
    let (rows, result) = tally_ballot(&config, &root_p, &args.votes)?;

    print_metrics(&result)?;

    if let Some(export_p) = &args.export {
        io_csv::write_csv_table(export_p, &rows)?;
    }

    let result_js = build_summary_js(&config, &rows, &result)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, &args.out, &config.output_settings, &root_p)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_summary(&pretty_js_stats, summary_p)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_dir() -> String {
        option_env!("BALLOT_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests"))
            .to_string()
    }

    fn empty_args() -> Args {
        Args {
            config: None,
            reference: None,
            out: None,
            input: None,
            input_type: None,
            excel_worksheet_name: None,
            votes: Vec::new(),
            export: None,
            verbose: false,
        }
    }

    fn run_ballot_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
        init();
        let test_dir = test_dir();
        info!("Running test {}", test_name);
        let args = Args {
            config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
            reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
            ..empty_args()
        };
        let res = run_tally(&args);
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }

    fn test_wrapper(test_name: &str) {
        run_ballot_test(
            test_name,
            format!("{}_config.json", test_name).as_str(),
            format!("{}_expected_summary.json", test_name).as_str(),
        )
    }

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("ballotsim-{}-{}", std::process::id(), name))
            .display()
            .to_string()
    }

    #[test]
    fn owners_vote() {
        test_wrapper("owners_vote");
    }

    #[test]
    fn reset_votes() {
        test_wrapper("reset_votes");
    }

    #[test]
    fn owners_vote_excel() {
        test_wrapper("owners_vote_excel");
    }

    #[test]
    fn reference_mismatch() {
        init();
        let test_dir = test_dir();
        let args = Args {
            config: Some(format!("{}/owners_vote/owners_vote_config.json", test_dir)),
            reference: Some(format!(
                "{}/reset_votes/reset_votes_expected_summary.json",
                test_dir
            )),
            ..empty_args()
        };
        assert!(matches!(run_tally(&args), Err(BallotError::Whatever { .. })));
    }

    #[test]
    fn parse_vote_overrides() {
        let votes = parse_votes(&["0101=YES".to_string(), " 0102 = NO ".to_string()]).unwrap();
        assert_eq!(
            votes,
            vec![
                ("0101".to_string(), BallotChoice::Yes),
                ("0102".to_string(), BallotChoice::No)
            ]
        );
        assert!(matches!(
            parse_votes(&["0101".to_string()]),
            Err(BallotError::ParsingVote { .. })
        ));
        assert!(parse_votes(&["=YES".to_string()]).is_err());
    }

    #[test]
    fn apply_vote_overrides() {
        let mut rows = vec![
            VoterRow::new("0101", 1.0, NOT_VOTED),
            VoterRow::new("0102", 1.0, NOT_VOTED),
            VoterRow::new("0101", 1.0, NOT_VOTED),
        ];
        apply_votes(&mut rows, &[("0101".to_string(), BallotChoice::No)]).unwrap();
        let tokens: Vec<&str> = rows.iter().map(|r| r.vote.token()).collect();
        assert_eq!(tokens, vec!["NO", NOT_VOTED, "NO"]);

        let res = apply_votes(&mut rows, &[("9999".to_string(), BallotChoice::Yes)]);
        assert!(matches!(res, Err(BallotError::UnknownUnit { .. })));
    }

    #[test]
    fn invalid_interest_is_reported() {
        let parsed = vec![
            ParsedRow {
                lineno: 2,
                unit: "0101".to_string(),
                interest: "12".to_string(),
                vote: Some("YES".to_string()),
            },
            ParsedRow {
                lineno: 4,
                unit: "0102".to_string(),
                interest: "twelve".to_string(),
                vote: Some("YES".to_string()),
            },
        ];
        let res = validate_rows(&parsed, &BallotRules::default());
        assert!(matches!(
            res,
            Err(BallotError::InvalidRow {
                source: TallyErrors::InvalidWeight { .. },
                lineno: 4,
            })
        ));
        let msg = res.unwrap_err().to_string();
        assert!(msg.starts_with("Invalid row at line 4:"), "{}", msg);
    }

    #[test]
    fn reset_rule_uses_label() {
        let parsed = vec![ParsedRow {
            lineno: 2,
            unit: "0101".to_string(),
            interest: "1".to_string(),
            vote: Some("YES".to_string()),
        }];
        let rules = BallotRules {
            reset_votes: Some(true),
            not_voted_label: Some("pending".to_string()),
        };
        let rows = validate_rows(&parsed, &rules).unwrap();
        assert_eq!(rows[0].vote, BallotChoice::Uncast("pending".to_string()));
    }

    #[test]
    fn input_with_votes_and_export() {
        init();
        let input = format!("{}/owners_vote/owners_vote.csv", test_dir());
        let export = temp_path("export.csv");
        let out = temp_path("summary.json");
        let args = Args {
            input: Some(input),
            votes: vec!["0103=YES".to_string(), "0108=NO".to_string()],
            export: Some(export.clone()),
            out: Some(out.clone()),
            ..empty_args()
        };
        run_tally(&args).unwrap();

        // The exported table carries the new votes.
        let cfs = FileSource::from_input(&export, "csv", None);
        let exported = validate_rows(
            &io_csv::read_csv_table(&export, &cfs).unwrap(),
            &BallotRules::default(),
        )
        .unwrap();
        let result = compute_tally(&exported).unwrap();
        let (yes, no, non_voters) = result.percentages().unwrap();
        assert_eq!(yes.to_string(), "60.00");
        assert_eq!(no.to_string(), "25.00");
        assert_eq!(non_voters.to_string(), "15.00");

        let summary = read_summary(&out).unwrap();
        assert_eq!(summary["config"]["contest"], json!("owners_vote"));
        assert_eq!(summary["results"]["percentages"]["YES"], json!("60.00"));
    }

    #[test]
    fn missing_input() {
        assert!(load_config(&empty_args()).is_err());
    }
}
