use clap::Parser;

/// This is a ballot tally program for unit owner votes weighted by beneficial interest.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the ballot description in JSON format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the summary of a ballot in JSON format. If provided, ballotsim will
    /// check that the tallied output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the ballot will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The ballot table. Setting this option overrides the sources that may be specified with
    /// the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or excel) The type of the input. Guessed from the file extension by default.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (UNIT=CHOICE, repeatable) Casts a vote for a unit before the tally, for example --vote 0101=YES
    #[clap(long = "vote", value_parser)]
    pub votes: Vec<String>,

    /// (file path) If specified, the ballot table with the updated votes is written as CSV to the given location.
    #[clap(short, long, value_parser)]
    pub export: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
