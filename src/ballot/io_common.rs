use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Identifier for a row whose unit cell is blank.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Guesses the input type from the extension of the file.
pub fn guess_provider(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => "excel",
        _ => "csv",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids() {
        let f = make_default_id("/data/owners_vote.csv");
        assert_eq!(f(12), "owners_vote-00000012");
    }

    #[test]
    fn providers() {
        assert_eq!(guess_provider("a/b.XLSX"), "excel");
        assert_eq!(guess_provider("a/b.csv"), "csv");
        assert_eq!(guess_provider("ballot"), "csv");
    }
}
