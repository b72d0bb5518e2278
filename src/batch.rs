use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::Config;
use crate::errors::ConvertResult;
use crate::statement::{self, TRANSACTION_TAG};
use crate::tree;
use crate::writer;

/// Outcome counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Converts a single statement file, returning the path of the CSV it
/// wrote.
///
/// Runs the whole pipeline: read, strip header, parse, walk to the
/// transaction list, infer headers from the first entry, emit one row per
/// `INVBANKTRAN` entry in document order (other siblings such as
/// `DTSTART`/`DTEND` are skipped), then write the output atomically.
pub fn convert_file(input: &Path, config: &Config) -> ConvertResult<PathBuf> {
    let raw = fs::read_to_string(input)?;
    let root = tree::parse_document(&raw)?;

    let list = statement::transaction_list(&root)?;
    let headers = statement::column_headers(list)?;

    let rows = list
        .children
        .iter()
        .filter(|node| node.tag == TRANSACTION_TAG)
        .map(|node| statement::transaction_row(node, &headers))
        .collect::<ConvertResult<Vec<_>>>()?;

    let output = config.output_path_for(input);
    writer::write_atomic(&output, &writer::render_csv(&headers, &rows))?;

    Ok(output)
}

/// Runs the batch: every file in the input directory whose name ends with
/// the recognized extension, processed independently in sorted order.
///
/// A failure while converting one file is logged and counted; the batch
/// always moves on to the next file. Only a failure to enumerate the
/// input directory itself is fatal.
pub fn run(config: &Config) -> ConvertResult<BatchSummary> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(&config.input_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| config.matches_input(&name.to_string_lossy()))
        })
        .collect();

    // read_dir order is platform-dependent; sort for reproducible runs
    inputs.sort();

    let mut summary = BatchSummary::default();

    for input in &inputs {
        info!("Converting {}", input.display());

        match convert_file(input, config) {
            Ok(output) => {
                info!("Saved output to {}", output.display());
                summary.converted += 1;
            }
            Err(err) => {
                error!("Failed to convert {}: {}", input.display(), err);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConvertError;
    use std::fs;

    const VALID_QFX: &str = "\
OFXHEADER:100
DATA:OFXSGML

<OFX>
    <INVSTMTMSGSRSV1>
        <INVSTMTTRNRS>
            <INVSTMTRS>
                <INVTRANLIST>
                    <DTSTART>20230101</DTSTART>
                    <INVBANKTRAN>
                        <STMTTRN>
                            <TRNTYPE>BUY</TRNTYPE>
                            <DTPOSTED>20230101</DTPOSTED>
                            <TRNAMT>100.00</TRNAMT>
                        </STMTTRN>
                        <SUBACCTFUND>CASH</SUBACCTFUND>
                    </INVBANKTRAN>
                </INVTRANLIST>
            </INVSTMTRS>
        </INVSTMTTRNRS>
    </INVSTMTMSGSRSV1>
</OFX>";

    fn test_config(dir: &Path) -> Config {
        Config {
            input_dir: dir.to_path_buf(),
            output_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_convert_file_matches_expected_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.qfx");
        fs::write(&input, VALID_QFX).unwrap();

        let output = convert_file(&input, &test_config(dir.path())).unwrap();

        assert_eq!(output, dir.path().join("a.csv"));
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "SUBACCTFUND,TRNTYPE,DTPOSTED,TRNAMT\nCASH,BUY,20230101,100.00\n"
        );
    }

    #[test]
    fn test_convert_file_row_count_and_width() {
        let dir = tempfile::tempdir().unwrap();
        let many = VALID_QFX.replace(
            "</INVBANKTRAN>",
            "</INVBANKTRAN>\
             <INVBANKTRAN><STMTTRN><TRNTYPE>SELL</TRNTYPE>\
             <DTPOSTED>20230102</DTPOSTED><TRNAMT>-5.00</TRNAMT></STMTTRN>\
             <SUBACCTFUND>MARGIN</SUBACCTFUND></INVBANKTRAN>",
        );
        let input = dir.path().join("a.qfx");
        fs::write(&input, many).unwrap();

        let output = convert_file(&input, &test_config(dir.path())).unwrap();
        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        // 2 transactions -> header + 2 rows
        assert_eq!(lines.len(), 3);
        let width = lines[0].split(',').count();
        for line in &lines {
            assert_eq!(line.split(',').count(), width);
        }
    }

    #[test]
    fn test_convert_file_later_transaction_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let sparse = VALID_QFX.replace(
            "</INVBANKTRAN>",
            "</INVBANKTRAN>\
             <INVBANKTRAN><STMTTRN><TRNTYPE>SELL</TRNTYPE>\
             <DTPOSTED>20230102</DTPOSTED></STMTTRN>\
             <SUBACCTFUND>MARGIN</SUBACCTFUND></INVBANKTRAN>",
        );
        let input = dir.path().join("a.qfx");
        fs::write(&input, sparse).unwrap();

        let output = convert_file(&input, &test_config(dir.path())).unwrap();
        let content = fs::read_to_string(&output).unwrap();

        assert!(content.ends_with("MARGIN,SELL,20230102,\n"));
    }

    #[test]
    fn test_convert_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.qfx");
        fs::write(&input, VALID_QFX).unwrap();
        let config = test_config(dir.path());

        let output = convert_file(&input, &config).unwrap();
        let first = fs::read(&output).unwrap();
        convert_file(&input, &config).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_convert_file_missing_fund_designator_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.qfx");
        fs::write(&input, VALID_QFX.replace("<SUBACCTFUND>CASH</SUBACCTFUND>", "")).unwrap();

        let result = convert_file(&input, &test_config(dir.path()));
        assert!(
            matches!(result, Err(ConvertError::ChildNotFound { ref tag, .. }) if tag == "SUBACCTFUND")
        );
        assert!(!dir.path().join("a.csv").exists());
    }

    #[test]
    fn test_run_continues_past_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.qfx"), "<OFX><BROKEN></OFX>").unwrap();
        fs::write(dir.path().join("good.qfx"), VALID_QFX).unwrap();

        let summary = run(&test_config(dir.path())).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                converted: 1,
                failed: 1
            }
        );
        assert!(dir.path().join("good.csv").exists());
        assert!(!dir.path().join("bad.csv").exists());
    }

    #[test]
    fn test_run_selects_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("upper.QFX"), VALID_QFX).unwrap();
        fs::write(dir.path().join("skip.txt"), "not a statement").unwrap();

        let summary = run(&test_config(dir.path())).unwrap();

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 0);
        assert!(dir.path().join("upper.csv").exists());
        assert!(!dir.path().join("skip.csv").exists());
    }

    #[test]
    fn test_run_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&test_config(dir.path())).unwrap();
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn test_run_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir.path().join("does-not-exist"));

        let result = run(&config);
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
