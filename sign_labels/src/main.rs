//! Print a label file alongside how many samples of each label a dataset
//! already holds.
//!
//! ```text
//! label_stats [labels.txt] [dataset.csv | sequence-dir]
//! ```
//!
//! Missing arguments are asked for interactively.

use clap::Parser;
use sign_labels::{LabelError, LabelSet, count_occurrences, count_sequences};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Label file and dataset summary
#[derive(Parser, Debug)]
#[command(name = "label_stats")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Label file, one label per line
    #[arg(value_name = "LABELS")]
    labels: Option<PathBuf>,

    /// Static dataset CSV, or a directory of recorded sequences
    #[arg(value_name = "DATASET")]
    dataset: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              Sign Label Dataset Summary              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let labels_path = cli.labels
        .unwrap_or_else(|| PathBuf::from(read_line("  Label file: ").trim()));
    let dataset_path = cli.dataset.or_else(|| {
        let s = read_line("  Dataset file or sequence directory (blank = none): ");
        let s = s.trim();
        if s.is_empty() { None } else { Some(PathBuf::from(s)) }
    });

    let labels = match LabelSet::load(&labels_path) {
        Ok(l)  => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let counts = match dataset_path.as_deref() {
        None    => None,
        Some(p) => match load_counts(p, &labels) {
            Ok(c)  => c,
            Err(e) => { eprintln!("  ⚠  {}", e); None }
        },
    };

    println!();
    println!("  ┌─ {} labels ─", labels.len());
    for (i, label) in labels.iter().enumerate() {
        let kind = if label.is_control() { "control" } else { "text" };
        match counts.as_ref() {
            Some(c) => println!("  │  [{:>3}]  {:<28} {:<8} {:>6}", i, label, kind, c[i]),
            None    => println!("  │  [{:>3}]  {:<28} {}", i, label, kind),
        }
    }
    if let Some(c) = counts.as_ref() {
        println!("  │");
        println!("  │  total samples: {}", c.iter().sum::<usize>());
    } else if dataset_path.is_some() {
        println!("  │");
        println!("  │  no samples recorded yet");
    }
    println!("  └─");
    println!();
}

/// Per-label counts from a sequence directory or a static dataset file.
fn load_counts(path: &Path, labels: &LabelSet) -> Result<Option<Vec<usize>>, LabelError> {
    if path.is_dir() {
        count_sequences(path, labels).map(Some)
    } else {
        count_occurrences(path, labels.len())
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("label_stats_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn positional_arguments_are_optional() {
        let cli = Cli::try_parse_from(["label_stats", "labels.txt", "data.csv"]).unwrap();
        assert_eq!(cli.labels, Some(PathBuf::from("labels.txt")));
        assert_eq!(cli.dataset, Some(PathBuf::from("data.csv")));

        let cli = Cli::try_parse_from(["label_stats"]).unwrap();
        assert!(cli.labels.is_none());
        assert!(cli.dataset.is_none());

        assert!(Cli::try_parse_from(["label_stats", "a", "b", "c"]).is_err());
    }

    #[test]
    fn counts_come_from_csv_or_sequence_dir() {
        let dir = temp_dir("counts");
        let labels = LabelSet::from_lines("a\nb");

        let csv = dir.join("data.csv");
        fs::write(&csv, "1,0.0\n1,0.0\n0,0.0\n").unwrap();
        assert_eq!(load_counts(&csv, &labels).unwrap(), Some(vec![1, 2]));

        let seq = dir.join("sequences");
        fs::create_dir_all(seq.join("b")).unwrap();
        fs::write(seq.join("b").join("0.csv"), "").unwrap();
        assert_eq!(load_counts(&seq, &labels).unwrap(), Some(vec![0, 1]));

        assert_eq!(load_counts(&dir.join("missing.csv"), &labels).unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_sequence_dir_is_reported() {
        use std::os::unix::fs::PermissionsExt;
        let dir = temp_dir("unreadable");
        let labels = LabelSet::from_lines("a");
        let label_dir = dir.join("a");
        fs::create_dir_all(&label_dir).unwrap();
        fs::set_permissions(&label_dir, fs::Permissions::from_mode(0o000)).unwrap();
        let readable_anyway = fs::read_dir(&label_dir).is_ok();
        let result = load_counts(&dir, &labels);
        fs::set_permissions(&label_dir, fs::Permissions::from_mode(0o755)).unwrap();
        if !readable_anyway {
            assert!(matches!(result, Err(LabelError::Io { .. })));
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
