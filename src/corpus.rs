//! Corpus enumeration and the per-document metric runner.

use crate::document::{Document, Row};
use crate::errors::Result;
use crate::metric::{Context, Metric};
use crate::options::Options;
use crossbeam_channel::TryRecvError;
use itertools::Itertools;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::thread;
use walkdir::WalkDir;

/// File extension recognized as a corpus document.
const DOC_EXTENSION: &str = "txt";

/// Label of the single index column produced by [read_corpus].
pub const INDEX_LABEL: &str = "path";

/// Read every `*.txt` document under `root`, in sorted path order.
///
/// A document's index is its root-relative path with the extension
/// stripped, `/`-joined regardless of platform. The sanity check
/// reconstructs the same identifier from a metadata row.
pub fn read_corpus(root: &Path) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(DOC_EXTENSION) {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        let id = rel
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .join("/");
        let text = fs::read_to_string(path)?;
        documents.push(Document::new(vec![id], text));
    }
    info!(
        "corpus: {} documents under {}",
        documents.len(),
        root.display()
    );
    Ok(documents)
}

/// Run one metric over every document.
///
/// The output schema is resolved once up front, so configuration problems
/// surface before the first document is read. Rows come back in document
/// order whatever the completion order; the first failure aborts the run.
pub fn process_corpus(
    metric: &dyn Metric,
    opts: &Options,
    ctx: &Context,
    documents: &[Document],
    jobs: usize,
) -> Result<Vec<Row>> {
    let columns = metric.columns(opts)?;
    debug!("{}: columns: {}", metric.name(), columns.iter().join(", "));
    if jobs <= 1 || documents.len() <= 1 {
        return documents
            .iter()
            .map(|doc| metric.process(doc, opts, ctx))
            .collect();
    }
    process_parallel(metric, opts, ctx, documents, jobs)
}

fn process_parallel(
    metric: &dyn Metric,
    opts: &Options,
    ctx: &Context,
    documents: &[Document],
    jobs: usize,
) -> Result<Vec<Row>> {
    let (s1, r1) = crossbeam_channel::unbounded();
    for job in documents.iter().enumerate() {
        s1.send(job).unwrap();
    }
    drop(s1);
    let nthreads = jobs.min(documents.len());
    debug!("{} documents, {nthreads} threads", documents.len());
    let mut rows: Vec<Option<Row>> = vec![None; documents.len()];
    let mut first_err = None;
    thread::scope(|scope| {
        let (s2, r2) = crossbeam_channel::unbounded();
        for _ in 0..nthreads {
            let r1 = r1.clone();
            let s2 = s2.clone();
            scope.spawn(move || {
                loop {
                    match r1.try_recv() {
                        Ok((i, doc)) => {
                            s2.send((i, metric.process(doc, opts, ctx))).unwrap();
                        }
                        Err(TryRecvError::Empty) => unreachable!(),
                        Err(TryRecvError::Disconnected) => break,
                    }
                }
            });
        }
        drop(s2);
        while let Ok((i, result)) = r2.recv() {
            match result {
                Ok(row) => rows[i] = Some(row),
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
    });
    match first_err {
        Some(e) => Err(e),
        None => Ok(rows
            .into_iter()
            .map(|r| r.expect("every document processed"))
            .collect()),
    }
}

/// Write result rows as CSV: the index labels, then the metric columns.
pub fn write_csv<W: Write>(
    out: W,
    index_labels: &[String],
    columns: &[String],
    rows: &[Row],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(index_labels.iter().chain(columns))?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::Value;
    use crate::options::resolve;
    use crate::words::WordCounter;
    use std::collections::HashMap;

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(vec![format!("doc{i}")], "some words here ".repeat(i + 1)))
            .collect()
    }

    #[test]
    fn read_corpus_strips_extensions_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/two.txt"), "two").unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        fs::write(dir.path().join("ignored.md"), "nope").unwrap();
        let documents = read_corpus(dir.path()).unwrap();
        assert_eq!(
            documents
                .iter()
                .map(|d| d.index[0].clone())
                .collect::<Vec<_>>(),
            ["a", "b/two"]
        );
        assert_eq!(documents[0].text, "one");
    }

    #[test]
    fn parallel_matches_sequential() {
        let metric = WordCounter;
        let opts = resolve(metric.options(), &HashMap::new()).unwrap();
        let ctx = Context::new(None);
        let documents = docs(25);
        let sequential = process_corpus(&metric, &opts, &ctx, &documents, 1).unwrap();
        let parallel = process_corpus(&metric, &opts, &ctx, &documents, 4).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[2][1], Value::Int(9));
    }

    #[test]
    fn schema_failures_surface_before_processing() {
        let metric = crate::sentiment::SentimentAnalysis;
        let raw: HashMap<String, String> =
            [("backend".to_owned(), "oracle".to_owned())].into_iter().collect();
        let opts = resolve(metric.options(), &raw).unwrap();
        let ctx = Context::new(None);
        let err = process_corpus(&metric, &opts, &ctx, &docs(3), 1).unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn errors_abort_parallel_runs() {
        let metric = crate::entropy::ShannonEntropy;
        let opts = resolve(metric.options(), &HashMap::new()).unwrap();
        let ctx = Context::new(None);
        let err = process_corpus(&metric, &opts, &ctx, &docs(8), 4).unwrap_err();
        assert!(err.to_string().contains("NLP backend"));
    }

    #[test]
    fn csv_output() {
        let rows = vec![
            vec![Value::Str("a".to_owned()), Value::Int(3)],
            vec![Value::Str("b/two".to_owned()), Value::Int(7)],
        ];
        let mut out = Vec::new();
        write_csv(
            &mut out,
            &[INDEX_LABEL.to_owned()],
            &["words".to_owned()],
            &rows,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "path,words\na,3\nb/two,7\n"
        );
    }
}
