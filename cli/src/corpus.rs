use anyhow::{Context, Result};
use search_core::{DocumentId, DocumentStatus, SearchServer};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// `.json` / `.jsonl` files under `input`, or `input` itself if it is a file.
pub fn discover_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Add every document found under `input`; returns how many were added.
pub fn load_corpus(server: &mut SearchServer, input: &Path) -> Result<usize> {
    let mut added = 0;
    for file in discover_files(input) {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            server
                .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
                .with_context(|| format!("document {} in {}", doc.id, file.display()))?;
            added += 1;
        }
    }
    tracing::info!(
        added,
        documents = server.document_count(),
        terms = server.term_count(),
        input = %input.display(),
        "loaded corpus"
    );
    Ok(added)
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    let mut docs = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), line_no + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<InputDoc>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_json_and_jsonl_from_a_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"id\": 1, \"text\": \"white cat\", \"ratings\": [8, -3]}\n\n{\"id\": 2, \"text\": \"black dog\", \"status\": \"banned\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), "[{\"id\": 3, \"text\": \"fluffy cat\"}]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut server = SearchServer::default();
        assert_eq!(load_corpus(&mut server, dir.path()).unwrap(), 3);
        assert_eq!(server.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(server.term_count(), 5);
        assert_eq!(server.document_text(2), Some("black dog"));

        let found = server.find_top_documents("cat").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].rating, 2);
        assert_eq!(server.match_document("dog", 2).unwrap().1, DocumentStatus::Banned);
    }

    #[test]
    fn duplicate_ids_fail_with_context() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        fs::write(&path, "{\"id\": 1, \"text\": \"cat\"}\n{\"id\": 1, \"text\": \"dog\"}\n").unwrap();

        let mut server = SearchServer::default();
        let err = load_corpus(&mut server, &path).unwrap_err();
        assert!(err.to_string().contains("document 1"));
    }
}
