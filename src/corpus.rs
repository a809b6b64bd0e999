//! Corpus ingestion: reading a tabular document source into `(DocId, text)` pairs.
//!
//! This is an external collaborator by design: anything that yields
//! `Result<(DocId, String)>` in a stable order can feed
//! [`crate::index::builder::SpimiBuilder`]. [`CsvCorpus`] is the one
//! concrete adapter this crate ships, reading the `song_id`/`lyrics`
//! tabular format.

use std::fs::File;
use std::path::Path;

use csv::Reader;

use crate::error::{Result, SpindexError};
use crate::index::DocId;

/// Reads a CSV corpus with `song_id` and `lyrics` columns, in file order.
pub struct CsvCorpus {
    reader: Reader<File>,
    song_id_idx: usize,
    lyrics_idx: usize,
}

impl CsvCorpus {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = Reader::from_path(path).map_err(|e| {
            SpindexError::InvalidCorpus(format!("cannot open corpus {}: {e}", path.display()))
        })?;

        let headers = reader.headers()?.clone();
        let song_id_idx = headers.iter().position(|h| h == "song_id").ok_or_else(|| {
            SpindexError::InvalidCorpus("corpus is missing required column 'song_id'".into())
        })?;
        let lyrics_idx = headers.iter().position(|h| h == "lyrics").ok_or_else(|| {
            SpindexError::InvalidCorpus("corpus is missing required column 'lyrics'".into())
        })?;

        Ok(Self {
            reader,
            song_id_idx,
            lyrics_idx,
        })
    }

    /// Consumes the corpus, yielding `(doc_id, raw_text)` pairs in file order.
    pub fn into_documents(self) -> impl Iterator<Item = Result<(DocId, String)>> {
        let song_id_idx = self.song_id_idx;
        let lyrics_idx = self.lyrics_idx;
        self.reader.into_records().map(move |record| {
            let record = record?;
            let raw_id = record.get(song_id_idx).unwrap_or("");
            let doc_id: DocId = raw_id.trim().parse().map_err(|_| {
                SpindexError::InvalidCorpus(format!("non-numeric song_id: {raw_id:?}"))
            })?;
            let text = record.get(lyrics_idx).unwrap_or("").to_string();
            Ok((doc_id, text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        std::fs::write(
            &path,
            "song_id,artist,lyrics\n1,A,hello world hello\n2,B,world peace\n",
        )
        .unwrap();

        let docs: Vec<_> = CsvCorpus::open(&path)
            .unwrap()
            .into_documents()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            docs,
            vec![
                (1, "hello world hello".to_string()),
                (2, "world peace".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_non_numeric_song_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        std::fs::write(&path, "song_id,lyrics\nabc,hello\n").unwrap();

        let err = CsvCorpus::open(&path)
            .unwrap()
            .into_documents()
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, SpindexError::InvalidCorpus(_)));
    }

    #[test]
    fn rejects_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        std::fs::write(&path, "id,text\n1,hello\n").unwrap();

        let err = CsvCorpus::open(&path).unwrap_err();
        assert!(matches!(err, SpindexError::InvalidCorpus(_)));
    }
}
