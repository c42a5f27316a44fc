use std::io::{Cursor, Write};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use scanpack_utils::error::ScanPackError;
use scanpack_utils::paths::archive_entry_name;

use crate::model::SourceFile;

/// Serialize the included files into an in-memory zip archive.
///
/// One entry per file, relative path as the entry name, Deflate
/// compression. Entry order follows inclusion order.
pub fn write_archive(files: &[SourceFile]) -> Result<Vec<u8>, ScanPackError> {
    let mut data = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut data));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for file in files {
            writer
                .start_file(archive_entry_name(&file.rel_path), options)
                .map_err(|e| ScanPackError::Archive(e.to_string()))?;
            writer.write_all(&file.content)?;
        }

        writer
            .finish()
            .map_err(|e| ScanPackError::Archive(e.to_string()))?;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use zip::ZipArchive;

    fn source_file(rel: &str, content: &str) -> SourceFile {
        SourceFile {
            rel_path: Utf8PathBuf::from(rel),
            size: content.len() as u64,
            line_count: content.lines().count() as u64,
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn entry_count_and_names_match_included_files() {
        let files = vec![
            source_file("test.rb", "require 'utils'\n"),
            source_file("utils.rb", "module Utils\nend\n"),
            source_file("helpers/helper.rb", "module Helper\nend\n"),
        ];

        let data = write_archive(&files).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 3);

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["test.rb", "utils.rb", "helpers/helper.rb"]);
    }

    #[test]
    fn entry_contents_round_trip() {
        use std::io::Read;

        let files = vec![source_file("a.rb", "a = 1\nb = 2\n")];
        let data = write_archive(&files).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        let mut entry = archive.by_name("a.rb").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "a = 1\nb = 2\n");
    }

    #[test]
    fn empty_selection_yields_empty_archive() {
        let data = write_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
