//! Output file handling with [`OutputFile`], which abstracts writing both
//! plaintext and gzip-compressed files.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

/// Check if a file is a gzipped by looking for the magic numbers
pub(crate) fn is_gzipped_file(file_path: impl Into<PathBuf>) -> io::Result<bool> {
    let mut file = File::open(file_path.into())?;
    let mut buffer = [0; 2];
    let nread = file.read(&mut buffer)?;

    Ok(nread == 2 && buffer == [0x1f, 0x8b])
}

/// Represents an output file.
///
/// This struct is used to handle operations on an output file, such as
/// writing to the file. If the file path ends with `.gz`, output is
/// gzip-compressed automatically.
#[derive(Clone, Debug)]
pub struct OutputFile {
    pub filepath: PathBuf,
}

impl OutputFile {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Opens the file and returns a writer, compressing if the path carries
    /// a `.gz` extension.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let is_gzip = self
            .filepath
            .extension()
            .is_some_and(|ext| ext == "gz");
        let writer: Box<dyn Write> = if is_gzip {
            Box::new(BufWriter::new(GzEncoder::new(
                File::create(&self.filepath)?,
                Compression::default(),
            )))
        } else {
            Box::new(BufWriter::new(File::create(&self.filepath)?))
        };
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_gzip_writing_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt.gz");

        let output = OutputFile::new(&path);
        let mut writer = output.writer().unwrap();
        writeln!(writer, "compressed line").unwrap();
        drop(writer);

        assert!(is_gzipped_file(&path).unwrap());

        let reader = flate2::read::GzDecoder::new(File::open(&path).unwrap());
        let mut lines = io::BufReader::new(reader).lines();
        assert_eq!(lines.next().unwrap().unwrap(), "compressed line");
    }

    #[test]
    fn test_plaintext_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut writer = OutputFile::new(&path).writer().unwrap();
        write!(writer, "plain").unwrap();
        drop(writer);

        assert!(!is_gzipped_file(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "plain");
    }
}
