use eyre::{Report, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;

/// Opens a file for writing, or stdout when the path is `-`.
pub fn create_file_or_stdout(filepath: impl AsRef<Path>) -> Result<Box<dyn Write>, Report> {
  let filepath = filepath.as_ref();
  if filepath == Path::new("-") {
    return Ok(Box::new(BufWriter::new(stdout())));
  }
  let file = File::create(filepath).wrap_err_with(|| format!("When creating file: {filepath:#?}"))?;
  Ok(Box::new(BufWriter::new(file)))
}

pub fn json_parse<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Report> {
  serde_json::from_str(s).wrap_err("When parsing JSON")
}

pub fn json_write<T: Serialize>(filepath: impl AsRef<Path>, obj: &T) -> Result<(), Report> {
  let filepath = filepath.as_ref();
  let mut file = create_file_or_stdout(filepath)?;
  serde_json::to_writer_pretty(&mut file, &obj).wrap_err_with(|| format!("When writing JSON to {filepath:#?}"))?;
  file.write_all(b"\n").wrap_err_with(|| format!("When writing JSON to {filepath:#?}"))?;
  Ok(())
}
