use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Writes one address per line to `path`, replacing any previous content.
pub fn save<P: AsRef<Path>>(ips: &[String], path: P) -> Result<()> {
    let path = path.as_ref();
    let err = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut f = BufWriter::new(File::create(path).map_err(err)?);
    write_lines(ips, &mut f).map_err(err)?;
    f.flush().map_err(err)
}

pub fn print<W: Write>(ips: &[String], mut out: W) -> std::io::Result<()> {
    write_lines(ips, &mut out)?;
    out.flush()
}

fn write_lines<W: Write>(ips: &[String], out: &mut W) -> std::io::Result<()> {
    for ip in ips {
        writeln!(out, "{}", ip)?;
    }
    Ok(())
}
