//! Low-level append-mode writers: one pair of functions (binary, CSV) per
//! record shape, used by [`crate::OutputSet`] for each of the fifteen
//! output streams.
//!
//! Every file is opened fresh per chunk: truncated on the first chunk of a
//! run, appended to afterwards. This mirrors the reference tool's
//! open-write-close-per-call pattern, just with a truncating first call
//! instead of relying on the caller to have deleted stale output by hand.
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

fn open_for_chunk(path: &Path, first_chunk: bool) -> io::Result<File> {
    if first_chunk {
        OpenOptions::new().write(true).create(true).truncate(true).open(path)
    } else {
        OpenOptions::new().append(true).create(true).open(path)
    }
}

/// Append an `i32` scalar vector as raw little-endian 4-byte words.
pub(crate) fn append_scalar_binary_i32(path: &Path, values: &[i32], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    for v in values {
        file.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Append a `u32` scalar vector as raw little-endian 4-byte words.
pub(crate) fn append_scalar_binary_u32(path: &Path, values: &[u32], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    for v in values {
        file.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Append an `i32` scalar vector as one decimal value per line. No header;
/// scalar streams are not tabular.
pub(crate) fn append_scalar_csv_i32(path: &Path, values: &[i32], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    let mut out = String::new();
    for v in values {
        out.push_str(&v.to_string());
        out.push('\n');
    }
    file.write_all(out.as_bytes())
}

pub(crate) fn append_scalar_csv_u32(path: &Path, values: &[u32], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    let mut out = String::new();
    for v in values {
        out.push_str(&v.to_string());
        out.push('\n');
    }
    file.write_all(out.as_bytes())
}

fn write_csv_header(file: &mut File, header: &[&str]) -> io::Result<()> {
    let mut line = String::new();
    for name in header {
        line.push_str(name);
        line.push(',');
    }
    line.push('\n');
    file.write_all(line.as_bytes())
}

/// Append fixed-width records whose fields are all `u32` (the six-field
/// `GpsTime` and `TimTpPacket` shapes).
pub(crate) fn append_record_binary_u32<const N: usize>(path: &Path, rows: &[[u32; N]], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    for row in rows {
        for field in row {
            file.write_all(&field.to_le_bytes())?;
        }
    }
    Ok(())
}

pub(crate) fn append_record_csv_u32<const N: usize>(
    path: &Path,
    header: &[&str; N],
    rows: &[[u32; N]],
    first_chunk: bool,
) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    if first_chunk {
        write_csv_header(&mut file, header)?;
    }
    let mut out = String::new();
    for row in rows {
        for field in row {
            out.push_str(&field.to_string());
            out.push(',');
        }
        out.push('\n');
    }
    file.write_all(out.as_bytes())
}

/// Append fixed-width records whose fields are all `u64` (the eleven-field
/// `StatusPacket` shape).
pub(crate) fn append_record_binary_u64<const N: usize>(path: &Path, rows: &[[u64; N]], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    for row in rows {
        for field in row {
            file.write_all(&field.to_le_bytes())?;
        }
    }
    Ok(())
}

pub(crate) fn append_record_csv_u64<const N: usize>(
    path: &Path,
    header: &[&str; N],
    rows: &[[u64; N]],
    first_chunk: bool,
) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    if first_chunk {
        write_csv_header(&mut file, header)?;
    }
    let mut out = String::new();
    for row in rows {
        for field in row {
            out.push_str(&field.to_string());
            out.push(',');
        }
        out.push('\n');
    }
    file.write_all(out.as_bytes())
}

/// Append fixed-width records carried internally as `i64` (to accommodate
/// a mix of signed and unsigned source fields) but written at their true
/// natural width of 4 bytes each, matching the reference tool's
/// `(int32_t*)` reinterpretation of its packed structs.
pub(crate) fn append_record_binary_i32_widened<const N: usize>(path: &Path, rows: &[[i64; N]], first_chunk: bool) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    for row in rows {
        for field in row {
            file.write_all(&(*field as i32).to_le_bytes())?;
        }
    }
    Ok(())
}

pub(crate) fn append_record_csv_i64<const N: usize>(
    path: &Path,
    header: &[&str; N],
    rows: &[[i64; N]],
    first_chunk: bool,
) -> io::Result<()> {
    let mut file = open_for_chunk(path, first_chunk)?;
    if first_chunk {
        write_csv_header(&mut file, header)?;
    }
    let mut out = String::new();
    for row in rows {
        for field in row {
            out.push_str(&field.to_string());
            out.push(',');
        }
        out.push('\n');
    }
    file.write_all(out.as_bytes())
}
