use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::SimIndexError;
use crate::flat::FlatIndex;

/// Binary format magic and version.
const SNAPSHOT_MAGIC: [u8; 4] = [b'E', b'V', b'I', b'X'];
const SNAPSHOT_VERSION: u32 = 1;

/// Upper bound on a stored id length; anything larger marks a corrupt file.
const MAX_ID_LEN: u32 = 4096;

/// Save serializes the index to a writer in a compact binary format.
///
/// ```text
/// [4B magic "EVIX"] [4B version=1]
/// [4B dim] [4B count]
/// For each entry:
///   [4B idLen] [idLen bytes id string]
///   [dim x 4B float32 vector]
/// ```
///
/// All multi-byte values are little-endian.
pub fn save(index: &FlatIndex, w: &mut dyn Write) -> Result<(), SimIndexError> {
    let inner = index.read_inner();
    let mut bw = BufWriter::new(w);

    let write_err = |e: std::io::Error| SimIndexError::Io(e.to_string());

    bw.write_all(&SNAPSHOT_MAGIC).map_err(write_err)?;
    bw.write_all(&SNAPSHOT_VERSION.to_le_bytes()).map_err(write_err)?;
    bw.write_all(&(index.dim() as u32).to_le_bytes()).map_err(write_err)?;
    bw.write_all(&(inner.ids.len() as u32).to_le_bytes()).map_err(write_err)?;

    for (id, vector) in inner.ids.iter().zip(inner.vectors.iter()) {
        let id_bytes = id.as_bytes();
        bw.write_all(&(id_bytes.len() as u32).to_le_bytes()).map_err(write_err)?;
        bw.write_all(id_bytes).map_err(write_err)?;
        for &v in vector {
            bw.write_all(&v.to_le_bytes()).map_err(write_err)?;
        }
    }

    bw.flush().map_err(write_err)?;
    Ok(())
}

/// Load deserializes index entries from a reader, suitable for feeding
/// straight into [`FlatIndex::rebuild`].
///
/// The recorded dimension must equal `want_dim`; any mismatch, bad magic,
/// unknown version or malformed record is an error, and callers treat a
/// failed load as "no snapshot" and rebuild from the authoritative store.
pub fn load(r: &mut dyn Read, want_dim: usize) -> Result<Vec<(String, Vec<f32>)>, SimIndexError> {
    let mut br = BufReader::new(r);
    let read_err = |e: std::io::Error| SimIndexError::Io(e.to_string());

    let mut buf4 = [0u8; 4];

    br.read_exact(&mut buf4).map_err(read_err)?;
    if buf4 != SNAPSHOT_MAGIC {
        return Err(SimIndexError::InvalidFormat(format!(
            "invalid magic {:?}",
            buf4
        )));
    }

    br.read_exact(&mut buf4).map_err(read_err)?;
    let version = u32::from_le_bytes(buf4);
    if version != SNAPSHOT_VERSION {
        return Err(SimIndexError::InvalidFormat(format!(
            "unsupported version {}",
            version
        )));
    }

    br.read_exact(&mut buf4).map_err(read_err)?;
    let dim = u32::from_le_bytes(buf4) as usize;
    if dim != want_dim {
        return Err(SimIndexError::InvalidFormat(format!(
            "dimension {} does not match expected {}",
            dim, want_dim
        )));
    }

    br.read_exact(&mut buf4).map_err(read_err)?;
    let count = u32::from_le_bytes(buf4) as usize;

    let mut entries = Vec::new();
    for _ in 0..count {
        br.read_exact(&mut buf4).map_err(read_err)?;
        let id_len = u32::from_le_bytes(buf4);
        if id_len == 0 || id_len > MAX_ID_LEN {
            return Err(SimIndexError::InvalidFormat(format!(
                "id length {} out of range",
                id_len
            )));
        }

        let mut id_bytes = vec![0u8; id_len as usize];
        br.read_exact(&mut id_bytes).map_err(read_err)?;
        let id = String::from_utf8(id_bytes)
            .map_err(|_| SimIndexError::InvalidFormat("id is not valid UTF-8".to_string()))?;

        let mut vector = Vec::with_capacity(dim);
        for _ in 0..dim {
            br.read_exact(&mut buf4).map_err(read_err)?;
            vector.push(f32::from_le_bytes(buf4));
        }

        entries.push((id, vector));
    }

    Ok(entries)
}

/// Save the index to a file, creating or truncating it.
pub fn save_file(index: &FlatIndex, path: &Path) -> Result<(), SimIndexError> {
    let mut f = File::create(path).map_err(|e| SimIndexError::Io(e.to_string()))?;
    save(index, &mut f)
}

/// Load index entries from a file.
pub fn load_file(path: &Path, want_dim: usize) -> Result<Vec<(String, Vec<f32>)>, SimIndexError> {
    let mut f = File::open(path).map_err(|e| SimIndexError::Io(e.to_string()))?;
    load(&mut f, want_dim)
}
