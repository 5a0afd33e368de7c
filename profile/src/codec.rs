//! Binary encoding for one stored voiceprint.
//!
//! Layout, all little-endian:
//!
//! ```text
//! [4B magic "EVPF"] [4B version=1] [4B dimension] [dimension x 4B f32]
//! ```

use earshot_voiceprint::Voiceprint;

const MAGIC: [u8; 4] = *b"EVPF";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 12;

pub(crate) fn encode(print: &Voiceprint) -> Vec<u8> {
    let values = print.values();
    let mut out = Vec::with_capacity(HEADER_LEN + values.len() * 4);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for &v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

pub(crate) fn decode(bytes: &[u8], want_dim: usize) -> Result<Voiceprint, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("{} bytes, want at least {HEADER_LEN}", bytes.len()));
    }
    if bytes[0..4] != MAGIC {
        return Err("bad magic".to_string());
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != VERSION {
        return Err(format!("unsupported version {version}"));
    }
    let dim = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
    if dim != want_dim {
        return Err(format!("dimension {dim}, want {want_dim}"));
    }
    let want_len = HEADER_LEN + dim * 4;
    if bytes.len() != want_len {
        return Err(format!("{} bytes, want {want_len}", bytes.len()));
    }

    let mut values = Vec::with_capacity(dim);
    for i in 0..dim {
        let off = HEADER_LEN + i * 4;
        values.push(f32::from_le_bytes([
            bytes[off],
            bytes[off + 1],
            bytes[off + 2],
            bytes[off + 3],
        ]));
    }
    Ok(Voiceprint::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let print = Voiceprint::from_values(vec![0.25, -1.5, 3.75]);
        let bytes = encode(&print);
        let back = decode(&bytes, 3).unwrap();
        assert_eq!(back.values(), print.values());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode(&Voiceprint::from_values(vec![1.0]));
        bytes[0] = b'X';
        assert!(decode(&bytes, 1).is_err());
    }

    #[test]
    fn rejects_wrong_dimension() {
        let bytes = encode(&Voiceprint::from_values(vec![1.0, 2.0]));
        assert!(decode(&bytes, 3).is_err());
    }

    #[test]
    fn rejects_truncation() {
        let bytes = encode(&Voiceprint::from_values(vec![1.0, 2.0]));
        assert!(decode(&bytes[..bytes.len() - 1], 2).is_err());
        assert!(decode(&[], 0).is_err());
    }
}
