//! WAV container read and write.
//!
//! The reader walks RIFF chunks, accepts PCM16 and IEEE float32 sample
//! data at any channel count, and downmixes to mono by averaging.
//! The writer always emits mono PCM16.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::clip::AudioClip;
use crate::error::AudioError;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

struct FmtChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Reads a WAV stream into a mono [`AudioClip`].
pub fn read(r: &mut dyn Read) -> Result<AudioClip, AudioError> {
    let mut br = BufReader::new(r);

    let mut header = [0u8; 12];
    br.read_exact(&mut header)
        .map_err(|e| AudioError::InvalidWav(format!("riff header: {e}")))?;
    if &header[0..4] != b"RIFF" {
        return Err(AudioError::InvalidWav("missing RIFF magic".into()));
    }
    if &header[8..12] != b"WAVE" {
        return Err(AudioError::InvalidWav("missing WAVE magic".into()));
    }

    let mut fmt: Option<FmtChunk> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some((id, size)) = read_chunk_header(&mut br)? {
        match &id {
            b"fmt " => {
                if size < 16 {
                    return Err(AudioError::InvalidWav(format!("fmt chunk size {size}")));
                }
                let mut buf = vec![0u8; size];
                br.read_exact(&mut buf)
                    .map_err(|e| AudioError::InvalidWav(format!("fmt chunk: {e}")))?;
                let mut tag = u16::from_le_bytes([buf[0], buf[1]]);
                // WAVE_FORMAT_EXTENSIBLE carries the real tag in the
                // extension's SubFormat GUID (first two bytes).
                if tag == FORMAT_EXTENSIBLE && size >= 40 {
                    tag = u16::from_le_bytes([buf[24], buf[25]]);
                }
                fmt = Some(FmtChunk {
                    format_tag: tag,
                    channels: u16::from_le_bytes([buf[2], buf[3]]),
                    sample_rate: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
                    bits_per_sample: u16::from_le_bytes([buf[14], buf[15]]),
                });
            }
            b"data" => {
                let mut buf = vec![0u8; size];
                br.read_exact(&mut buf)
                    .map_err(|e| AudioError::InvalidWav(format!("data chunk: {e}")))?;
                data = Some(buf);
            }
            _ => {
                skip(&mut br, size)?;
            }
        }
        // Chunks are word-aligned; odd sizes carry a pad byte.
        if size % 2 == 1 {
            skip(&mut br, 1)?;
        }
        if fmt.is_some() && data.is_some() {
            break;
        }
    }

    let fmt = fmt.ok_or_else(|| AudioError::InvalidWav("no fmt chunk".into()))?;
    let data = data.ok_or_else(|| AudioError::InvalidWav("no data chunk".into()))?;
    if fmt.channels == 0 {
        return Err(AudioError::InvalidWav("zero channels".into()));
    }
    if fmt.sample_rate == 0 {
        return Err(AudioError::InvalidWav("zero sample rate".into()));
    }

    let samples = match (fmt.format_tag, fmt.bits_per_sample) {
        (FORMAT_PCM, 16) => decode_pcm16(&data, fmt.channels as usize),
        (FORMAT_IEEE_FLOAT, 32) => decode_f32(&data, fmt.channels as usize),
        (format_tag, bits) => return Err(AudioError::Unsupported { format_tag, bits }),
    };

    Ok(AudioClip::new(samples, fmt.sample_rate))
}

/// Writes a clip as mono 16-bit PCM WAV.
pub fn write(w: &mut dyn Write, clip: &AudioClip) -> Result<(), AudioError> {
    let mut bw = BufWriter::new(w);
    let pcm = clip.to_pcm16();
    let data_len = (pcm.len() * 2) as u32;

    bw.write_all(b"RIFF")?;
    bw.write_all(&(36 + data_len).to_le_bytes())?;
    bw.write_all(b"WAVE")?;

    bw.write_all(b"fmt ")?;
    bw.write_all(&16u32.to_le_bytes())?;
    bw.write_all(&FORMAT_PCM.to_le_bytes())?;
    bw.write_all(&1u16.to_le_bytes())?; // channels
    bw.write_all(&clip.sample_rate.to_le_bytes())?;
    bw.write_all(&(clip.sample_rate * 2).to_le_bytes())?; // byte rate
    bw.write_all(&2u16.to_le_bytes())?; // block align
    bw.write_all(&16u16.to_le_bytes())?; // bits per sample

    bw.write_all(b"data")?;
    bw.write_all(&data_len.to_le_bytes())?;
    for s in pcm {
        bw.write_all(&s.to_le_bytes())?;
    }
    bw.flush()?;
    Ok(())
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<AudioClip, AudioError> {
    let mut f = File::open(path)?;
    read(&mut f)
}

pub fn write_file<P: AsRef<Path>>(path: P, clip: &AudioClip) -> Result<(), AudioError> {
    let mut f = File::create(path)?;
    write(&mut f, clip)
}

/// Reads the next 8-byte chunk header, or `None` at a clean end of stream.
fn read_chunk_header(
    br: &mut BufReader<&mut dyn Read>,
) -> Result<Option<([u8; 4], usize)>, AudioError> {
    let mut header = [0u8; 8];
    let mut filled = 0usize;
    while filled < header.len() {
        let n = br.read(&mut header[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(AudioError::InvalidWav("truncated chunk header".into()));
        }
        filled += n;
    }
    let id = [header[0], header[1], header[2], header[3]];
    let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    Ok(Some((id, size)))
}

fn skip(br: &mut BufReader<&mut dyn Read>, n: usize) -> Result<(), AudioError> {
    let mut remaining = n;
    let mut scratch = [0u8; 512];
    while remaining > 0 {
        let want = remaining.min(scratch.len());
        br.read_exact(&mut scratch[..want])
            .map_err(|_| AudioError::InvalidWav("truncated chunk".into()))?;
        remaining -= want;
    }
    Ok(())
}

fn decode_pcm16(data: &[u8], channels: usize) -> Vec<f32> {
    let frame_bytes = 2 * channels;
    let frames = data.len() / frame_bytes;
    let mut samples = Vec::with_capacity(frames);
    for f in 0..frames {
        let mut acc = 0.0f32;
        for c in 0..channels {
            let off = f * frame_bytes + 2 * c;
            let s = i16::from_le_bytes([data[off], data[off + 1]]);
            acc += s as f32 / 32768.0;
        }
        samples.push(acc / channels as f32);
    }
    samples
}

fn decode_f32(data: &[u8], channels: usize) -> Vec<f32> {
    let frame_bytes = 4 * channels;
    let frames = data.len() / frame_bytes;
    let mut samples = Vec::with_capacity(frames);
    for f in 0..frames {
        let mut acc = 0.0f32;
        for c in 0..channels {
            let off = f * frame_bytes + 4 * c;
            acc += f32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]]);
        }
        samples.push(acc / channels as f32);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(rate: u32, secs: f32, hz: f32) -> AudioClip {
        let n = (rate as f32 * secs) as usize;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * hz * i as f32 / rate as f32).sin() * 0.5)
            .collect();
        AudioClip::new(samples, rate)
    }

    #[test]
    fn test_write_read_round_trip() {
        let clip = tone(16000, 0.5, 440.0);
        let mut buf = Vec::new();
        write(&mut buf, &clip).unwrap();

        let back = read(&mut &buf[..]).unwrap();
        assert_eq!(back.sample_rate, 16000);
        assert_eq!(back.len(), clip.len());
        for (a, b) in clip.samples.iter().zip(back.samples.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let clip = tone(8000, 0.25, 200.0);
        write_file(&path, &clip).unwrap();
        let back = read_file(&path).unwrap();
        assert_eq!(back.sample_rate, 8000);
        assert_eq!(back.len(), clip.len());
    }

    #[test]
    fn test_stereo_downmix() {
        // Hand-built stereo WAV: left = 0.5, right = -0.5 -> mono 0.0.
        let left: i16 = 16384;
        let right: i16 = -16384;
        let frames = 100u32;
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + frames * 4).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16000u32.to_le_bytes());
        buf.extend_from_slice(&64000u32.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&(frames * 4).to_le_bytes());
        for _ in 0..frames {
            buf.extend_from_slice(&left.to_le_bytes());
            buf.extend_from_slice(&right.to_le_bytes());
        }

        let clip = read(&mut &buf[..]).unwrap();
        assert_eq!(clip.len(), 100);
        for &s in &clip.samples {
            assert!(s.abs() < 1e-6);
        }
    }

    #[test]
    fn test_float_format() {
        let frames = 50u32;
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + frames * 4).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes()); // IEEE float
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&22050u32.to_le_bytes());
        buf.extend_from_slice(&88200u32.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&32u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&(frames * 4).to_le_bytes());
        for _ in 0..frames {
            buf.extend_from_slice(&0.25f32.to_le_bytes());
        }

        let clip = read(&mut &buf[..]).unwrap();
        assert_eq!(clip.sample_rate, 22050);
        assert_eq!(clip.len(), 50);
        assert!((clip.samples[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_skips_unknown_chunks() {
        let clip = tone(16000, 0.1, 100.0);
        let mut wav = Vec::new();
        write(&mut wav, &clip).unwrap();

        // Splice a LIST chunk between the fmt and data chunks.
        let mut buf = Vec::new();
        buf.extend_from_slice(&wav[..36]);
        buf.extend_from_slice(b"LIST");
        buf.extend_from_slice(&6u32.to_le_bytes());
        buf.extend_from_slice(b"INFOab");
        buf.extend_from_slice(&wav[36..]);
        // Fix up the RIFF size.
        let riff_size = (buf.len() - 8) as u32;
        buf[4..8].copy_from_slice(&riff_size.to_le_bytes());

        let back = read(&mut &buf[..]).unwrap();
        assert_eq!(back.len(), clip.len());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let buf = b"RIFX....WAVE".to_vec();
        assert!(matches!(
            read(&mut &buf[..]),
            Err(AudioError::InvalidWav(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_encoding() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&36u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&16000u32.to_le_bytes());
        buf.extend_from_slice(&16000u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&8u16.to_le_bytes()); // PCM8: unsupported
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(&[0, 0, 0, 0]);

        assert!(matches!(
            read(&mut &buf[..]),
            Err(AudioError::Unsupported { bits: 8, .. })
        ));
    }

    #[test]
    fn test_truncated_data() {
        let clip = tone(16000, 0.1, 100.0);
        let mut wav = Vec::new();
        write(&mut wav, &clip).unwrap();
        wav.truncate(wav.len() - 10);
        assert!(read(&mut &wav[..]).is_err());
    }
}
