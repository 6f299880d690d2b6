//! Helpers shared by the integration tests: hand-built WAVE images and job files.

#![allow(dead_code)]

use std::{fs, path::Path, path::PathBuf};

/// One chunk: tag, little-endian size, body and the pad byte for odd sizes.
pub fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 9);
    out.extend_from_slice(id);
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// RIFF/WAVE container around already encoded chunks.
pub fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut out = Vec::with_capacity(body.len() + 12);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(&body);
    out
}

/// 16-byte `fmt ` body with consistent derived fields.
pub fn fmt_body(code: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut body = Vec::with_capacity(16);
    body.extend_from_slice(&code.to_le_bytes());
    body.extend_from_slice(&channels.to_le_bytes());
    body.extend_from_slice(&rate.to_le_bytes());
    body.extend_from_slice(&(rate * block_align as u32).to_le_bytes());
    body.extend_from_slice(&block_align.to_le_bytes());
    body.extend_from_slice(&bits.to_le_bytes());
    body
}

/// LIST/INFO body holding one ICOP entry.
pub fn info_list(copyright: &str) -> Vec<u8> {
    let mut body = b"INFO".to_vec();
    body.extend_from_slice(&chunk(b"ICOP", copyright.as_bytes()));
    body
}

/// Body of a job file with one section per `(left_start, left_end, left_amp,
/// right_start, right_end, right_amp, seconds)` tuple.
pub fn job_text(sample_rate: u32, range: u8, sections: &[(i64, i64, i64, i64, i64, i64, i64)]) -> String {
    let mut text = format!(
        "[general]\nsamples per second = {}\nsample value range = {}\n",
        sample_rate, range
    );
    for (i, s) in sections.iter().enumerate() {
        text.push_str(&format!(
            "\n[section {}]\n\
             left channel starting frequency Hz = {}\n\
             left channel ending frequency Hz = {}\n\
             left channel amplitude = {}\n\
             right channel starting frequency Hz = {}\n\
             right channel ending frequency Hz = {}\n\
             right channel amplitude = {}\n\
             time duration in seconds = {}\n",
            i + 1,
            s.0,
            s.1,
            s.2,
            s.3,
            s.4,
            s.5,
            s.6
        ));
    }
    text
}

pub fn write_job(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write job file");
    path
}

/// Top-level chunks of a WAVE image as `(tag, offset, size)`, skipping pads.
pub fn top_level_chunks(bytes: &[u8]) -> Vec<([u8; 4], usize, u32)> {
    let mut chunks = Vec::new();
    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let mut id = [0u8; 4];
        id.copy_from_slice(&bytes[pos..pos + 4]);
        let size = u32::from_le_bytes([bytes[pos + 4], bytes[pos + 5], bytes[pos + 6], bytes[pos + 7]]);
        chunks.push((id, pos, size));
        pos += 8 + size as usize + (size as usize & 1);
    }
    chunks
}
