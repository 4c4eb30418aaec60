//! Length-prefixed frames in a growable byte buffer.
//!
//! Run with: RUST_LOG=debug cargo run --example byte_frames

use tola_cursors::prelude::*;
use tola_cursors::{BufferConfig, Result};

/// Appends `payload` behind a big-endian u16 length.
fn write_frame(buffer: &mut ByteBuffer, payload: &[u8]) -> Result<()> {
    let len = i64::try_from(payload.len()).unwrap_or(i64::MAX);
    let at = buffer.count();
    buffer.write_int(at, len, IntLayout::U16_BE)?;
    buffer.extend_from_slice(payload)
}

/// Walks the buffer frame by frame, collecting each payload.
fn read_frames(buffer: &ByteBuffer) -> Result<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    let mut cursor = buffer.begin();
    let end = buffer.end();
    while !cursor.equals(&end) {
        let len = usize::try_from(cursor.read_at(0, IntLayout::U16_BE)?).unwrap_or(usize::MAX);
        advance(&mut cursor, 2)?;
        let start = cursor.clone();
        advance(&mut cursor, len)?;
        frames.push(start.data(&cursor)?.to_vec()?);
    }
    Ok(frames)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut buffer = ByteBuffer::with_config(BufferConfig { initial_capacity: 8, growth_factor: 2 })?;
    for payload in ["hello", "cursor", "world"] {
        write_frame(&mut buffer, payload.as_bytes())?;
    }
    println!("{} bytes, capacity {}", buffer.count(), buffer.capacity());

    for (i, frame) in read_frames(&buffer)?.iter().enumerate() {
        println!("frame {i}: {}", String::from_utf8_lossy(frame));
    }

    // A view does not survive reallocation.
    let view = buffer.begin().data(&buffer.end())?;
    let capacity = buffer.capacity();
    buffer.expand(capacity * 2)?;
    match view.bytes() {
        Ok(_) => println!("view still valid"),
        Err(err) => println!("after expand: {err}"),
    }
    Ok(())
}
