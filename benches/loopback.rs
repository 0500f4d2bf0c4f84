//! Frame reception benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serbus::{CodecError, FrameCodec, FrameHeader, RtuTransport};
use std::io::{self, Read, Write};

/// Codec that carries the raw frame span; keeps the benchmark focused on
/// the transport's accumulation loop rather than decode cost.
struct RawCodec;

impl FrameCodec for RawCodec {
    type Frame = Vec<u8>;

    fn encode(&self, frame: &Vec<u8>, buf: &mut [u8]) -> Result<usize, CodecError> {
        buf[..frame.len()].copy_from_slice(frame);
        Ok(frame.len())
    }

    fn decode_header(&self, buf: &[u8]) -> Result<FrameHeader, CodecError> {
        Ok(FrameHeader {
            address: buf[0],
            function: buf[1],
        })
    }

    fn decode_frame(&self, buf: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(buf.to_vec())
    }
}

/// Replays the same frame forever in fixed-size chunks.
struct Replay {
    frame: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for Replay {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf
            .len()
            .min(self.chunk)
            .min(self.frame.len() - self.pos);
        buf[..n].copy_from_slice(&self.frame[self.pos..self.pos + n]);
        self.pos = (self.pos + n) % self.frame.len();
        Ok(n)
    }
}

impl Write for Replay {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn receive_benchmark(c: &mut Criterion) {
    // Read-holding-registers reply with a 16-byte data payload.
    let mut frame = vec![0x11, 0x03, 0x10];
    frame.extend((0..16).map(|i| i as u8));
    frame.extend_from_slice(&[0xAA, 0x55]);
    let len = frame.len();

    let mut group = c.benchmark_group("receive");
    group.throughput(Throughput::Bytes(len as u64));

    for chunk in [1usize, 8, 64] {
        group.bench_function(format!("chunk_{chunk}"), |b| {
            let replay = Replay {
                frame: frame.clone(),
                pos: 0,
                chunk,
            };
            let mut transport = RtuTransport::new(replay, RawCodec);
            b.iter(|| {
                let frame = transport.receive().unwrap();
                black_box(frame)
            })
        });
    }

    group.finish();
}

fn length_table_benchmark(c: &mut Criterion) {
    c.bench_function("reply_body_length", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for function in 0u8..=0x20 {
                total += serbus::reply_body_length(black_box(function), black_box(4));
            }
            black_box(total)
        })
    });
}

criterion_group!(benches, receive_benchmark, length_table_benchmark);
criterion_main!(benches);
