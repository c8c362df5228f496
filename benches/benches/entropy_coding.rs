//! Benchmarks for Huffman decoding and entropy-coded segment handling

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dng_bitstream::{BitReader, HuffmanTable};
use dng_ljpeg::{destuff, magnitude_to_difference};

/// Categories 0..=16 with five-bit codes equal to the category
fn uniform_table() -> HuffmanTable<u8> {
    let mut counts = [0u8; 16];
    counts[4] = 17;
    let values: Vec<u8> = (0..=16).collect();
    HuffmanTable::canonical(&counts, &values).unwrap()
}

fn bench_huffman_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Huffman Decode");

    let table = uniform_table();
    // Five-bit codes cycling through categories 0..=15
    let mut data = Vec::new();
    let (mut acc, mut bits) = (0u64, 0u32);
    for i in 0..32768u64 {
        acc = (acc << 5) | (i % 16);
        bits += 5;
        while bits >= 8 {
            bits -= 8;
            data.push((acc >> bits) as u8);
        }
    }
    let symbols = data.len() * 8 / 5;
    group.throughput(Throughput::Elements(symbols as u64));

    group.bench_function("five_bit_codes", |b| {
        b.iter(|| {
            let mut reader = BitReader::new(black_box(&data));
            let mut sum = 0i32;
            for _ in 0..symbols {
                let ssss = table.decode(&mut reader).unwrap();
                sum = sum.wrapping_add(magnitude_to_difference(ssss, 0));
            }
            sum
        });
    });

    group.finish();
}

fn bench_destuff(c: &mut Criterion) {
    let mut group = c.benchmark_group("Byte Destuffing");

    let mut data: Vec<u8> = (0..65536u32)
        .flat_map(|i| if i % 64 == 0 { vec![0xFF, 0x00] } else { vec![(i % 255) as u8] })
        .collect();
    data.extend_from_slice(&[0xFF, 0xD9]);
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("stuffed_64k", |b| {
        b.iter(|| destuff(black_box(&data), 0));
    });

    group.finish();
}

criterion_group!(benches, bench_huffman_decode, bench_destuff);
criterion_main!(benches);
