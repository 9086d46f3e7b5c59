use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabstream::{BookReader, CellValue, Dispatcher, IoBuffer, SheetReaderBuilder};

fn grid(rows: usize, columns: usize) -> Vec<Vec<CellValue>> {
    (0..rows)
        .map(|r| {
            (0..columns)
                .map(|c| CellValue::Int((r * columns + c) as i64))
                .collect()
        })
        .collect()
}

fn benchmark_windowed_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_streaming");

    for size in [1000, 10000].iter() {
        let source = grid(*size, 20);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let rows = SheetReaderBuilder::new()
                    .start_row(10)
                    .start_column(2)
                    .column_limit(10)
                    .build_from_grid(black_box(source.clone()))
                    .rows();
                rows.count()
            });
        });
    }

    group.finish();
}

fn benchmark_csv_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_read");
    group.sample_size(10);

    for size in [1000, 10000].iter() {
        let mut content = String::new();
        for i in 0..*size {
            content.push_str(&format!("{i},Name_{i},{}\n", i * 100));
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let dispatcher = Dispatcher::with_builtins();
            b.iter(|| {
                let mut reader = dispatcher.create_reader("csv", None).unwrap();
                reader
                    .open_buffer(IoBuffer::Text(black_box(content.clone())))
                    .unwrap();
                let book = reader.read_all().unwrap();
                book.len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_windowed_streaming, benchmark_csv_read);
criterion_main!(benches);
